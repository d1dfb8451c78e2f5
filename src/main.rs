//! Petitorium plugin host
//!
//! Loads configuration, admits the enabled built-in plugins, fires the
//! configuration hook, and keeps the plugins admitted until shutdown.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use petitorium_core::config::{AppConfig, LogFormat};
use petitorium_core::error::AppError;
use petitorium_core::types::HookType;
use petitorium_plugin::{HookContext, Plugin, PluginHost};
use plugin_env_vars::EnvVarsPlugin;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Host error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path = std::env::var("PETITORIUM_CONFIG")
        .unwrap_or_else(|_| "config/petitorium.toml".to_string());

    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Built-in plugins offered for admission.
fn builtin_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(EnvVarsPlugin::new())]
}

/// Main host run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Petitorium plugin host v{}", env!("CARGO_PKG_VERSION"));

    let host = PluginHost::with_config(config.plugins.clone(), &config.hooks);

    let report = host.admit_enabled(builtin_plugins());
    tracing::info!(
        admitted = report.admitted.len(),
        skipped = report.skipped.len(),
        rejected = report.rejected.len(),
        "Built-in plugins processed"
    );

    let mut ctx = HookContext::new().with_value(serde_json::to_value(&config)?);
    let dispatch = match host.dispatch(HookType::OnConfigLoad, &mut ctx).await {
        Ok(dispatch) => dispatch,
        Err(e) => {
            host.evict_all();
            return Err(e.into());
        }
    };
    tracing::info!(plugins = dispatch.invoked.len(), "Configuration hook fired");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, evicting plugins...");

    host.evict_all();
    tracing::info!("Petitorium plugin host stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
