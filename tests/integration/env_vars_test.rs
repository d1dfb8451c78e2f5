//! Integration tests for the env-vars plugin admitted from configuration.

mod helpers;

use std::collections::HashMap;
use std::sync::Arc;

use petitorium_core::error::ErrorKind;
use petitorium_core::types::HookType;
use petitorium_plugin::{Plugin, PluginError};
use plugin_env_vars::EnvVarsPlugin;

const CONFIG: &str = r#"
[plugins]
enabled = ["env-vars"]

[plugins.config.env-vars.defaults]
api_version = "v3"
"#;

fn candidates() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(EnvVarsPlugin::new())]
}

#[tokio::test]
async fn test_request_pipeline_substitutes_from_environment_and_defaults() {
    let config = helpers::config_from_toml(CONFIG);
    let host = helpers::host_from(&config);
    let report = host.admit_enabled(candidates());
    assert_eq!(report.admitted, vec!["env-vars"]);

    let mut ctx = helpers::get_ctx("https://{{host}}/{{api_version}}/users")
        .with_environment(HashMap::from([(
            "host".to_string(),
            "staging.example.com".to_string(),
        )]));

    host.dispatch(HookType::PreRequest, &mut ctx).await.unwrap();
    host.dispatch(HookType::RequestValidation, &mut ctx)
        .await
        .unwrap();

    assert_eq!(
        ctx.request.map(|r| r.url),
        Some("https://staging.example.com/v3/users".to_string())
    );
}

#[tokio::test]
async fn test_not_enabled_plugin_is_skipped() {
    let config = helpers::config_from_toml("[plugins]\nenabled = []\n");
    let host = helpers::host_from(&config);
    let report = host.admit_enabled(candidates());

    assert!(report.admitted.is_empty());
    assert_eq!(report.skipped, vec!["env-vars"]);
    assert!(!host.hook_registry().has_hooks(HookType::PreRequest));
}

#[tokio::test]
async fn test_unresolved_variable_rejected_by_validation() {
    let config = helpers::config_from_toml(CONFIG);
    let host = helpers::host_from(&config);
    host.admit_enabled(candidates());

    let mut ctx = helpers::get_ctx("https://{{unknown_host}}/");
    host.dispatch(HookType::PreRequest, &mut ctx).await.unwrap();
    let err = host
        .dispatch(HookType::RequestValidation, &mut ctx)
        .await
        .unwrap_err();

    match &err {
        PluginError::HookFailure { plugin, source, .. } => {
            assert_eq!(plugin, "env-vars");
            assert_eq!(source.kind, ErrorKind::Validation);
            assert!(source.message.contains("unknown_host"));
        }
        other => panic!("expected hook failure, got {other}"),
    }
}

#[tokio::test]
async fn test_lenient_mode_allows_leftovers() {
    let config = helpers::config_from_toml(
        r#"
[plugins]
enabled = ["env-vars"]

[plugins.config.env-vars]
strict = false
"#,
    );
    let host = helpers::host_from(&config);
    host.admit_enabled(candidates());

    let mut ctx = helpers::get_ctx("https://{{unknown_host}}/");
    host.dispatch(HookType::PreRequest, &mut ctx).await.unwrap();
    host.dispatch(HookType::RequestValidation, &mut ctx)
        .await
        .unwrap();
}
