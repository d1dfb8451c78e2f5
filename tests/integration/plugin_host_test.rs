//! Integration tests for plugin admission and hook dispatch.

mod helpers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use petitorium_core::types::{DispatchPolicy, HookType, ResponseData};
use petitorium_plugin::{HookContext, Plugin, PluginError, PluginHook, PluginHost, hook_fn};
use petitorium_plugin_sdk::PluginBuilder;
use tokio_util::sync::CancellationToken;

use helpers::CallLog;

#[tokio::test]
async fn test_pre_send_hook_sets_header() {
    let host = PluginHost::new();
    let plugin = PluginBuilder::new("h1", "1.0.0")
        .hook(HookType::PreSend, |ctx| {
            Box::pin(async move {
                if let Some(request) = ctx.request_mut() {
                    request.set_header("X-Test", "1");
                }
                Ok(())
            })
        })
        .build();
    host.admit_plugin(plugin).expect("admitted");

    let mut ctx = helpers::get_ctx("https://example.com");
    assert!(ctx.request.as_ref().is_some_and(|r| r.headers.is_empty()));

    host.dispatch(HookType::PreSend, &mut ctx)
        .await
        .expect("dispatch succeeds");

    let request = ctx.request.expect("request kept");
    assert_eq!(request.headers.get("X-Test").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn test_fail_fast_skips_later_hooks() {
    let log = CallLog::default();
    let host = PluginHost::new();
    host.admit_plugin(helpers::failing_plugin("H1", HookType::PostRequest, "boom", &log))
        .unwrap();
    host.admit_plugin(helpers::recording_plugin("H2", HookType::PostRequest, &log))
        .unwrap();

    let mut ctx = HookContext::new();
    let err = host
        .dispatch(HookType::PostRequest, &mut ctx)
        .await
        .expect_err("H1 fails");

    assert_eq!(log.calls(), vec!["H1"]);
    assert_eq!(err.plugin(), Some("H1"));
    let message = err.to_string();
    assert!(message.contains("H1"));
    assert!(message.contains("boom"));
}

#[tokio::test]
async fn test_best_effort_aggregates_exactly_the_failures() {
    let log = CallLog::default();
    let host = PluginHost::new();
    host.admit_plugin(helpers::failing_plugin("A", HookType::OnError, "first", &log))
        .unwrap();
    host.admit_plugin(helpers::recording_plugin("B", HookType::OnError, &log))
        .unwrap();

    let mut ctx = HookContext::new();
    let err = host
        .dispatch_with_policy(HookType::OnError, &mut ctx, DispatchPolicy::BestEffort)
        .await
        .expect_err("A fails");

    assert_eq!(log.calls(), vec!["A", "B"]);
    let failures = err.failures();
    assert!(matches!(err, PluginError::AggregateFailure { .. }));
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].plugin(), Some("A"));
}

#[tokio::test]
async fn test_configured_policy_applies() {
    let config = helpers::config_from_toml(
        r#"
[hooks]
notifications_best_effort = true
"#,
    );
    let host = helpers::host_from(&config);
    let log = CallLog::default();
    host.admit_plugin(helpers::failing_plugin("A", HookType::OnSuccess, "x", &log))
        .unwrap();
    host.admit_plugin(helpers::recording_plugin("B", HookType::OnSuccess, &log))
        .unwrap();

    let mut ctx = HookContext::new();
    let err = host.dispatch(HookType::OnSuccess, &mut ctx).await.unwrap_err();

    assert_eq!(log.calls(), vec!["A", "B"]);
    assert!(matches!(err, PluginError::AggregateFailure { .. }));
}

#[tokio::test]
async fn test_dispatch_order_is_admission_order() {
    let log = CallLog::default();
    let host = PluginHost::new();
    for name in ["zulu", "alpha", "mike"] {
        host.admit_plugin(helpers::recording_plugin(name, HookType::PreRequest, &log))
            .unwrap();
    }

    let mut ctx = HookContext::new();
    let report = host.dispatch(HookType::PreRequest, &mut ctx).await.unwrap();

    assert_eq!(log.calls(), vec!["zulu", "alpha", "mike"]);
    assert_eq!(report.invoked, log.calls());
}

#[tokio::test]
async fn test_evicted_plugin_never_runs_again() {
    let log = CallLog::default();
    let host = PluginHost::new();
    let multi = PluginBuilder::new("multi", "1.0.0")
        .hook(HookType::PreSend, {
            let log = log.clone();
            move |_ctx| {
                let log = log.clone();
                Box::pin(async move {
                    log.push("multi:pre_send");
                    Ok(())
                })
            }
        })
        .hook(HookType::PostReceive, {
            let log = log.clone();
            move |_ctx| {
                let log = log.clone();
                Box::pin(async move {
                    log.push("multi:post_receive");
                    Ok(())
                })
            }
        })
        .build();
    host.admit_plugin(multi).unwrap();
    host.admit_plugin(helpers::recording_plugin("other", HookType::PreSend, &log))
        .unwrap();

    assert!(host.evict_plugin("multi"));

    let mut ctx = HookContext::new();
    host.dispatch(HookType::PreSend, &mut ctx).await.unwrap();
    host.dispatch(HookType::PostReceive, &mut ctx).await.unwrap();

    assert_eq!(log.calls(), vec!["other"]);
    assert!(host.hook_registry().hooks_of("multi").is_empty());
}

#[derive(Debug)]
struct Declares;

impl Plugin for Declares {
    fn name(&self) -> &str {
        "declares"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        "provides a function for a hook it never declared"
    }

    fn hooks(&self) -> Vec<HookType> {
        vec![HookType::PreSave]
    }

    fn hook_funcs(&self) -> HashMap<HookType, PluginHook> {
        let ok = || hook_fn(|_ctx| Box::pin(async { Ok(()) }));
        HashMap::from([(HookType::PreSave, ok()), (HookType::PostSave, ok())])
    }
}

#[tokio::test]
async fn test_hook_set_mismatch_rejected_at_admission() {
    let host = PluginHost::new();
    let err = host.admit_plugin(Arc::new(Declares)).unwrap_err();

    assert!(matches!(err, PluginError::InvalidPlugin { .. }));
    assert!(host.list_plugins().is_empty());
    assert!(host.hook_registry().registered_hooks().is_empty());
}

#[tokio::test]
async fn test_concurrent_contexts_do_not_cross_contaminate() {
    let host = Arc::new(PluginHost::new());
    let plugin = PluginBuilder::new("echo-env", "1.0.0")
        .hook(HookType::PreSend, |ctx| {
            Box::pin(async move {
                let marker = ctx.environment.get("marker").cloned().unwrap_or_default();
                tokio::task::yield_now().await;
                if let Some(request) = ctx.request_mut() {
                    request.set_header("X-Marker", &marker);
                }
                Ok(())
            })
        })
        .build();
    host.admit_plugin(plugin).unwrap();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let host = host.clone();
            tokio::spawn(async move {
                let mut ctx = helpers::get_ctx("https://example.com").with_environment(
                    HashMap::from([("marker".to_string(), i.to_string())]),
                );
                let outcome = host.dispatch(HookType::PreSend, &mut ctx).await;
                outcome.map(|_| {
                    ctx.request
                        .and_then(|r| r.header("x-marker").map(str::to_string))
                })
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let marker = task.await.unwrap().unwrap();
        assert_eq!(marker, Some(i.to_string()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_from_config() {
    let config = helpers::config_from_toml(
        r#"
[hooks]
timeout_ms = 100
"#,
    );
    let host = helpers::host_from(&config);
    let plugin = PluginBuilder::new("sleepy", "1.0.0")
        .hook(HookType::PostReceive, |_ctx| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
        })
        .build();
    host.admit_plugin(plugin).unwrap();

    let mut ctx = HookContext::new();
    let err = host.dispatch(HookType::PostReceive, &mut ctx).await.unwrap_err();

    match err {
        PluginError::HookTimeout { plugin, timeout, .. } => {
            assert_eq!(plugin, "sleepy");
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("expected timeout, got {other}"),
    }
}

#[tokio::test]
async fn test_cancelled_request_stops_dispatch() {
    let log = CallLog::default();
    let host = PluginHost::new();
    host.admit_plugin(helpers::recording_plugin("a", HookType::PreSend, &log))
        .unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let mut ctx = helpers::get_ctx("https://example.com").with_cancellation(token);

    let err = host.dispatch(HookType::PreSend, &mut ctx).await.unwrap_err();
    assert!(matches!(err, PluginError::Cancelled { .. }));
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn test_evict_all_clears_host() {
    let log = CallLog::default();
    let host = PluginHost::new();
    host.admit_plugin(helpers::recording_plugin("a", HookType::PreSend, &log))
        .unwrap();
    host.admit_plugin(helpers::recording_plugin("b", HookType::OnError, &log))
        .unwrap();

    assert_eq!(host.evict_all(), 2);

    let mut ctx = HookContext::new();
    let report = host.dispatch(HookType::PreSend, &mut ctx).await.unwrap();
    assert!(report.invoked.is_empty());
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn test_on_success_hook_reads_response_status() {
    let log = CallLog::default();
    let recorder = log.clone();
    let host = PluginHost::new();
    let plugin = PluginBuilder::new("status", "1.0.0")
        .hook(HookType::OnSuccess, move |ctx| {
            let log = recorder.clone();
            let ok = ctx.http_response().is_some_and(ResponseData::is_success);
            Box::pin(async move {
                log.push(if ok { "2xx" } else { "other" });
                Ok(())
            })
        })
        .build();
    host.admit_plugin(plugin).expect("admitted");

    for status_code in [204, 503] {
        let mut ctx = helpers::get_ctx("https://example.com").with_response(ResponseData {
            status_code,
            ..Default::default()
        });
        host.dispatch(HookType::OnSuccess, &mut ctx)
            .await
            .expect("dispatch succeeds");
    }

    assert_eq!(log.calls(), vec!["2xx", "other"]);
}
