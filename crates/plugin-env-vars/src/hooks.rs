//! Hook implementations for the env-vars plugin.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use petitorium_core::error::AppError;
use petitorium_core::result::AppResult;
use petitorium_core::types::RequestData;
use petitorium_plugin::{HookContext, HookHandler};

use crate::template::interpolate;

/// Settings key holding fallback values for unset variables.
pub const DEFAULTS_KEY: &str = "defaults";

/// Settings key controlling whether leftover placeholders fail validation.
pub const STRICT_KEY: &str = "strict";

/// Hook handler for pre_request: substitute `{{name}}` placeholders.
#[derive(Debug, Default)]
pub struct SubstituteHook;

#[async_trait]
impl HookHandler for SubstituteHook {
    async fn handle(&self, ctx: &mut HookContext) -> AppResult<()> {
        let defaults = match ctx.setting(DEFAULTS_KEY) {
            Some(Value::Object(map)) => map.clone(),
            _ => Default::default(),
        };
        let environment = ctx.environment.clone();

        let Some(request) = ctx.request_mut() else {
            return Ok(());
        };

        let lookup = |name: &str| {
            environment
                .get(name)
                .cloned()
                .or_else(|| defaults.get(name).map(render))
        };

        let replaced = substitute_request(request, lookup);
        debug!(replaced = replaced, url = %request.url, "Environment variables substituted");

        Ok(())
    }
}

/// Hook handler for request_validation: reject unresolved placeholders.
#[derive(Debug, Default)]
pub struct ValidateHook;

#[async_trait]
impl HookHandler for ValidateHook {
    async fn handle(&self, ctx: &mut HookContext) -> AppResult<()> {
        let strict = ctx.setting_bool(STRICT_KEY).unwrap_or(true);

        let Some(request) = ctx.request.as_ref() else {
            return Ok(());
        };

        let unresolved = request.placeholders();
        if unresolved.is_empty() {
            return Ok(());
        }

        if strict {
            return Err(AppError::validation(format!(
                "Unresolved environment variables: {}",
                unresolved.join(", ")
            )));
        }

        warn!(
            unresolved = %unresolved.join(", "),
            url = %request.url,
            "Request still contains placeholders"
        );
        Ok(())
    }
}

/// Substitutes placeholders in the URL, header values and body. Returns
/// how many were replaced.
fn substitute_request<F>(request: &mut RequestData, lookup: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let mut replaced = 0;
    let mut apply = |text: &mut String| {
        let out = interpolate(text, &lookup);
        replaced += out.replaced;
        *text = out.text;
    };

    apply(&mut request.url);
    for value in request.headers.values_mut() {
        apply(value);
    }
    apply(&mut request.body);

    replaced
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use petitorium_core::config::PluginSettings;
    use serde_json::json;

    use super::*;

    fn ctx_with(request: RequestData, settings: PluginSettings) -> HookContext {
        let mut ctx = HookContext::for_request(request).with_environment(HashMap::from([
            ("host".to_string(), "api.example.com".to_string()),
            ("token".to_string(), "s3cret".to_string()),
        ]));
        ctx.config = Arc::new(settings);
        ctx
    }

    #[tokio::test]
    async fn test_substitutes_url_headers_and_body() {
        let request = RequestData::new("post", "https://{{host}}/items")
            .with_header("Authorization", "Bearer {{token}}")
            .with_body(r#"{"host":"{{host}}"}"#);
        let mut ctx = ctx_with(request, PluginSettings::new());

        SubstituteHook.handle(&mut ctx).await.unwrap();

        let request = ctx.request.expect("request kept");
        assert_eq!(request.url, "https://api.example.com/items");
        assert_eq!(request.header("authorization"), Some("Bearer s3cret"));
        assert_eq!(request.body, r#"{"host":"api.example.com"}"#);
    }

    #[tokio::test]
    async fn test_defaults_fill_unset_variables() {
        let mut settings = PluginSettings::new();
        settings.insert(
            DEFAULTS_KEY.to_string(),
            json!({"version": "v2", "host": "ignored", "page": 3}),
        );
        let request = RequestData::new("GET", "https://{{host}}/{{version}}?page={{page}}");
        let mut ctx = ctx_with(request, settings);

        SubstituteHook.handle(&mut ctx).await.unwrap();

        assert_eq!(
            ctx.request.map(|r| r.url).as_deref(),
            Some("https://api.example.com/v2?page=3")
        );
    }

    #[tokio::test]
    async fn test_no_request_is_a_no_op() {
        let mut ctx = HookContext::new();
        SubstituteHook.handle(&mut ctx).await.unwrap();
        ValidateHook.handle(&mut ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_strict_validation_rejects_leftovers() {
        let request = RequestData::new("GET", "https://{{missing}}/x")
            .with_header("X-Key", "{{also_missing}}");
        let mut ctx = ctx_with(request, PluginSettings::new());

        let err = ValidateHook.handle(&mut ctx).await.unwrap_err();
        assert_eq!(err.kind, petitorium_core::error::ErrorKind::Validation);
        assert!(err.message.contains("missing, also_missing"));
    }

    #[tokio::test]
    async fn test_strict_validation_rejects_non_identifier_names() {
        let request = RequestData::new("GET", "https://{{api host}}/x")
            .with_body("{\"id\": \"{{user-id}}\"}");
        let mut ctx = ctx_with(request, PluginSettings::new());

        SubstituteHook.handle(&mut ctx).await.unwrap();
        let err = ValidateHook.handle(&mut ctx).await.unwrap_err();
        assert_eq!(err.kind, petitorium_core::error::ErrorKind::Validation);
        assert!(err.message.contains("api host, user-id"));
    }

    #[tokio::test]
    async fn test_lenient_validation_passes() {
        let mut settings = PluginSettings::new();
        settings.insert(STRICT_KEY.to_string(), json!(false));
        let request = RequestData::new("GET", "https://{{missing}}/x");
        let mut ctx = ctx_with(request, settings);

        ValidateHook.handle(&mut ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_resolved_request_validates() {
        let request = RequestData::new("GET", "https://api.example.com/x");
        let mut ctx = ctx_with(request, PluginSettings::new());
        ValidateHook.handle(&mut ctx).await.unwrap();
    }
}
