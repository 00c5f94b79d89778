pub mod robo_action;

use std::sync::Arc;

use tracing::debug;

use toolrig_core::{Capability, Config, Result};
use toolrig_runtime::{CapabilityFactory, CapabilityRegistry};

pub use robo_action::RoboActionTool;

fn robo_action_factory() -> Result<Arc<dyn Capability>> {
    Ok(Arc::new(RoboActionTool::new()))
}

/// The built-in registration table: every (name, constructor) pair shipped
/// with the workspace. Embedders can extend the returned registry with their
/// own factories.
fn builtin_factories() -> Vec<(&'static str, CapabilityFactory)> {
    vec![("robo_action", robo_action_factory)]
}

/// Build the registry from the built-in table, honoring the configured
/// disabled list.
pub fn default_registry(config: &Config) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    for (name, factory) in builtin_factories() {
        if config.disabled_capabilities.iter().any(|d| d == name) {
            debug!(capability = name, "Skipping disabled capability");
            continue;
        }
        registry.register(factory);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry_has_builtins() {
        let registry = default_registry(&Config::default());
        assert!(registry.get("robo_action").is_some());
        assert_eq!(registry.len(), builtin_factories().len());
    }

    #[test]
    fn test_disabled_capability_excluded() {
        let config = Config {
            disabled_capabilities: vec!["robo_action".to_string()],
            ..Config::default()
        };
        let registry = default_registry(&config);
        assert!(registry.get("robo_action").is_none());
    }

    #[tokio::test]
    async fn test_domain_error_forwarded_as_response() {
        let registry = default_registry(&Config::default());
        let entry = registry.get("robo_action").unwrap();

        let id = entry.adapter.create(None).await.unwrap();
        let outcome = entry
            .adapter
            .execute(&id, json!({"action": "fly", "target": "cube_1"}))
            .await
            .unwrap();

        // The unsupported action is data in the response, not an Err.
        let response: serde_json::Value = serde_json::from_str(&outcome.response).unwrap();
        assert_eq!(response["status"], "error");
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("Unsupported action 'fly'"));
        entry.adapter.release(&id).await.unwrap();
    }
}
