use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Metadata record every capability implementation supplies.
///
/// Built once at registration time via the `with_*` methods and treated as
/// immutable afterwards. Input and output types use the raw
/// `"<type-tag> - <free text>"` convention; see [`crate::schema::translate`]
/// for how they become a function-calling schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Unique name across the registry.
    pub name: String,
    /// Free-text description. Demo commands and the output type are folded
    /// into this text during schema translation.
    pub description: String,
    /// Opaque version string, informational only.
    pub version: String,
    /// Parameter name -> raw descriptor string, in declaration order.
    /// Every declared parameter is required in the derived schema.
    pub input_types: Vec<(String, String)>,
    /// Raw descriptor string for the return value, if any.
    pub output_type: Option<String>,
    /// Example invocations, documentation only.
    pub demo_commands: Vec<Value>,
    /// Whether the capability needs an LLM backend. Informational.
    pub requires_external_engine: bool,
    /// Engine model identifier, only meaningful when
    /// `requires_external_engine` is set.
    pub model: Option<String>,
    /// Directory the capability writes artifacts to, if any.
    pub output_dir: Option<String>,
    /// Arbitrary extra metadata, passed through unchanged.
    pub user_metadata: Option<Value>,
}

impl CapabilityDescriptor {
    pub fn new(name: &str, description: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            version: version.to_string(),
            input_types: Vec::new(),
            output_type: None,
            demo_commands: Vec::new(),
            requires_external_engine: false,
            model: None,
            output_dir: None,
            user_metadata: None,
        }
    }

    /// Declare an input parameter. Declaration order is preserved in the
    /// derived schema.
    pub fn with_input(mut self, name: &str, raw_type: &str) -> Self {
        self.input_types.push((name.to_string(), raw_type.to_string()));
        self
    }

    pub fn with_output(mut self, raw_type: &str) -> Self {
        self.output_type = Some(raw_type.to_string());
        self
    }

    pub fn with_demo_command(mut self, demo: Value) -> Self {
        self.demo_commands.push(demo);
        self
    }

    pub fn with_external_engine(mut self, model: Option<&str>) -> Self {
        self.requires_external_engine = true;
        self.model = model.map(|m| m.to_string());
        self
    }

    pub fn with_output_dir(mut self, dir: &str) -> Self {
        self.output_dir = Some(dir.to_string());
        self
    }

    pub fn with_user_metadata(mut self, metadata: Value) -> Self {
        self.user_metadata = Some(metadata);
        self
    }

    /// Metadata record as JSON, for diagnostics and the CLI `info` command.
    pub fn metadata_json(&self) -> Value {
        let mut meta = json!({
            "name": self.name,
            "description": self.description,
            "version": self.version,
            "input_types": Value::Object(
                self.input_types
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            "output_type": self.output_type,
            "demo_commands": self.demo_commands,
            "requires_external_engine": self.requires_external_engine,
        });
        if let Some(user_metadata) = &self.user_metadata {
            meta["user_metadata"] = user_metadata.clone();
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_input_order() {
        let desc = CapabilityDescriptor::new("demo", "a demo", "1.0.0")
            .with_input("zulu", "str - last alphabetically")
            .with_input("alpha", "int - first alphabetically");

        let keys: Vec<&str> = desc.input_types.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zulu", "alpha"]);
    }

    #[test]
    fn test_metadata_json_includes_user_metadata_only_when_present() {
        let bare = CapabilityDescriptor::new("demo", "a demo", "1.0.0");
        assert!(bare.metadata_json().get("user_metadata").is_none());

        let with_meta = bare.with_user_metadata(json!({"limitations": "mock only"}));
        assert_eq!(
            with_meta.metadata_json()["user_metadata"]["limitations"],
            "mock only"
        );
    }

    #[test]
    fn test_external_engine_flag_defaults_off() {
        let desc = CapabilityDescriptor::new("demo", "a demo", "1.0.0");
        assert!(!desc.requires_external_engine);
        assert!(desc.model.is_none());

        let desc = desc.with_external_engine(Some("gpt-4o-mini"));
        assert!(desc.requires_external_engine);
        assert_eq!(desc.model.as_deref(), Some("gpt-4o-mini"));
    }
}
