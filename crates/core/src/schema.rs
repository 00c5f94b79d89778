//! Translation from the loose descriptor convention into the strict
//! function-calling schema consumed by the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::descriptor::CapabilityDescriptor;
use crate::error::{Error, Result};

/// Top-level function-calling schema:
/// `{"type": "function", "function": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub param_type: String,
    /// Property name -> `{"type": ..., "description": ...}`, in the
    /// descriptor's declaration order (serde_json preserve_order).
    pub properties: Map<String, Value>,
    /// All declared parameters; the schema dialect has no optional ones.
    pub required: Vec<String>,
}

/// Map a descriptor type tag onto the schema dialect's type names.
/// Unrecognized tags pass through verbatim.
fn map_type_tag(tag: &str) -> &str {
    match tag {
        "str" => "string",
        "int" => "integer",
        "float" => "number",
        "bool" => "boolean",
        "list" => "array",
        "dict" => "object",
        other => other,
    }
}

/// Split a raw `"<type-tag> - <free text>"` string into (type, description).
fn parse_type_and_description(field: &str, raw: &str) -> Result<(String, String)> {
    let (tag, desc) = raw.split_once(" - ").ok_or_else(|| {
        Error::MalformedDescriptor(format!(
            "field '{}': missing ' - ' separator in '{}'",
            field, raw
        ))
    })?;
    Ok((map_type_tag(tag.trim()).to_string(), desc.trim().to_string()))
}

/// Build the external function-calling schema for a descriptor.
///
/// Pure function of its input. The schema dialect has no fields for demo
/// commands or the output type, so both are folded into the description
/// text.
pub fn translate(descriptor: &CapabilityDescriptor) -> Result<FunctionSchema> {
    let mut description = descriptor.description.clone();

    if !descriptor.demo_commands.is_empty() {
        description.push_str(&format!(
            " Demo command(s): {}.",
            serde_json::to_string_pretty(&descriptor.demo_commands)?
        ));
    }
    if let Some(raw) = &descriptor.output_type {
        let (out_type, out_desc) = parse_type_and_description("output_type", raw)?;
        description.push_str(&format!(
            " Output type is {} and it is {}.",
            out_type, out_desc
        ));
    }

    let mut properties = Map::new();
    let mut required = Vec::with_capacity(descriptor.input_types.len());
    for (param, raw) in &descriptor.input_types {
        let (param_type, param_desc) = parse_type_and_description(param, raw)?;
        properties.insert(
            param.clone(),
            json!({ "type": param_type, "description": param_desc }),
        );
        required.push(param.clone());
    }

    Ok(FunctionSchema {
        schema_type: "function".to_string(),
        function: FunctionSpec {
            name: descriptor.name.clone(),
            description,
            parameters: ParameterSpec {
                param_type: "object".to_string(),
                properties,
                required,
            },
        },
    })
}
