//! Core data types for tool descriptors and their parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Descriptor schema version emitted by this crate.
pub const DESCRIPTOR_SCHEMA_VERSION: &str = "1.0";

/// A discoverable tool exposed to assistant clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub schema_version: String,
    pub id: String,
    pub display_name: String,
    pub source_path: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<ToolParameter>,
    #[serde(default)]
    pub outputs: Vec<ToolParameter>,
}

/// A single input or output parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolParameter {
    pub name: String,
    pub display_name: String,
    /// Host data-type tag, e.g. `double`, `string`, `featureClass`.
    pub data_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ParameterValidation>,
}

/// Optional constraints a host applies to a parameter value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Free-text rule shown to the user, not machine-checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl ToolDescriptor {
    /// Look up an input parameter by name.
    pub fn input(&self, name: &str) -> Option<&ToolParameter> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Look up an output parameter by name.
    pub fn output(&self, name: &str) -> Option<&ToolParameter> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Check structural consistency of the descriptor.
    ///
    /// Rejects an empty id, duplicate parameter names within one direction,
    /// and inverted numeric or length bounds.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.id.trim().is_empty() {
            return Err(ProviderError::Catalog(
                "Tool descriptor id must not be empty".to_string(),
            ));
        }

        for (direction, params) in [("input", &self.inputs), ("output", &self.outputs)] {
            let mut seen = std::collections::HashSet::new();
            for param in params {
                if !seen.insert(param.name.as_str()) {
                    return Err(ProviderError::Catalog(format!(
                        "Tool '{}' declares {direction} parameter '{}' more than once",
                        self.id, param.name
                    )));
                }
                if let Some(rules) = &param.validation {
                    rules.check_bounds().map_err(|reason| {
                        ProviderError::Catalog(format!(
                            "Tool '{}' parameter '{}': {reason}",
                            self.id, param.name
                        ))
                    })?;
                }
            }
        }

        Ok(())
    }
}

impl ParameterValidation {
    fn check_bounds(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("min {min} exceeds max {max}"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(format!("minLength {min} exceeds maxLength {max}"));
            }
        }
        if matches!(&self.allowed_values, Some(values) if values.is_empty()) {
            return Err("allowedValues must not be empty".to_string());
        }
        Ok(())
    }
}

/// Errors raised by capability providers.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Convenience result type.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param(name: &str) -> ToolParameter {
        ToolParameter {
            name: name.to_string(),
            display_name: name.to_string(),
            data_type: "string".to_string(),
            required: false,
            default_value: None,
            validation: None,
        }
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor {
            schema_version: DESCRIPTOR_SCHEMA_VERSION.to_string(),
            id: "clip".to_string(),
            display_name: "Clip".to_string(),
            source_path: "toolboxes/analysis.tbx/Clip".to_string(),
            category: "Analysis".to_string(),
            description: String::new(),
            last_modified: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            dependencies: vec![],
            inputs: vec![param("in_features"), param("clip_features")],
            outputs: vec![param("out_features")],
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(value["schemaVersion"], "1.0");
        assert_eq!(value["displayName"], "Clip");
        assert_eq!(value["sourcePath"], "toolboxes/analysis.tbx/Clip");
        assert_eq!(value["inputs"][0]["dataType"], "string");
        assert!(value["inputs"][0].get("defaultValue").is_none());
    }

    #[test]
    fn test_deserializes_minimal_parameter() {
        let p: ToolParameter = serde_json::from_value(json!({
            "name": "distance",
            "displayName": "Distance",
            "dataType": "double",
            "validation": { "min": 0.0, "max": 10.0 }
        }))
        .unwrap();
        assert!(!p.required);
        assert_eq!(p.validation.unwrap().max, Some(10.0));
    }

    #[test]
    fn test_lookup_by_name() {
        let d = descriptor();
        assert!(d.input("clip_features").is_some());
        assert!(d.input("out_features").is_none());
        assert!(d.output("out_features").is_some());
    }

    #[test]
    fn test_validate_ok() {
        assert!(descriptor().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_id() {
        let mut d = descriptor();
        d.id = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_input() {
        let mut d = descriptor();
        d.inputs.push(param("in_features"));
        let err = d.validate().unwrap_err();
        assert!(err.to_string().contains("in_features"));
    }

    #[test]
    fn test_same_name_across_directions_is_allowed() {
        let mut d = descriptor();
        d.outputs.push(param("in_features"));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_range() {
        let mut d = descriptor();
        d.inputs[0].validation = Some(ParameterValidation {
            min: Some(5.0),
            max: Some(1.0),
            ..Default::default()
        });
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_validate_empty_enum() {
        let mut d = descriptor();
        d.inputs[0].validation = Some(ParameterValidation {
            allowed_values: Some(vec![]),
            ..Default::default()
        });
        assert!(d.validate().is_err());
    }
}
