use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The sources file (`config_fe_be/config.json`), describing the field sets shared between
/// instance configs.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct SourcesConfig {
  /// List of source descriptors. A missing list is treated as empty.
  #[serde(default)]
  pub sources: Vec<SourceDescriptor>,
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SourceDescriptor {
  /// Name of the source. Instance directories whose name contains the source key inherit (and
  /// therefore do not repeat) the fields declared here.
  pub source: String,
  /// Marks the source holding the fields of the main aggregate entity.
  #[serde(default)]
  pub generic_fields: bool,
  /// Field name to field descriptor, in declaration order.
  #[serde(default)]
  pub fields: IndexMap<String, FieldDescriptor>,
}

/// A single declared field. Only the type tag is relevant for generation; other keys are
/// accepted and ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct FieldDescriptor {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub type_tag: Option<String>,
  /// PLC style configs use `dataType` instead of `type`.
  #[serde(rename = "dataType", default, skip_serializing_if = "Option::is_none")]
  pub data_type: Option<String>,
}

impl FieldDescriptor {
  pub fn new(type_tag: &str) -> Self {
    Self {
      type_tag: Some(type_tag.to_string()),
      data_type: None,
    }
  }

  /// `type` wins over `dataType`; empty values are ignored.
  pub fn tag(&self) -> Option<&str> {
    self
      .type_tag
      .as_deref()
      .filter(|t| !t.is_empty())
      .or_else(|| self.data_type.as_deref().filter(|t| !t.is_empty()))
  }
}

/// Per-instance config (`rw_configs/<name>/config.json`).
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct InstanceConfig {
  /// Field name to field descriptor for the fields this instance exposes.
  #[serde(default)]
  pub data: IndexMap<String, FieldDescriptor>,
}
