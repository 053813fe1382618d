use std::fmt;

use serde::de::{self, Deserializer, Visitor};

struct OptionalNonEmptyStringVisitor;

impl<'de> Visitor<'de> for OptionalNonEmptyStringVisitor {
  type Value = Option<String>;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a string or null")
  }

  fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
  where
    E: de::Error,
  {
    match value.trim().is_empty() {
      true => Ok(None),
      false => Ok(Some(value.to_string())),
    }
  }

  fn visit_none<E>(self) -> Result<Self::Value, E>
  where
    E: de::Error,
  {
    Ok(None)
  }

  fn visit_unit<E>(self) -> Result<Self::Value, E>
  where
    E: de::Error,
  {
    Ok(None)
  }

  fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_str(self)
  }
}

/// Reads an optional string where an empty (or blank) string means "not configured".
///
/// Older input configs disable features by leaving an image name empty; this keeps them working
/// while the typed config only deals with `Option<String>`.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  deserializer.deserialize_option(OptionalNonEmptyStringVisitor)
}
