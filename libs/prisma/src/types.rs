use std::fmt;

/// Prisma scalar types the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
  String,
  Int,
  BigInt,
  Float,
  Boolean,
  DateTime,
}

impl ScalarType {
  pub fn as_str(&self) -> &'static str {
    match self {
      ScalarType::String => "String",
      ScalarType::Int => "Int",
      ScalarType::BigInt => "BigInt",
      ScalarType::Float => "Float",
      ScalarType::Boolean => "Boolean",
      ScalarType::DateTime => "DateTime",
    }
  }
}

impl fmt::Display for ScalarType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Maps a config type tag to its Prisma scalar.
///
/// Tags are case-sensitive and cover both the generic names (`Int32`, `String`, ...) and the PLC
/// names (`DINT`, `REAL`, ...). Anything else, including a missing tag, is stored as a `String`.
pub fn map_type_tag(tag: Option<&str>) -> ScalarType {
  match tag {
    Some("Float" | "float32" | "Double" | "REAL") => ScalarType::Float,
    Some("String" | "string" | "STRING") => ScalarType::String,
    Some("Boolean" | "BOOL") => ScalarType::Boolean,
    Some(
      "Int16" | "int16" | "Int32" | "int32" | "BYTE" | "WORD" | "DWORD" | "SINT" | "USINT" | "INT"
      | "UINT" | "DINT" | "UDINT",
    ) => ScalarType::Int,
    Some("Int64" | "int64") => ScalarType::BigInt,
    _ => ScalarType::String,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_the_whole_vocabulary() {
    let table = [
      ("Float", ScalarType::Float),
      ("float32", ScalarType::Float),
      ("Double", ScalarType::Float),
      ("REAL", ScalarType::Float),
      ("String", ScalarType::String),
      ("string", ScalarType::String),
      ("STRING", ScalarType::String),
      ("Boolean", ScalarType::Boolean),
      ("BOOL", ScalarType::Boolean),
      ("Int16", ScalarType::Int),
      ("int16", ScalarType::Int),
      ("Int32", ScalarType::Int),
      ("int32", ScalarType::Int),
      ("BYTE", ScalarType::Int),
      ("WORD", ScalarType::Int),
      ("DWORD", ScalarType::Int),
      ("SINT", ScalarType::Int),
      ("USINT", ScalarType::Int),
      ("INT", ScalarType::Int),
      ("UINT", ScalarType::Int),
      ("DINT", ScalarType::Int),
      ("UDINT", ScalarType::Int),
      ("Int64", ScalarType::BigInt),
      ("int64", ScalarType::BigInt),
    ];

    for (tag, expected) in table {
      assert_eq!(map_type_tag(Some(tag)), expected, "tag {}", tag);
    }
  }

  #[test]
  fn unknown_tags_fall_back_to_string() {
    for tag in ["boolean", "float", "LREAL", "Int8", "", "TIME"] {
      assert_eq!(map_type_tag(Some(tag)), ScalarType::String, "tag {}", tag);
    }
    assert_eq!(map_type_tag(None), ScalarType::String);
  }

  #[test]
  fn displays_prisma_names() {
    assert_eq!(ScalarType::BigInt.to_string(), "BigInt");
    assert_eq!(ScalarType::DateTime.to_string(), "DateTime");
  }
}
