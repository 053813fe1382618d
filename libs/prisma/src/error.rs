use std::{fmt, path::PathBuf};

use deploygen_config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationSide {
  /// The field owning the foreign key (`fields: [...]`).
  Forward,
  /// The reverse field naming the relation only.
  Back,
}

impl fmt::Display for RelationSide {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RelationSide::Forward => f.write_str("forward"),
      RelationSide::Back => f.write_str("back-reference"),
    }
  }
}

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("failed to list instance configs under \"{}\": {source}", .path.display())]
  ListInstances {
    path: PathBuf,
    source: walkdir::Error,
  },
  #[error("no generic source is declared, the main model cannot be generated")]
  MissingGenericSource,
  #[error("model \"{0}\" is declared more than once")]
  DuplicateModel(String),
  #[error("relation \"{name}\" has more than one {side} field ({first} and {second})")]
  DuplicateRelation {
    name: String,
    side: RelationSide,
    first: String,
    second: String,
  },
  #[error("relation \"{name}\" has no {missing} field")]
  UnpairedRelation { name: String, missing: RelationSide },
  #[error("relation \"{name}\" on {field} points at unknown model \"{target}\"")]
  UnknownRelationTarget {
    name: String,
    field: String,
    target: String,
  },
  #[error("relation \"{name}\" pairs {forward} with {back}, which do not reference each other")]
  MismatchedRelation {
    name: String,
    forward: String,
    back: String,
  },
  #[error("failed to write schema to \"{}\": {source}", .path.display())]
  Write {
    path: PathBuf,
    source: std::io::Error,
  },
}
