use std::{fmt, fs, path::Path};

use tracing::debug;

use crate::{
  aggregate::{AggregateModels, STATUS_TIMESTAMP_MODEL, STATUS_TIMESTAMP_RELATION},
  error::SchemaError,
  model::{FieldArity, Model, ModelField, ReferentialAction, Relation},
  relation::RelationTable,
  types::ScalarType,
};

const PREAMBLE: &str = r#"generator client {
  provider = "prisma-client-js"
  output = "../generated/prisma"
}

generator jsonSchema {
  provider = "prisma-json-schema-generator"
  output = "../json-schema"
  includeRequiredFields = "true"
  keepRelationFields = "false"
}

datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}
"#;

/// Models that do not depend on the sources, other than naming the main model.
pub fn static_models(main: &str) -> Vec<Model> {
  let main_id = format!("{}_id", main);

  vec![
    Model::new(STATUS_TIMESTAMP_MODEL)
      .field(
        ModelField::scalar("id", ScalarType::Int)
          .attribute("@id")
          .attribute("@default(autoincrement())"),
      )
      .field(ModelField::scalar("timestamp", ScalarType::DateTime).attribute("@default(now())"))
      .field(ModelField::scalar("status", ScalarType::Int).attribute("@default(0)"))
      .field(ModelField::scalar(main_id.as_str(), ScalarType::Int))
      .field(ModelField::relation(
        format!("{}_data", main),
        main,
        FieldArity::Required,
        Relation::foreign_key(STATUS_TIMESTAMP_RELATION, main_id.as_str(), ReferentialAction::Cascade),
      )),
    Model::new("app_heartbeat")
      .field(ModelField::scalar("name", ScalarType::String).attribute("@id"))
      .field(ModelField::scalar(main_id.as_str(), ScalarType::Int).optional())
      .field(ModelField::scalar("last_heartbeat", ScalarType::DateTime).attribute("@updatedAt")),
    Model::new("User")
      .field(
        ModelField::scalar("id", ScalarType::String)
          .attribute("@id")
          .attribute("@default(uuid())"),
      )
      .field(ModelField::scalar("username", ScalarType::String).attribute("@unique"))
      .field(ModelField::scalar("password", ScalarType::String))
      .field(
        ModelField::scalar("role", ScalarType::String)
          .attribute("@default(\"USER\")")
          .comment("Can be \"USER\", \"ADMIN\", etc."),
      )
      .field(ModelField::scalar("createdAt", ScalarType::DateTime).attribute("@default(now())"))
      .field(
        ModelField::scalar("updatedAt", ScalarType::DateTime)
          .attribute("@default(now())")
          .attribute("@updatedAt"),
      ),
  ]
}

/// A complete schema, in output order.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
  pub metadata: Model,
  pub instances: Vec<Model>,
  pub aggregate: AggregateModels,
  pub trailing: Vec<Model>,
}

impl SchemaDocument {
  pub fn new(metadata: Model, instances: Vec<Model>, aggregate: AggregateModels) -> Self {
    let trailing = static_models(&aggregate.main.name);

    Self {
      metadata,
      instances,
      aggregate,
      trailing,
    }
  }

  pub fn models(&self) -> impl Iterator<Item = &Model> {
    std::iter::once(&self.metadata)
      .chain(self.instances.iter())
      .chain(std::iter::once(&self.aggregate.main))
      .chain(self.aggregate.children.iter())
      .chain(self.trailing.iter())
  }

  pub fn validate(&self) -> Result<RelationTable, SchemaError> {
    RelationTable::from_models(self.models())
  }

  /// Validates the relations, then renders the schema text.
  pub fn render(&self) -> Result<String, SchemaError> {
    let relations = self.validate()?;
    debug!("schema has {} valid relations", relations.len());

    Ok(self.to_string())
  }
}

impl fmt::Display for SchemaDocument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(PREAMBLE)?;

    for model in self.models() {
      writeln!(f)?;
      write!(f, "{}", model)?;
    }

    Ok(())
  }
}

pub fn write_schema(path: &Path, contents: &str) -> Result<(), SchemaError> {
  let write_error = |source| SchemaError::Write {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(write_error)?;
  }

  fs::write(path, contents).map_err(write_error)
}
