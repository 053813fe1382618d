use tracing::warn;

use crate::{
  error::SchemaError,
  model::{FieldArity, Model, ModelField, ReferentialAction, Relation},
  profile::{relation_name, GeneratorProfile},
  sources::{FieldSet, Sources, GENERIC_PREFIX},
  types::{map_type_tag, ScalarType},
};

pub const STATUS_TIMESTAMP_MODEL: &str = "status_timestamp";
pub const STATUS_TIMESTAMP_RELATION: &str = "status_timestamp_rel";

/// The main model and the child models hanging off it.
#[derive(Debug, Clone)]
pub struct AggregateModels {
  pub main: Model,
  pub children: Vec<Model>,
}

impl AggregateModels {
  /// Whether the main model references the metadata model.
  pub fn has_metadata_link(&self, profile: &GeneratorProfile) -> bool {
    self.main.get(&profile.metadata_fk_field).is_some()
  }
}

/// Every `generic_` occurrence is removed, not only the prefix.
pub fn main_model_name(generic_key: &str) -> String {
  generic_key.replace(GENERIC_PREFIX, "")
}

fn build_child_model(name: &str, fields: &FieldSet, main: &str) -> Model {
  let mut model =
    Model::new(name).field(ModelField::scalar("id", ScalarType::Int).attribute("@id").attribute("@unique"));

  for (field_name, descriptor) in fields {
    model.push(ModelField::scalar(field_name.as_str(), map_type_tag(descriptor.tag())).optional());
  }

  model.push(ModelField::relation(
    main,
    main,
    FieldArity::Required,
    Relation::foreign_key(relation_name(name), "id", ReferentialAction::Cascade),
  ));

  model
}

fn build_main_model(name: &str, fields: &FieldSet, profile: &GeneratorProfile) -> Model {
  let mut model = Model::new(name).field(
    ModelField::scalar("id", ScalarType::Int)
      .attribute("@id")
      .attribute("@default(autoincrement())"),
  );

  for (field_name, descriptor) in fields {
    let field = ModelField::scalar(field_name.as_str(), map_type_tag(descriptor.tag()));
    model.push(match *field_name == profile.unique_field {
      true => field.attribute("@unique"),
      false => field.optional(),
    });
  }

  if fields.contains_key(&profile.metadata_fk_field) {
    model.push(ModelField::relation(
      profile.metadata_model.as_str(),
      profile.metadata_model.as_str(),
      FieldArity::Optional,
      Relation::foreign_key(
        profile.metadata_relation.as_str(),
        profile.metadata_fk_field.as_str(),
        ReferentialAction::SetNull,
      ),
    ));
  }

  model.push(
    ModelField::scalar("createdAt", ScalarType::DateTime).attribute("@default(now())"),
  );
  model.push(ModelField::relation(
    STATUS_TIMESTAMP_MODEL,
    STATUS_TIMESTAMP_MODEL,
    FieldArity::List,
    Relation::back_reference(STATUS_TIMESTAMP_RELATION),
  ));

  model
}

/// Builds the main model from the generic source and one child model per other non-empty source.
pub fn build_aggregate_models(
  sources: &Sources,
  profile: &GeneratorProfile,
) -> Result<AggregateModels, SchemaError> {
  let (generic_key, generic_fields) = sources.generic().ok_or(SchemaError::MissingGenericSource)?;

  for (key, _) in sources.iter().filter(|(key, _)| Sources::is_generic(key)) {
    if key != generic_key {
      warn!(
        "ignoring generic source \"{}\", \"{}\" already backs the main model",
        key, generic_key
      );
    }
  }

  let main_name = main_model_name(generic_key);
  let mut main = build_main_model(&main_name, generic_fields, profile);
  let mut children = vec![];

  for (key, fields) in sources.iter() {
    if Sources::is_generic(key) || fields.is_empty() {
      continue;
    }

    let child_name = profile.child_model_name(key);
    children.push(build_child_model(&child_name, fields, &main_name));
    main.push(ModelField::relation(
      child_name.as_str(),
      child_name.as_str(),
      FieldArity::List,
      Relation::back_reference(relation_name(&child_name)),
    ));
  }

  Ok(AggregateModels { main, children })
}

#[cfg(test)]
mod tests {
  use super::*;
  use deploygen_config::SourcesConfig;

  fn sources(json: serde_json::Value) -> Sources {
    Sources::from_config(serde_json::from_value::<SourcesConfig>(json).unwrap())
  }

  #[test]
  fn builds_main_model_with_unique_and_metadata_link() {
    let sources = sources(serde_json::json!({
      "sources": [{
        "source": "task",
        "generic_fields": true,
        "fields": {
          "odp": { "type": "String" },
          "job_card_id": { "type": "Int64" },
          "qty": { "type": "Int32" }
        }
      }]
    }));
    let profile = GeneratorProfile::default();
    let aggregate = build_aggregate_models(&sources, &profile).unwrap();

    assert!(aggregate.has_metadata_link(&profile));
    assert!(aggregate.children.is_empty());
    assert_eq!(
      aggregate.main.to_string(),
      concat!(
        "model task {\n",
        "  id Int @id @default(autoincrement())\n",
        "  odp String @unique\n",
        "  job_card_id BigInt?\n",
        "  qty Int?\n",
        "  job_card_metadata job_card_metadata? @relation(\"job_card_rel\", fields: [job_card_id], references: [id], onDelete: SetNull)\n",
        "  createdAt DateTime @default(now())\n",
        "  status_timestamp status_timestamp[] @relation(\"status_timestamp_rel\")\n",
        "}\n"
      )
    );
  }

  #[test]
  fn children_get_back_references_in_order() {
    let sources = sources(serde_json::json!({
      "sources": [
        { "source": "zeta", "fields": { "z": { "type": "REAL" } } },
        { "source": "task", "generic_fields": true, "fields": { "odp": { "type": "String" } } },
        { "source": "empty", "fields": {} },
        { "source": "alpha", "fields": { "a": { "dataType": "DINT" } } }
      ]
    }));
    let aggregate = build_aggregate_models(&sources, &GeneratorProfile::default()).unwrap();

    let children: Vec<&str> = aggregate.children.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(children, vec!["task_zeta", "task_alpha"]);

    let fields = aggregate.main.field_names();
    assert_eq!(&fields[fields.len() - 2..], &["task_zeta", "task_alpha"]);
    assert!(!aggregate.has_metadata_link(&GeneratorProfile::default()));

    assert_eq!(
      aggregate.children[1].to_string(),
      concat!(
        "model task_alpha {\n",
        "  id Int @id @unique\n",
        "  a Int?\n",
        "  task task @relation(\"task_alpha_rel\", fields: [id], references: [id], onDelete: Cascade)\n",
        "}\n"
      )
    );
  }

  #[test]
  fn recipe_profile_renames_children() {
    let sources = sources(serde_json::json!({
      "sources": [
        { "source": "recipe_step", "generic_fields": true, "fields": { "recipe_id": { "type": "Int32" } } },
        { "source": "dosing", "fields": { "grams": { "type": "Float" } } }
      ]
    }));
    let profile = GeneratorProfile::for_product_line(deploygen_config::ProductLine::Recipe);
    let aggregate = build_aggregate_models(&sources, &profile).unwrap();

    assert_eq!(aggregate.main.name, "recipe_step");
    assert_eq!(aggregate.children[0].name, "job_dosing");
    assert!(aggregate.main.get("recipe_metadata").is_some());
  }

  #[test]
  fn main_model_name_drops_every_generic_marker() {
    assert_eq!(main_model_name("generic_task"), "task");
    assert_eq!(main_model_name("generic_generic_x"), "x");
    assert_eq!(main_model_name("generic_line_generic_fields"), "line_fields");
  }

  #[test]
  fn missing_generic_source_is_fatal() {
    let sources = sources(serde_json::json!({
      "sources": [{ "source": "press", "fields": { "a": { "type": "INT" } } }]
    }));

    assert!(matches!(
      build_aggregate_models(&sources, &GeneratorProfile::default()),
      Err(SchemaError::MissingGenericSource)
    ));
  }
}
