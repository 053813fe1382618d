use crate::{
  aggregate::AggregateModels,
  model::{FieldArity, Model, ModelField, Relation},
  profile::{relation_name, GeneratorProfile},
  types::ScalarType,
};

const EPOCH_NOW: &str = r#"@default(dbgenerated("floor(EXTRACT(epoch FROM now()))"))"#;

/// The metadata model: fixed columns, then a back-reference per instance model.
pub fn build_metadata_model(
  profile: &GeneratorProfile,
  aggregate: &AggregateModels,
  instance_models: &[Model],
) -> Model {
  let mut model = Model::new(profile.metadata_model.as_str())
    .field(ModelField::scalar("id", ScalarType::BigInt).attribute("@id").attribute(EPOCH_NOW))
    .field(ModelField::scalar("name", ScalarType::String))
    .field(ModelField::scalar("new", ScalarType::Boolean).attribute("@default(false)"))
    .field(ModelField::scalar("colorNum", ScalarType::Int))
    .field(ModelField::scalar("notes", ScalarType::String).optional())
    .field(
      ModelField::scalar("status", ScalarType::Int)
        .attribute("@default(0)")
        .comment("status 0 ready 1 loaded in the machine"),
    )
    .field(ModelField::scalar("updatedAt", ScalarType::BigInt).attribute(EPOCH_NOW));

  // only paired when the main model carries the foreign key
  if aggregate.has_metadata_link(profile) {
    let main = aggregate.main.name.as_str();
    model.push(ModelField::relation(
      main,
      main,
      FieldArity::List,
      Relation::back_reference(profile.metadata_relation.as_str()),
    ));
  }

  for instance in instance_models {
    let name = instance.name.as_str();
    model.push(ModelField::relation(
      name,
      name,
      FieldArity::Optional,
      Relation::back_reference(relation_name(name)),
    ));
  }

  model
}
