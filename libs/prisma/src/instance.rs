use std::path::{Path, PathBuf};

use deploygen_config::{read_document, InstanceConfig};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
  error::SchemaError,
  model::{FieldArity, Model, ModelField, ReferentialAction, Relation},
  profile::{relation_name, GeneratorProfile},
  sources::{FieldSet, Sources},
  types::{map_type_tag, ScalarType},
};

pub const INSTANCE_CONFIG_FILE: &str = "config.json";

/// An instance directory holding a `config.json`.
#[derive(Debug, Clone)]
pub struct InstanceDir {
  pub name: String,
  pub config_path: PathBuf,
}

/// Lists the instance directories under `base_dir`, sorted by name.
pub fn list_instance_dirs(base_dir: &Path) -> Result<Vec<InstanceDir>, SchemaError> {
  if !base_dir.is_dir() {
    warn!(
      "instance directory {:?} does not exist, no instance models will be generated",
      base_dir
    );
    return Ok(vec![]);
  }

  let mut dirs = vec![];

  for entry in WalkDir::new(base_dir)
    .min_depth(1)
    .max_depth(1)
    .follow_links(true)
    .sort_by_file_name()
  {
    let entry = entry.map_err(|source| SchemaError::ListInstances {
      path: base_dir.to_path_buf(),
      source,
    })?;

    if !entry.file_type().is_dir() {
      continue;
    }

    let config_path = entry.path().join(INSTANCE_CONFIG_FILE);
    if !config_path.is_file() {
      debug!("skipping {:?}, it has no {}", entry.path(), INSTANCE_CONFIG_FILE);
      continue;
    }

    dirs.push(InstanceDir {
      name: entry.file_name().to_string_lossy().into_owned(),
      config_path,
    });
  }

  Ok(dirs)
}

/// Fields of an instance that are not already declared by a matching source.
pub fn own_fields(directory_name: &str, declared: FieldSet, sources: &Sources) -> FieldSet {
  let mut remaining = declared;

  for (key, inherited) in sources.matching(directory_name) {
    debug!(
      "instance \"{}\" inherits {} fields from source \"{}\"",
      directory_name,
      inherited.len(),
      key
    );
    remaining.retain(|name, _| !inherited.contains_key(name));
  }

  remaining
}

pub fn build_instance_model(
  directory_name: &str,
  fields: &FieldSet,
  profile: &GeneratorProfile,
) -> Model {
  let name = profile.instance_model_name(directory_name);
  let mut model = Model::new(name.as_str()).field(
    ModelField::scalar("id", ScalarType::BigInt)
      .attribute("@id")
      .attribute("@unique"),
  );

  for (field_name, descriptor) in fields {
    model.push(ModelField::scalar(field_name.as_str(), map_type_tag(descriptor.tag())).optional());
  }

  model.push(ModelField::relation(
    profile.metadata_model.as_str(),
    profile.metadata_model.as_str(),
    FieldArity::Required,
    Relation::foreign_key(relation_name(&name), "id", ReferentialAction::Cascade),
  ));

  model
}

/// Builds one model per instance directory that still has fields of its own.
#[tracing::instrument(level = "debug", skip(sources, profile))]
pub fn build_instance_models(
  base_dir: &Path,
  sources: &Sources,
  profile: &GeneratorProfile,
) -> Result<Vec<Model>, SchemaError> {
  let mut models = vec![];

  for dir in list_instance_dirs(base_dir)? {
    let config = read_document::<InstanceConfig>(&dir.config_path)?;
    let fields = own_fields(&dir.name, config.data, sources);

    if fields.is_empty() {
      info!(
        "instance \"{}\" has no fields of its own, skipping its model",
        dir.name
      );
      continue;
    }

    models.push(build_instance_model(&dir.name, &fields, profile));
  }

  Ok(models)
}

#[cfg(test)]
mod tests {
  use super::*;
  use deploygen_config::{FieldDescriptor, SourcesConfig};

  fn field_set(names: &[(&str, &str)]) -> FieldSet {
    names
      .iter()
      .map(|(name, tag)| (name.to_string(), FieldDescriptor::new(tag)))
      .collect()
  }

  fn modbus_sources() -> Sources {
    let config: SourcesConfig = serde_json::from_value(serde_json::json!({
      "sources": [
        { "source": "modbus", "fields": { "a": { "type": "INT" }, "b": { "type": "REAL" } } }
      ]
    }))
    .unwrap();
    Sources::from_config(config)
  }

  #[test]
  fn subtracts_inherited_fields() {
    let declared = field_set(&[("a", "INT"), ("b", "REAL"), ("c", "BOOL")]);
    let remaining = own_fields("modbus_press", declared, &modbus_sources());

    assert_eq!(remaining.keys().collect::<Vec<_>>(), vec!["c"]);
  }

  #[test]
  fn keeps_fields_when_no_source_matches() {
    let declared = field_set(&[("a", "INT"), ("c", "BOOL")]);
    let remaining = own_fields("opcua_oven", declared, &modbus_sources());

    assert_eq!(remaining.len(), 2);
  }

  #[test]
  fn builds_optional_fields_and_metadata_relation() {
    let profile = GeneratorProfile::default();
    let model = build_instance_model("press", &field_set(&[("temp", "REAL")]), &profile);

    assert_eq!(
      model.to_string(),
      concat!(
        "model job_card_press {\n",
        "  id BigInt @id @unique\n",
        "  temp Float?\n",
        "  job_card_metadata job_card_metadata @relation(\"job_card_press_rel\", fields: [id], references: [id], onDelete: Cascade)\n",
        "}\n"
      )
    );
  }

  #[test]
  fn missing_base_dir_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let models = build_instance_models(
      &dir.path().join("rw_configs"),
      &Sources::default(),
      &GeneratorProfile::default(),
    )
    .unwrap();

    assert!(models.is_empty());
  }

  #[test]
  fn lists_only_directories_with_a_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("b_press")).unwrap();
    std::fs::create_dir_all(dir.path().join("a_oven")).unwrap();
    std::fs::create_dir_all(dir.path().join("empty")).unwrap();
    std::fs::write(dir.path().join("b_press/config.json"), "{}").unwrap();
    std::fs::write(dir.path().join("a_oven/config.json"), "{}").unwrap();
    std::fs::write(dir.path().join("stray.json"), "{}").unwrap();

    let names: Vec<String> = list_instance_dirs(dir.path())
      .unwrap()
      .into_iter()
      .map(|d| d.name)
      .collect();

    assert_eq!(names, vec!["a_oven", "b_press"]);
  }

  #[cfg(unix)]
  #[test]
  fn symlinked_instance_directories_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let base = dir.path().join("rw_configs");
    std::fs::create_dir_all(base.join("oven")).unwrap();
    std::fs::write(base.join("oven/config.json"), "{}").unwrap();
    std::fs::write(target.path().join("config.json"), "{}").unwrap();
    std::os::unix::fs::symlink(target.path(), base.join("press")).unwrap();

    let dirs = list_instance_dirs(&base).unwrap();
    let names: Vec<&str> = dirs.iter().map(|d| d.name.as_str()).collect();

    assert_eq!(names, vec!["oven", "press"]);
    assert_eq!(dirs[1].config_path, base.join("press/config.json"));
  }

  #[test]
  fn malformed_instance_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("press")).unwrap();
    std::fs::write(dir.path().join("press/config.json"), "{\"data\": ").unwrap();

    let result = build_instance_models(dir.path(), &Sources::default(), &GeneratorProfile::default());
    assert!(matches!(result, Err(SchemaError::Config(_))));
  }
}
