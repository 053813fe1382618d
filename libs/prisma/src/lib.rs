pub mod aggregate;
pub mod document;
pub mod error;
pub mod instance;
pub mod metadata;
pub mod model;
pub mod profile;
pub mod relation;
pub mod sources;
pub mod types;

use std::path::PathBuf;

use deploygen_config::WorkspaceLayout;
use tracing::info;

pub use document::SchemaDocument;
pub use error::SchemaError;
pub use profile::GeneratorProfile;
pub use sources::{parse_sources_config, Sources};

/// Builds the schema document from the sources file and the instance directories of `layout`.
#[tracing::instrument(skip_all, fields(root = ?layout.root()))]
pub fn build_schema(
  layout: &WorkspaceLayout,
  profile: &GeneratorProfile,
) -> Result<SchemaDocument, SchemaError> {
  let sources = parse_sources_config(&layout.sources_file())?;
  let instances = instance::build_instance_models(&layout.rw_configs_dir(), &sources, profile)?;
  let aggregate = aggregate::build_aggregate_models(&sources, profile)?;
  let metadata = metadata::build_metadata_model(profile, &aggregate, &instances);

  Ok(SchemaDocument::new(metadata, instances, aggregate))
}

pub fn generate_schema(
  layout: &WorkspaceLayout,
  profile: &GeneratorProfile,
) -> Result<String, SchemaError> {
  build_schema(layout, profile)?.render()
}

/// Generates the schema and writes it to `prisma_schema/schema.prisma`.
pub fn generate_schema_file(
  layout: &WorkspaceLayout,
  profile: &GeneratorProfile,
) -> Result<PathBuf, SchemaError> {
  let schema = generate_schema(layout, profile)?;
  let path = layout.schema_output();
  document::write_schema(&path, &schema)?;
  info!("schema written to {:?}", path);

  Ok(path)
}
