pub mod builder;
pub mod error;
pub mod service;
pub mod yaml;

use std::{fs, path::PathBuf};

use deploygen_config::{InputConfig, WorkspaceLayout};
use tracing::info;

pub use builder::ComposeBuilder;
pub use error::ComposeError;
pub use service::{ComposeFile, FoldedScalar, HealthCheck, HealthTest, Service};

/// Builds the compose document: database, log viewers, tasker, then one service per instance
/// config file.
pub fn build_compose(
  config: &InputConfig,
  layout: &WorkspaceLayout,
  account: &str,
) -> Result<ComposeFile, ComposeError> {
  Ok(
    ComposeBuilder::new(config, account)
      .with_database()
      .with_log_viewers()
      .with_tasker()
      .with_instance_services(&layout.compose_configs_dir())?
      .build(),
  )
}

pub fn render_compose(compose: &ComposeFile) -> Result<String, ComposeError> {
  Ok(yaml::to_yaml_string(compose)?)
}

/// Generates `docker-compose.yml` under the layout root.
#[tracing::instrument(skip(config, layout))]
pub fn generate_compose_file(
  config: &InputConfig,
  layout: &WorkspaceLayout,
  account: &str,
) -> Result<PathBuf, ComposeError> {
  let compose = build_compose(config, layout, account)?;
  let contents = render_compose(&compose)?;
  let path = layout.compose_output();

  fs::write(&path, contents).map_err(|source| ComposeError::Write {
    path: path.clone(),
    source,
  })?;
  info!(
    "compose file with {} services written to {:?}",
    compose.services.len(),
    path
  );

  Ok(path)
}
