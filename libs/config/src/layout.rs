use std::path::{Path, PathBuf};

/// Conventional locations of the inputs and outputs, relative to the deployment root.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
  root: PathBuf,
}

impl WorkspaceLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn input_config(&self) -> PathBuf {
    self.root.join("input_config").join("config.json")
  }

  pub fn fe_be_dir(&self) -> PathBuf {
    self.root.join("config_fe_be")
  }

  /// The materialised FE/BE config, which doubles as the sources file of the schema generator.
  pub fn sources_file(&self) -> PathBuf {
    self.fe_be_dir().join("config.json")
  }

  pub fn rw_configs_dir(&self) -> PathBuf {
    self.root.join("rw_configs")
  }

  pub fn compose_configs_dir(&self) -> PathBuf {
    self.root.join("configs")
  }

  pub fn compose_output(&self) -> PathBuf {
    self.root.join("docker-compose.yml")
  }

  pub fn schema_output(&self) -> PathBuf {
    self.root.join("prisma_schema").join("schema.prisma")
  }
}

impl Default for WorkspaceLayout {
  fn default() -> Self {
    Self::new(".")
  }
}
