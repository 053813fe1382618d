use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
  #[error("failed to read compose configs directory \"{}\": {source}", .path.display())]
  ReadConfigs {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to serialize compose file: {0}")]
  Serialize(#[from] serde_yaml::Error),
  #[error("failed to write compose file \"{}\": {source}", .path.display())]
  Write {
    path: PathBuf,
    source: std::io::Error,
  },
}
