use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
  #[error("failed to run git: {0}")]
  Spawn(#[source] std::io::Error),
  #[error("git clone of branch \"{branch}\" failed ({status}): {stderr}")]
  CloneFailed {
    branch: String,
    status: String,
    stderr: String,
  },
  #[error("failed to serialize the FE/BE config: {0}")]
  Serialize(#[from] serde_json::Error),
  #[error("failed to write \"{}\": {source}", .path.display())]
  Write {
    path: PathBuf,
    source: std::io::Error,
  },
}
