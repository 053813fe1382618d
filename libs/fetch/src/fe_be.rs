use std::{fs, path::PathBuf};

use deploygen_config::WorkspaceLayout;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::FetchError;

/// Writes `content` to `config_fe_be/config.json`, pretty-printed with a two-space indent.
pub fn write_fe_be_config(
  layout: &WorkspaceLayout,
  content: &serde_json::Value,
) -> Result<PathBuf, FetchError> {
  let dir = layout.fe_be_dir();
  let path = layout.sources_file();

  fs::create_dir_all(&dir).map_err(|source| FetchError::Write {
    path: dir.clone(),
    source,
  })?;

  let mut buffer = Vec::new();
  let mut serializer =
    serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
  content.serialize(&mut serializer)?;

  fs::write(&path, buffer).map_err(|source| FetchError::Write {
    path: path.clone(),
    source,
  })?;
  info!("created {:?}", path);

  Ok(path)
}
