pub mod error;
pub mod fe_be;
pub mod fetcher;
pub mod git;

use deploygen_config::{InputConfig, WorkspaceLayout};

pub use error::FetchError;
pub use fe_be::write_fe_be_config;
pub use fetcher::{fetch_modules, FetchReport};
pub use git::{GitCli, RepositoryCloner};

/// Writes the FE/BE config, then clones the module repositories.
pub fn sync(
  config: &InputConfig,
  layout: &WorkspaceLayout,
  cloner: &impl RepositoryCloner,
) -> Result<FetchReport, FetchError> {
  write_fe_be_config(layout, &config.config_fe_be.config_content)?;

  Ok(fetch_modules(config, &layout.rw_configs_dir(), cloner))
}
