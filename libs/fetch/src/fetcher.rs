use std::path::Path;

use deploygen_config::InputConfig;
use tracing::{error, info};

use crate::git::RepositoryCloner;

/// Outcome of one fetch run, by module name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchReport {
  pub cloned: Vec<String>,
  pub skipped: Vec<String>,
  pub failed: Vec<String>,
}

impl FetchReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Clones every `rw_configs` module that has a branch into `rw_dir/<module>`.
///
/// Existing directories are left untouched. A failed clone is logged and the remaining modules are
/// still fetched.
#[tracing::instrument(skip(config, cloner))]
pub fn fetch_modules(
  config: &InputConfig,
  rw_dir: &Path,
  cloner: &impl RepositoryCloner,
) -> FetchReport {
  let mut report = FetchReport::default();

  for (name, module) in &config.rw_configs {
    let branch = match &module.branch_name {
      Some(branch) => branch,
      None => {
        info!("skipping {}, no branch_name provided", name);
        report.skipped.push(name.clone());
        continue;
      }
    };

    let target = rw_dir.join(name);
    if target.exists() {
      info!("directory {:?} already exists, skipping clone", target);
      report.skipped.push(name.clone());
      continue;
    }

    info!("cloning branch \"{}\" into {:?}", branch, target);
    match cloner.clone_branch(&config.repository_url, branch, &target) {
      Ok(()) => {
        info!("cloned {}", name);
        report.cloned.push(name.clone());
      }
      Err(err) => {
        error!("failed to clone {} ({}): {}", name, branch, err);
        report.failed.push(name.clone());
      }
    }
  }

  report
}
