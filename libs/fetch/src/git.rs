//! Cloning module repositories with the `git` command line client.

use std::{
  path::Path,
  process::{Command, Stdio},
};

use tracing::debug;

use crate::error::FetchError;

/// Clones a single branch of a repository into a target directory.
pub trait RepositoryCloner {
  fn clone_branch(&self, url: &str, branch: &str, target: &Path) -> Result<(), FetchError>;
}

/// Runs `git clone --branch <branch> --single-branch <url> <target>`.
#[derive(Debug, Clone)]
pub struct GitCli {
  program: String,
}

impl GitCli {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }

  fn command(&self, url: &str, branch: &str, target: &Path) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd
      .arg("clone")
      .arg("--branch")
      .arg(branch)
      .arg("--single-branch")
      .arg(url)
      .arg(target)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());

    cmd
  }
}

impl Default for GitCli {
  fn default() -> Self {
    Self::new("git")
  }
}

impl RepositoryCloner for GitCli {
  fn clone_branch(&self, url: &str, branch: &str, target: &Path) -> Result<(), FetchError> {
    let mut cmd = self.command(url, branch, target);
    debug!(command = ?cmd, "running git clone");

    let output = cmd.output().map_err(FetchError::Spawn)?;

    if !output.status.success() {
      return Err(FetchError::CloneFailed {
        branch: branch.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(())
  }
}
