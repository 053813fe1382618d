use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use deploygen_config::ProductLine;
use deploygen_logger::{LoggerConfig, LoggerConfigFormat};

#[derive(Parser, Debug)]
#[command(name = "deploygen")]
#[command(about = "Generate deployment artifacts from the plant input config")]
#[command(version)]
pub struct Cli {
  /// Deployment root holding `input_config/`, `rw_configs/` and `configs/`
  #[arg(long, global = true, env = "DEPLOYGEN_ROOT", default_value = ".")]
  pub root: PathBuf,

  /// Naming preset of the generated schema (overrides `product_line` in the input config)
  #[arg(long, global = true, value_enum)]
  pub product_line: Option<ProductLineArg>,

  /// Log filter directives, e.g. `debug` or `deploygen_prisma=trace,info`
  #[arg(long, global = true, env = "DEPLOYGEN_LOG", default_value = "info")]
  pub log_filter: String,

  /// Log output format: compact, pretty or json
  #[arg(long, global = true)]
  pub log_format: Option<LoggerConfigFormat>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Generate docker-compose.yml
  Compose {
    /// Docker Hub account the service images are published under
    account: String,
  },
  /// Generate prisma_schema/schema.prisma
  Prisma,
  /// Write config_fe_be/config.json and clone the module repositories
  Sync,
  /// Run sync, prisma and compose in that order
  All {
    /// Docker Hub account the service images are published under
    account: String,
  },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLineArg {
  #[value(name = "job_card")]
  JobCard,
  #[value(name = "recipe")]
  Recipe,
}

impl From<ProductLineArg> for ProductLine {
  fn from(value: ProductLineArg) -> Self {
    match value {
      ProductLineArg::JobCard => ProductLine::JobCard,
      ProductLineArg::Recipe => ProductLine::Recipe,
    }
  }
}

impl Cli {
  pub fn logger_config(&self) -> LoggerConfig {
    LoggerConfig {
      filter: self.log_filter.clone(),
      format: self.log_format.unwrap_or_default(),
      ..Default::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compose_requires_an_account() {
    let err = Cli::try_parse_from(["deploygen", "compose"]).unwrap_err();
    assert_eq!(
      err.kind(),
      clap::error::ErrorKind::MissingRequiredArgument
    );

    let cli = Cli::try_parse_from(["deploygen", "compose", "acme"]).unwrap();
    assert_eq!(
      cli.command,
      Command::Compose {
        account: "acme".to_string()
      }
    );
  }

  #[test]
  fn global_flags_after_the_subcommand() {
    let cli = Cli::try_parse_from([
      "deploygen",
      "prisma",
      "--root",
      "/srv/plant",
      "--product-line",
      "recipe",
      "--log-format",
      "json",
      "--log-filter",
      "debug",
    ])
    .unwrap();

    assert_eq!(cli.command, Command::Prisma);
    assert_eq!(cli.root, PathBuf::from("/srv/plant"));
    assert_eq!(cli.product_line, Some(ProductLineArg::Recipe));

    let logger = cli.logger_config();
    assert_eq!(logger.format, LoggerConfigFormat::Json);
    assert_eq!(logger.filter, "debug");
  }

  #[test]
  fn rejects_unknown_product_lines() {
    assert!(Cli::try_parse_from(["deploygen", "prisma", "--product-line", "bakery"]).is_err());
  }
}
