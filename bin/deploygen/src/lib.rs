pub mod cli;

use anyhow::Context;
use cli::{Cli, Command};
use deploygen_config::{load_config, InputConfig, ProductLine, WorkspaceLayout};
use deploygen_fetch::GitCli;
use deploygen_prisma::GeneratorProfile;
use tracing::{info, warn};

fn env_lookup(key: &str) -> Option<String> {
  std::env::var(key).ok()
}

fn read_input_config(layout: &WorkspaceLayout) -> anyhow::Result<InputConfig> {
  let path = layout.input_config();
  let config = load_config(&path, env_lookup)
    .with_context(|| format!("failed to load input config {:?}", path))?;
  info!("input config loaded from {:?}", path);

  Ok(config)
}

/// The schema generator does not need the input config beyond the product line.
fn read_optional_input_config(layout: &WorkspaceLayout) -> anyhow::Result<InputConfig> {
  match layout.input_config().is_file() {
    true => read_input_config(layout),
    false => {
      info!("no input config found, using the default product line");
      Ok(InputConfig::default())
    }
  }
}

fn profile(cli: &Cli, config: &InputConfig) -> GeneratorProfile {
  let product_line: ProductLine = cli
    .product_line
    .map(Into::into)
    .unwrap_or(config.product_line);

  GeneratorProfile::for_product_line(product_line)
}

fn run_sync(config: &InputConfig, layout: &WorkspaceLayout) -> anyhow::Result<()> {
  let report = deploygen_fetch::sync(config, layout, &GitCli::default())
    .context("failed to sync module configs")?;

  info!(
    cloned = report.cloned.len(),
    skipped = report.skipped.len(),
    failed = report.failed.len(),
    "module sync finished"
  );
  if !report.is_success() {
    warn!("some modules could not be cloned: {}", report.failed.join(", "));
  }

  Ok(())
}

fn run_prisma(cli: &Cli, config: &InputConfig, layout: &WorkspaceLayout) -> anyhow::Result<()> {
  deploygen_prisma::generate_schema_file(layout, &profile(cli, config))
    .context("failed to generate the prisma schema")?;

  Ok(())
}

fn run_compose(config: &InputConfig, layout: &WorkspaceLayout, account: &str) -> anyhow::Result<()> {
  deploygen_compose::generate_compose_file(config, layout, account)
    .context("failed to generate the compose file")?;

  Ok(())
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
  let layout = WorkspaceLayout::new(&cli.root);

  match &cli.command {
    Command::Compose { account } => run_compose(&read_input_config(&layout)?, &layout, account),
    Command::Prisma => run_prisma(cli, &read_optional_input_config(&layout)?, &layout),
    Command::Sync => run_sync(&read_input_config(&layout)?, &layout),
    Command::All { account } => {
      let config = read_input_config(&layout)?;
      run_sync(&config, &layout)?;
      run_prisma(cli, &config, &layout)?;
      run_compose(&config, &layout, account)
    }
  }
}
