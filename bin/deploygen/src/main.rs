use std::process::ExitCode;

use clap::Parser;
use deploygen::{cli::Cli, run};
use deploygen_logger::install_global_logger;
use tracing::error;

fn main() -> ExitCode {
  let cli = Cli::parse();

  if let Err(err) = install_global_logger(&cli.logger_config()) {
    eprintln!("failed to set up logging: {}", err);
    return ExitCode::FAILURE;
  }

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{:#}", err);
      ExitCode::FAILURE
    }
  }
}
