use std::io;

use crate::config::{LoggerConfig, LoggerConfigFormat};
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::{
  fmt::{self, format::FmtSpan, time::UtcTime},
  Layer,
};

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
  #[error("invalid log filter: {0}")]
  Filter(#[from] tracing_subscriber::filter::ParseError),
  #[error("failed to install the global logger: {0}")]
  Install(#[from] SetGlobalDefaultError),
}

/// Builds the stderr log layer for `config`. ANSI colors are only used for the text formats on a
/// terminal.
pub fn build_logger(
  config: &LoggerConfig,
) -> Result<Box<dyn Layer<Registry> + Send + Sync>, tracing_subscriber::filter::ParseError> {
  let filter = EnvFilter::try_new(&config.filter)?;
  let span_events = match config.print_performance_info {
    true => FmtSpan::CLOSE,
    false => FmtSpan::NONE,
  };
  let ansi = config.format != LoggerConfigFormat::Json && atty::is(atty::Stream::Stderr);

  let layer = fmt::Layer::<Registry>::default()
    .with_writer(io::stderr)
    .with_ansi(ansi)
    .with_timer(UtcTime::rfc_3339())
    .with_span_events(span_events);

  Ok(match config.format {
    LoggerConfigFormat::Json => layer.json().with_filter(filter).boxed(),
    LoggerConfigFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
    LoggerConfigFormat::Compact => layer.compact().with_target(false).with_filter(filter).boxed(),
  })
}

/// Builds the layer described by `config` and installs it as the process-wide subscriber.
pub fn install_global_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
  let layer = build_logger(config)?;
  set_global_default(tracing_subscriber::registry().with(layer))?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(format: LoggerConfigFormat, filter: &str, print_performance_info: bool) -> LoggerConfig {
    LoggerConfig {
      filter: filter.to_string(),
      format,
      print_performance_info,
    }
  }

  #[test]
  fn builds_every_format() {
    for format in [
      LoggerConfigFormat::Compact,
      LoggerConfigFormat::Pretty,
      LoggerConfigFormat::Json,
    ] {
      assert!(build_logger(&config(format, "info", false)).is_ok());
      assert!(build_logger(&config(format, "deploygen_prisma=debug,warn", true)).is_ok());
    }
  }

  #[test]
  fn invalid_filter_is_rejected() {
    let result = build_logger(&config(LoggerConfigFormat::Compact, "deploygen=notalevel", false));
    assert!(result.is_err());
  }
}
