use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, JsonSchema, PartialEq, Eq)]
/// Output format of the generator logs.
pub enum LoggerConfigFormat {
  /// Minimal, single-line output: level, target and message. Suitable for CI logs.
  #[serde(rename = "compact")]
  #[schemars(title = "compact")]
  Compact,

  /// Multi-line, human-readable output including fields and source locations. Ideal for
  /// development and debugging purposes.
  #[serde(rename = "pretty")]
  #[schemars(title = "pretty")]
  Pretty,

  /// One JSON object per event, for log aggregators.
  #[serde(rename = "json")]
  #[schemars(title = "json")]
  Json,
}

impl Default for LoggerConfigFormat {
  // In development, we wish to see some more details and code locations.
  #[cfg(debug_assertions)]
  fn default() -> Self {
    LoggerConfigFormat::Pretty
  }

  #[cfg(not(debug_assertions))]
  fn default() -> Self {
    if atty::is(atty::Stream::Stderr) {
      LoggerConfigFormat::Compact
    } else {
      LoggerConfigFormat::Json
    }
  }
}

impl FromStr for LoggerConfigFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "compact" => Ok(LoggerConfigFormat::Compact),
      "pretty" => Ok(LoggerConfigFormat::Pretty),
      "json" => Ok(LoggerConfigFormat::Json),
      other => Err(format!(
        "unknown log format \"{}\", expected one of: compact, pretty, json",
        other
      )),
    }
  }
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LoggerConfig {
  /// Environment filter directives, for example `info` or `deploygen_prisma=debug,info`.
  ///
  /// See [tracing_subscriber::EnvFilter](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html) for the syntax.
  #[serde(default = "default_log_filter")]
  pub filter: String,
  /// Log output format. By default, `pretty` is used in debug builds; release builds use `compact`
  /// on a TTY and `json` otherwise.
  #[serde(default)]
  pub format: LoggerConfigFormat,
  /// Prints the duration of instrumented spans when they close.
  #[serde(default)]
  pub print_performance_info: bool,
}

impl Default for LoggerConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
      format: LoggerConfigFormat::default(),
      print_performance_info: false,
    }
  }
}

fn default_log_filter() -> String {
  "info".to_string()
}
