pub mod config;
pub mod logger_layer;

pub use config::{LoggerConfig, LoggerConfigFormat};
pub use logger_layer::{build_logger, install_global_logger, LoggerError};
