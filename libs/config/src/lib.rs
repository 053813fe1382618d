pub mod interpolate;
pub mod layout;
pub mod serde_utils;
pub mod sources;

use indexmap::IndexMap;
use interpolate::{interpolate, EnvLookup};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
  fs::read_to_string,
  path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub use layout::WorkspaceLayout;
pub use sources::{FieldDescriptor, InstanceConfig, SourceDescriptor, SourcesConfig};

/// This section describes the top-level input configuration consumed by `deploygen`.
///
/// The same document drives every generator:
///
/// - `deploygen sync` writes `config_fe_be.config_content` to `config_fe_be/config.json` and clones
///   one repository per `rw_configs` entry.
/// - `deploygen prisma` reads the files produced by `sync` and writes `prisma_schema/schema.prisma`.
/// - `deploygen compose <ACCOUNT>` writes `docker-compose.yml`.
///
/// ## Loading the config file
///
/// The file is read from `input_config/config.json` under the deployment root (`--root`, or the
/// `DEPLOYGEN_ROOT` environment variable). Both JSON and YAML (`.yaml` / `.yml`) are accepted.
///
/// ### Configuration Interpolation with Environment Variables
///
/// Environment variables are substituted into the raw file before it is parsed, so secrets such as
/// the database password do not have to be committed:
///
/// - `${VAR_NAME}` inserts the value of `VAR_NAME`; an unset variable becomes an empty string and a
///   warning is logged.
/// - `${VAR_NAME:-default}` uses `default` when `VAR_NAME` is unset or empty.
/// - `${VAR_NAME:?message}` fails the run when `VAR_NAME` is unset or empty.
/// - `$$` produces a literal dollar sign.
/// - Any other `$`, such as the one in `"cost $5"`, is kept unchanged.
///
/// Examples:
/// - `"password": "${POSTGRES_PASSWORD:?database password is required}"`
/// - `"image": "${DB_IMAGE:-postgres:16}"`
///
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[schemars(example = "input_config_example")]
pub struct InputConfig {
  /// Naming preset for the generated Prisma models. Can be overridden on the command line.
  #[serde(default)]
  pub product_line: ProductLine,
  /// Upstream repository holding the worker module configurations. Every `rw_configs` entry is
  /// cloned from this repository at its own branch.
  #[serde(default = "default_repository_url")]
  pub repository_url: String,
  /// Docker network shared by every generated service.
  #[serde(default = "default_network_name")]
  pub network_name: String,
  /// Front-end / back-end configuration.
  #[serde(default)]
  pub config_fe_be: FeBeConfig,
  /// Worker modules, keyed by module name. The key is also the name of the directory the module
  /// repository is cloned into.
  #[serde(default)]
  pub rw_configs: IndexMap<String, RwModuleConfig>,
  /// Database service configuration. When absent, no database service is generated.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub db_config: Option<DatabaseConfig>,
  /// Log viewer services. Entries without an image are skipped.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub config_log_viewer: Vec<LogViewerConfig>,
}

impl Default for InputConfig {
  fn default() -> Self {
    Self {
      product_line: ProductLine::default(),
      repository_url: default_repository_url(),
      network_name: default_network_name(),
      config_fe_be: FeBeConfig::default(),
      rw_configs: IndexMap::new(),
      db_config: None,
      config_log_viewer: Vec::new(),
    }
  }
}

fn input_config_example() -> InputConfig {
  let mut rw_configs = IndexMap::new();
  rw_configs.insert(
    "modbus_press_1".to_string(),
    RwModuleConfig {
      branch_name: Some("press-line-1".to_string()),
    },
  );

  InputConfig {
    product_line: ProductLine::JobCard,
    repository_url: default_repository_url(),
    network_name: default_network_name(),
    config_fe_be: FeBeConfig {
      image_name_fe_job: Some("tasker".to_string()),
      config_content: serde_json::json!({
        "sources": [
          {
            "source": "task",
            "generic_fields": true,
            "fields": { "odp": { "type": "String" }, "job_card_id": { "type": "Int64" } }
          }
        ]
      }),
    },
    rw_configs,
    db_config: Some(DatabaseConfig {
      user: Some("postgres".to_string()),
      password: Some("${POSTGRES_PASSWORD}".to_string()),
      database: Some("tasker".to_string()),
      ..Default::default()
    }),
    config_log_viewer: vec![LogViewerConfig {
      image: Some("amir20/dozzle:latest".to_string()),
      ..Default::default()
    }],
  }
}

fn default_repository_url() -> String {
  "git@github.com:OmetSRL/recipe_deployment_config.git".to_string()
}

fn default_network_name() -> String {
  "recepy-manager".to_string()
}

/// Selects the naming scheme of the generated schema.
#[derive(Deserialize, Serialize, Default, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum ProductLine {
  /// `job_card_metadata` root model, `job_card_*` instance models and `task_*` child models.
  #[serde(rename = "job_card")]
  #[schemars(title = "job_card")]
  #[default]
  JobCard,
  /// `recipe_metadata` root model, `recipe_*` instance models and `job_*` child models.
  #[serde(rename = "recipe")]
  #[schemars(title = "recipe")]
  Recipe,
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FeBeConfig {
  /// Image name of the combined front-end / back-end job application. The `tasker` service is
  /// generated only when this is set to a non-empty value.
  #[serde(
    default,
    deserialize_with = "serde_utils::non_empty_string",
    skip_serializing_if = "Option::is_none"
  )]
  #[schemars(with = "Option<String>")]
  pub image_name_fe_job: Option<String>,
  /// Content written verbatim to `config_fe_be/config.json`. It holds the `sources` list read by
  /// the schema generator.
  #[serde(default = "empty_object")]
  pub config_content: serde_json::Value,
}

impl Default for FeBeConfig {
  fn default() -> Self {
    Self {
      image_name_fe_job: None,
      config_content: empty_object(),
    }
  }
}

fn empty_object() -> serde_json::Value {
  serde_json::Value::Object(Default::default())
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct RwModuleConfig {
  /// Branch of the upstream repository to clone for this module. Modules without a branch are
  /// skipped.
  #[serde(
    default,
    deserialize_with = "serde_utils::non_empty_string",
    skip_serializing_if = "Option::is_none"
  )]
  #[schemars(with = "Option<String>")]
  pub branch_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct DatabaseConfig {
  /// Database image, defaults to `postgres:16`.
  #[serde(default = "default_db_image")]
  pub image: String,
  /// Container (and host) name of the database, defaults to `postgres_db`.
  #[serde(default = "default_db_container_name")]
  pub container_name: String,
  #[serde(
    default,
    deserialize_with = "serde_utils::non_empty_string",
    skip_serializing_if = "Option::is_none"
  )]
  #[schemars(with = "Option<String>")]
  pub user: Option<String>,
  #[serde(
    default,
    deserialize_with = "serde_utils::non_empty_string",
    skip_serializing_if = "Option::is_none"
  )]
  #[schemars(with = "Option<String>")]
  pub password: Option<String>,
  /// Name of the database created on first start.
  #[serde(
    default,
    deserialize_with = "serde_utils::non_empty_string",
    skip_serializing_if = "Option::is_none"
  )]
  #[schemars(with = "Option<String>")]
  pub database: Option<String>,
  /// Host port mapped to the database port, defaults to 5432.
  #[serde(default = "default_db_port")]
  pub port: u16,
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    Self {
      image: default_db_image(),
      container_name: default_db_container_name(),
      user: None,
      password: None,
      database: None,
      port: default_db_port(),
    }
  }
}

fn default_db_image() -> String {
  "postgres:16".to_string()
}

fn default_db_container_name() -> String {
  "postgres_db".to_string()
}

fn default_db_port() -> u16 {
  5432
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LogViewerConfig {
  /// Service and container name, defaults to `log_viewer`.
  #[serde(default = "default_log_viewer_name")]
  pub name: String,
  #[serde(
    default,
    deserialize_with = "serde_utils::non_empty_string",
    skip_serializing_if = "Option::is_none"
  )]
  #[schemars(with = "Option<String>")]
  pub image: Option<String>,
  /// Host port mapped to the viewer's web UI (container port 8080), defaults to 8080.
  #[serde(default = "default_log_viewer_port")]
  pub port: u16,
}

impl Default for LogViewerConfig {
  fn default() -> Self {
    Self {
      name: default_log_viewer_name(),
      image: None,
      port: default_log_viewer_port(),
    }
  }
}

fn default_log_viewer_name() -> String {
  "log_viewer".to_string()
}

fn default_log_viewer_port() -> u16 {
  8080
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
  #[error("failed to read \"{}\": {source}", .path.display())]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("file \"{}\" has no extension", .0.display())]
  MissingExtension(PathBuf),
  #[error("unsupported file extension \"{0}\"")]
  UnsupportedExtension(String),
  #[error("failed to interpolate config file: {}", .0.join("; "))]
  Interpolation(Vec<String>),
  #[error("failed to parse JSON document \"{}\": {source}", .path.display())]
  Json {
    path: PathBuf,
    source: serde_json::Error,
  },
  #[error("failed to parse YAML document \"{}\": {source}", .path.display())]
  Yaml {
    path: PathBuf,
    source: serde_yaml::Error,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
  Json,
  Yaml,
}

impl ConfigFormat {
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    match path.extension() {
      Some(ext) => match ext.to_str() {
        Some("json") => Ok(ConfigFormat::Json),
        Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
        other => Err(ConfigError::UnsupportedExtension(
          other.unwrap_or_default().to_string(),
        )),
      },
      None => Err(ConfigError::MissingExtension(path.to_path_buf())),
    }
  }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
  read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })
}

fn parse_document<T: DeserializeOwned>(
  contents: &str,
  format: ConfigFormat,
  path: &Path,
) -> Result<T, ConfigError> {
  match format {
    ConfigFormat::Json => serde_json::from_str::<T>(contents).map_err(|source| ConfigError::Json {
      path: path.to_path_buf(),
      source,
    }),
    ConfigFormat::Yaml => serde_yaml::from_str::<T>(contents).map_err(|source| ConfigError::Yaml {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Reads and parses a JSON or YAML document as-is, without env interpolation.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
  let format = ConfigFormat::from_path(path)?;
  let contents = read_file(path)?;
  debug!("parsing document {:?} as {:?}", path, format);

  parse_document(&contents, format, path)
}

#[tracing::instrument(level = "trace", skip(get_env_value))]
pub fn load_config(
  file_path: &Path,
  get_env_value: impl EnvLookup,
) -> Result<InputConfig, ConfigError> {
  let format = ConfigFormat::from_path(file_path)?;
  let raw_contents = read_file(file_path)?;

  parse_config_contents(&raw_contents, format, file_path, get_env_value)
}

pub fn parse_config_contents(
  contents: &str,
  format: ConfigFormat,
  origin: &Path,
  get_env_value: impl EnvLookup,
) -> Result<InputConfig, ConfigError> {
  let (interpolated, warnings) =
    interpolate(contents, get_env_value).map_err(ConfigError::Interpolation)?;

  for warning in warnings {
    warn!("{}", warning);
  }

  parse_document(&interpolated, format, origin)
}
