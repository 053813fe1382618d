use std::{fs, path::Path};

use deploygen_config::{DatabaseConfig, InputConfig};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
  error::ComposeError,
  service::{ComposeFile, HealthTest, NetworkDefinition, Service, VolumeDefinition},
};

pub const DB_VOLUME: &str = "postgres_data";
pub const TASKER_SERVICE: &str = "tasker";

/// Services with a hand-written definition; their config files are not turned into services.
const CUSTOM_SERVICES: [&str; 2] = ["tasker", "orchestrator"];

lazy_static! {
  static ref CONFIG_FILE_REGEX: Regex = Regex::new(r"^config-([\w\d\-]+)-\d+\.json$")
    // @expected: hard coded regex
    .unwrap();
}

/// An instance config file in `configs/`, e.g. `config-modbus_rw-2.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceConfigFile {
  pub file_name: String,
  pub image: String,
  pub identifier: String,
}

impl InstanceConfigFile {
  pub fn parse(file_name: &str) -> Option<Self> {
    let captures = CONFIG_FILE_REGEX.captures(file_name)?;
    let image = captures.get(1)?.as_str().to_string();
    let identifier = file_name
      .trim_end_matches(".json")
      .rsplit('-')
      .next()?
      .to_string();

    Some(Self {
      file_name: file_name.to_string(),
      image,
      identifier,
    })
  }

  pub fn service_name(&self) -> String {
    format!("{}_{}", self.image, self.identifier)
  }
}

/// Builds the compose document for images published under `account`.
pub struct ComposeBuilder<'a> {
  config: &'a InputConfig,
  account: &'a str,
  compose: ComposeFile,
}

impl<'a> ComposeBuilder<'a> {
  pub fn new(config: &'a InputConfig, account: &'a str) -> Self {
    Self {
      config,
      account,
      compose: ComposeFile::default(),
    }
  }

  fn network(&self) -> &str {
    &self.config.network_name
  }

  fn image(&self, name: &str) -> String {
    format!("{}/{}", self.account, name)
  }

  fn add(&mut self, name: String, service: Service) {
    if self.compose.services.contains_key(&name) {
      warn!("service \"{}\" is defined more than once, the last definition wins", name);
    }
    debug!("adding service \"{}\" ({})", name, service.image);
    self.compose.services.insert(name, service);
  }

  /// Name of the database service, when one is generated.
  fn database_service(&self) -> Option<&str> {
    self
      .config
      .db_config
      .as_ref()
      .map(|db| db.container_name.as_str())
      .filter(|name| self.compose.services.contains_key(*name))
  }

  pub fn with_database(mut self) -> Self {
    let config = self.config;
    let db = match &config.db_config {
      Some(db) => db,
      None => {
        info!("no db_config found, skipping the database service");
        return self;
      }
    };

    let (user, password, database) = match (&db.user, &db.password, &db.database) {
      (Some(user), Some(password), Some(database)) => (user, password, database),
      _ => {
        warn!("db_config needs user, password and database, skipping the database service");
        return self;
      }
    };

    let service = Service::new(db.image.as_str(), db.container_name.as_str(), self.network())
      .env("POSTGRES_USER", user.as_str())
      .env("POSTGRES_PASSWORD", password.as_str())
      .env("POSTGRES_DB", database.as_str())
      .healthcheck(HealthTest::exec([
        "CMD-SHELL".to_string(),
        format!("pg_isready -U {} -d {}", user, database),
      ]))
      .volume(format!("{}:/var/lib/postgresql/data", DB_VOLUME))
      .port(db.port, 5432);

    self.add(db.container_name.clone(), service);
    self
      .compose
      .volumes
      .insert(DB_VOLUME.to_string(), VolumeDefinition::local());

    self
  }

  pub fn with_log_viewers(mut self) -> Self {
    let config = self.config;

    for viewer in &config.config_log_viewer {
      let image = match &viewer.image {
        Some(image) => image,
        None => {
          warn!("log viewer \"{}\" has no image, skipping it", viewer.name);
          continue;
        }
      };

      let service = Service::new(image.as_str(), viewer.name.as_str(), self.network())
        .volume("/var/run/docker.sock:/var/run/docker.sock")
        .port(viewer.port, 8080);
      self.add(viewer.name.clone(), service);
    }

    self
  }

  pub fn with_tasker(mut self) -> Self {
    let config = self.config;
    let image_name = match &config.config_fe_be.image_name_fe_job {
      Some(image_name) => image_name,
      None => {
        info!("image_name_fe_job is not set, skipping the {} service", TASKER_SERVICE);
        return self;
      }
    };

    let mut service = Service::new(self.image(image_name), TASKER_SERVICE, self.network())
      .healthcheck(HealthTest::shell(
        "curl -fsSL http://localhost:3000/api/health &&\ncurl -fsSL http://localhost:3001/api/health\n",
      ))
      .volume("/home/shares/csv_import/:/home/shares/csv_import")
      .volume("./config_fe_be/config.json:/app/config/config.json")
      .port(3000, 3000)
      .port(4000, 4000);

    if let Some(db_service) = self.database_service().map(str::to_string) {
      if let Some(url) = config.db_config.as_ref().and_then(database_url) {
        service = service.env("DATABASE_URL", url);
      }
      service = service.depends_on(db_service);
    }

    self.add(TASKER_SERVICE.to_string(), service);
    self
  }

  /// Adds one service per instance config file in `configs_dir`, in file name order.
  pub fn with_instance_services(mut self, configs_dir: &Path) -> Result<Self, ComposeError> {
    for file in list_instance_config_files(configs_dir)? {
      let service = Service::new(self.image(&file.image), file.service_name(), self.network())
        .healthcheck(HealthTest::shell("curl -fsSL http://localhost:5000/api/health\n"))
        .volume(format!("./configs/{}:/app/config.json", file.file_name));
      self.add(file.service_name(), service);
    }

    Ok(self)
  }

  pub fn build(mut self) -> ComposeFile {
    let network = self.config.network_name.clone();
    let mut networks = IndexMap::new();
    networks.insert(network.clone(), NetworkDefinition { name: network });
    self.compose.networks = networks;

    self.compose
  }
}

fn database_url(db: &DatabaseConfig) -> Option<String> {
  Some(format!(
    "postgresql://{}:{}@{}:5432/{}",
    db.user.as_deref()?,
    db.password.as_deref()?,
    db.container_name,
    db.database.as_deref()?
  ))
}

/// Instance config files of `configs_dir`, sorted by name. A missing directory yields none.
pub fn list_instance_config_files(configs_dir: &Path) -> Result<Vec<InstanceConfigFile>, ComposeError> {
  if !configs_dir.is_dir() {
    warn!(
      "compose configs directory {:?} does not exist, no instance services will be generated",
      configs_dir
    );
    return Ok(vec![]);
  }

  let read_error = |source| ComposeError::ReadConfigs {
    path: configs_dir.to_path_buf(),
    source,
  };

  let mut names = vec![];
  for entry in fs::read_dir(configs_dir).map_err(read_error)? {
    let entry = entry.map_err(read_error)?;
    names.push(entry.file_name().to_string_lossy().into_owned());
  }
  names.sort();

  Ok(
    names
      .iter()
      .filter(|name| {
        let custom = CUSTOM_SERVICES.iter().any(|service| name.contains(service));
        if custom {
          debug!("skipping {}, the service is defined by hand", name);
        }
        !custom
      })
      .filter_map(|name| InstanceConfigFile::parse(name))
      .collect(),
  )
}
