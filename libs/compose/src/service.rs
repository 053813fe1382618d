use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A `docker-compose.yml` document.
#[derive(Serialize, Debug, Clone, Default)]
pub struct ComposeFile {
  pub services: IndexMap<String, Service>,
  #[serde(skip_serializing_if = "IndexMap::is_empty")]
  pub volumes: IndexMap<String, VolumeDefinition>,
  pub networks: IndexMap<String, NetworkDefinition>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VolumeDefinition {
  pub driver: String,
}

impl VolumeDefinition {
  pub fn local() -> Self {
    Self {
      driver: "local".to_string(),
    }
  }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefinition {
  pub name: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct Service {
  pub image: String,
  pub container_name: String,
  #[serde(skip_serializing_if = "IndexMap::is_empty")]
  pub environment: IndexMap<String, String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub healthcheck: Option<HealthCheck>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub volumes: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ports: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub depends_on: Vec<String>,
  pub restart: String,
  pub networks: Vec<String>,
}

impl Service {
  pub fn new(image: impl Into<String>, container_name: impl Into<String>, network: &str) -> Self {
    Self {
      image: image.into(),
      container_name: container_name.into(),
      environment: IndexMap::new(),
      healthcheck: None,
      volumes: vec![],
      ports: vec![],
      depends_on: vec![],
      restart: "always".to_string(),
      networks: vec![network.to_string()],
    }
  }

  pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
    self.environment.insert(key.to_string(), value.into());
    self
  }

  pub fn healthcheck(mut self, test: HealthTest) -> Self {
    self.healthcheck = Some(HealthCheck::new(test));
    self
  }

  pub fn volume(mut self, volume: impl Into<String>) -> Self {
    self.volumes.push(volume.into());
    self
  }

  pub fn port(mut self, host: u16, container: u16) -> Self {
    self.ports.push(format!("{}:{}", host, container));
    self
  }

  pub fn depends_on(mut self, service: impl Into<String>) -> Self {
    self.depends_on.push(service.into());
    self
  }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
  pub test: HealthTest,
  pub interval: String,
  pub timeout: String,
  pub retries: u32,
  pub start_period: String,
}

impl HealthCheck {
  pub fn new(test: HealthTest) -> Self {
    Self {
      test,
      interval: "10s".to_string(),
      timeout: "5s".to_string(),
      retries: 3,
      start_period: "20s".to_string(),
    }
  }
}

/// Either an exec-form command (`["CMD-SHELL", ...]`) or a shell command string.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum HealthTest {
  Exec(Vec<String>),
  Shell(FoldedScalar),
}

impl HealthTest {
  pub fn exec<I, S>(args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    HealthTest::Exec(args.into_iter().map(Into::into).collect())
  }

  pub fn shell(command: &str) -> Self {
    HealthTest::Shell(FoldedScalar::reflow(command))
  }
}

/// A string emitted as a folded (`>`) block scalar.
///
/// Lines are trimmed and blank lines dropped; the value always ends with a single newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedScalar(String);

impl FoldedScalar {
  pub fn reflow(input: &str) -> Self {
    let lines: Vec<&str> = input
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .collect();

    Self(format!("{}\n", lines.join("\n")))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn lines(&self) -> impl Iterator<Item = &str> {
    self.0.lines()
  }
}

impl Serialize for FoldedScalar {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}
