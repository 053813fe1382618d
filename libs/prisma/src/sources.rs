use std::path::Path;

use deploygen_config::{read_document, FieldDescriptor, SourcesConfig};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::SchemaError;

/// Key prefix marking the source of the main aggregate model.
pub const GENERIC_PREFIX: &str = "generic_";

pub type FieldSet = IndexMap<String, FieldDescriptor>;

/// Source key to declared fields, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Sources {
  entries: IndexMap<String, FieldSet>,
}

impl Sources {
  pub fn from_config(config: SourcesConfig) -> Self {
    let mut entries = IndexMap::new();

    for source in config.sources {
      let key = match source.generic_fields {
        true => format!("{}{}", GENERIC_PREFIX, source.source),
        false => source.source,
      };

      if entries.insert(key.clone(), source.fields).is_some() {
        warn!("source \"{}\" is declared more than once, the last declaration wins", key);
      }
    }

    Self { entries }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSet)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn get(&self, key: &str) -> Option<&FieldSet> {
    self.entries.get(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn is_generic(key: &str) -> bool {
    key.contains(GENERIC_PREFIX)
  }

  /// The first generic source, which backs the main model.
  pub fn generic(&self) -> Option<(&str, &FieldSet)> {
    self.iter().find(|(key, _)| Self::is_generic(key))
  }

  /// Every source whose key occurs in `directory_name`.
  pub fn matching<'a>(
    &'a self,
    directory_name: &'a str,
  ) -> impl Iterator<Item = (&'a str, &'a FieldSet)> + 'a {
    self
      .iter()
      .filter(move |(key, _)| directory_name.contains(key))
  }
}

pub fn parse_sources_config(source_file: &Path) -> Result<Sources, SchemaError> {
  let config = read_document::<SourcesConfig>(source_file)?;
  let sources = Sources::from_config(config);
  debug!("loaded {} sources from {:?}", sources.len(), source_file);

  Ok(sources)
}
