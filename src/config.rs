//! Runtime configuration, read from a TOML file.
//!
//! ```toml
//! base_url = "https://pokeapi.co/api/v2"
//! timeout_secs = 10
//! cache_capacity = 128
//! disk_cache = true
//! cache_dir = "/var/cache/pkmn"
//! ```
//!
//! Every key is optional.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::api;
use crate::api::Cache;

/// A configuration error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error("could not read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("could not parse {path}: {source}")]
  Toml {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// Configuration for talking to PokéAPI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// The PokéAPI base URL.
  pub base_url: String,
  /// How long a single species lookup may take, in seconds.
  pub timeout_secs: u64,
  /// How many resolved species to keep in memory.
  pub cache_capacity: usize,
  /// Whether resolved species are also cached on disk.
  pub disk_cache: bool,
  /// Where the disk cache lives; defaults to `~/.pkmn-cache`.
  pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url: api::DEFAULT_BASE_URL.to_string(),
      timeout_secs: 10,
      cache_capacity: 128,
      disk_cache: true,
      cache_dir: None,
    }
  }
}

impl Config {
  /// Parses a configuration from TOML text.
  pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(text)
  }

  /// Reads the configuration file at `path`.
  pub fn load(path: &Path) -> Result<Self, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml(&text).map_err(|source| Error::Toml {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Returns the default configuration file location,
  /// `<config dir>/pkmn-showdown/config.toml`.
  pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
      path.push("pkmn-showdown");
      path.push("config.toml");
      path
    })
  }

  /// Reads the configuration file at the default location, falling back to
  /// the defaults if there is none.
  pub fn load_default() -> Result<Self, Error> {
    match Self::default_path() {
      Some(path) if path.exists() => Self::load(&path),
      _ => Ok(Self::default()),
    }
  }

  /// Returns the per-lookup timeout.
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// Returns options for constructing an [`api::Api`].
  pub fn api_options(&self) -> api::Options {
    api::Options {
      base_url: self.base_url.clone(),
    }
  }

  /// Builds the species cache this configuration describes.
  pub fn cache(&self) -> Cache {
    if !self.disk_cache {
      return Cache::no_disk(self.cache_capacity);
    }
    match &self.cache_dir {
      Some(dir) => Cache::with_dir(self.cache_capacity, dir.clone()),
      None => Cache::new(self.cache_capacity),
    }
  }
}
