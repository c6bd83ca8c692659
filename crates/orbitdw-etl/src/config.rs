//! Runtime configuration, layered from defaults, an optional TOML file and
//! `ORBITDW_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use orbitdw_source_http::HttpSourceConfig;
use serde::Deserialize;

/// File read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "orbitdw.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EtlConfig {
  pub base_url:     String,
  pub store_path:   PathBuf,
  /// Where raw payloads are archived. `None` or an empty path disables it.
  pub snapshot_dir: Option<PathBuf>,
  pub timeout_secs: u64,
}

impl EtlConfig {
  /// Resolve the configuration once at startup. Source defaults come from
  /// [`HttpSourceConfig::default`].
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    let source = HttpSourceConfig::default();
    config::Config::builder()
      .set_default("base_url", source.base_url)?
      .set_default("store_path", "Data/DB/spacex.db")?
      .set_default("snapshot_dir", "Data/Row")?
      .set_default("timeout_secs", source.timeout.as_secs())?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ORBITDW"))
      .build()?
      .try_deserialize()
  }

  pub fn snapshot_dir(&self) -> Option<&Path> {
    self
      .snapshot_dir
      .as_deref()
      .filter(|dir| !dir.as_os_str().is_empty())
  }

  pub fn source_config(&self) -> HttpSourceConfig {
    HttpSourceConfig {
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }
}
