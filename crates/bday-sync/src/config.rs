//! Runtime configuration, read from `BDAY_SYNC_*` environment variables.

use std::{path::PathBuf, time::Duration};

use bday_core::event::CalendarSpec;
use serde::Deserialize;

/// Prefix of the environment variables read by [`SyncConfig::load`].
pub const ENV_PREFIX: &str = "BDAY_SYNC";

/// Where Baïkal keeps its database in a default install.
pub const DEFAULT_STORE_PATH: &str = "/opt/baikal/Specific/db/db.sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  pub store_path:            PathBuf,
  pub busy_timeout_secs:     u64,
  /// Only principals whose uri starts with this are considered.
  pub principal_prefix:      String,
  pub calendar_uri:          String,
  pub calendar_display_name: String,
  pub calendar_description:  String,
}

impl Default for SyncConfig {
  fn default() -> Self {
    let calendar = CalendarSpec::default();
    Self {
      store_path:            PathBuf::from(DEFAULT_STORE_PATH),
      busy_timeout_secs:     30,
      principal_prefix:      "principals/".to_string(),
      calendar_uri:          calendar.uri,
      calendar_display_name: calendar.display_name,
      calendar_description:  calendar.description,
    }
  }
}

impl SyncConfig {
  /// Defaults overridden by any `BDAY_SYNC_*` variables in the environment.
  pub fn load() -> Result<Self, config::ConfigError> {
    Self::from_env(config::Environment::with_prefix(ENV_PREFIX))
  }

  fn from_env(env: config::Environment) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(env.try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn busy_timeout(&self) -> Duration {
    Duration::from_secs(self.busy_timeout_secs)
  }

  pub fn calendar_spec(&self) -> CalendarSpec {
    CalendarSpec {
      uri:          self.calendar_uri.clone(),
      display_name: self.calendar_display_name.clone(),
      description:  self.calendar_description.clone(),
    }
  }
}
