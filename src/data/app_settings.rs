use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// URL of the remote trip script. Empty means "not configured".
    pub endpoint: Option<String>,
    pub poll_interval_secs: u64,
    /// Relative paths are resolved against the data directory.
    pub log_file: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            endpoint: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            log_file: "tripcal.log".to_string(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsWrapper {
    #[serde(default)]
    pub(crate) settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }

    /// Trimmed endpoint, or None when unset or blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Never zero; a zero interval would poll on every frame.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
