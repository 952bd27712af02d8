use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable pointing at a self-contained PocketWise home. When
/// set, both the configuration and the ledger snapshot live beneath it.
pub const HOME_ENV: &str = "POCKETWISE_HOME";

const APP_DIR: &str = "pocketwise";

/// Stores user-configurable display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// strftime pattern overriding the locale's date layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the ledger snapshot. Defaults to the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            date_format: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Directory holding the ledger snapshot.
    ///
    /// `home` (usually [`home_override`]) wins over the configured
    /// `data_dir`, which wins over the platform data directory.
    pub fn resolve_data_dir(&self, home: Option<&Path>) -> PathBuf {
        if let Some(home) = home {
            return home.to_path_buf();
        }
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Directory holding `config.json` when no home override is set.
    pub fn default_config_root() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Reads [`HOME_ENV`], ignoring an empty value.
pub fn home_override() -> Option<PathBuf> {
    env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
