use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Web view configuration, persisted as webview.toml.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewConfig {
    #[serde(default)]
    pub settings: SessionSettings,
    #[serde(default)]
    pub window: WindowConfig,
}

impl WebViewConfig {
    /// Returns the config file path within the given directory.
    pub fn path(dir: &Path) -> PathBuf {
        dir.join("webview.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Settings applied once to every new session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_true")]
    pub script_enabled: bool,
    #[serde(default)]
    pub zoom_control_enabled: bool,
    #[serde(default)]
    pub default_context_menus_enabled: bool,
    #[serde(default)]
    pub status_bar_enabled: bool,
    #[serde(default = "default_true")]
    pub web_message_enabled: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            script_enabled: true,
            zoom_control_enabled: false,
            default_context_menus_enabled: false,
            status_bar_enabled: false,
            web_message_enabled: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            class_name: default_class_name(),
        }
    }
}

fn default_class_name() -> String {
    "web_view_window_web_view".to_string()
}

fn default_true() -> bool {
    true
}
