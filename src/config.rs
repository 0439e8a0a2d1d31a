use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ApiError;
use crate::theme::ThemeConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOG_FILTER: &str = "asistencia_tui=info";

/// Where and how to reach the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub log_filter: String,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            api_url: api.api_url,
            timeout_secs: api.timeout_secs,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Loads the user's config file, then applies environment overrides.
    pub fn load() -> Result<Self, ApiError> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content).map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ASISTENCIA_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(filter) = lookup("ASISTENCIA_LOG").filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
    }

    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs.max(1),
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("asistencia-tui"))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.api(), ApiConfig::default());
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn reads_keys_and_theme_table() {
        let config = Config::from_toml(
            r##"
            api_url = "https://asistencia.example.org/api"
            timeout_secs = 30

            [theme]
            preset = "terminal"

            [theme.colors]
            "today.bg" = "#112233"
            "##,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://asistencia.example.org/api");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.theme.preset.as_deref(), Some("terminal"));
        assert_eq!(config.theme.colors["today.bg"], "#112233");
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "ASISTENCIA_API_URL" => Some("http://10.0.0.5:9000".to_string()),
            "ASISTENCIA_LOG" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://10.0.0.5:9000");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::from_file(&missing).is_ok());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(Config::from_file(&bad), Err(ApiError::Config(_))));
    }

    #[test]
    fn zero_timeout_is_raised() {
        let config = Config::from_toml("timeout_secs = 0").unwrap();
        assert_eq!(config.api().timeout_secs, 1);
    }
}
