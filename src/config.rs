use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::remote::types::ArticleMode;
use crate::session::controller::SessionConfig;

pub const LANGUAGES: &[&str] = &["en", "zh-CN"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Sent as a bearer token when non-empty.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub last_mode: ArticleMode,
    #[serde(default = "default_show_meaning")]
    pub show_meaning: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_completion_delay_ms")]
    pub completion_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_show_meaning() -> bool {
    true
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_advance_delay_ms() -> u64 {
    100
}
fn default_completion_delay_ms() -> u64 {
    600
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auth_token: None,
            last_mode: ArticleMode::default(),
            show_meaning: default_show_meaning(),
            theme: default_theme(),
            language: default_language(),
            advance_delay_ms: default_advance_delay_ms(),
            completion_delay_ms: default_completion_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordgap")
            .join("config.toml")
    }

    /// Clamp out-of-range values left behind by hand edits.
    pub fn validate(&mut self) {
        self.advance_delay_ms = self.advance_delay_ms.min(2_000);
        self.completion_delay_ms = self.completion_delay_ms.min(5_000);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
        if !LANGUAGES.contains(&self.language.as_str()) {
            self.language = default_language();
        }
        if self.server_url.trim().is_empty() {
            self.server_url = default_server_url();
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            show_meaning: self.show_meaning,
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            completion_delay: Duration::from_millis(self.completion_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.last_mode, ArticleMode::Generic);
        assert!(config.show_meaning);
        assert_eq!(config.advance_delay_ms, 100);
        assert_eq!(config.completion_delay_ms, 600);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
server_url = "https://words.example.com"
last_mode = "custom"
show_meaning = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server_url, "https://words.example.com");
        assert_eq!(config.last_mode, ArticleMode::Custom);
        assert!(!config.show_meaning);
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config {
            advance_delay_ms: 60_000,
            request_timeout_secs: 0,
            language: "klingon".to_string(),
            server_url: "  ".to_string(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.advance_delay_ms, 2_000);
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.language, "en");
        assert_eq!(config.server_url, "http://localhost:8080");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            last_mode: ArticleMode::Custom,
            auth_token: Some("tok".to_string()),
            language: "zh-CN".to_string(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.last_mode, ArticleMode::Custom);
        assert_eq!(loaded.auth_token.as_deref(), Some("tok"));
        assert_eq!(loaded.language, "zh-CN");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server_url, default_server_url());
    }

    #[test]
    fn test_session_config_conversion() {
        let config = Config {
            advance_delay_ms: 250,
            ..Config::default()
        };
        let session = config.session_config();
        assert_eq!(session.advance_delay, Duration::from_millis(250));
        assert!(session.show_meaning);
    }
}
