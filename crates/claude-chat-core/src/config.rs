use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Optional settings, as read from the config file or collected from CLI flags.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

impl Config {
    /// Load the config from the default location. A missing file yields an
    /// empty config.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the config from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("claude-chat").join("config.json"))
    }

    /// Layer `overrides` on top of `self`; fields set in `overrides` win.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            model: overrides.model.or(self.model),
            max_tokens: overrides.max_tokens.or(self.max_tokens),
            base_url: overrides.base_url.or(self.base_url),
        }
    }

    /// Fill unset fields with the built-in defaults.
    pub fn into_settings(self) -> Settings {
        Settings {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Fully resolved settings for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().into_settings()
    }
}

/// Read the API key from `ANTHROPIC_API_KEY`.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

/// An absent or empty value is a configuration error.
pub fn api_key_from(value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey(API_KEY_VAR)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model, "claude-sonnet-4-5-20250929");
        assert_eq!(settings.max_tokens, 1024);
        assert_eq!(settings.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_api_key_missing_or_empty() {
        assert!(matches!(
            api_key_from(None),
            Err(ConfigError::MissingApiKey("ANTHROPIC_API_KEY"))
        ));
        assert!(matches!(
            api_key_from(Some(String::new())),
            Err(ConfigError::MissingApiKey(_))
        ));
        assert_eq!(api_key_from(Some("sk-test".into())).unwrap(), "sk-test");
    }

    #[test]
    fn test_missing_api_key_message() {
        let err = api_key_from(None).unwrap_err();
        assert_eq!(err.to_string(), "ANTHROPIC_API_KEY environment variable not set");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"model": "claude-3-5-haiku-20241022"}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.model.as_deref(), Some("claude-3-5-haiku-20241022"));
        assert_eq!(config.max_tokens, None);

        let settings = config.into_settings();
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_overrides_win() {
        let file = Config {
            model: Some("from-file".into()),
            max_tokens: Some(2048),
            base_url: Some("http://localhost:8080/".into()),
        };
        let cli = Config {
            model: Some("from-cli".into()),
            ..Config::default()
        };

        let settings = file.merge(cli).into_settings();
        assert_eq!(settings.model, "from-cli");
        assert_eq!(settings.max_tokens, 2048);
        assert_eq!(settings.base_url, "http://localhost:8080/");
    }
}
