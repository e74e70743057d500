//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::database::DEFAULT_MAX_CONNECTIONS;

/// DevMatch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub matching: MatchingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Hide candidates below this technical match percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    /// Show at most this many candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

const KEYS: &[&str] = &[
    "database.path",
    "database.max_connections",
    "matching.min_score",
    "matching.limit",
];

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DEVMATCH_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("devmatch")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the config path, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            // Return default config without creating file
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the config path
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.max_connections == 0 {
            return Err(anyhow!("database.max_connections must be at least 1"));
        }
        if let Some(min_score) = self.matching.min_score {
            if !(0.0..=100.0).contains(&min_score) {
                return Err(anyhow!("matching.min_score must be between 0 and 100"));
            }
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        fn or_unset<T: ToString>(value: Option<T>) -> String {
            value.map_or_else(|| "(not set)".to_string(), |v| v.to_string())
        }

        match key {
            "database.path" => Ok(or_unset(
                self.database.path.as_ref().map(|p| p.display()),
            )),
            "database.max_connections" => Ok(self.database.max_connections.to_string()),
            "matching.min_score" => Ok(or_unset(self.matching.min_score)),
            "matching.limit" => Ok(or_unset(self.matching.limit)),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Valid keys: {}",
                key,
                KEYS.join(", ")
            )),
        }
    }

    /// Set a configuration value by key. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key {
            "database.path" => {
                self.database.path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "database.max_connections" => {
                let max: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid max_connections value: {}", value))?;
                if max == 0 {
                    return Err(anyhow!("max_connections must be at least 1"));
                }
                self.database.max_connections = max;
            }
            "matching.min_score" if value.is_empty() => self.matching.min_score = None,
            "matching.min_score" => {
                let score: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid min_score value: {}", value))?;
                if !(0.0..=100.0).contains(&score) {
                    return Err(anyhow!("min_score must be between 0 and 100"));
                }
                self.matching.min_score = Some(score);
            }
            "matching.limit" if value.is_empty() => self.matching.limit = None,
            "matching.limit" => {
                self.matching.limit = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid limit value: {}", value))?,
                );
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Valid keys: {}",
                    key,
                    KEYS.join(", ")
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        KEYS.iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.database.path.is_none());
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.matching.min_score.is_none());
        assert!(config.matching.limit.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database.path = Some(PathBuf::from("/tmp/devmatch.db"));
        config.matching.min_score = Some(40.0);
        config.matching.limit = Some(5);
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[matching]\nlimit = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.matching.limit, Some(3));
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[matching]\nmin_score = 150.0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_max_connections() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
        assert!(config.save_to(Path::new("/nonexistent/never-written.toml")).is_err());
    }

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();

        config.set("matching.min_score", "25").unwrap();
        assert_eq!(config.get("matching.min_score").unwrap(), "25");

        config.set("matching.min_score", "").unwrap();
        assert_eq!(config.get("matching.min_score").unwrap(), "(not set)");

        assert!(config.set("matching.min_score", "101").is_err());
        assert!(config.set("database.max_connections", "0").is_err());
        assert!(config.set("matching.limit", "many").is_err());
        assert!(config.set("llm.model", "x").is_err());
        assert!(config.get("llm.model").is_err());
    }

    #[test]
    fn test_list_covers_all_keys() {
        let listed = Config::default().list().unwrap();
        let keys: Vec<_> = listed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, KEYS);
    }
}
