use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_game_count")]
    pub game_count: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config TOML")?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache: CacheConfig::default(),
            mock: MockConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_cache_duration_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl CacheConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            game_count: default_game_count(),
            seed: None,
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_cache_duration_ms() -> u64 {
    60_000
}

fn default_sweep_interval_ms() -> u64 {
    300_000
}

fn default_game_count() -> usize {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.cache.duration_ms, 60_000);
        assert_eq!(config.cache.sweep_interval_ms, 300_000);
        assert_eq!(config.mock.game_count, 6);
        assert!(config.mock.seed.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let toml_str = r#"
data_dir = "runs"
[cache]
duration_ms = 30000
[mock]
game_count = 2
seed = 7
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, "runs");
        assert_eq!(config.cache.duration_ms, 30_000);
        assert_eq!(config.cache.sweep_interval_ms, 300_000);
        assert_eq!(config.mock.seed, Some(7));
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("truline.toml");
        std::fs::write(&path, "data_dir = \"elsewhere\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, "elsewhere");

        assert!(Config::load(dir.path().join("missing.toml")).is_err());
    }
}
