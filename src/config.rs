use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{SimError, SimResult};
use crate::ideas::{Idea, IdeaCatalog};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// How many saved scenarios the front ends show by default.
    pub list_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            list_limit: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Seeds the jitter RNG so repeated runs draw the same values.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub web_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            web_root: "web".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub storage: StorageConfig,
    pub jitter: JitterConfig,
    pub server: ServerConfig,
    /// Replaces the built-in idea catalog when non-empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ideas: Vec<Idea>,
}

impl SimConfig {
    /// Defaults with the built-in catalog spelled out as `[[ideas]]` tables.
    pub fn starter() -> Self {
        Self {
            ideas: IdeaCatalog::builtin().all().to_vec(),
            ..Self::default()
        }
    }

    pub fn load(path: Option<PathBuf>) -> SimResult<(Self, PathBuf)> {
        let config_path = resolve_path(path);
        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .map_err(|err| SimError::Config(format!("failed to read config: {}", err)))?;
            toml::from_str(&contents)
                .map_err(|err| SimError::Config(format!("failed to parse config: {}", err)))?
        } else {
            SimConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path, overwrite: bool) -> SimResult<()> {
        if path.exists() && !overwrite {
            return Err(SimError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                SimError::Config(format!("failed to create config dir: {}", err))
            })?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| SimError::Config(format!("failed to serialize config: {}", err)))?;
        std::fs::write(path, payload)
            .map_err(|err| SimError::Config(format!("failed to write config: {}", err)))?;
        Ok(())
    }

    pub fn catalog(&self) -> IdeaCatalog {
        if self.ideas.is_empty() {
            IdeaCatalog::builtin()
        } else {
            IdeaCatalog::new(self.ideas.clone())
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("VENTURE_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.storage.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(limit) = env::var("VENTURE_LIST_LIMIT") {
            if let Ok(value) = limit.parse::<usize>() {
                self.storage.list_limit = value;
            }
        }
        if let Ok(seed) = env::var("VENTURE_JITTER_SEED") {
            if let Ok(value) = seed.parse::<u64>() {
                self.jitter.seed = Some(value);
            }
        }
        if let Ok(host) = env::var("VENTURE_HOST") {
            if !host.trim().is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = env::var("VENTURE_PORT") {
            if let Ok(value) = port.parse::<u16>() {
                self.server.port = value;
            }
        }
    }
}

/// `--config`, then `VENTURE_CONFIG_PATH`, then `config/venture.toml`.
pub fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    path.or_else(|| {
        env::var("VENTURE_CONFIG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from("config/venture.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskCategory;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/tmp/venture"

            [jitter]
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/venture"));
        assert_eq!(config.storage.list_limit, 6);
        assert_eq!(config.jitter.seed, Some(9));
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.catalog().all().len(), IdeaCatalog::builtin().all().len());
    }

    #[test]
    fn idea_tables_replace_catalog() {
        let config: SimConfig = toml::from_str(
            r#"
            [[ideas]]
            id = "solar-kiosk"
            title = "Solar Charging Kiosk"
            risk = "high"
            market = "other"
            "#,
        )
        .unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.all().len(), 1);
        assert_eq!(catalog.get("solar-kiosk").unwrap().risk, RiskCategory::High);
    }

    #[test]
    fn starter_file_reloads_with_full_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config/venture.toml");
        SimConfig::starter().write(&path, false).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[ideas]]"));

        let (loaded, loaded_path) = SimConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded_path, path);
        assert_eq!(loaded.server.host, "127.0.0.1");
        assert_eq!(loaded.ideas, IdeaCatalog::builtin().all().to_vec());
    }

    #[test]
    fn write_keeps_existing_file_unless_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("venture.toml");
        std::fs::write(&path, "[jitter]\nseed = 3\n").unwrap();

        assert!(matches!(
            SimConfig::starter().write(&path, false),
            Err(SimError::Config(_))
        ));
        assert!(std::fs::read_to_string(&path).unwrap().contains("seed = 3"));

        let mut config = SimConfig::default();
        config.storage.list_limit = 3;
        config.write(&path, true).unwrap();
        let (loaded, _) = SimConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.storage.list_limit, 3);
    }

    #[test]
    fn unparsable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "storage = [").unwrap();
        assert!(matches!(
            SimConfig::load(Some(path)),
            Err(SimError::Config(_))
        ));
    }
}
