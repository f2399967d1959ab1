use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "DND_ROLL_CONFIG";
const DEFAULT_CONFIG: &str = "dnd-roll.toml";

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Plain,
    Markdown,
    Json,
}

impl Default for Format {
    fn default() -> Self {
        Format::Plain
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Config {
    pub name: String,
    pub format: Format,
    pub seed: Option<u64>,
    pub details: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: "you".to_string(),
            format: Format::Plain,
            seed: None,
            details: true,
        }
    }
}

impl Config {
    /// Explicit path, then the env var, then `dnd-roll.toml` if it exists.
    pub fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG);
                if default.exists() {
                    Some(default)
                } else {
                    None
                }
            })
    }

    pub fn from_toml(source: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(source)
    }

    /// Never fails, a broken file only costs a warning.
    pub fn load(path: &Path) -> Config {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Unable to read config file {:?}: {}", path, e);
                return Config::default();
            }
        };
        match Config::from_toml(&source) {
            Ok(config) => {
                log::info!("loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Unable to parse config {:?}: {}", path, e);
                Config::default()
            }
        }
    }
}
