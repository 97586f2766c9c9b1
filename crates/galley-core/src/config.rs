use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::router::UserMode;
use crate::state::KeymapPreset;
use crate::state::UiTheme;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GalleyConfig {
    pub ui: UiConfig,
    pub simulation: SimulationConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub theme: UiTheme,
    pub mode: UserMode,
    pub keymap: Option<KeymapPreset>,
    pub project_name: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: UiTheme::Classic,
            mode: UserMode::Advanced,
            keymap: None,
            project_name: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub step_delay_ms: u64,
    pub chat_delay_ms: u64,
    pub session_tick_ms: u64,
    pub toast_ttl_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 900,
            chat_delay_ms: 1_200,
            session_tick_ms: 700,
            toast_ttl_ms: 3_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: Option<PathBuf>,
}

impl GalleyConfig {
    /// A missing file is not an error; it yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
