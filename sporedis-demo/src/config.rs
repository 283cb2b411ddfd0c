//! TOML configuration: key naming, store connection and index attributes.
//!
//! ```toml
//! [keys]
//! prefix = "oly"
//! separator = ":"
//!
//! [store]
//! pool_size = 8
//! op_timeout_ms = 5000
//! scan_count = 100
//! # redis_url = "redis://localhost:6379/0"
//!
//! [index]
//! lookup_attributes = ["disabled_access", "medal_event", "venue", "tbd"]
//! ```

use serde::{Deserialize, Serialize};
use sporedis_keys::KeyConfig;
use sporedis_store::StoreConfig;
use std::path::Path;
use tracing::{info, warn};

/// Attributes the demo's facet indexes maintain entries for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_lookup_attributes")]
    pub lookup_attributes: Vec<String>,
}

fn default_lookup_attributes() -> Vec<String> {
    ["disabled_access", "medal_event", "venue", "tbd"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            lookup_attributes: default_lookup_attributes(),
        }
    }
}

/// Full configuration, parsed from `sporedis.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SporedisConfig {
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

impl SporedisConfig {
    /// Parses a TOML document. Missing sections and fields take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads configuration from `path`.
    /// Falls back to defaults with a warning when the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
