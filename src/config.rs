use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gate: GateConfig,
}

/// Inputs for the startup validation gate.
#[derive(Debug, Deserialize)]
pub struct GateConfig {
    /// Catalog definition file (JSON array of categories).
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Registered-routes file (JSON array of router mounts).
    #[serde(default = "default_routes")]
    pub routes: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            routes: default_routes(),
        }
    }
}

fn default_catalog() -> PathBuf {
    "catalog.json".into()
}
fn default_routes() -> PathBuf {
    "routes.json".into()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }
}
