//! Simulator config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use solarsim_core::error::{Result, SolarSimError};

pub use schema::{ServerSection, SimulationSection, SimulatorConfig};

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "SOLARSIM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "solarsim.yaml";

pub fn load_from_file(path: &str) -> Result<SimulatorConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SolarSimError::Io(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<SimulatorConfig> {
    let cfg: SimulatorConfig = serde_yaml::from_str(s)
        .map_err(|e| SolarSimError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config path from the environment and load it.
///
/// A missing default file falls back to the built-in fleet; an explicitly
/// configured path must exist.
pub fn load() -> Result<SimulatorConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(&path),
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        Err(_) => {
            tracing::info!(
                path = DEFAULT_CONFIG_PATH,
                "config file not found, using built-in fleet"
            );
            let cfg = SimulatorConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
