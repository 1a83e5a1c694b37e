use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use solarsim_core::error::{Result, SolarSimError};
use solarsim_core::farm::default_fleet;
use solarsim_core::model::DEFAULT_ANOMALY_PROBABILITY;
use solarsim_core::Farm;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default = "default_fleet")]
    pub farms: Vec<Farm>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            simulation: SimulationSection::default(),
            farms: default_fleet(),
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SolarSimError::UnsupportedVersion);
        }
        if self.farms.is_empty() {
            return Err(SolarSimError::BadConfig("farms must not be empty".into()));
        }

        self.server.validate()?;
        self.simulation.validate()?;

        let mut seen = HashSet::new();
        for farm in &self.farms {
            validate_farm(farm)?;
            if !seen.insert(farm.id.as_str()) {
                return Err(SolarSimError::BadConfig(format!(
                    "duplicate farm id: {}",
                    farm.id
                )));
            }
        }
        Ok(())
    }
}

fn validate_farm(farm: &Farm) -> Result<()> {
    let label_safe = farm
        .id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if farm.id.is_empty() || !label_safe {
        return Err(SolarSimError::BadConfig(format!(
            "farm id must be non-empty [A-Za-z0-9_-]: {:?}",
            farm.id
        )));
    }
    if farm.panels == 0 {
        return Err(SolarSimError::BadConfig(format!(
            "farm {}: panels must be greater than 0",
            farm.id
        )));
    }
    if !farm.peak_power_kw.is_finite() || farm.peak_power_kw <= 0.0 {
        return Err(SolarSimError::BadConfig(format!(
            "farm {}: peak_power_kw must be a positive number",
            farm.id
        )));
    }
    if !(-90.0..=90.0).contains(&farm.latitude) {
        return Err(SolarSimError::BadConfig(format!(
            "farm {}: latitude must be between -90 and 90",
            farm.id
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SolarSimError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_anomaly_probability")]
    pub anomaly_probability: f64,

    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            anomaly_probability: default_anomaly_probability(),
            seed: None,
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60000).contains(&self.tick_interval_ms) {
            return Err(SolarSimError::BadConfig(
                "simulation.tick_interval_ms must be between 100 and 60000".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.anomaly_probability) {
            return Err(SolarSimError::BadConfig(
                "simulation.anomaly_probability must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn default_tick_interval_ms() -> u64 {
    2000
}
fn default_anomaly_probability() -> f64 {
    DEFAULT_ANOMALY_PROBABILITY
}
