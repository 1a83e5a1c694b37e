//! Static farm description and the per-tick sample it produces.

use serde::Deserialize;

/// A modeled solar installation. Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Farm {
    /// Label value used on every published metric.
    pub id: String,
    /// Human readable site name (only used for logs and `solar_farm_info`).
    pub name: String,
    pub panels: u32,
    /// Peak rating of a single panel, in kW.
    pub peak_power_kw: f64,
    pub latitude: f64,
}

impl Farm {
    pub fn new(id: &str, name: &str, panels: u32, peak_power_kw: f64, latitude: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            panels,
            peak_power_kw,
            latitude,
        }
    }

    /// Peak rating of a single panel, in W.
    pub fn peak_power_watts(&self) -> f64 {
        self.peak_power_kw * 1000.0
    }

    /// Installed capacity of the whole farm, in W.
    pub fn capacity_watts(&self) -> f64 {
        f64::from(self.panels) * self.peak_power_watts()
    }
}

/// Built-in fleet used when no configuration file is supplied.
pub fn default_fleet() -> Vec<Farm> {
    vec![
        Farm::new("provence", "Marseille", 5000, 0.4, 43.29),
        Farm::new("occitanie", "Montpellier", 3500, 0.4, 43.61),
        Farm::new("aquitaine", "Bordeaux", 4200, 0.4, 44.83),
    ]
}

/// Simulated fault injected into a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anomaly {
    /// Production forced to zero, inverter reported as failed.
    InverterFailure,
    /// Panel temperature raised by a fixed offset.
    Overheat,
    /// Production halved.
    DegradedOutput,
}

impl Anomaly {
    pub const ALL: [Anomaly; 3] = [
        Anomaly::InverterFailure,
        Anomaly::Overheat,
        Anomaly::DegradedOutput,
    ];

    /// Label value used by `solar_anomalies_total`.
    pub fn as_str(self) -> &'static str {
        match self {
            Anomaly::InverterFailure => "inverter_failure",
            Anomaly::Overheat => "overheat",
            Anomaly::DegradedOutput => "degraded_output",
        }
    }
}

/// One instantaneous reading for one farm. Values are already rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// W/m², always >= 0.
    pub irradiance: f64,
    /// Panel temperature in °C.
    pub temperature: f64,
    /// Output in W, always >= 0.
    pub power: f64,
    pub inverter_ok: bool,
    pub anomaly: Option<Anomaly>,
}

impl Sample {
    /// Gauge encoding of the inverter state: 1 = OK, 0 = failed.
    pub fn inverter_status(&self) -> f64 {
        if self.inverter_ok {
            1.0
        } else {
            0.0
        }
    }
}
