//! Telemetry generation model.
//!
//! Pipeline per farm and tick:
//! 1. clear-sky irradiance from the fractional hour (half sine between 06:00 and 18:00)
//! 2. atmospheric attenuation drawn from the noise source
//! 3. panel temperature from the irradiance fraction
//! 4. nominal production with system efficiency and linear temperature derating
//! 5. optional anomaly
//! 6. rounding to 2 decimals, production clamped at zero

use std::f64::consts::PI;

use chrono::Timelike;

use crate::farm::{Anomaly, Farm, Sample};
use crate::noise::NoiseSource;

/// Irradiance at solar noon under a clear sky, W/m².
pub const PEAK_IRRADIANCE: f64 = 1000.0;
pub const SUNRISE_HOUR: f64 = 6.0;
pub const SUNSET_HOUR: f64 = 18.0;

/// Panel temperature with no sun, °C.
pub const AMBIENT_TEMPERATURE: f64 = 15.0;
/// Temperature rise at peak irradiance, °C.
pub const MAX_TEMPERATURE_RISE: f64 = 30.0;

pub const SYSTEM_EFFICIENCY: f64 = 0.85;
/// Derating reference point, °C.
pub const REFERENCE_TEMPERATURE: f64 = 25.0;
/// Fractional output lost per °C above the reference.
pub const TEMPERATURE_COEFFICIENT: f64 = 0.0035;

pub const OVERHEAT_OFFSET: f64 = 30.0;
pub const DEFAULT_ANOMALY_PROBABILITY: f64 = 0.10;

/// Fractional hour of day (`14:30` -> `14.5`). Seconds are ignored.
pub fn hour_of_day<T: Timelike>(t: &T) -> f64 {
    f64::from(t.hour()) + f64::from(t.minute()) / 60.0
}

/// Irradiance before atmospheric attenuation. Zero outside `(6, 18)`.
pub fn clear_sky_irradiance(hour: f64) -> f64 {
    if hour > SUNRISE_HOUR && hour < SUNSET_HOUR {
        PEAK_IRRADIANCE * (PI * (hour - SUNRISE_HOUR) / (SUNSET_HOUR - SUNRISE_HOUR)).sin()
    } else {
        0.0
    }
}

pub fn panel_temperature(irradiance: f64) -> f64 {
    AMBIENT_TEMPERATURE + (irradiance / PEAK_IRRADIANCE) * MAX_TEMPERATURE_RISE
}

/// Linear derating around 25 °C; above 1.0 for colder panels.
pub fn temperature_derating(temperature: f64) -> f64 {
    1.0 - TEMPERATURE_COEFFICIENT * (temperature - REFERENCE_TEMPERATURE)
}

/// Production in W for the given irradiance and panel temperature.
pub fn nominal_power(farm: &Farm, irradiance: f64, temperature: f64) -> f64 {
    f64::from(farm.panels)
        * farm.peak_power_watts()
        * (irradiance / PEAK_IRRADIANCE)
        * SYSTEM_EFFICIENCY
        * temperature_derating(temperature)
}

/// Round half away from zero to 2 decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Compute one sample for `farm` at fractional hour `hour`.
///
/// Overheat raises the published temperature only; derating keeps using the
/// temperature computed before the anomaly.
pub fn sample(
    farm: &Farm,
    hour: f64,
    noise: &mut dyn NoiseSource,
    anomaly_probability: f64,
) -> Sample {
    let mut irradiance = clear_sky_irradiance(hour);
    if irradiance > 0.0 {
        irradiance *= noise.atmospheric_factor();
    }

    let mut temperature = panel_temperature(irradiance);
    let mut power = nominal_power(farm, irradiance, temperature);
    let mut inverter_ok = true;

    let anomaly = noise.anomaly(anomaly_probability);
    match anomaly {
        Some(Anomaly::InverterFailure) => {
            power = 0.0;
            inverter_ok = false;
        }
        Some(Anomaly::Overheat) => temperature += OVERHEAT_OFFSET,
        Some(Anomaly::DegradedOutput) => power *= 0.5,
        None => {}
    }

    Sample {
        irradiance: round2(irradiance).max(0.0),
        temperature: round2(temperature),
        power: round2(power).max(0.0),
        inverter_ok,
        anomaly,
    }
}
