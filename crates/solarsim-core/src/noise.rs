//! Injectable randomness for the generation model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::farm::Anomaly;

/// Lower bound of the atmospheric attenuation factor.
pub const ATMOSPHERIC_MIN: f64 = 0.8;
/// Upper bound of the atmospheric attenuation factor.
pub const ATMOSPHERIC_MAX: f64 = 1.0;

/// Source of every random decision the model makes.
///
/// Tests substitute a scripted implementation to pin the atmospheric factor
/// and the anomaly outcome.
pub trait NoiseSource: Send {
    /// Multiplicative factor applied to clear-sky irradiance, in `[0.8, 1.0]`.
    fn atmospheric_factor(&mut self) -> f64;

    /// Roll for an anomaly; `probability` is the chance that any fires.
    fn anomaly(&mut self, probability: f64) -> Option<Anomaly>;
}

/// [`NoiseSource`] backed by any `rand` generator.
#[derive(Debug)]
pub struct RngNoise<R> {
    rng: R,
}

impl<R: Rng> RngNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNoise<StdRng> {
    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> NoiseSource for RngNoise<R> {
    fn atmospheric_factor(&mut self) -> f64 {
        self.rng.gen_range(ATMOSPHERIC_MIN..=ATMOSPHERIC_MAX)
    }

    fn anomaly(&mut self, probability: f64) -> Option<Anomaly> {
        // gen_bool panics outside [0, 1]; compare against a unit draw instead.
        if self.rng.gen::<f64>() >= probability {
            return None;
        }
        let idx = self.rng.gen_range(0..Anomaly::ALL.len());
        Anomaly::ALL.get(idx).copied()
    }
}
