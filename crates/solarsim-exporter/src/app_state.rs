//! Shared application state for the solarsim exporter.
//!
//! Owns the metrics registry for the lifetime of the server process. The same
//! `Arc<FarmMetrics>` is handed to the generator (writer) and to the HTTP
//! handlers (readers).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use solarsim_core::{Farm, NoiseSource, RngNoise};

use crate::config::SimulatorConfig;
use crate::generator::Generator;
use crate::obs::FarmMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<FarmMetrics>,
}

struct AppStateInner {
    cfg: SimulatorConfig,
    farms: Arc<[Farm]>,
    draining: AtomicBool,
}

impl AppState {
    /// Build application state and publish the static fleet description.
    pub fn new(cfg: SimulatorConfig) -> Self {
        let metrics = Arc::new(FarmMetrics::new());
        let farms: Arc<[Farm]> = cfg.farms.clone().into();
        for farm in farms.iter() {
            metrics.describe_farm(farm);
        }

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                farms,
                draining: AtomicBool::new(false),
            }),
            metrics,
        }
    }

    pub fn cfg(&self) -> &SimulatorConfig {
        &self.inner.cfg
    }

    pub fn farms(&self) -> Arc<[Farm]> {
        Arc::clone(&self.inner.farms)
    }

    pub fn metrics(&self) -> Arc<FarmMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Generator wired to this state's registry, with noise from config.
    pub fn generator(&self) -> Generator {
        let sim = &self.inner.cfg.simulation;
        let noise: Box<dyn NoiseSource> = match sim.seed {
            Some(seed) => Box::new(RngNoise::seeded(seed)),
            None => Box::new(RngNoise::from_entropy()),
        };
        self.generator_with(noise)
    }

    /// Generator wired to this state's registry with an explicit noise source.
    pub fn generator_with(&self, noise: Box<dyn NoiseSource>) -> Generator {
        Generator::new(
            self.farms(),
            self.metrics(),
            noise,
            self.inner.cfg.simulation.anomaly_probability,
        )
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
