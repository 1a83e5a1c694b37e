//! Periodic telemetry generator.
//!
//! Each tick reads the wall clock once, computes a sample per farm, and
//! overwrites that farm's gauges. Ticks are independent: nothing is carried
//! over from the previous one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use solarsim_core::error::{Result, SolarSimError};
use solarsim_core::model::{self, hour_of_day};
use solarsim_core::{Anomaly, Farm, NoiseSource, Sample};

use crate::obs::FarmMetrics;

/// Shortest accepted tick period.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct Generator {
    farms: Arc<[Farm]>,
    metrics: Arc<FarmMetrics>,
    noise: Box<dyn NoiseSource>,
    anomaly_probability: f64,
}

impl Generator {
    pub fn new(
        farms: Arc<[Farm]>,
        metrics: Arc<FarmMetrics>,
        noise: Box<dyn NoiseSource>,
        anomaly_probability: f64,
    ) -> Self {
        Self {
            farms,
            metrics,
            noise,
            anomaly_probability,
        }
    }

    /// Run one tick against the local wall clock.
    pub fn tick(&mut self) {
        let hour = hour_of_day(&chrono::Local::now());
        self.tick_at(hour);
    }

    /// Run one tick for a given fractional hour of day.
    pub fn tick_at(&mut self, hour: f64) {
        for farm in self.farms.iter() {
            let sample = model::sample(farm, hour, self.noise.as_mut(), self.anomaly_probability);
            log_anomaly(farm, &sample);
            self.metrics.record(&farm.id, &sample);
        }
        self.metrics.tick_completed();
        tracing::debug!(hour, farms = self.farms.len(), "generator tick");
    }

    /// Drive `tick` every `period` until the returned handle is shut down.
    ///
    /// The first tick fires immediately so the registry is populated before
    /// the first scrape. Late ticks are delayed, never replayed in a burst.
    /// Periods shorter than [`MIN_PERIOD`] are raised to it. Dropping the
    /// handle detaches the task; it keeps ticking for the process lifetime.
    pub fn spawn(mut self, period: Duration) -> GeneratorHandle {
        let period = period.max(MIN_PERIOD);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut detached = false;
            loop {
                tokio::select! {
                    res = &mut shutdown_rx, if !detached => match res {
                        Ok(()) => break,
                        Err(_) => detached = true,
                    },
                    _ = interval.tick() => self.tick(),
                }
            }
            tracing::info!("generator stopped");
        });

        GeneratorHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

fn log_anomaly(farm: &Farm, sample: &Sample) {
    match sample.anomaly {
        Some(Anomaly::InverterFailure) => {
            tracing::warn!(farm = %farm.id, name = %farm.name, "inverter failure");
        }
        Some(Anomaly::Overheat) => {
            tracing::warn!(
                farm = %farm.id,
                name = %farm.name,
                temperature = sample.temperature,
                "panel overheat"
            );
        }
        Some(Anomaly::DegradedOutput) => {
            tracing::debug!(farm = %farm.id, power = sample.power, "degraded output");
        }
        None => {}
    }
}

/// Handle to the running generator task.
#[derive(Debug)]
#[must_use = "dropping the handle detaches the generator; keep it to shut down cleanly"]
pub struct GeneratorHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl GeneratorHandle {
    /// Stop scheduling ticks and wait for the task to exit.
    /// A tick already running completes first.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task
            .await
            .map_err(|e| SolarSimError::Internal(format!("generator task failed: {e}")))
    }

    /// True once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
