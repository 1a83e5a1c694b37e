//! In-memory metrics registry for the simulated fleet.
//!
//! Gauges and counters with dynamic labels backed by `DashMap`. Labels are
//! flattened into sorted key vectors; rendering sorts label sets so two scrapes
//! with no intervening write produce identical bodies. Gauge values are stored
//! as `f64` bits in an `AtomicU64`, so a single `set` is one atomic store and a
//! concurrent scrape sees either the old or the new value.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use solarsim_core::{Anomaly, Farm, Sample};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_sample(out: &mut String, name: &str, key: &LabelKey, val: impl std::fmt::Display) {
    if key.is_empty() {
        let _ = writeln!(out, "{} {}", name, val);
    } else {
        let _ = writeln!(out, "{}{{{}}} {}", name, label_str(key), val);
    }
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, val) in rows {
            write_sample(out, name, &key, val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl GaugeVec {
    /// Overwrite the current value for a label set.
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        let key = label_key(labels);
        if let Some(gauge) = self.map.get(&key) {
            gauge.store(v.to_bits(), Ordering::Relaxed);
            return;
        }
        self.map
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map
            .get(&label_key(labels))
            .map(|g| f64::from_bits(g.load(Ordering::Relaxed)))
    }

    /// Number of label sets currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let mut rows: Vec<(LabelKey, f64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), f64::from_bits(r.value().load(Ordering::Relaxed))))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, val) in rows {
            write_sample(out, name, &key, val);
        }
    }
}

pub const POWER: &str = "solar_power_watts";
pub const IRRADIANCE: &str = "solar_irradiance_wm2";
pub const PANEL_TEMPERATURE: &str = "solar_panel_temperature_celsius";
pub const INVERTER_STATUS: &str = "solar_inverter_status";
pub const FARM_INFO: &str = "solar_farm_info";
pub const ANOMALIES: &str = "solar_anomalies_total";
pub const TICKS: &str = "solar_simulator_ticks_total";

/// Registry owned by the process and shared by the generator and `/metrics`.
#[derive(Default)]
pub struct FarmMetrics {
    pub power: GaugeVec,
    pub irradiance: GaugeVec,
    pub panel_temperature: GaugeVec,
    pub inverter_status: GaugeVec,
    pub farm_info: GaugeVec,
    pub anomalies: CounterVec,
    pub ticks: CounterVec,
}

impl FarmMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the static description of a farm.
    pub fn describe_farm(&self, farm: &Farm) {
        let panels = farm.panels.to_string();
        let peak = farm.peak_power_kw.to_string();
        let latitude = farm.latitude.to_string();
        self.farm_info.set(
            &[
                ("farm", &farm.id),
                ("name", &farm.name),
                ("panels", &panels),
                ("peak_power_kw", &peak),
                ("latitude", &latitude),
            ],
            1.0,
        );
    }

    /// Overwrite the four telemetry gauges of one farm.
    pub fn record(&self, farm_id: &str, sample: &Sample) {
        let labels = [("farm", farm_id)];
        self.power.set(&labels, sample.power);
        self.irradiance.set(&labels, sample.irradiance);
        self.panel_temperature.set(&labels, sample.temperature);
        self.inverter_status.set(&labels, sample.inverter_status());
        if let Some(anomaly) = sample.anomaly {
            self.record_anomaly(farm_id, anomaly);
        }
    }

    fn record_anomaly(&self, farm_id: &str, anomaly: Anomaly) {
        self.anomalies.inc(&[("farm", farm_id), ("kind", anomaly.as_str())]);
    }

    pub fn tick_completed(&self) {
        self.ticks.inc(&[]);
    }

    /// Render every family in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.power.render(POWER, "Instantaneous electrical power output", &mut out);
        self.irradiance.render(IRRADIANCE, "Measured solar irradiance", &mut out);
        self.panel_temperature.render(PANEL_TEMPERATURE, "Panel temperature", &mut out);
        self.inverter_status.render(INVERTER_STATUS, "Inverter state (1=OK, 0=failed)", &mut out);
        self.farm_info.render(FARM_INFO, "Static farm description", &mut out);
        self.anomalies.render(ANOMALIES, "Simulated anomalies injected", &mut out);
        self.ticks.render(TICKS, "Completed generator ticks", &mut out);
        out
    }
}
