//! Lightweight in-process metrics.
//!
//! Telemetry gauges live as atomics and are rendered by the `/metrics`
//! handler in Prometheus text format.

pub mod metrics;

pub use metrics::FarmMetrics;
