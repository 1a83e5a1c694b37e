//! solarsim exporter library entry.
//!
//! Wires configuration, the metrics registry, the periodic generator, and the
//! HTTP surface into one process. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod generator;
pub mod obs;
pub mod ops;
pub mod router;
