//! solarsim core: farm model, telemetry generation, and error types.
//!
//! This crate holds the physics-flavoured sample model shared by the exporter
//! and tests. It carries no transport or runtime dependencies; randomness is
//! injected through [`noise::NoiseSource`] so every formula can be pinned down
//! deterministically.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod farm;
pub mod model;
pub mod noise;

/// Shared result type.
pub use error::{Result, SolarSimError};
pub use farm::{Anomaly, Farm, Sample};
pub use noise::{NoiseSource, RngNoise};
