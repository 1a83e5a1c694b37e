//! Top-level facade crate for solarsim.
//!
//! Re-exports the domain model and the exporter so users can depend on a single crate.

pub mod core {
    pub use solarsim_core::*;
}

pub mod exporter {
    pub use solarsim_exporter::*;
}
