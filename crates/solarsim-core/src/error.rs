//! Shared error type across solarsim crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, SolarSimError>;

/// Unified error type used by core and exporter.
///
/// The generation model itself is total; these variants only surface while
/// loading configuration and bootstrapping the process.
#[derive(Debug, Error)]
pub enum SolarSimError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("io: {0}")]
    Io(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SolarSimError {
    /// Stable short name, handy for log fields and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            SolarSimError::BadConfig(_) => "BAD_CONFIG",
            SolarSimError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            SolarSimError::Io(_) => "IO",
            SolarSimError::Internal(_) => "INTERNAL",
        }
    }
}
