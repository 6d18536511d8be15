//! Error types.
//!
//! Construction is the only place a counter can be misconfigured, and the
//! asynchronous mutator is the only operation with a runtime failure mode.
//! Every other mutator is total over `i64`.

use thiserror::Error;

use crate::Bounds;

/// A [`CounterConfig`](crate::CounterConfig) that cannot produce a counter.
///
/// Returned by [`BoundedCounter::new`](crate::BoundedCounter::new). The
/// counter never clamps a bad initial value into range; the caller has to
/// rebuild the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The lower bound is greater than the upper bound.
    #[error("min ({min}) is greater than max ({max})")]
    InvertedBounds {
        /// Configured lower bound.
        min: i64,
        /// Configured upper bound.
        max: i64,
    },
    /// The initial value lies outside the configured bounds.
    #[error("initial value {initial} lies outside {bounds}")]
    InitialOutOfBounds {
        /// Configured initial value.
        initial: i64,
        /// Resolved bounds the value was checked against.
        bounds: Bounds,
    },
    /// The step is zero or negative.
    #[error("step must be positive, got {0}")]
    NonPositiveStep(i64),
}

/// An asynchronous increment was requested while another one is in flight.
///
/// Recoverable: retry once [`BoundedCounter::is_loading`](crate::BoundedCounter::is_loading)
/// reports `false` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("an asynchronous increment is already in progress")]
pub struct AlreadyInProgress;

/// Errors from saving, loading, or parsing persisted counter data.
#[cfg(feature = "persist")]
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A snapshot could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Toml(#[from] toml::de::Error),
    /// A snapshot was written by an incompatible version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),
    /// The storage backend reported an error.
    #[error("storage backend error: {0}")]
    Store(String),
    /// The parsed configuration was rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
