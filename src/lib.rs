//! # counter-kit
//!
//! Observable bounded counters for application state.
//!
//! A [`BoundedCounter`] holds an integer clamped into optional `[min, max]`
//! bounds. It moves by a fixed step, can be reset or set directly, and can
//! run one latency-bound asynchronous increment at a time while exposing a
//! loading flag. Every change is pushed synchronously to subscribed
//! listeners.
//!
//! ## Quick Start
//!
//! ```
//! use counter_kit::prelude::*;
//!
//! let counter = BoundedCounter::new(
//!     CounterConfig::default().with_initial(5).with_bounds(0, 10),
//! )
//! .unwrap();
//!
//! counter.increment();
//! counter.set(-20);
//! assert_eq!(counter.value(), 0);
//!
//! counter.reset();
//! assert_eq!(counter.value(), 5);
//! ```
//!
//! ## Invariants
//!
//! - `min <= value <= max` at all times; out-of-range input saturates.
//! - Construction rejects `step <= 0`, `min > max`, and an `initial`
//!   outside the bounds with a [`ConfigurationError`].
//! - At most one asynchronous increment is in flight per counter; a second
//!   one fails with [`AlreadyInProgress`].
//!
//! ## Features
//!
//! - `persist` *(default)*: JSON snapshots, storage backends, and TOML
//!   configuration loading. See [`persist`].
//! - `serde`: `Serialize`/`Deserialize` for configs, actions, and state.
//! - `wasm`: JavaScript bindings.

#![warn(missing_docs)]

mod bounds;
mod config;
mod counter;
mod error;
mod history;
mod state;
#[cfg(feature = "wasm")]
mod wasm;

pub mod action;
pub mod observer;
#[cfg(feature = "persist")]
pub mod persist;
pub mod prelude;

pub use action::Action;
pub use bounds::Bounds;
pub use config::{CounterConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_LATENCY};
pub use counter::BoundedCounter;
#[cfg(feature = "persist")]
pub use error::PersistError;
pub use error::{AlreadyInProgress, ConfigurationError};
pub use observer::{CounterEvent, SubscriptionId};
pub use state::{AsyncStatus, CounterState};
