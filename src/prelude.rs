//! Convenient re-exports for common usage.
//!
//! ```
//! use counter_kit::prelude::*;
//! ```

pub use crate::Action;
pub use crate::AlreadyInProgress;
pub use crate::AsyncStatus;
pub use crate::BoundedCounter;
pub use crate::ConfigurationError;
pub use crate::CounterConfig;
pub use crate::CounterEvent;
pub use crate::CounterState;
#[cfg(feature = "persist")]
pub use crate::persist::{FileStore, MemoryStore, StateStore};
