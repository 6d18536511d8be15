//! Counter mutations expressed as data.
//!
//! Every synchronous mutator of [`BoundedCounter`](crate::BoundedCounter) has
//! an [`Action`] counterpart. Actions can be logged, queued, or replayed, and
//! [`Action::apply`] is a pure reducer that needs no counter at all:
//!
//! ```text
//! (value, Limits) --Action::apply--> value'
//! ```
//!
//! ```
//! use counter_kit::action::{Action, Limits};
//! use counter_kit::Bounds;
//!
//! let limits = Limits {
//!     initial: 5,
//!     step: 1,
//!     bounds: Bounds::new(Some(0), Some(10)).unwrap(),
//! };
//!
//! let value = [Action::Decrement; 6]
//!     .iter()
//!     .fold(limits.initial, |value, action| action.apply(value, &limits));
//! assert_eq!(value, 0);
//! ```

use crate::Bounds;

/// Static parameters an [`Action`] is applied against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Target of [`Action::Reset`].
    pub initial: i64,
    /// Magnitude of [`Action::Increment`] and [`Action::Decrement`].
    pub step: i64,
    /// Interval every result is clamped into.
    pub bounds: Bounds,
}

/// A synchronous counter mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "amount", rename_all = "snake_case")
)]
pub enum Action {
    /// Add one step, saturating at the upper bound.
    Increment,
    /// Subtract one step, saturating at the lower bound.
    Decrement,
    /// Add a signed amount, clamped into bounds.
    IncrementBy(i64),
    /// Return to the initial value.
    Reset,
    /// Jump to a target, clamped into bounds.
    Set(i64),
}

impl Action {
    /// Compute the value that results from applying `self` to `value`.
    #[must_use]
    pub fn apply(&self, value: i64, limits: &Limits) -> i64 {
        match *self {
            Self::Increment => limits.bounds.offset(value, limits.step),
            Self::Decrement => limits.bounds.offset(value, limits.step.saturating_neg()),
            Self::IncrementBy(amount) => limits.bounds.offset(value, amount),
            Self::Reset => limits.initial,
            Self::Set(target) => limits.bounds.clamp(target),
        }
    }
}
