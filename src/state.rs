use crate::Bounds;

/// Lifecycle of the asynchronous mutator.
///
/// `Loading` is the only busy state. `Succeeded` and `Failed` are idle states
/// that remember how the last asynchronous mutation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AsyncStatus {
    /// No asynchronous mutation has run, or the last one was abandoned.
    #[default]
    Idle,
    /// An asynchronous mutation is in flight.
    Loading,
    /// The last asynchronous mutation applied its amount.
    Succeeded,
    /// The last asynchronous mutation failed and left the value untouched.
    Failed,
}

impl AsyncStatus {
    /// Whether an asynchronous mutation is in flight.
    #[must_use]
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}

/// Point-in-time view of a counter.
///
/// # Example
///
/// ```
/// use counter_kit::{BoundedCounter, CounterConfig};
///
/// let counter = BoundedCounter::new(CounterConfig::default().with_bounds(-5, 5)).unwrap();
/// counter.set(5);
///
/// let state = counter.state();
/// assert_eq!(state.doubled(), 10);
/// assert!(state.at_max());
/// assert!(!state.is_loading());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterState {
    /// Current value.
    pub value: i64,
    /// Value restored by `reset`.
    pub initial: i64,
    /// Magnitude of each step.
    pub step: i64,
    /// Clamping interval.
    pub bounds: Bounds,
    /// Asynchronous mutator status.
    pub status: AsyncStatus,
}

impl CounterState {
    /// Whether an asynchronous mutation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Twice the value, saturating.
    #[must_use]
    pub fn doubled(&self) -> i64 {
        self.value.saturating_mul(2)
    }

    /// Whether the value is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    /// Whether `decrement` would be a no-op.
    #[must_use]
    pub fn at_min(&self) -> bool {
        self.value == self.bounds.min()
    }

    /// Whether `increment` would be a no-op.
    #[must_use]
    pub fn at_max(&self) -> bool {
        self.value == self.bounds.max()
    }
}
