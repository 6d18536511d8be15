use core::time::Duration;

use crate::{Bounds, ConfigurationError};

/// Default simulated latency of an asynchronous increment.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// Default number of values kept in a counter's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Construction options for a [`BoundedCounter`](crate::BoundedCounter).
///
/// Every field has a default, so a config only needs to name what differs:
///
/// ```
/// use counter_kit::CounterConfig;
///
/// let config = CounterConfig::default()
///     .with_initial(5)
///     .with_bounds(0, 10);
/// assert!(config.validate().is_ok());
///
/// let bad = CounterConfig::default().with_initial(11).with_max(10);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct CounterConfig {
    /// Value at construction and after `reset`.
    pub initial: i64,
    /// Magnitude of each `increment`/`decrement`. Must be positive.
    pub step: i64,
    /// Lower bound, or `None` for unbounded.
    pub min: Option<i64>,
    /// Upper bound, or `None` for unbounded.
    pub max: Option<i64>,
    /// Simulated latency of `increment_async`, in milliseconds.
    pub latency_ms: u64,
    /// How many past values to keep. `0` disables history.
    pub history_limit: usize,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            initial: 0,
            step: 1,
            min: None,
            max: None,
            latency_ms: DEFAULT_LATENCY.as_millis() as u64,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl CounterConfig {
    /// Set the initial value.
    pub fn with_initial(mut self, initial: i64) -> Self {
        self.initial = initial;
        self
    }

    /// Set the step.
    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Set the lower bound.
    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set both bounds.
    pub fn with_bounds(self, min: i64, max: i64) -> Self {
        self.with_min(min).with_max(max)
    }

    /// Set the simulated latency of `increment_async`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the history limit.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Simulated latency of `increment_async`.
    #[must_use]
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Check the construction invariants and resolve the bounds.
    ///
    /// Requires `step > 0` and `min <= initial <= max`.
    pub fn validate(&self) -> Result<Bounds, ConfigurationError> {
        if self.step <= 0 {
            return Err(ConfigurationError::NonPositiveStep(self.step));
        }
        let bounds = Bounds::new(self.min, self.max)?;
        if !bounds.contains(self.initial) {
            return Err(ConfigurationError::InitialOutOfBounds {
                initial: self.initial,
                bounds,
            });
        }
        Ok(bounds)
    }

    /// Parse and validate a TOML configuration document.
    ///
    /// ```
    /// use counter_kit::CounterConfig;
    ///
    /// let config = CounterConfig::from_toml_str("initial = 5\nmin = 0\nmax = 10").unwrap();
    /// assert_eq!(config.initial, 5);
    /// assert_eq!(config.step, 1);
    /// ```
    #[cfg(feature = "persist")]
    pub fn from_toml_str(document: &str) -> Result<Self, crate::PersistError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_unbounded() {
        let config = CounterConfig::default();
        assert_eq!(config.validate(), Ok(Bounds::UNBOUNDED));
        assert_eq!(config.latency(), DEFAULT_LATENCY);
    }

    #[test]
    fn zero_and_negative_steps_are_rejected() {
        for step in [0, -1, i64::MIN] {
            assert_eq!(
                CounterConfig::default().with_step(step).validate(),
                Err(ConfigurationError::NonPositiveStep(step))
            );
        }
    }

    #[test]
    fn initial_must_lie_in_bounds() {
        let below = CounterConfig::default().with_initial(-1).with_min(0);
        assert!(matches!(
            below.validate(),
            Err(ConfigurationError::InitialOutOfBounds { initial: -1, .. })
        ));

        let above = CounterConfig::default().with_initial(11).with_max(10);
        assert!(matches!(
            above.validate(),
            Err(ConfigurationError::InitialOutOfBounds { initial: 11, .. })
        ));
    }

    #[test]
    fn inverted_bounds_win_over_initial_check() {
        let config = CounterConfig::default().with_bounds(10, 0);
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::InvertedBounds { min: 10, max: 0 })
        );
    }

    #[test]
    fn latency_round_trips_through_millis() {
        let config = CounterConfig::default().with_latency(Duration::from_millis(250));
        assert_eq!(config.latency_ms, 250);
        assert_eq!(config.latency(), Duration::from_millis(250));
    }

    #[cfg(feature = "persist")]
    #[test]
    fn toml_rejects_unknown_options() {
        assert!(CounterConfig::from_toml_str("initial = 1\nspeed = 3").is_err());
    }

    #[cfg(feature = "persist")]
    #[test]
    fn toml_runs_validation() {
        let err = CounterConfig::from_toml_str("step = 0").unwrap_err();
        assert!(matches!(
            err,
            crate::PersistError::Configuration(ConfigurationError::NonPositiveStep(0))
        ));
    }
}
