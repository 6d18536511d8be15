use core::fmt;

use crate::ConfigurationError;

/// A closed interval `[min, max]` that a counter value is clamped into.
///
/// A missing bound is stored as the matching `i64` extreme, so an unbounded
/// side behaves like infinity: nothing is ever clamped against it, and
/// arithmetic saturates there instead of overflowing.
///
/// # Example
///
/// ```
/// use counter_kit::Bounds;
///
/// let bounds = Bounds::new(Some(0), Some(10)).unwrap();
/// assert_eq!(bounds.clamp(42), 10);
/// assert_eq!(bounds.offset(9, 5), 10);
/// assert_eq!(bounds.offset(1, -5), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawBounds")
)]
pub struct Bounds {
    min: i64,
    max: i64,
}

impl Bounds {
    /// The interval covering every `i64`.
    pub const UNBOUNDED: Self = Self {
        min: i64::MIN,
        max: i64::MAX,
    };

    /// Resolve optional bounds into an interval.
    ///
    /// Fails with [`ConfigurationError::InvertedBounds`] when `min > max`.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Result<Self, ConfigurationError> {
        let min = min.unwrap_or(i64::MIN);
        let max = max.unwrap_or(i64::MAX);
        if min > max {
            return Err(ConfigurationError::InvertedBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound (`i64::MIN` when unbounded).
    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound (`i64::MAX` when unbounded).
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Whether `value` lies inside the interval.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Saturate `value` into the interval.
    #[must_use]
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }

    /// `clamp(value + delta)`, saturating at the `i64` extremes first.
    #[must_use]
    pub fn offset(&self, value: i64, delta: i64) -> i64 {
        self.clamp(value.saturating_add(delta))
    }
}

/// Unchecked wire form of [`Bounds`]; deserialization goes through
/// [`Bounds::new`] so an inverted interval is rejected.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBounds {
    min: i64,
    max: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBounds> for Bounds {
    type Error = ConfigurationError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(Some(raw.min), Some(raw.max))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.min == i64::MIN {
            f.write_str("-inf")?;
        } else {
            write!(f, "{}", self.min)?;
        }
        f.write_str(", ")?;
        if self.max == i64::MAX {
            f.write_str("+inf")?;
        } else {
            write!(f, "{}", self.max)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bounds_are_unbounded() {
        assert_eq!(Bounds::new(None, None).unwrap(), Bounds::UNBOUNDED);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert_eq!(
            Bounds::new(Some(5), Some(1)),
            Err(ConfigurationError::InvertedBounds { min: 5, max: 1 })
        );
    }

    #[test]
    fn single_point_interval_is_allowed() {
        let b = Bounds::new(Some(3), Some(3)).unwrap();
        assert_eq!(b.clamp(-100), 3);
        assert_eq!(b.clamp(100), 3);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let b = Bounds::UNBOUNDED;
        assert_eq!(b.offset(i64::MAX - 1, 10), i64::MAX);
        assert_eq!(b.offset(i64::MIN + 1, -10), i64::MIN);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_inverted_interval() {
        let err = serde_json::from_str::<Bounds>(r#"{"min":5,"max":1}"#).unwrap_err();
        assert!(err.to_string().contains("min (5) is greater than max (1)"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_accepts_valid_interval() {
        let bounds: Bounds = serde_json::from_str(r#"{"min":-1,"max":1}"#).unwrap();
        assert_eq!(bounds, Bounds::new(Some(-1), Some(1)).unwrap());
        assert_eq!(bounds.clamp(9), 1);
    }

    #[test]
    fn display() {
        assert_eq!(Bounds::UNBOUNDED.to_string(), "[-inf, +inf]");
        assert_eq!(Bounds::new(Some(-2), Some(7)).unwrap().to_string(), "[-2, 7]");
    }
}
