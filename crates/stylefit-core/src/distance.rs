//! Non-negative distances with a saturating infinite marker.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

/// Count of changed lines between a reference and a reformatted output.
///
/// [`Distance::INFINITE`] marks pairs that could not be evaluated (formatter
/// failure, timeout, metric unavailable); it is worse than every finite
/// distance and absorbs addition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Distance(pub u64);

impl Distance {
    /// The zero distance (byte-identical line content).
    pub const ZERO: Distance = Distance(0);
    /// Marker for an evaluation that failed or timed out.
    pub const INFINITE: Distance = Distance(u64::MAX);

    /// Returns true when this distance is the infinite marker.
    pub fn is_infinite(self) -> bool {
        self == Self::INFINITE
    }

    /// Adds two distances, saturating at the infinite marker.
    pub fn saturating_add(self, other: Distance) -> Distance {
        if self.is_infinite() || other.is_infinite() {
            Self::INFINITE
        } else {
            Distance(self.0.saturating_add(other.0))
        }
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Distance>>(iter: I) -> Distance {
        iter.fold(Distance::ZERO, Distance::saturating_add)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "inf")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
