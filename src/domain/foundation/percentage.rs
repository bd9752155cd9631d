//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub const fn new(value: u8) -> Self {
        if value > 100 {
            Self(100)
        } else {
            Self(value)
        }
    }

    /// Completion ratio `part / whole`, rounded half up.
    ///
    /// A zero `whole` yields zero. `part` is clamped to `whole`. Any ratio
    /// short of complete is capped at 99, so the result is 100 exactly
    /// when `part == whole`.
    pub fn from_ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let part = part.min(whole) as u128;
        let whole_wide = whole as u128;
        let rounded = (200 * part + whole_wide) / (2 * whole_wide);
        if part < whole_wide {
            Self(rounded.min(99) as u8)
        } else {
            Self::HUNDRED
        }
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true at one hundred percent.
    pub fn is_complete(&self) -> bool {
        self.0 == 100
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn from_ratio_of_empty_whole_is_zero() {
        assert_eq!(Percentage::from_ratio(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::from_ratio(3, 0), Percentage::ZERO);
    }

    #[test]
    fn from_ratio_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(Percentage::from_ratio(1, 8).value(), 13);
        // 1/3 = 33.33%
        assert_eq!(Percentage::from_ratio(1, 3).value(), 33);
        // 2/3 = 66.67%
        assert_eq!(Percentage::from_ratio(2, 3).value(), 67);
        assert_eq!(Percentage::from_ratio(1, 2).value(), 50);
    }

    #[test]
    fn from_ratio_caps_incomplete_at_99() {
        // 199/200 = 99.5% would round to 100
        assert_eq!(Percentage::from_ratio(199, 200).value(), 99);
        assert_eq!(Percentage::from_ratio(999, 1000).value(), 99);
    }

    #[test]
    fn from_ratio_clamps_part_to_whole() {
        assert_eq!(Percentage::from_ratio(7, 5), Percentage::HUNDRED);
    }

    #[test]
    fn percentage_serializes_to_json() {
        let json = serde_json::to_string(&Percentage::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn percentage_displays_correctly() {
        assert_eq!(format!("{}", Percentage::new(75)), "75%");
        assert_eq!(format!("{}", Percentage::HUNDRED), "100%");
    }

    proptest! {
        #[test]
        fn from_ratio_is_hundred_iff_complete(whole in 1usize..5_000, part in 0usize..5_000) {
            let part = part.min(whole);
            let pct = Percentage::from_ratio(part, whole);
            prop_assert_eq!(pct.is_complete(), part == whole);
        }

        #[test]
        fn from_ratio_matches_rounded_ratio_below_cap(whole in 1usize..199, part in 0usize..199) {
            // Under 200 lessons an incomplete ratio never rounds up to 100.
            let part = part.min(whole);
            let exact = part as f64 * 100.0 / whole as f64;
            let expected = (exact + 0.5).floor() as u8;
            prop_assert_eq!(Percentage::from_ratio(part, whole).value(), expected);
        }
    }
}
