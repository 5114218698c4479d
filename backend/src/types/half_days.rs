//! Fixed-point day quantities.
//!
//! Durations and leave balances are counted in half days so that repeated
//! holiday create/delete cycles never accumulate rounding drift.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct HalfDays(i32);

impl HalfDays {
    pub const ZERO: HalfDays = HalfDays(0);
    pub const HALF_DAY: HalfDays = HalfDays(1);
    pub const ONE_DAY: HalfDays = HalfDays(2);

    pub const fn from_half_days(count: i32) -> Self {
        Self(count)
    }

    pub const fn from_days(days: i32) -> Self {
        Self(days * 2)
    }

    /// Converts a decimal day count; only whole and half values are accepted.
    pub fn try_from_days_f64(days: f64) -> Option<Self> {
        let doubled = days * 2.0;
        if !doubled.is_finite() || doubled.fract() != 0.0 {
            return None;
        }
        if doubled < i32::MIN as f64 || doubled > i32::MAX as f64 {
            return None;
        }
        Some(Self(doubled as i32))
    }

    pub const fn half_days(self) -> i32 {
        self.0
    }

    pub fn as_days_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for HalfDays {
    type Output = HalfDays;

    fn add(self, rhs: HalfDays) -> HalfDays {
        HalfDays(self.0 + rhs.0)
    }
}

impl Sub for HalfDays {
    type Output = HalfDays;

    fn sub(self, rhs: HalfDays) -> HalfDays {
        HalfDays(self.0 - rhs.0)
    }
}

impl AddAssign for HalfDays {
    fn add_assign(&mut self, rhs: HalfDays) {
        self.0 += rhs.0;
    }
}

impl SubAssign for HalfDays {
    fn sub_assign(&mut self, rhs: HalfDays) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for HalfDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{:.1}", self.as_days_f64())
        }
    }
}

// The API speaks decimal days (`5.5`), storage speaks half-day counts.
impl Serialize for HalfDays {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_days_f64())
    }
}

impl<'de> Deserialize<'de> for HalfDays {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let days = f64::deserialize(deserializer)?;
        HalfDays::try_from_days_f64(days)
            .ok_or_else(|| de::Error::custom(format!("{} is not a multiple of half a day", days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_days_counts_half_days() {
        assert_eq!(HalfDays::from_days(5).half_days(), 10);
        assert_eq!(HalfDays::from_days(5) + HalfDays::HALF_DAY, HalfDays::from_half_days(11));
    }

    #[test]
    fn try_from_days_rejects_quarter_days() {
        assert_eq!(HalfDays::try_from_days_f64(5.5), Some(HalfDays::from_half_days(11)));
        assert_eq!(HalfDays::try_from_days_f64(0.25), None);
        assert_eq!(HalfDays::try_from_days_f64(f64::NAN), None);
    }

    #[test]
    fn display_uses_decimal_only_for_half_values() {
        assert_eq!(HalfDays::from_days(16).to_string(), "16");
        assert_eq!(HalfDays::from_half_days(31).to_string(), "15.5");
        assert_eq!(HalfDays::from_half_days(-1).to_string(), "-0.5");
    }

    #[test]
    fn serde_uses_decimal_days() {
        let json = serde_json::to_value(HalfDays::from_half_days(11)).unwrap();
        assert_eq!(json, serde_json::json!(5.5));

        let parsed: HalfDays = serde_json::from_str("15").unwrap();
        assert_eq!(parsed, HalfDays::from_days(15));
        assert!(serde_json::from_str::<HalfDays>("0.3").is_err());
    }

    #[test]
    fn repeated_adjustments_do_not_drift() {
        let mut value = HalfDays::from_days(5);
        for _ in 0..1_000 {
            value += HalfDays::HALF_DAY;
            value -= HalfDays::HALF_DAY;
        }
        assert_eq!(value, HalfDays::from_days(5));
    }
}
