//! Sampling frequency lookup from index spacing.

use std::fmt;

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// Regular sampling frequency of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Frequency {
    /// One sample per calendar year (365 or 366 days).
    Annual,
    /// One sample per calendar month (28 to 31 days).
    Monthly,
    /// One sample per week.
    Weekly,
    /// One sample per day.
    Daily,
    /// One sample per hour.
    Hourly,
    /// One sample per minute.
    Minutely,
    /// One sample per second.
    Secondly,
    /// One sample per millisecond.
    Milli,
    /// One sample per microsecond.
    Micro,
    /// One sample per nanosecond.
    Nano,
}

impl Frequency {
    /// Map a spacing in nanoseconds to a frequency.
    ///
    /// Pure table lookup; returns `None` for spacings that are not exactly one
    /// unit of a known frequency.
    #[must_use]
    pub fn from_nanos(nanos: i64) -> Option<Self> {
        match nanos {
            n if n == 365 * NANOS_PER_DAY || n == 366 * NANOS_PER_DAY => Some(Self::Annual),
            n if (28 * NANOS_PER_DAY..=31 * NANOS_PER_DAY).contains(&n) && n % NANOS_PER_DAY == 0 => {
                Some(Self::Monthly)
            }
            n if n == 7 * NANOS_PER_DAY => Some(Self::Weekly),
            NANOS_PER_DAY => Some(Self::Daily),
            NANOS_PER_HOUR => Some(Self::Hourly),
            NANOS_PER_MINUTE => Some(Self::Minutely),
            NANOS_PER_SECOND => Some(Self::Secondly),
            NANOS_PER_MILLI => Some(Self::Milli),
            NANOS_PER_MICRO => Some(Self::Micro),
            1 => Some(Self::Nano),
            _ => None,
        }
    }

    /// Return the short offset alias for this frequency.
    #[must_use]
    pub fn alias(self) -> &'static str {
        match self {
            Self::Annual => "A",
            Self::Monthly => "M",
            Self::Weekly => "W",
            Self::Daily => "D",
            Self::Hourly => "H",
            Self::Minutely => "T",
            Self::Secondly => "S",
            Self::Milli => "L",
            Self::Micro => "U",
            Self::Nano => "N",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_multiples() {
        assert_eq!(Frequency::from_nanos(NANOS_PER_DAY), Some(Frequency::Daily));
        assert_eq!(Frequency::from_nanos(7 * NANOS_PER_DAY), Some(Frequency::Weekly));
        assert_eq!(Frequency::from_nanos(2 * NANOS_PER_DAY), None);
    }

    #[test]
    fn every_month_length_is_monthly() {
        for days in 28..=31 {
            assert_eq!(
                Frequency::from_nanos(days * NANOS_PER_DAY),
                Some(Frequency::Monthly),
                "{days} days"
            );
        }
    }

    #[test]
    fn leap_and_common_years_are_annual() {
        assert_eq!(Frequency::from_nanos(365 * NANOS_PER_DAY), Some(Frequency::Annual));
        assert_eq!(Frequency::from_nanos(366 * NANOS_PER_DAY), Some(Frequency::Annual));
    }

    #[test]
    fn sub_day_units() {
        assert_eq!(Frequency::from_nanos(NANOS_PER_HOUR), Some(Frequency::Hourly));
        assert_eq!(Frequency::from_nanos(NANOS_PER_MINUTE), Some(Frequency::Minutely));
        assert_eq!(Frequency::from_nanos(NANOS_PER_SECOND), Some(Frequency::Secondly));
        assert_eq!(Frequency::from_nanos(NANOS_PER_MILLI), Some(Frequency::Milli));
        assert_eq!(Frequency::from_nanos(NANOS_PER_MICRO), Some(Frequency::Micro));
        assert_eq!(Frequency::from_nanos(1), Some(Frequency::Nano));
    }

    #[test]
    fn non_positive_spacing_is_unknown() {
        assert_eq!(Frequency::from_nanos(0), None);
        assert_eq!(Frequency::from_nanos(-NANOS_PER_DAY), None);
    }

    #[test]
    fn display_uses_alias() {
        assert_eq!(Frequency::Minutely.to_string(), "T");
        assert_eq!(Frequency::Milli.alias(), "L");
    }
}
