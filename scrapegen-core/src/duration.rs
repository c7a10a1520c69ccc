//! Prometheus duration values.
//!
//! The grammar is `[Ny][Nw][Nd][Nh][Nm][Ns][Nms]`: every unit optional, units in
//! that order, at least one present. The bare string `0` is also accepted.
//! A year is 365 days and a week 7 days; there is no sub-millisecond unit.

use crate::DurationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;
const MS_PER_YEAR: u64 = 365 * MS_PER_DAY;

/// Prometheus stores durations as i64 nanoseconds.
const MAX_MILLIS: u64 = (i64::MAX as u64) / 1_000_000;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:([0-9]+)y)?(?:([0-9]+)w)?(?:([0-9]+)d)?(?:([0-9]+)h)?(?:([0-9]+)m)?(?:([0-9]+)s)?(?:([0-9]+)ms)?$",
    )
    .expect("duration grammar is a valid regex")
});

/// Unit multipliers, in capture-group order.
const UNITS: [u64; 7] = [
    MS_PER_YEAR,
    MS_PER_WEEK,
    MS_PER_DAY,
    MS_PER_HOUR,
    MS_PER_MINUTE,
    MS_PER_SECOND,
    1,
];

/// A millisecond-precision duration that parses and prints in Prometheus syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PromDuration(Duration);

impl PromDuration {
    pub const ZERO: PromDuration = PromDuration(Duration::ZERO);

    pub const MAX: PromDuration = PromDuration(Duration::from_millis(MAX_MILLIS));

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn as_millis(&self) -> u64 {
        // Every constructor bounds the value by MAX_MILLIS.
        self.0.as_millis() as u64
    }
}

impl TryFrom<Duration> for PromDuration {
    type Error = DurationError;

    /// Truncates to the millisecond, the finest unit the syntax can express.
    fn try_from(d: Duration) -> Result<Self, Self::Error> {
        let ms = d.as_millis();
        if ms > u128::from(MAX_MILLIS) {
            return Err(DurationError::Overflow {
                value: format!("{:?}", d),
            });
        }
        Ok(PromDuration(Duration::from_millis(ms as u64)))
    }
}

impl FromStr for PromDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DurationError::Empty);
        }
        if s == "0" {
            return Ok(PromDuration::ZERO);
        }

        let caps = DURATION_RE
            .captures(s)
            .ok_or_else(|| DurationError::Malformed {
                value: s.to_string(),
            })?;

        let overflow = || DurationError::Overflow {
            value: s.to_string(),
        };

        let mut total: u64 = 0;
        for (group, multiplier) in UNITS.iter().enumerate() {
            let Some(m) = caps.get(group + 1) else {
                continue;
            };
            let n: u64 = m.as_str().parse().map_err(|_| overflow())?;
            let ms = n.checked_mul(*multiplier).ok_or_else(overflow)?;
            total = total.checked_add(ms).ok_or_else(overflow)?;
        }

        if total > MAX_MILLIS {
            return Err(overflow());
        }

        Ok(PromDuration(Duration::from_millis(total)))
    }
}

impl fmt::Display for PromDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ms = self.as_millis();
        if ms == 0 {
            return write!(f, "0s");
        }

        // Years and weeks are only used when they divide the value exactly.
        let units: [(&str, u64, bool); 7] = [
            ("y", MS_PER_YEAR, true),
            ("w", MS_PER_WEEK, true),
            ("d", MS_PER_DAY, false),
            ("h", MS_PER_HOUR, false),
            ("m", MS_PER_MINUTE, false),
            ("s", MS_PER_SECOND, false),
            ("ms", 1, false),
        ];
        for (unit, mult, exact) in units {
            if exact && ms % mult != 0 {
                continue;
            }
            let v = ms / mult;
            if v > 0 {
                write!(f, "{}{}", v, unit)?;
                ms -= v * mult;
            }
        }
        Ok(())
    }
}

impl Serialize for PromDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PromDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
