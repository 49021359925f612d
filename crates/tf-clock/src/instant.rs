//! Instant kinds a mock can produce and the units it steps by

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tf_core::{types, Value};

use crate::{ClockError, ClockResult};

/// Unit the step between synthesized instants is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaUnit {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
    Microseconds,
}

impl DeltaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaUnit::Weeks => "weeks",
            DeltaUnit::Days => "days",
            DeltaUnit::Hours => "hours",
            DeltaUnit::Minutes => "minutes",
            DeltaUnit::Seconds => "seconds",
            DeltaUnit::Milliseconds => "milliseconds",
            DeltaUnit::Microseconds => "microseconds",
        }
    }

    /// `delta` of this unit as a duration, `None` on overflow
    pub fn duration(&self, delta: i64) -> Option<Duration> {
        match self {
            DeltaUnit::Weeks => Duration::try_weeks(delta),
            DeltaUnit::Days => Duration::try_days(delta),
            DeltaUnit::Hours => Duration::try_hours(delta),
            DeltaUnit::Minutes => Duration::try_minutes(delta),
            DeltaUnit::Seconds => Duration::try_seconds(delta),
            DeltaUnit::Milliseconds => Duration::try_milliseconds(delta),
            DeltaUnit::Microseconds => Some(Duration::microseconds(delta)),
        }
    }
}

impl fmt::Display for DeltaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeltaUnit {
    type Err = ClockError;

    fn from_str(s: &str) -> ClockResult<Self> {
        match s {
            "weeks" => Ok(DeltaUnit::Weeks),
            "days" => Ok(DeltaUnit::Days),
            "hours" => Ok(DeltaUnit::Hours),
            "minutes" => Ok(DeltaUnit::Minutes),
            "seconds" => Ok(DeltaUnit::Seconds),
            "milliseconds" => Ok(DeltaUnit::Milliseconds),
            "microseconds" => Ok(DeltaUnit::Microseconds),
            _ => Err(ClockError::UnknownUnit(s.to_string())),
        }
    }
}

/// A point in time a clock mock can hand out
pub trait Instant: Copy + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {
    /// Builtin type name of the instant
    const KIND: &'static str;
    /// Type name carried by values from a strict mock
    const MOCK_KIND: &'static str;

    /// First instant of a mock built with `new()`
    fn default_start() -> Self;

    fn default_unit() -> DeltaUnit;

    /// The instant `step` later, `None` if it cannot be represented
    fn advance(self, step: Duration) -> Option<Self>;

    fn to_value(self) -> Value;
}

impl Instant for NaiveDate {
    const KIND: &'static str = types::DATE;
    const MOCK_KIND: &'static str = "tdate";

    fn default_start() -> Self {
        NaiveDate::from_ymd_opt(2001, 1, 1).unwrap_or_default()
    }

    fn default_unit() -> DeltaUnit {
        DeltaUnit::Days
    }

    fn advance(self, step: Duration) -> Option<Self> {
        self.checked_add_signed(step)
    }

    fn to_value(self) -> Value {
        Value::Date(self)
    }
}

impl Instant for NaiveDateTime {
    const KIND: &'static str = types::DATETIME;
    const MOCK_KIND: &'static str = "tdatetime";

    fn default_start() -> Self {
        NaiveDate::default_start().and_time(NaiveTime::MIN)
    }

    fn default_unit() -> DeltaUnit {
        DeltaUnit::Seconds
    }

    fn advance(self, step: Duration) -> Option<Self> {
        self.checked_add_signed(step)
    }

    fn to_value(self) -> Value {
        Value::DateTime(self)
    }
}

/// Times wrap around midnight
impl Instant for NaiveTime {
    const KIND: &'static str = types::TIME;
    const MOCK_KIND: &'static str = "ttime";

    fn default_start() -> Self {
        NaiveTime::MIN
    }

    fn default_unit() -> DeltaUnit {
        DeltaUnit::Seconds
    }

    fn advance(self, step: Duration) -> Option<Self> {
        Some(self.overflowing_add_signed(step).0)
    }

    fn to_value(self) -> Value {
        Value::Time(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parsing() {
        assert_eq!("days".parse::<DeltaUnit>().unwrap(), DeltaUnit::Days);
        assert_eq!(
            "fortnights".parse::<DeltaUnit>(),
            Err(ClockError::UnknownUnit("fortnights".to_string()))
        );
    }

    #[test]
    fn test_unit_serde() {
        let unit: DeltaUnit = serde_json::from_str("\"minutes\"").unwrap();
        assert_eq!(unit, DeltaUnit::Minutes);
        assert_eq!(serde_json::to_string(&DeltaUnit::Weeks).unwrap(), "\"weeks\"");
    }

    #[test]
    fn test_unit_duration() {
        assert_eq!(DeltaUnit::Hours.duration(2), Some(Duration::hours(2)));
        assert_eq!(DeltaUnit::Weeks.duration(i64::MAX), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(NaiveDate::default_start().to_string(), "2001-01-01");
        assert_eq!(NaiveDateTime::default_start().to_string(), "2001-01-01 00:00:00");
        assert_eq!(NaiveTime::default_start().to_string(), "00:00:00");
        assert_eq!(NaiveDate::default_unit(), DeltaUnit::Days);
        assert_eq!(NaiveTime::default_unit(), DeltaUnit::Seconds);
    }

    #[test]
    fn test_time_wraps() {
        let late = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        assert_eq!(
            late.advance(Duration::seconds(2)),
            NaiveTime::from_hms_opt(0, 0, 1)
        );
    }

    #[test]
    fn test_date_overflow() {
        assert_eq!(NaiveDate::MAX.advance(Duration::days(1)), None);
    }
}
