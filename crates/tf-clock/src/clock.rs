//! Queued clock mocks and the `Clock` seam

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use tf_core::Value;
use tracing::{debug, trace};

use crate::{ClockError, ClockResult, DeltaUnit, Instant};

/// Source of the current time for code under test
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> ClockResult<DateTime<Utc>>;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> ClockResult<DateTime<Utc>> {
        Ok(Utc::now())
    }
}

#[derive(Debug)]
struct ClockState<T> {
    queue: VecDeque<T>,
    last: Option<T>,
}

/// A mock clock handing out a queue of instants
///
/// Each read pops the next queued instant. Once the queue is empty, reads
/// synthesize `last + delta` instead. Clones share the same queue.
#[derive(Debug, Clone)]
pub struct MockClock<T: Instant> {
    state: Arc<RwLock<ClockState<T>>>,
    delta: i64,
    unit: DeltaUnit,
    offset: Option<FixedOffset>,
    strict: bool,
}

pub type MockDate = MockClock<NaiveDate>;
pub type MockDateTime = MockClock<NaiveDateTime>;
pub type MockTime = MockClock<NaiveTime>;

impl<T: Instant> MockClock<T> {
    /// Create a mock starting at the default instant for `T`
    pub fn new() -> Self {
        Self::at(T::default_start())
    }

    /// Create a mock whose first read returns `instant`
    pub fn at(instant: T) -> Self {
        let mock = Self::empty();
        mock.add(instant);
        mock
    }

    /// Create a mock with nothing queued
    ///
    /// Reading before an [`add`](Self::add) or [`set`](Self::set) fails with
    /// [`ClockError::Exhausted`].
    pub fn empty() -> Self {
        Self {
            state: Arc::new(RwLock::new(ClockState {
                queue: VecDeque::new(),
                last: None,
            })),
            delta: 1,
            unit: T::default_unit(),
            offset: None,
            strict: false,
        }
    }

    /// Step applied when the queue runs out
    pub fn delta(mut self, delta: i64) -> Self {
        self.delta = delta;
        self
    }

    pub fn delta_unit(mut self, unit: DeltaUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Zone the queued instants are local to
    pub fn offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Tag values from [`read_value`](Self::read_value) with the mock type name
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Queue an instant after any already queued
    pub fn add(&self, instant: T) {
        debug!(kind = T::KIND, %instant, "Queueing mock instant");
        self.write_state().queue.push_back(instant);
    }

    /// Drop everything queued and make `instant` the next read
    pub fn set(&self, instant: T) {
        debug!(kind = T::KIND, %instant, "Setting mock instant");
        let mut state = self.write_state();
        state.queue.clear();
        state.queue.push_back(instant);
    }

    /// Next instant
    ///
    /// # Errors
    ///
    /// [`ClockError::Exhausted`] if nothing is queued and nothing was read
    /// before, [`ClockError::OutOfRange`] if the synthesized instant cannot
    /// be represented.
    pub fn read(&self) -> ClockResult<T> {
        let mut state = self.write_state();
        let instant = match state.queue.pop_front() {
            Some(instant) => instant,
            None => {
                let last = state.last.ok_or(ClockError::Exhausted)?;
                let out_of_range = || ClockError::OutOfRange {
                    instant: last.to_string(),
                    delta: self.delta,
                    unit: self.unit.to_string(),
                };
                let step = self.step().ok_or_else(out_of_range)?;
                last.advance(step).ok_or_else(out_of_range)?
            }
        };
        state.last = Some(instant);
        trace!(kind = T::KIND, %instant, "Read mock instant");
        Ok(instant)
    }

    /// Next instant as a [`Value`], typed `tdate` / `tdatetime` / `ttime`
    /// when the mock is strict
    pub fn read_value(&self) -> ClockResult<Value> {
        let value = self.read()?.to_value();
        if self.strict {
            Ok(Value::subtype(T::MOCK_KIND, value))
        } else {
            Ok(value)
        }
    }

    /// Number of explicitly queued instants not yet read
    pub fn pending(&self) -> usize {
        self.read_state().queue.len()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn step(&self) -> Option<Duration> {
        self.unit.duration(self.delta)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClockState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClockState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Instant> Default for MockClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock<NaiveDate> {
    /// Create a mock starting at the given date
    pub fn ymd(year: i32, month: u32, day: u32) -> ClockResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::at)
            .ok_or_else(|| ClockError::InvalidInstant {
                kind: NaiveDate::KIND,
                description: format!("{:04}-{:02}-{:02}", year, month, day),
            })
    }

    pub fn today(&self) -> ClockResult<NaiveDate> {
        self.read()
    }
}

impl MockClock<NaiveDateTime> {
    /// Create a mock starting at the given date and time
    pub fn ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> ClockResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self::at)
            .ok_or_else(|| ClockError::InvalidInstant {
                kind: NaiveDateTime::KIND,
                description: format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                ),
            })
    }

    /// Next instant, as queued
    pub fn now(&self) -> ClockResult<NaiveDateTime> {
        self.read()
    }

    /// Next instant shifted from the configured zone to UTC
    pub fn utcnow(&self) -> ClockResult<NaiveDateTime> {
        Ok(self.zoned()?.naive_utc())
    }

    /// Next instant converted from the configured zone (UTC if none) into `tz`
    ///
    /// The queued instants themselves are left unchanged.
    pub fn now_in<Tz: TimeZone>(&self, tz: &Tz) -> ClockResult<DateTime<Tz>> {
        Ok(self.zoned()?.with_timezone(tz))
    }

    fn zoned(&self) -> ClockResult<DateTime<FixedOffset>> {
        let naive = self.read()?;
        let offset = self.offset.unwrap_or_else(|| Utc.fix());
        offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| ClockError::OutOfRange {
                instant: naive.to_string(),
                delta: i64::from(offset.local_minus_utc()),
                unit: DeltaUnit::Seconds.to_string(),
            })
    }
}

impl Clock for MockClock<NaiveDateTime> {
    fn now_utc(&self) -> ClockResult<DateTime<Utc>> {
        Ok(self.utcnow()?.and_utc())
    }
}

impl MockClock<NaiveTime> {
    /// Create a mock starting at the given time of day
    pub fn hms(hour: u32, minute: u32, second: u32) -> ClockResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self::at)
            .ok_or_else(|| ClockError::InvalidInstant {
                kind: NaiveTime::KIND,
                description: format!("{:02}:{:02}:{:02}", hour, minute, second),
            })
    }

    pub fn time(&self) -> ClockResult<NaiveTime> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_delta_in_days() {
        let mock = MockDate::ymd(1978, 6, 13).unwrap().delta(2);
        assert_eq!(mock.today().unwrap(), date(1978, 6, 13));
        assert_eq!(mock.today().unwrap(), date(1978, 6, 15));
        assert_eq!(mock.today().unwrap(), date(1978, 6, 17));
    }

    #[test]
    fn test_queue_then_synthesize() {
        let mock = MockDate::empty();
        mock.add(date(2020, 1, 1));
        mock.add(date(2020, 3, 1));
        assert_eq!(mock.pending(), 2);
        assert_eq!(mock.today().unwrap(), date(2020, 1, 1));
        assert_eq!(mock.today().unwrap(), date(2020, 3, 1));
        assert_eq!(mock.today().unwrap(), date(2020, 3, 2));
    }

    #[test]
    fn test_set_clears_queue() {
        let mock = MockDate::new();
        mock.add(date(2005, 5, 5));
        mock.set(date(2010, 10, 10));
        assert_eq!(mock.pending(), 1);
        assert_eq!(mock.today().unwrap(), date(2010, 10, 10));
        assert_eq!(mock.today().unwrap(), date(2010, 10, 11));
    }

    #[test]
    fn test_empty_is_exhausted() {
        let mock = MockTime::empty();
        assert_eq!(mock.time(), Err(ClockError::Exhausted));
    }

    #[test]
    fn test_default_datetime_steps_seconds() {
        let mock = MockDateTime::new();
        assert_eq!(mock.now().unwrap().to_string(), "2001-01-01 00:00:00");
        assert_eq!(mock.now().unwrap().to_string(), "2001-01-01 00:00:01");
    }

    #[test]
    fn test_custom_unit() {
        let mock = MockTime::hms(10, 0, 0).unwrap().delta(90).delta_unit(DeltaUnit::Minutes);
        mock.time().unwrap();
        let next = mock.time().unwrap();
        assert_eq!((next.hour(), next.minute()), (11, 30));
    }

    #[test]
    fn test_clones_share_queue() {
        let mock = MockDate::new();
        let other = mock.clone();
        mock.today().unwrap();
        assert_eq!(other.pending(), 0);
        assert_eq!(other.today().unwrap(), date(2001, 1, 2));
    }

    #[test]
    fn test_overflow() {
        let mock = MockDate::at(NaiveDate::MAX);
        mock.today().unwrap();
        assert!(matches!(mock.today(), Err(ClockError::OutOfRange { .. })));
    }

    #[test]
    fn test_invalid_constructor() {
        assert!(matches!(
            MockDate::ymd(2001, 2, 30),
            Err(ClockError::InvalidInstant { kind: "date", .. })
        ));
        assert!(MockTime::hms(25, 0, 0).is_err());
    }

    #[test]
    fn test_utcnow_applies_inverse_offset() {
        let mock = MockDateTime::ymd_hms(2001, 1, 1, 10, 0, 0)
            .unwrap()
            .offset(FixedOffset::east_opt(3 * 3600).unwrap());
        assert_eq!(mock.utcnow().unwrap().to_string(), "2001-01-01 07:00:00");
    }

    #[test]
    fn test_now_in_converts_zone() {
        let mock = MockDateTime::ymd_hms(2001, 1, 1, 10, 0, 0).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let converted = mock.now_in(&east).unwrap();
        assert_eq!(converted.to_rfc3339(), "2001-01-01T12:00:00+02:00");
    }

    #[test]
    fn test_clock_trait() {
        let mock = MockDateTime::ymd_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock: &dyn Clock = &mock;
        assert_eq!(clock.now_utc().unwrap().to_rfc3339(), "2024-06-01T12:00:00+00:00");
        assert!(SystemClock.now_utc().is_ok());
    }

    #[test]
    fn test_read_value_strictness() {
        let lenient = MockDate::new();
        assert_eq!(lenient.read_value().unwrap().type_name(), "date");

        let strict = MockDate::new().strict(true);
        let value = strict.read_value().unwrap();
        assert_eq!(value.type_name(), "tdate");
        assert_eq!(value.base_type_names(), vec!["date"]);
    }
}
