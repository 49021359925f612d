//! Clock mocks used the way test suites use them: behind the `Clock` seam
//! and as values checked by the comparison engine

use std::sync::{Arc, Once};

use chrono::{DateTime, NaiveDate, Utc};
use tf_clock::{Clock, ClockResult, DeltaUnit, MockDate, MockDateTime, SystemClock};
use tf_compare::{compare, compare_values, CompareOptions, Value};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Stamps records with the time from whatever clock it was given
struct Recorder {
    clock: Arc<dyn Clock>,
    stamps: Vec<DateTime<Utc>>,
}

impl Recorder {
    fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            stamps: Vec::new(),
        }
    }

    fn record(&mut self) -> ClockResult<()> {
        self.stamps.push(self.clock.now_utc()?);
        Ok(())
    }
}

#[test]
fn test_three_reads_two_days_apart() {
    init_tracing();
    let mock = MockDate::ymd(1978, 6, 13).unwrap().delta(2).delta_unit(DeltaUnit::Days);
    let reads: Vec<String> = (0..3).map(|_| mock.today().unwrap().to_string()).collect();
    assert_eq!(reads, vec!["1978-06-13", "1978-06-15", "1978-06-17"]);
}

#[test]
fn test_recorder_with_mock_clock() {
    let mock = MockDateTime::ymd_hms(2024, 1, 1, 8, 0, 0).unwrap().delta(30);
    let mut recorder = Recorder::new(Arc::new(mock.clone()));
    recorder.record().unwrap();
    recorder.record().unwrap();

    let stamps: Vec<String> = recorder.stamps.iter().map(|s| s.to_rfc3339()).collect();
    assert_eq!(
        stamps,
        vec!["2024-01-01T08:00:00+00:00", "2024-01-01T08:00:30+00:00"]
    );
    assert_eq!(mock.now().unwrap().to_string(), "2024-01-01 08:01:00");
}

#[test]
fn test_recorder_with_system_clock() {
    let mut recorder = Recorder::new(Arc::new(SystemClock));
    recorder.record().unwrap();
    assert_eq!(recorder.stamps.len(), 1);
}

#[test]
fn test_strict_comparison_tells_mocked_dates_apart() {
    let real = Value::from(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());

    let lenient = MockDate::new();
    assert!(compare_values(lenient.read_value().unwrap(), real.clone()).is_ok());

    let strict_mock = MockDate::new().strict(true);
    let mocked = strict_mock.read_value().unwrap();
    assert!(compare_values(mocked.clone(), real.clone()).is_ok());

    let err = compare(&mocked, &real, &CompareOptions::new().strict()).unwrap_err();
    assert_eq!(
        err.mismatch(),
        Some("tdate(2001-01-01) (tdate) != 2001-01-01 (date)")
    );
}
