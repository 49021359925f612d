//! Deterministic date, datetime and time sources for tests
//!
//! A [`MockClock`] hands out instants from a queue. When the queue runs out
//! it keeps going by adding a fixed step to the last instant it returned,
//! so a test can predict every value the code under test will see.
//!
//! ```
//! use tf_clock::MockDate;
//!
//! let dates = MockDate::ymd(1978, 6, 13).unwrap().delta(2);
//! assert_eq!(dates.today().unwrap().to_string(), "1978-06-13");
//! assert_eq!(dates.today().unwrap().to_string(), "1978-06-15");
//! ```
//!
//! Code under test should take a [`Clock`] so tests can substitute a
//! [`MockDateTime`] for the [`SystemClock`].

pub mod clock;
pub mod error;
pub mod instant;

pub use clock::{Clock, MockClock, MockDate, MockDateTime, MockTime, SystemClock};
pub use error::{ClockError, ClockResult};
pub use instant::{DeltaUnit, Instant};
