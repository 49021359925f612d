//! Shared helpers for the comparison integration tests

use std::sync::Once;

use tf_compare::{CompareError, Object, Value};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a `RUST_LOG` controlled subscriber once per test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn point(x: i64, y: i64) -> Value {
    Object::new("Point").attr("x", x).attr("y", y).into()
}

/// The mismatch text of a comparison that was expected to fail
pub fn mismatch(result: Result<(), CompareError>) -> String {
    match result {
        Err(CompareError::NotEqual { message }) => message,
        Err(other) => panic!("expected a mismatch, got usage error: {}", other),
        Ok(()) => panic!("expected a mismatch, values compared equal"),
    }
}
