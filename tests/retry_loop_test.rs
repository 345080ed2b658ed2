//! Retry loop behavior test
//!
//! This test verifies that:
//! 1. A target failing twice then succeeding recovers within two retries,
//!    with the counter and failure log reflecting both failures
//! 2. An always-failing target makes exactly max_retries + 1 attempts and
//!    the final failure comes back to the caller
//! 3. Failure kinds outside the catch set propagate immediately
//! 4. The delay applies between attempts only

use kosmeo::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn flaky_target(failures: u32) -> (Target<(), Result<&'static str, String>>, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&calls);
    let target = Target::named("unreliable", move |(): ()| {
        let n = seen.fetch_add(1, Ordering::SeqCst);
        if n < failures {
            Err(format!("attempt {n} failed"))
        } else {
            Ok("success")
        }
    });
    (target, calls)
}

#[test]
fn test_recovery_on_the_third_attempt() {
    let (target, calls) = flaky_target(2);
    let retryer: Retryer<String> = Retryer::new().with_max_retries(2);
    let wrapped = retryer.wrap(target);

    assert_eq!(wrapped.call(()), Ok("success"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(retryer.count(), 2);
    assert_eq!(retryer.exceptions().len(), 2);
}

#[test]
fn test_exhaustion_re_raises_the_second_failure() {
    let (target, calls) = flaky_target(u32::MAX);
    let retryer: Retryer<String> = Retryer::new().with_max_retries(1);
    let wrapped = retryer.wrap(target);

    assert_eq!(wrapped.call(()), Err("attempt 1 failed".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(retryer.exceptions().len(), 2);
    assert_eq!(retryer.exceptions()[0], "attempt 0 failed");
}

#[test]
fn test_selective_interception() {
    let calls = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&calls);
    let target = Target::named("io_then_bad_value", move |(): ()| -> Result<(), TransformError> {
        let n = seen.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            Err(TransformError::missing_key("key not there yet"))
        } else {
            Err(TransformError::type_mismatch("wrong shape"))
        }
    });

    let retryer: Retryer<TransformError> = Retryer::new()
        .with_max_retries(10)
        .catching(FaultKind::MissingKey);
    let wrapped = retryer.wrap(target);

    let err = wrapped.call(()).unwrap_err();
    assert_eq!(err.kind(), FaultKind::TypeMismatch);
    // Only the missing-key failure was intercepted and recorded.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(retryer.exceptions().len(), 1);
}

#[test]
fn test_no_delay_after_the_final_attempt() {
    let (target, _) = flaky_target(u32::MAX);
    let retryer: Retryer<String> = Retryer::new()
        .with_max_retries(1)
        .with_delay(Duration::from_millis(25));
    let wrapped = retryer.wrap(target);

    let started = Instant::now();
    assert!(wrapped.call(()).is_err());
    let elapsed = started.elapsed();
    // One pause between the two attempts; none after the last.
    assert!(elapsed >= Duration::from_millis(25), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(500), "elapsed {elapsed:?}");
}
