//! Wall-clock timing of wrapped calls.
//!
//! This module hides the clock choice and the storage of readings: a
//! [`Timer`] samples a monotonic clock around one re-invocation and keeps
//! the most recent elapsed duration for later inspection.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::core::{Binder, Invocation, Target, Wrapped};

/// Times calls made through its wrappers.
///
/// The reading is scoped to the `Timer` instance, not to the wrapped
/// function: one `Timer` wrapping several functions overwrites
/// [`elapsed`](Self::elapsed) on every call, whichever function the call
/// went through. Wrap with one `Timer` per function when isolated readings
/// matter. Clones share the reading.
///
/// # Example
///
/// ```
/// use kosmeo::timing::Timer;
/// use kosmeo::core::Target;
///
/// let timer = Timer::new();
/// let wrapped = timer.wrap(Target::named("sum", |(a, b): (u32, u32)| a + b));
///
/// assert_eq!(wrapped.call((2, 3)), 5);
/// assert!(timer.elapsed().is_some());
/// ```
#[derive(Clone)]
pub struct Timer {
    elapsed: Arc<Mutex<Option<Duration>>>,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            elapsed: Arc::new(Mutex::new(None)),
        }
    }

    /// Duration of the most recent timed call, or `None` before the first
    /// one completes.
    pub fn elapsed(&self) -> Option<Duration> {
        *self.elapsed.lock().expect("timer reading lock poisoned")
    }

    /// Wraps an infallible target; every call records a reading.
    ///
    /// The clock is sampled immediately before and immediately after the
    /// re-invocation, so the reading covers the target alone.
    pub fn wrap<A, R>(&self, target: impl Into<Target<A, R>>) -> Wrapped<A, R>
    where
        A: Clone + 'static,
        R: 'static,
    {
        let reading = Arc::clone(&self.elapsed);
        Binder::new(move |invocation: &Invocation<A, R>| {
            let start = Instant::now();
            let result = invocation.execute();
            *reading.lock().expect("timer reading lock poisoned") = Some(start.elapsed());
            result
        })
        .with_name("timed")
        .wrap(target)
    }

    /// Wraps a fallible target; only `Ok` outcomes record a reading.
    ///
    /// A failed attempt propagates its error verbatim and leaves the
    /// previous reading in place.
    pub fn wrap_result<A, T, E>(
        &self,
        target: impl Into<Target<A, Result<T, E>>>,
    ) -> Wrapped<A, Result<T, E>>
    where
        A: Clone + 'static,
        T: 'static,
        E: 'static,
    {
        let reading = Arc::clone(&self.elapsed);
        Binder::new(move |invocation: &Invocation<A, Result<T, E>>| {
            let start = Instant::now();
            let result = invocation.execute();
            if result.is_ok() {
                *reading.lock().expect("timer reading lock poisoned") = Some(start.elapsed());
            }
            result
        })
        .with_name("timed")
        .wrap(target)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
