//! Bounded retry over wrapped calls.
//!
//! A [`Retryer`] re-runs a failing target a bounded number of times,
//! intercepting failures by [`FaultKind`], pausing between attempts, and
//! handing back the last failure once attempts run out.
//!
//! # Attempt convention
//!
//! `max_retries` counts retries *after* the first attempt, so a wrapped
//! call makes up to `max_retries + 1` attempts in total; `max_retries = 0`
//! means exactly one attempt. The delay applies between attempts only,
//! never after the last one.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::core::{Binder, Classify, FaultKind, Invocation, Target, Wrapped};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Re-runs failing calls a bounded number of times.
///
/// An empty catch set intercepts every failure kind; a non-empty set
/// propagates unlisted kinds immediately, unrecorded and unretried. The
/// pause between attempts is a blocking sleep on the calling thread, and a
/// running attempt cannot be interrupted.
///
/// Run state ([`count`](Self::count), [`exceptions`](Self::exceptions)) is
/// scoped to the `Retryer` instance, not to the wrapped function: one
/// instance wrapping several functions shares a single record across all
/// of them, and clones share it too. Use [`isolated`](Self::isolated) for
/// a same-configuration executor with fresh state.
///
/// # Example
///
/// ```
/// use kosmeo::core::Target;
/// use kosmeo::retry::Retryer;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// let attempts = Arc::new(AtomicU32::new(0));
/// let seen = Arc::clone(&attempts);
/// let flaky = Target::named("flaky", move |(): ()| -> Result<&'static str, String> {
///     if seen.fetch_add(1, Ordering::SeqCst) < 2 {
///         Err("not yet".to_string())
///     } else {
///         Ok("done")
///     }
/// });
///
/// let retryer: Retryer<String> = Retryer::new().with_max_retries(2);
/// let wrapped = retryer.wrap(flaky);
///
/// assert_eq!(wrapped.call(()), Ok("done"));
/// assert_eq!(retryer.count(), 2);
/// assert_eq!(retryer.exceptions().len(), 2);
/// ```
pub struct Retryer<E> {
    max_retries: u32,
    delay: Duration,
    catches: HashSet<FaultKind>,
    state: Arc<Mutex<RunState<E>>>,
}

struct RunState<E> {
    exceptions: Vec<E>,
    count: u32,
}

impl<E> RunState<E> {
    fn new() -> Self {
        Self {
            exceptions: Vec::new(),
            count: 0,
        }
    }
}

impl<E> Retryer<E> {
    /// Three retries, no delay, every failure kind intercepted.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::ZERO,
            catches: HashSet::new(),
            state: Arc::new(Mutex::new(RunState::new())),
        }
    }

    /// Number of retries after the first attempt; 0 means exactly one
    /// attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Blocking pause between attempts; zero means none.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Adds one failure kind to intercept.
    pub fn catching(mut self, kind: FaultKind) -> Self {
        self.catches.insert(kind);
        self
    }

    /// Replaces the intercepted kinds; an empty set intercepts everything.
    pub fn with_catches(mut self, kinds: impl IntoIterator<Item = FaultKind>) -> Self {
        self.catches = kinds.into_iter().collect();
        self
    }

    /// Same configuration, fresh run state.
    pub fn isolated(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            delay: self.delay,
            catches: self.catches.clone(),
            state: Arc::new(Mutex::new(RunState::new())),
        }
    }

    /// Zero-based index of the most recent run's final attempt.
    pub fn count(&self) -> u32 {
        self.state.lock().expect("retry state lock poisoned").count
    }

    /// Every failure the most recent run intercepted, in attempt order.
    pub fn exceptions(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.state
            .lock()
            .expect("retry state lock poisoned")
            .exceptions
            .clone()
    }
}

impl<E> Retryer<E>
where
    E: Classify + Clone + Send + 'static,
{
    /// Wraps a fallible target in the retry loop.
    ///
    /// The wrapped call either returns the target's first successful
    /// result or the last intercepted failure once attempts run out; it
    /// never returns silently after exhaustion.
    pub fn wrap<A, T>(&self, target: impl Into<Target<A, Result<T, E>>>) -> Wrapped<A, Result<T, E>>
    where
        A: Clone + 'static,
        T: 'static,
    {
        let max_retries = self.max_retries;
        let delay = self.delay;
        let catches = self.catches.clone();
        let state = Arc::clone(&self.state);

        Binder::new(move |invocation: &Invocation<A, Result<T, E>>| {
            run(invocation, max_retries, delay, &catches, &state)
        })
        .with_name("retry")
        .wrap(target)
    }
}

/// One top-level run of the retry loop.
fn run<A, T, E>(
    invocation: &Invocation<A, Result<T, E>>,
    max_retries: u32,
    delay: Duration,
    catches: &HashSet<FaultKind>,
    state: &Mutex<RunState<E>>,
) -> Result<T, E>
where
    A: Clone,
    E: Classify + Clone,
{
    {
        let mut run_state = state.lock().expect("retry state lock poisoned");
        run_state.exceptions.clear();
        run_state.count = 0;
    }

    let mut attempt: u32 = 0;
    loop {
        state.lock().expect("retry state lock poisoned").count = attempt;
        match invocation.execute() {
            Ok(value) => return Ok(value),
            Err(error) if intercepts(catches, &error) => {
                state
                    .lock()
                    .expect("retry state lock poisoned")
                    .exceptions
                    .push(error.clone());

                if attempt < max_retries {
                    tracing::debug!(
                        function = invocation.target_name(),
                        attempt,
                        max_retries,
                        kind = %error.fault_kind(),
                        "attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                } else {
                    tracing::warn!(
                        function = invocation.target_name(),
                        attempts = attempt + 1,
                        kind = %error.fault_kind(),
                        "retries exhausted"
                    );
                    return Err(error);
                }
            }
            Err(error) => {
                tracing::debug!(
                    function = invocation.target_name(),
                    kind = %error.fault_kind(),
                    "failure kind not intercepted, propagating"
                );
                return Err(error);
            }
        }
    }
}

fn intercepts<E: Classify>(catches: &HashSet<FaultKind>, error: &E) -> bool {
    catches.is_empty() || catches.contains(&error.fault_kind())
}

impl<E> Default for Retryer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Retryer<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            delay: self.delay,
            catches: self.catches.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<E> fmt::Debug for Retryer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retryer")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .field("catches", &self.catches)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TransformError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    fn failing_until(successes_after: u32) -> (Target<(), Result<u32, String>>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let target = Target::named("flaky", move |(): ()| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            if n < successes_after {
                Err(format!("failure {n}"))
            } else {
                Ok(n)
            }
        });
        (target, calls)
    }

    #[test]
    fn test_success_on_first_attempt() {
        let (target, calls) = failing_until(0);
        let retryer: Retryer<String> = Retryer::new();
        let wrapped = retryer.wrap(target);

        assert_eq!(wrapped.call(()), Ok(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(retryer.count(), 0);
        assert!(retryer.exceptions().is_empty());
    }

    #[test]
    fn test_recovers_within_the_retry_budget() {
        let (target, calls) = failing_until(2);
        let retryer: Retryer<String> = Retryer::new().with_max_retries(2);
        let wrapped = retryer.wrap(target);

        assert_eq!(wrapped.call(()), Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(retryer.count(), 2);
        assert_eq!(
            retryer.exceptions(),
            vec!["failure 0".to_string(), "failure 1".to_string()]
        );
    }

    #[test]
    fn test_exhaustion_returns_the_last_failure() {
        let (target, calls) = failing_until(u32::MAX);
        let retryer: Retryer<String> = Retryer::new().with_max_retries(1);
        let wrapped = retryer.wrap(target);

        assert_eq!(wrapped.call(()), Err("failure 1".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(retryer.count(), 1);
        assert_eq!(retryer.exceptions().len(), 2);
    }

    #[test]
    fn test_zero_retries_means_one_attempt() {
        let (target, calls) = failing_until(u32::MAX);
        let retryer: Retryer<String> = Retryer::new().with_max_retries(0);
        let wrapped = retryer.wrap(target);

        assert_eq!(wrapped.call(()), Err("failure 0".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(retryer.count(), 0);
        assert_eq!(retryer.exceptions().len(), 1);
    }

    #[test]
    fn test_unlisted_kind_propagates_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let target = Target::named("mixed", move |(): ()| -> Result<u32, TransformError> {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(TransformError::missing_key("absent"))
            } else {
                Err(TransformError::invalid_value("bad"))
            }
        });

        let retryer: Retryer<TransformError> =
            Retryer::new().catching(FaultKind::MissingKey).with_max_retries(5);
        let wrapped = retryer.wrap(target);

        let result = wrapped.call(());
        // Attempt 0 (missing key) was intercepted and retried; attempt 1
        // (invalid value) is not in the catch set and propagated at once.
        assert_eq!(result.unwrap_err().kind(), FaultKind::InvalidValue);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(retryer.exceptions().len(), 1);
        assert_eq!(retryer.exceptions()[0].kind(), FaultKind::MissingKey);
    }

    #[test]
    fn test_state_resets_between_runs() {
        let (target, _) = failing_until(1);
        let retryer: Retryer<String> = Retryer::new().with_max_retries(3);
        let wrapped = retryer.wrap(target);

        assert_eq!(wrapped.call(()), Ok(1));
        assert_eq!(retryer.exceptions().len(), 1);

        // Second run succeeds on its first attempt; the log clears.
        assert_eq!(wrapped.call(()), Ok(2));
        assert!(retryer.exceptions().is_empty());
        assert_eq!(retryer.count(), 0);
    }

    #[test]
    fn test_shared_state_across_targets_and_isolated() {
        let (first, _) = failing_until(1);
        let (second, _) = failing_until(0);
        let retryer: Retryer<String> = Retryer::new();

        let wrapped_first = retryer.wrap(first);
        assert_eq!(wrapped_first.call(()), Ok(1));
        assert_eq!(retryer.exceptions().len(), 1);

        // A second target wrapped by the same instance overwrites the log.
        let wrapped_second = retryer.wrap(second);
        assert_eq!(wrapped_second.call(()), Ok(0));
        assert!(retryer.exceptions().is_empty());

        let isolated = retryer.isolated();
        assert!(!Arc::ptr_eq(&retryer.state, &isolated.state));
    }

    #[test]
    fn test_delay_applies_between_attempts() {
        let (target, _) = failing_until(2);
        let retryer: Retryer<String> = Retryer::new()
            .with_max_retries(2)
            .with_delay(Duration::from_millis(15));
        let wrapped = retryer.wrap(target);

        let started = Instant::now();
        assert_eq!(wrapped.call(()), Ok(2));
        // Two failed attempts, so two pauses.
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
