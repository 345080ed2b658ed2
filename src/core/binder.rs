//! The generic wrapping mechanism.
//!
//! A [`Binder`] pairs a handler with optional metadata; wrapping a target
//! produces a [`Wrapped`] callable. Every call of the wrapped callable
//! builds a fresh [`Invocation`] and hands it to the handler, and whatever
//! the handler returns is the call's result.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::invocation::Invocation;
use super::target::Target;

/// Behavior function driving wrapped calls.
///
/// Receives the [`Invocation`] of one outer call and decides how, or
/// whether, to invoke the target. `T` is the wrapped call's result type;
/// for a transparent wrapper it equals the target's own `R`.
pub type Handler<A, R, T> = dyn Fn(&Invocation<A, R>) -> T + Send + Sync;

/// Binds a handler so it can wrap any number of targets.
///
/// # Examples
///
/// ```
/// use kosmeo::core::{Binder, Invocation, Target};
///
/// let shout = Binder::new(|inv: &Invocation<String, String>| inv.execute().to_uppercase())
///     .with_name("shout");
///
/// let greet = shout.wrap(Target::named("greet", |name: String| format!("hello {name}")));
/// assert_eq!(greet.call("world".to_string()), "HELLO WORLD");
/// ```
pub struct Binder<A, R, T = R> {
    handler: Arc<Handler<A, R, T>>,
    name: Option<Cow<'static, str>>,
    doc: Option<Cow<'static, str>>,
}

impl<A, R, T> Binder<A, R, T> {
    /// Binds `handler`.
    pub fn new(handler: impl Fn(&Invocation<A, R>) -> T + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            name: None,
            doc: None,
        }
    }

    /// Attaches the handler's name, visible to contexts it drives.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches the handler's documentation string.
    pub fn with_doc(mut self, doc: impl Into<Cow<'static, str>>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Wraps `target`.
    ///
    /// Calling the result builds a fresh [`Invocation`] recording the
    /// target, that call's arguments, and the handler metadata, then
    /// invokes the handler and returns whatever it returns. Two calls
    /// build two independent contexts.
    pub fn wrap(&self, target: impl Into<Target<A, R>>) -> Wrapped<A, T>
    where
        A: 'static,
        R: 'static,
        T: 'static,
    {
        let target = target.into();
        let target_name: Cow<'static, str> = Cow::Owned(target.name().to_owned());
        let handler = Arc::clone(&self.handler);
        let handler_name = self.name.clone();
        let handler_doc = self.doc.clone();

        let inner = move |args: A| {
            let invocation = Invocation::new(target.clone(), args)
                .with_handler_meta(handler_name.clone(), handler_doc.clone());
            handler(&invocation)
        };
        Wrapped {
            inner: Arc::new(inner),
            target_name,
        }
    }
}

impl<A: Clone + 'static, R: 'static> Binder<A, R, R> {
    /// The default behavior: a transparent pass-through that calls the
    /// target with the stored arguments.
    pub fn passthrough() -> Self {
        Binder::new(|invocation: &Invocation<A, R>| invocation.execute())
            .with_name("passthrough")
            .with_doc("call the target with the stored arguments")
    }
}

impl<A, R, T> Clone for Binder<A, R, T> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            name: self.name.clone(),
            doc: self.doc.clone(),
        }
    }
}

impl<A, R, T> fmt::Debug for Binder<A, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("name", &self.name.as_deref().unwrap_or(super::target::UNKNOWN))
            .finish_non_exhaustive()
    }
}

/// A wrapped callable produced by [`Binder::wrap`].
///
/// Accepts the same argument value the target would and returns the
/// handler's result.
pub struct Wrapped<A, T> {
    inner: Arc<dyn Fn(A) -> T + Send + Sync>,
    target_name: Cow<'static, str>,
}

impl<A, T> Wrapped<A, T> {
    /// Invokes the wrapped function.
    pub fn call(&self, args: A) -> T {
        (self.inner)(args)
    }

    /// Name of the target underneath, for diagnostics.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }
}

impl<A, T> Clone for Wrapped<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            target_name: self.target_name.clone(),
        }
    }
}

impl<A, T> fmt::Debug for Wrapped<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("target", &self.target_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_passthrough_returns_target_result() {
        let wrapped = Binder::passthrough().wrap(Target::named("square", |n: i64| n * n));
        assert_eq!(wrapped.call(7), 49);
        assert_eq!(wrapped.target_name(), "square");
    }

    #[test]
    fn test_passthrough_propagates_failure() {
        let wrapped = Binder::passthrough().wrap(Target::named(
            "checked_div",
            |(a, b): (i64, i64)| -> Result<i64, String> {
                if b == 0 {
                    Err("division by zero".to_string())
                } else {
                    Ok(a / b)
                }
            },
        ));
        assert_eq!(wrapped.call((10, 2)), Ok(5));
        assert_eq!(wrapped.call((1, 0)), Err("division by zero".to_string()));
    }

    #[test]
    fn test_each_call_builds_a_fresh_context() {
        let contexts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&contexts);
        let binder = Binder::new(move |invocation: &Invocation<i64, i64>| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(*invocation.args(), invocation.execute() - 1);
            invocation.execute()
        });
        let wrapped = binder.wrap(Target::named("add_one", |n: i64| n + 1));

        assert_eq!(wrapped.call(1), 2);
        assert_eq!(wrapped.call(5), 6);
        assert_eq!(contexts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_metadata_reaches_the_context() {
        let binder = Binder::new(|invocation: &Invocation<(), &'static str>| {
            assert_eq!(invocation.handler_name(), "observer");
            assert_eq!(invocation.handler_doc(), "watches calls");
            invocation.execute()
        })
        .with_name("observer")
        .with_doc("watches calls");

        let wrapped = binder.wrap(Target::named("constant", |(): ()| "value"));
        assert_eq!(wrapped.call(()), "value");
    }

    #[test]
    fn test_handler_can_reroute_with_overrides() {
        let binder = Binder::new(|invocation: &Invocation<i64, i64>| {
            let first = invocation.execute();
            invocation.execute_with(first)
        });
        let wrapped = binder.wrap(Target::named("double", |n: i64| n * 2));
        assert_eq!(wrapped.call(3), 12);
    }

    #[test]
    fn test_one_binder_wraps_many_targets() {
        let binder: Binder<i64, i64> = Binder::passthrough();
        let double = binder.wrap(Target::named("double", |n: i64| n * 2));
        let negate = binder.wrap(Target::named("negate", |n: i64| -n));
        assert_eq!(double.call(4), 8);
        assert_eq!(negate.call(4), -4);
    }
}
