//! Captured-call contexts.
//!
//! An [`Invocation`] records one call into a wrapped function: the target
//! handle, the argument snapshot of that call, and the metadata of the
//! handler driving it. Handlers re-invoke the target through
//! [`Invocation::execute`], with or without argument overrides.

use std::borrow::Cow;
use std::fmt;

use super::target::{Target, UNKNOWN};

/// Context for a single call into a wrapped function.
///
/// A fresh `Invocation` is built for every outer call and discarded when
/// that call returns; nothing persists across calls at this layer. The
/// argument snapshot always reflects the outer call that created the
/// context, so re-invocation without overrides reuses exactly those
/// arguments.
pub struct Invocation<A, R> {
    target: Target<A, R>,
    args: A,
    handler_name: Option<Cow<'static, str>>,
    handler_doc: Option<Cow<'static, str>>,
}

impl<A, R> Invocation<A, R> {
    /// Creates a context for `target` called with `args`. Never fails.
    pub fn new(target: Target<A, R>, args: A) -> Self {
        Self {
            target,
            args,
            handler_name: None,
            handler_doc: None,
        }
    }

    pub(crate) fn with_handler_meta(
        mut self,
        name: Option<Cow<'static, str>>,
        doc: Option<Cow<'static, str>>,
    ) -> Self {
        self.handler_name = name;
        self.handler_doc = doc;
        self
    }

    /// Re-invokes the target with the stored argument snapshot.
    ///
    /// Each call independently invokes the target; nothing is memoized at
    /// this layer, and failures from the target propagate verbatim in `R`.
    pub fn execute(&self) -> R
    where
        A: Clone,
    {
        self.target.call(self.args.clone())
    }

    /// Re-invokes the target with `args` instead of the stored snapshot.
    ///
    /// The override applies to this call only; the snapshot is untouched,
    /// so a later [`execute`](Self::execute) reverts to the stored
    /// arguments.
    pub fn execute_with(&self, args: A) -> R {
        self.target.call(args)
    }

    /// The argument snapshot of the outer call.
    pub fn args(&self) -> &A {
        &self.args
    }

    /// The wrapped target.
    pub fn target(&self) -> &Target<A, R> {
        &self.target
    }

    /// Name of the wrapped function, or `"<unknown>"`.
    pub fn target_name(&self) -> &str {
        self.target.name()
    }

    /// Documentation string of the wrapped function, or `"<unknown>"`.
    pub fn target_doc(&self) -> &str {
        self.target.doc()
    }

    /// Name of the handler driving this context, or `"<unknown>"`.
    pub fn handler_name(&self) -> &str {
        self.handler_name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Documentation string of the handler, or `"<unknown>"`.
    pub fn handler_doc(&self) -> &str {
        self.handler_doc.as_deref().unwrap_or(UNKNOWN)
    }
}

impl<A, R> fmt::Debug for Invocation<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("target", &self.target_name())
            .field("handler", &self.handler_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_reuses_snapshot() {
        let target = Target::named("add_one", |n: i64| n + 1);
        let invocation = Invocation::new(target, 41);
        assert_eq!(invocation.execute(), 42);
        assert_eq!(invocation.execute(), 42);
        assert_eq!(*invocation.args(), 41);
    }

    #[test]
    fn test_override_applies_to_one_call_only() {
        let target = Target::named("add_one", |n: i64| n + 1);
        let invocation = Invocation::new(target, 1);
        assert_eq!(invocation.execute(), 2);
        assert_eq!(invocation.execute_with(10), 11);
        // Back to the stored snapshot.
        assert_eq!(invocation.execute(), 2);
        assert_eq!(*invocation.args(), 1);
    }

    #[test]
    fn test_target_failure_propagates() {
        let target = Target::named("fail_on_zero", |n: i64| -> Result<i64, String> {
            if n == 0 {
                Err("zero".to_string())
            } else {
                Ok(n)
            }
        });
        let invocation = Invocation::new(target, 0);
        assert_eq!(invocation.execute(), Err("zero".to_string()));
        assert_eq!(invocation.execute_with(7), Ok(7));
    }

    #[test]
    fn test_introspection_sentinels() {
        let invocation = Invocation::new(Target::new(|n: i64| n), 0);
        assert_eq!(invocation.target_name(), UNKNOWN);
        assert_eq!(invocation.target_doc(), UNKNOWN);
        assert_eq!(invocation.handler_name(), UNKNOWN);
        assert_eq!(invocation.handler_doc(), UNKNOWN);
    }
}
