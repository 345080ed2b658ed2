//! Wrapped-function handles.
//!
//! Rust functions carry no name, documentation, or stable identity at run
//! time, so the toolkit attaches all three to a [`Target`] handle. The
//! identity keys per-function state such as the cache store registry.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Sentinel returned by introspection accessors when no metadata was
/// attached.
pub const UNKNOWN: &str = "<unknown>";

/// A wrapped callable plus its run-time metadata.
///
/// `A` is the argument value of one call (use a tuple or a struct for
/// several parameters) and `R` the return value. Cloning a `Target` shares
/// the underlying callable, so clones keep the same [`TargetId`].
///
/// # Examples
///
/// ```
/// use kosmeo::core::Target;
///
/// let double = Target::named("double", |n: i64| n * 2);
/// assert_eq!(double.call(4), 8);
/// assert_eq!(double.name(), "double");
/// assert_eq!(double.doc(), "<unknown>");
/// ```
pub struct Target<A, R> {
    func: Arc<dyn Fn(A) -> R + Send + Sync>,
    id: TargetId,
    name: Option<Cow<'static, str>>,
    doc: Option<Cow<'static, str>>,
}

/// Pointer-equality-safe identity of a wrapped function.
///
/// Plain `fn` items identify by their function address, so wrapping the
/// same item any number of times resolves to one identity. Closures
/// identify by the allocation holding them: clones of one `Target` share
/// its identity, while two `Target`s built from the same closure body are
/// distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(usize);

impl<A, R> Target<A, R> {
    /// Wraps a callable. Identity follows this handle and its clones.
    pub fn new(func: impl Fn(A) -> R + Send + Sync + 'static) -> Self {
        let func: Arc<dyn Fn(A) -> R + Send + Sync> = Arc::new(func);
        let id = TargetId(Arc::as_ptr(&func) as *const () as usize);
        Self {
            func,
            id,
            name: None,
            doc: None,
        }
    }

    /// Wraps a callable and names it in one step.
    pub fn named(
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(A) -> R + Send + Sync + 'static,
    ) -> Self {
        Self::new(func).with_name(name)
    }

    /// Wraps a plain function item. Identity is the function address, so
    /// every wrap of the same item shares one identity.
    pub fn from_fn(func: fn(A) -> R) -> Self
    where
        A: 'static,
        R: 'static,
    {
        let id = TargetId(func as usize);
        Self {
            func: Arc::new(func),
            id,
            name: None,
            doc: None,
        }
    }

    /// Attaches the function's name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches the function's documentation string.
    pub fn with_doc(mut self, doc: impl Into<Cow<'static, str>>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Invokes the callable.
    pub fn call(&self, args: A) -> R {
        (self.func)(args)
    }

    /// The stable identity of this function.
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// The function's name, or `"<unknown>"`.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    /// The function's documentation string, or `"<unknown>"`.
    pub fn doc(&self) -> &str {
        self.doc.as_deref().unwrap_or(UNKNOWN)
    }

    pub(crate) fn name_meta(&self) -> Option<Cow<'static, str>> {
        self.name.clone()
    }

    pub(crate) fn doc_meta(&self) -> Option<Cow<'static, str>> {
        self.doc.clone()
    }
}

impl<A: 'static, R: 'static> From<fn(A) -> R> for Target<A, R> {
    fn from(func: fn(A) -> R) -> Self {
        Self::from_fn(func)
    }
}

impl<A, R> Clone for Target<A, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            id: self.id,
            name: self.name.clone(),
            doc: self.doc.clone(),
        }
    }
}

impl<A, R> fmt::Debug for Target<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<A, R> fmt::Display for Target<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
