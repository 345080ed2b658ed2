//! Kosmeo: Function-Wrapping Toolkit for Rust
//!
//! `kosmeo` (κοσμέω, Greek for "to adorn or arrange") augments plain
//! functions with cross-cutting behavior through a uniform wrapping
//! protocol: an invocation context captures one call and lets the
//! surrounding handler observe, repeat, or reroute it.
//!
//! # Features
//!
//! - **Generic wrapping**: bind a handler once, wrap any number of targets
//! - **Timing**: record the wall-clock duration of the most recent call
//! - **Per-function caching**: one identity-keyed store per wrapped
//!   function, with bulk get/filter/map and merge/subtract set algebra
//! - **Bounded retry**: intercept failures by kind, pause between
//!   attempts, give up after a limit and hand back the last failure
//! - **Synchronous**: every wrapped call runs to completion on the calling
//!   thread; shared state sits behind plain mutexes
//!
//! # Quick Start
//!
//! ```
//! use kosmeo::prelude::*;
//!
//! let double = Target::named("double", |n: i64| n * 2).with_doc("doubles its argument");
//!
//! // A transparent wrap returns exactly what the target returns.
//! let wrapped = Binder::passthrough().wrap(double.clone());
//! assert_eq!(wrapped.call(21), 42);
//!
//! // A handler can observe the call and re-invoke with overrides.
//! let chained = Binder::new(|inv: &Invocation<i64, i64>| {
//!     let first = inv.execute();
//!     inv.execute_with(first)
//! })
//! .wrap(double);
//! assert_eq!(chained.call(10), 40);
//! ```
//!
//! # Module Organization
//!
//! Each module hides one set of design decisions:
//!
//! - [`core`]: the wrapping protocol — targets, invocation contexts,
//!   binders — and failure classification
//! - [`timing`]: wall-clock timing of wrapped calls (hides the clock)
//! - [`cache`]: per-function key/value stores (hides the identity registry)
//! - [`retry`]: bounded retry with selective interception (hides the loop)
//!
//! # Shared decorator state
//!
//! [`Timer`] and [`Retryer`] scope their observable state to the decorator
//! instance, not to the wrapped function: one instance wrapping several
//! functions shares one record across all of them. Wrap with one instance
//! per function (or [`Retryer::isolated`]) when isolation matters.
//! [`Cached`] is the opposite: its store follows the wrapped function's
//! identity, so every wrapper of the same function sees the same entries.
//!
//! # Concurrency
//!
//! The toolkit is synchronous. Nothing suspends, the retry pause is a
//! blocking sleep, and a running attempt cannot be cancelled. Store,
//! registry, timer, and retry state are mutex-guarded, so concurrent calls
//! are well-defined, but no atomicity is promised across separate
//! operations.

pub mod cache;
pub mod core;
pub mod retry;
pub mod timing;

pub use crate::core::{
    Binder, Classify, FaultKind, Handler, Invocation, Target, TargetId, Wrapped, UNKNOWN,
};
pub use cache::{BulkGet, CacheError, CacheStore, Cached, Operand, TransformError};
pub use retry::Retryer;
pub use timing::Timer;

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use kosmeo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cache::{BulkGet, CacheError, CacheStore, Cached, Operand, TransformError};
    pub use crate::core::{Binder, Classify, FaultKind, Invocation, Target, TargetId, Wrapped};
    pub use crate::retry::Retryer;
    pub use crate::timing::Timer;
}
