//! The wrapping protocol: targets, invocation contexts, and binders.
//!
//! # Domain Model
//! - [`Target`]: a callable plus run-time metadata (name, doc) and a stable
//!   [`TargetId`] identity
//! - [`Invocation`]: one captured call — target, argument snapshot, handler
//!   metadata — with re-invocation and overrides
//! - [`Binder`] / [`Wrapped`]: bind a handler once, wrap any number of
//!   targets; each call of a wrapped function runs the handler against a
//!   fresh context
//!
//! # Failure Classification
//! - [`FaultKind`] / [`Classify`]: coarse failure kinds shared by retry
//!   interception and safe cache transforms
//!
//! # Example
//!
//! ```
//! use kosmeo::core::{Binder, Invocation, Target};
//!
//! let audited = Binder::new(|inv: &Invocation<i64, i64>| {
//!     assert_eq!(inv.target_name(), "double");
//!     inv.execute()
//! })
//! .with_name("audit");
//!
//! let double = audited.wrap(Target::named("double", |n: i64| n * 2));
//! assert_eq!(double.call(8), 16);
//! ```

mod binder;
mod fault;
mod invocation;
mod target;

pub use binder::{Binder, Handler, Wrapped};
pub use fault::{Classify, FaultKind};
pub use invocation::Invocation;
pub use target::{Target, TargetId, UNKNOWN};
