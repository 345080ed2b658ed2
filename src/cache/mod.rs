//! Per-function key/value caching.
//!
//! # Domain Model
//! - [`Cached`]: the wrapper — a callable pass-through that owns its
//!   function's store
//! - [`CacheStore`]: the entries and every operation over them
//! - [`BulkGet`]: options for bulk lookups (default, filter, map, safe
//!   modes)
//! - [`Operand`]: the shapes `merge`/`subtract` accept
//!
//! # Identity
//!
//! Stores are singletons keyed by wrapped-function identity: the first
//! wrap of a function creates its store, every later wrap of the same
//! identity resolves the same instance, and stores live for the process
//! lifetime. The registry behind this starts empty and has no teardown.
//!
//! # Example
//!
//! ```
//! use kosmeo::cache::{BulkGet, Cached};
//! use kosmeo::core::Target;
//!
//! let cached: Cached<i64, i64, &'static str, i64> =
//!     Cached::wrap(Target::named("identity", |n: i64| n));
//!
//! cached.set("a", 1);
//! cached.set("b", 2);
//!
//! let big = cached
//!     .get_many_with(&["a", "b"], &BulkGet::new().filter(|v: &i64| Ok(*v > 1)))
//!     .unwrap();
//! assert_eq!(big.len(), 1);
//! ```

mod cached;
mod error;
mod operand;
mod query;
mod registry;
mod store;

pub use cached::Cached;
pub use error::{CacheError, Result, TransformError};
pub use operand::Operand;
pub use query::{default_safe_kinds, BulkGet, FilterFn, MapFn};
pub use store::CacheStore;
