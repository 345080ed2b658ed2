//! The cache wrapper.

use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

use crate::core::Target;

use super::operand::Operand;
use super::registry::store_for;
use super::store::CacheStore;

/// A wrapped function paired with its identity-keyed store.
///
/// Calling the wrapper passes straight through to the target; the store is
/// reachable through [`Deref`], so the wrapper is itself queryable
/// (membership, iteration, get/set/pop and the set algebra). Wrapping the
/// same target identity again yields the same store: entries set through
/// one wrapper are visible through every other.
///
/// # Example
///
/// ```
/// use kosmeo::cache::Cached;
/// use kosmeo::core::Target;
///
/// let square = Target::named("square", |n: i64| n * n);
/// let cached: Cached<i64, i64, String, i64> = Cached::wrap(square.clone());
///
/// assert_eq!(cached.call(4), 16);
/// cached.set("seen".to_string(), 4);
///
/// let again: Cached<i64, i64, String, i64> = Cached::wrap(square);
/// assert_eq!(again.get(&"seen".to_string()), Some(4));
/// ```
pub struct Cached<A, R, K, V> {
    target: Target<A, R>,
    store: Arc<CacheStore<K, V>>,
}

impl<A, R, K, V> Cached<A, R, K, V>
where
    A: 'static,
    R: 'static,
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Wraps `target`, resolving the store for its identity; the store is
    /// created on the first wrap and shared by every later one.
    pub fn wrap(target: impl Into<Target<A, R>>) -> Self {
        let target = target.into();
        let store = store_for::<A, R, K, V>(&target);
        Self { target, store }
    }

    /// Calls the wrapped function: a transparent pass-through.
    pub fn call(&self, args: A) -> R {
        self.target.call(args)
    }

    /// The underlying store, shared with every wrapper of this identity.
    pub fn store(&self) -> Arc<CacheStore<K, V>> {
        Arc::clone(&self.store)
    }

    /// The wrapped target.
    pub fn target(&self) -> &Target<A, R> {
        &self.target
    }
}

impl<A, R, K, V> Deref for Cached<A, R, K, V> {
    type Target = CacheStore<K, V>;

    fn deref(&self) -> &CacheStore<K, V> {
        &self.store
    }
}

impl<A, R, K, V> Clone for Cached<A, R, K, V> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<A, R, K, V> From<&Cached<A, R, K, V>> for Operand<K, V> {
    fn from(cached: &Cached<A, R, K, V>) -> Self {
        Operand::Store(Arc::clone(&cached.store))
    }
}

impl<A, R, K, V> fmt::Display for Cached<A, R, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Cached: {}>", self.store.name())
    }
}

impl<A, R, K, V> fmt::Debug for Cached<A, R, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("target", &self.store.name())
            .field("entries", &self.store.len())
            .finish_non_exhaustive()
    }
}
