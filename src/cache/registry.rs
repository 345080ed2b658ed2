//! The process-wide store registry.
//!
//! Stores are singletons keyed by wrapped-function identity plus the
//! store's entry types: resolving the same identity always yields the same
//! [`CacheStore`] instance. The registry starts empty and is never torn
//! down.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, LazyLock, Mutex};

use crate::core::{Target, TargetId};

use super::store::CacheStore;

/// Registry key: function identity plus the entry types, so one function
/// can back stores of different shapes without collision.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct StoreKey {
    target: TargetId,
    entry_types: TypeId,
}

struct Registered {
    store: Arc<dyn Any + Send + Sync>,
    /// Keeps the target's allocation alive so its identity address is
    /// never reused within the process.
    _anchor: Box<dyn Any + Send + Sync>,
}

static REGISTRY: LazyLock<Mutex<HashMap<StoreKey, Registered>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Resolves the singleton store for `target`, creating it on first wrap.
///
/// The first wrap of an identity records the target's name and doc on the
/// store; later wraps reuse the existing store unchanged.
pub(super) fn store_for<A, R, K, V>(target: &Target<A, R>) -> Arc<CacheStore<K, V>>
where
    A: 'static,
    R: 'static,
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    let key = StoreKey {
        target: target.id(),
        entry_types: TypeId::of::<(K, V)>(),
    };

    let mut registry = REGISTRY.lock().expect("store registry lock poisoned");
    let registered = registry.entry(key).or_insert_with(|| {
        tracing::debug!(function = target.name(), "creating cache store");
        Registered {
            store: Arc::new(CacheStore::<K, V>::new(
                target.id(),
                target.name_meta(),
                target.doc_meta(),
            )),
            _anchor: Box::new(target.clone()),
        }
    });

    Arc::clone(&registered.store)
        .downcast::<CacheStore<K, V>>()
        .expect("store registry entry has mismatched entry types")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_identity_resolves_the_same_store() {
        let target = Target::named("registry_subject", |n: i64| n);
        let first = store_for::<i64, i64, String, i64>(&target);
        let second = store_for::<i64, i64, String, i64>(&target.clone());
        assert!(Arc::ptr_eq(&first, &second));

        first.set("shared".to_string(), 7);
        assert_eq!(second.get(&"shared".to_string()), Some(7));
    }

    #[test]
    fn test_distinct_identities_resolve_distinct_stores() {
        let a = Target::named("registry_a", |n: i64| n);
        let b = Target::named("registry_b", |n: i64| n);
        let store_a = store_for::<i64, i64, String, i64>(&a);
        let store_b = store_for::<i64, i64, String, i64>(&b);
        assert!(!Arc::ptr_eq(&store_a, &store_b));
    }

    #[test]
    fn test_entry_types_split_stores_for_one_identity() {
        let target = Target::named("registry_typed", |n: i64| n);
        let strings = store_for::<i64, i64, String, String>(&target);
        let numbers = store_for::<i64, i64, String, i64>(&target);

        strings.set("k".to_string(), "v".to_string());
        assert_eq!(numbers.get(&"k".to_string()), None);
    }
}
