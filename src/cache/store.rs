//! The per-function key/value store.
//!
//! A store holds arbitrary entries scoped to one wrapped function. The
//! registry guarantees exactly one store per wrapped-function identity for
//! the process lifetime, so every wrapper of the same function reads and
//! writes the same entries.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;

use crate::core::{FaultKind, TargetId, UNKNOWN};

use super::error::{CacheError, Result};
use super::operand::Operand;
use super::query::{BulkGet, FilterFn, MapFn};

/// Key/value entries scoped to one wrapped function.
///
/// Entries iterate in insertion order. Every operation locks an internal
/// mutex, so concurrent use is well-defined, though no atomicity is
/// promised across separate calls. Entries live until popped or
/// subtracted; nothing clears them implicitly.
pub struct CacheStore<K, V> {
    /// Identity of the wrapped function this store belongs to.
    id: TargetId,
    /// Wrapped-function metadata for introspection.
    name: Option<Cow<'static, str>>,
    doc: Option<Cow<'static, str>>,
    /// The entries, insertion-ordered for reproducible iteration.
    entries: Mutex<IndexMap<K, V>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(super) fn new(
        id: TargetId,
        name: Option<Cow<'static, str>>,
        doc: Option<Cow<'static, str>>,
    ) -> Self {
        Self {
            id,
            name,
            doc,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<K, V>> {
        self.entries.lock().expect("cache entries lock poisoned")
    }

    /// Writes `value` at `key` unconditionally; returns the stored value.
    pub fn set(&self, key: K, value: V) -> V {
        let stored = value.clone();
        self.lock().insert(key, value);
        stored
    }

    /// Writes only when `key` is absent; returns the value now stored at
    /// `key` — the pre-existing one on a collision.
    pub fn set_if_absent(&self, key: K, value: V) -> V {
        self.lock().entry(key).or_insert(value).clone()
    }

    /// Merges `entries` into the store, overwriting existing keys.
    pub fn set_many(&self, entries: impl IntoIterator<Item = (K, V)>) {
        let mut held = self.lock();
        for (key, value) in entries {
            held.insert(key, value);
        }
    }

    /// Returns the value at `key`, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Returns the value at `key`, or `default` when absent.
    pub fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Bulk lookup; absent keys are omitted from the result.
    pub fn get_many(&self, keys: &[K]) -> IndexMap<K, V> {
        let entries = self.lock();
        keys.iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    /// Bulk lookup with the full pipeline: base lookup, then filter, then
    /// map.
    ///
    /// Absent keys take the query's default value when one is set and are
    /// omitted otherwise. A transform failure propagates as
    /// [`CacheError`] unless the corresponding safe mode screens its
    /// kind, in which case the offending entry is dropped and the lookup
    /// continues. A value the filter removed never reaches the map.
    pub fn get_many_with(&self, keys: &[K], query: &BulkGet<'_, V>) -> Result<IndexMap<K, V>> {
        // Snapshot under the lock; caller transforms run outside it.
        let mut values: IndexMap<K, V> = {
            let entries = self.lock();
            keys.iter()
                .filter_map(|key| match entries.get(key) {
                    Some(value) => Some((key.clone(), value.clone())),
                    None => query.default.clone().map(|default| (key.clone(), default)),
                })
                .collect()
        };

        if let Some(filter) = query.filter.as_deref() {
            values = Self::apply_filter(values, filter, query.filter_safe.as_ref())?;
        }
        if let Some(map) = query.map.as_deref() {
            values = Self::apply_map(values, map, query.map_safe.as_ref())?;
        }
        Ok(values)
    }

    fn apply_filter(
        values: IndexMap<K, V>,
        filter: &FilterFn<'_, V>,
        safe: Option<&HashSet<FaultKind>>,
    ) -> Result<IndexMap<K, V>> {
        let mut kept = IndexMap::with_capacity(values.len());
        for (key, value) in values {
            match filter(&value) {
                Ok(true) => {
                    kept.insert(key, value);
                }
                Ok(false) => {}
                Err(fault) => match safe {
                    Some(kinds) if kinds.contains(&fault.kind()) => {}
                    _ => return Err(CacheError::Filter(fault)),
                },
            }
        }
        Ok(kept)
    }

    fn apply_map(
        values: IndexMap<K, V>,
        map: &MapFn<'_, V>,
        safe: Option<&HashSet<FaultKind>>,
    ) -> Result<IndexMap<K, V>> {
        let mut mapped = IndexMap::with_capacity(values.len());
        for (key, value) in values {
            match map(value) {
                Ok(new_value) => {
                    mapped.insert(key, new_value);
                }
                Err(fault) => match safe {
                    Some(kinds) if kinds.contains(&fault.kind()) => {}
                    _ => return Err(CacheError::Map(fault)),
                },
            }
        }
        Ok(mapped)
    }

    /// Removes and returns the entry at `key`.
    pub fn pop(&self, key: &K) -> Option<V> {
        self.lock().shift_remove(key)
    }

    /// Removes and returns the entry at `key`, or `default` when absent.
    pub fn pop_or(&self, key: &K, default: V) -> V {
        self.pop(key).unwrap_or(default)
    }

    /// Removes the entries at `keys`; the result is positionally ordered
    /// to match, with `None` for keys that were absent.
    pub fn pop_many(&self, keys: &[K]) -> Vec<Option<V>> {
        let mut entries = self.lock();
        keys.iter().map(|key| entries.shift_remove(key)).collect()
    }

    /// In place, adds every entry of `operand`, overwriting on key
    /// collision. Returns the store for chaining. A keys-only operand has
    /// no values to insert and is reported as
    /// [`CacheError::UnsupportedOperand`].
    pub fn merge(&self, operand: impl Into<Operand<K, V>>) -> Result<&Self> {
        let operand = operand.into();
        let shape = operand.shape();
        match operand {
            Operand::Store(other) => {
                // Snapshot first so merging a store into itself cannot
                // deadlock on the shared mutex.
                let snapshot = other.entries();
                self.set_many(snapshot);
            }
            Operand::Mapping(mapping) => self.set_many(mapping),
            Operand::Pairs(pairs) => self.set_many(pairs),
            Operand::Keys(_) => {
                return Err(CacheError::UnsupportedOperand {
                    op: "merge",
                    operand: shape,
                })
            }
        }
        Ok(self)
    }

    /// In place, removes every key present in `operand`; pair sequences
    /// contribute only their keys. Returns the store for chaining.
    pub fn subtract(&self, operand: impl Into<Operand<K, V>>) -> Result<&Self> {
        match operand.into() {
            Operand::Store(other) => {
                let keys = other.keys();
                let mut entries = self.lock();
                for key in &keys {
                    entries.shift_remove(key);
                }
            }
            Operand::Mapping(mapping) => {
                let mut entries = self.lock();
                for key in mapping.keys() {
                    entries.shift_remove(key);
                }
            }
            Operand::Pairs(pairs) => {
                let mut entries = self.lock();
                for (key, _) in &pairs {
                    entries.shift_remove(key);
                }
            }
            Operand::Keys(keys) => {
                let mut entries = self.lock();
                for key in &keys {
                    entries.shift_remove(key);
                }
            }
        }
        Ok(self)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    /// The keys, in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys().cloned().collect()
    }

    /// A snapshot of the entries, in insertion order.
    pub fn entries(&self) -> IndexMap<K, V> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Identity of the wrapped function.
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Name of the wrapped function, or `"<unknown>"`.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Documentation string of the wrapped function, or `"<unknown>"`.
    pub fn doc(&self) -> &str {
        self.doc.as_deref().unwrap_or(UNKNOWN)
    }
}

impl<K, V> fmt::Debug for CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("name", &self.name())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
