//! Set-algebra operands.
//!
//! `merge` and `subtract` accept several operand shapes. Conversion into
//! [`Operand`] happens at the call boundary through `From`, so the
//! operations never inspect types at run time; a shape an operation cannot
//! use is reported as
//! [`CacheError::UnsupportedOperand`](super::CacheError::UnsupportedOperand).

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

use super::store::CacheStore;

/// Operand for [`CacheStore::merge`](super::CacheStore::merge) and
/// [`CacheStore::subtract`](super::CacheStore::subtract).
pub enum Operand<K, V> {
    /// Another store; its entries are read when the operation applies.
    Store(Arc<CacheStore<K, V>>),
    /// A plain mapping.
    Mapping(IndexMap<K, V>),
    /// A sequence of key/value pairs. `subtract` uses only the keys.
    Pairs(Vec<(K, V)>),
    /// A sequence of bare keys. `merge` has no values to insert from this
    /// shape and reports it as unsupported.
    Keys(Vec<K>),
}

impl<K, V> Operand<K, V> {
    /// Builds the keys-only shape explicitly.
    pub fn keys(keys: impl IntoIterator<Item = K>) -> Self {
        Operand::Keys(keys.into_iter().collect())
    }

    /// Shape name used in unsupported-operand reports.
    pub(super) fn shape(&self) -> &'static str {
        match self {
            Operand::Store(_) => "store",
            Operand::Mapping(_) => "mapping",
            Operand::Pairs(_) => "pairs",
            Operand::Keys(_) => "keys",
        }
    }
}

impl<K: Eq + Hash, V> From<HashMap<K, V>> for Operand<K, V> {
    fn from(mapping: HashMap<K, V>) -> Self {
        Operand::Mapping(mapping.into_iter().collect())
    }
}

impl<K: Eq + Hash, V> From<IndexMap<K, V>> for Operand<K, V> {
    fn from(mapping: IndexMap<K, V>) -> Self {
        Operand::Mapping(mapping)
    }
}

impl<K, V> From<Vec<(K, V)>> for Operand<K, V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Operand::Pairs(pairs)
    }
}

impl<K: Clone, V: Clone> From<&[(K, V)]> for Operand<K, V> {
    fn from(pairs: &[(K, V)]) -> Self {
        Operand::Pairs(pairs.to_vec())
    }
}

impl<K, V> From<Arc<CacheStore<K, V>>> for Operand<K, V> {
    fn from(store: Arc<CacheStore<K, V>>) -> Self {
        Operand::Store(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_from_conversions() {
        let from_map: Operand<String, i64> =
            HashMap::from([("a".to_string(), 1)]).into();
        assert_eq!(from_map.shape(), "mapping");

        let from_pairs: Operand<String, i64> = vec![("a".to_string(), 1)].into();
        assert_eq!(from_pairs.shape(), "pairs");

        let from_slice: Operand<String, i64> = [("a".to_string(), 1)].as_slice().into();
        assert_eq!(from_slice.shape(), "pairs");

        let keys_only: Operand<String, i64> = Operand::keys(["a".to_string()]);
        assert_eq!(keys_only.shape(), "keys");
    }
}
