//! Bulk-lookup options.
//!
//! [`CacheStore::get_many_with`](super::CacheStore::get_many_with) takes
//! its knobs as one [`BulkGet`] value instead of a long argument list.
//! Filter and map are independently toggleable; each has a safe mode that
//! drops entries whose transform failed with a matching
//! [`FaultKind`] instead of failing the whole lookup.

use std::collections::HashSet;

use crate::core::FaultKind;

use super::error::TransformError;

/// A caller-supplied predicate over stored values. Outcomes are
/// classified: keep/drop, or a [`TransformError`] carrying the failure
/// kind.
pub type FilterFn<'f, V> = dyn Fn(&V) -> Result<bool, TransformError> + 'f;

/// A caller-supplied replacement over stored values.
pub type MapFn<'f, V> = dyn Fn(V) -> Result<V, TransformError> + 'f;

/// The kinds safe mode screens when none are named explicitly:
/// type-mismatch, invalid-value, missing-key, and out-of-range.
pub fn default_safe_kinds() -> HashSet<FaultKind> {
    [
        FaultKind::TypeMismatch,
        FaultKind::InvalidValue,
        FaultKind::MissingKey,
        FaultKind::OutOfRange,
    ]
    .into_iter()
    .collect()
}

/// Options for one bulk lookup.
///
/// The pipeline order is fixed: base lookup, then filter, then map. A
/// value the filter removed never reaches the map.
///
/// # Example
///
/// ```
/// use kosmeo::cache::{BulkGet, TransformError};
///
/// let query = BulkGet::new()
///     .default_value(0i64)
///     .filter(|v: &i64| Ok(*v > 1))
///     .map(|v: i64| {
///         v.checked_mul(10)
///             .ok_or_else(|| TransformError::out_of_range("overflow"))
///     })
///     .map_safe();
/// # let _ = query;
/// ```
pub struct BulkGet<'f, V> {
    pub(super) default: Option<V>,
    pub(super) filter: Option<Box<FilterFn<'f, V>>>,
    pub(super) filter_safe: Option<HashSet<FaultKind>>,
    pub(super) map: Option<Box<MapFn<'f, V>>>,
    pub(super) map_safe: Option<HashSet<FaultKind>>,
}

impl<'f, V> BulkGet<'f, V> {
    /// No default, no filter, no map: a plain bulk lookup that omits
    /// absent keys.
    pub fn new() -> Self {
        Self {
            default: None,
            filter: None,
            filter_safe: None,
            map: None,
            map_safe: None,
        }
    }

    /// Absent keys appear in the result mapped to this value; without it
    /// they are omitted.
    pub fn default_value(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    /// Retains only entries whose value satisfies the predicate.
    pub fn filter(mut self, f: impl Fn(&V) -> Result<bool, TransformError> + 'f) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    /// Drops, rather than propagates, entries whose filter failed with one
    /// of the [`default_safe_kinds`].
    pub fn filter_safe(self) -> Self {
        self.filter_safe_kinds(default_safe_kinds())
    }

    /// Like [`filter_safe`](Self::filter_safe) with an explicit kind set.
    /// Failures with kinds outside the set still propagate.
    pub fn filter_safe_kinds(mut self, kinds: impl IntoIterator<Item = FaultKind>) -> Self {
        self.filter_safe = Some(kinds.into_iter().collect());
        self
    }

    /// Replaces each surviving entry's value.
    pub fn map(mut self, f: impl Fn(V) -> Result<V, TransformError> + 'f) -> Self {
        self.map = Some(Box::new(f));
        self
    }

    /// Drops, rather than propagates, entries whose map failed with one of
    /// the [`default_safe_kinds`].
    pub fn map_safe(self) -> Self {
        self.map_safe_kinds(default_safe_kinds())
    }

    /// Like [`map_safe`](Self::map_safe) with an explicit kind set.
    pub fn map_safe_kinds(mut self, kinds: impl IntoIterator<Item = FaultKind>) -> Self {
        self.map_safe = Some(kinds.into_iter().collect());
        self
    }
}

impl<V> Default for BulkGet<'_, V> {
    fn default() -> Self {
        Self::new()
    }
}
