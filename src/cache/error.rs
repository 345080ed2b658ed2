use thiserror::Error;

use crate::core::{Classify, FaultKind};

/// Cache layer error type.
///
/// Failures from the wrapped function itself never appear here; the cache
/// wrapper is a transparent pass-through. This type covers the store's own
/// operations: set algebra handed an unusable operand, and caller-supplied
/// transforms failing during a bulk lookup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// `merge`/`subtract` was handed an operand shape the operation cannot
    /// use.
    #[error("unsupported operand for {op}: {operand}")]
    UnsupportedOperand {
        op: &'static str,
        operand: &'static str,
    },

    /// A caller-supplied filter failed outside safe mode, or with a kind
    /// the safe mode does not screen.
    #[error("filter transform failed")]
    Filter(#[source] TransformError),

    /// A caller-supplied map failed outside safe mode, or with a kind the
    /// safe mode does not screen.
    #[error("map transform failed")]
    Map(#[source] TransformError),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// A classified failure from a caller-supplied filter or map function.
///
/// The [`FaultKind`] decides whether a safe-mode bulk lookup drops the
/// offending entry or propagates the failure.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct TransformError {
    kind: FaultKind,
    message: String,
}

impl TransformError {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(FaultKind::TypeMismatch, message)
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(FaultKind::InvalidValue, message)
    }

    pub fn missing_key(message: impl Into<String>) -> Self {
        Self::new(FaultKind::MissingKey, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(FaultKind::OutOfRange, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Other, message)
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Classify for TransformError {
    fn fault_kind(&self) -> FaultKind {
        self.kind
    }
}
