//! Failure classification.
//!
//! Wrapped targets keep their own error types; this module hides the
//! decision of how those failures are grouped into coarse kinds. An error
//! type that implements [`Classify`] can be intercepted selectively by a
//! [`Retryer`](crate::retry::Retryer) and screened by the safe modes of a
//! bulk cache lookup.

use std::fmt;
use std::sync::Arc;

/// Coarse classification of a failure raised by a wrapped target or by a
/// caller-supplied transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FaultKind {
    /// A value had the wrong type or shape for the operation.
    TypeMismatch,
    /// A value was well-typed but semantically invalid.
    InvalidValue,
    /// A lookup key was absent.
    MissingKey,
    /// An index or range bound was exceeded.
    OutOfRange,
    /// An I/O operation failed.
    Io,
    /// An operation ran out of time.
    Timeout,
    /// A local or remote resource was unavailable.
    Unavailable,
    /// Anything that does not fit the kinds above.
    Other,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::TypeMismatch => "TYPE_MISMATCH",
            FaultKind::InvalidValue => "INVALID_VALUE",
            FaultKind::MissingKey => "MISSING_KEY",
            FaultKind::OutOfRange => "OUT_OF_RANGE",
            FaultKind::Io => "IO",
            FaultKind::Timeout => "TIMEOUT",
            FaultKind::Unavailable => "UNAVAILABLE",
            FaultKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for failure types to report their [`FaultKind`].
///
/// # Default Behavior
///
/// String errors classify as [`FaultKind::Other`], which a
/// [`Retryer`](crate::retry::Retryer) with an empty catch set still
/// intercepts. Implement this trait on your own error types when you need
/// selective interception or safe-mode screening by kind.
///
/// # Example
///
/// ```
/// use kosmeo::core::{Classify, FaultKind};
///
/// #[derive(Debug, Clone)]
/// enum FetchError {
///     Timeout,
///     BadPayload,
/// }
///
/// impl Classify for FetchError {
///     fn fault_kind(&self) -> FaultKind {
///         match self {
///             FetchError::Timeout => FaultKind::Timeout,
///             FetchError::BadPayload => FaultKind::InvalidValue,
///         }
///     }
/// }
/// ```
pub trait Classify {
    /// The coarse kind of this failure.
    fn fault_kind(&self) -> FaultKind;
}

impl Classify for std::io::Error {
    fn fault_kind(&self) -> FaultKind {
        use std::io::ErrorKind;
        match self.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => FaultKind::Timeout,
            ErrorKind::NotFound => FaultKind::MissingKey,
            ErrorKind::InvalidInput | ErrorKind::InvalidData => FaultKind::InvalidValue,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => FaultKind::Unavailable,
            _ => FaultKind::Io,
        }
    }
}

impl Classify for String {
    fn fault_kind(&self) -> FaultKind {
        FaultKind::Other
    }
}

impl Classify for &str {
    fn fault_kind(&self) -> FaultKind {
        FaultKind::Other
    }
}

impl<E: Classify + ?Sized> Classify for Box<E> {
    fn fault_kind(&self) -> FaultKind {
        (**self).fault_kind()
    }
}

// Arc lets non-Clone errors such as std::io::Error flow through a Retryer,
// which stores every intercepted failure and returns the last one.
impl<E: Classify + ?Sized> Classify for Arc<E> {
    fn fault_kind(&self) -> FaultKind {
        (**self).fault_kind()
    }
}
