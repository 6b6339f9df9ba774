//! Error types for the vow deferred-value library

use std::fmt;
use thiserror::Error as ThisError;

use crate::value::{ErrorValue, Value};

/// Main error type for vow.
///
/// Past construction, every failure travels through a chain as a rejection;
/// these variants are what executors and handlers return through `Err` before
/// the conversion into a rejection reason happens.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Construction error - the executor argument was not invocable.
    ///
    /// `Future::new` discharges this statically (it only accepts closures),
    /// so this surfaces only from embedders validating dynamically sourced
    /// executors before driving a future themselves.
    #[error("TypeError: executor must be invocable: {0}")]
    InvalidExecutor(String),

    /// A value raised inside an executor or handler.
    ///
    /// The raised value becomes the rejection reason unchanged, so a thrown
    /// string is caught as that same string.
    #[error("Uncaught {0:?}")]
    Thrown(Value),

    /// Runtime error - TypeError, RangeError, etc.
    #[error("{kind}: {message}")]
    RuntimeError {
        kind: ErrorKind,
        message: String,
    },
}

/// Runtime error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// TypeError - wrong type for operation
    TypeError,
    /// RangeError - value out of range
    RangeError,
    /// Generic Error - user-raised errors without a more specific kind
    GenericError,
    /// InternalError - internal library error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TypeError => write!(f, "TypeError"),
            ErrorKind::RangeError => write!(f, "RangeError"),
            ErrorKind::GenericError => write!(f, "Error"),
            ErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

impl Error {
    /// Create a TypeError
    pub fn type_error(message: impl Into<String>) -> Self {
        Error::RuntimeError {
            kind: ErrorKind::TypeError,
            message: message.into(),
        }
    }

    /// Create a RangeError
    pub fn range_error(message: impl Into<String>) -> Self {
        Error::RuntimeError {
            kind: ErrorKind::RangeError,
            message: message.into(),
        }
    }

    /// Raise an arbitrary value, preserving it as the rejection reason
    pub fn thrown(value: impl Into<Value>) -> Self {
        Error::Thrown(value.into())
    }
}

/// The rejection reason an error settles a cell with.
impl From<Error> for Value {
    fn from(err: Error) -> Value {
        match err {
            Error::Thrown(value) => value,
            Error::RuntimeError { kind, message } => {
                Value::Error(ErrorValue::new(kind.to_string(), message))
            }
            Error::InvalidExecutor(message) => {
                Value::Error(ErrorValue::new("TypeError", message))
            }
        }
    }
}

/// Result type alias for vow
pub type Result<T> = std::result::Result<T, Error>;
