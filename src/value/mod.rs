//! Settlement value types
//!
//! This module defines the dynamically typed values a future can settle with.
//! Fulfillment values and rejection reasons share one representation, so a
//! reason recovered in a `catch` handler can flow onward as an ordinary value.

use rustc_hash::FxHashMap as HashMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::future::Future;

/// A callback waiting on one settlement outcome. Receives the fulfillment
/// value or the rejection reason, depending on which queue it sits in.
pub type Callback = Box<dyn FnOnce(Value)>;

/// The capability of producing an eventual value.
///
/// Any value carrying this capability is treated as interoperable with this
/// library's futures, regardless of its concrete type. [`Future`] implements
/// it; foreign async value types can too, and then wrap themselves into
/// [`Value::Thenable`] to participate in chaining and the combinators.
pub trait Thenable {
    /// Register callbacks for the eventual outcome of this value.
    ///
    /// Exactly one of the two callbacks is invoked, once, when the value
    /// settles. Implementations for already-settled sources may invoke the
    /// matching callback before returning.
    fn subscribe(&self, on_fulfilled: Callback, on_rejected: Callback);

    /// Downcast hook: the future behind this thenable, if it is one of this
    /// library's own futures. Used by [`Future::resolve`] to return an
    /// existing future unchanged instead of re-wrapping it.
    fn as_future(&self) -> Option<Future> {
        None
    }
}

/// An error carried as a value.
///
/// Mirrors the `{name, message}` shape of runtime error objects; `errors`
/// holds the individual reasons when this is an aggregate (see
/// [`Future::any`](crate::future::Future::any)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorValue {
    /// Error name, e.g. `"TypeError"`
    pub name: String,
    /// Human-readable message
    pub message: String,
    /// Component reasons, non-empty only for aggregate errors
    pub errors: Vec<Value>,
}

impl ErrorValue {
    /// Create an error value with the given name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Create an `AggregateError` carrying the component reasons.
    pub fn aggregate(errors: Vec<Value>) -> Self {
        Self {
            name: "AggregateError".to_string(),
            message: "All futures were rejected".to_string(),
            errors,
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// A settlement value.
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// String-keyed map of values
    Object(HashMap<String, Value>),
    /// An error carried as a value
    Error(ErrorValue),
    /// A deferred value: anything with the [`Thenable`] capability
    Thenable(Rc<dyn Thenable>),
}

impl Value {
    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is nullish (null or undefined)
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Convert to boolean (truthiness)
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Object(_) | Value::Error(_) | Value::Thenable(_) => true,
        }
    }

    /// The capability check behind chaining and the combinators: the thenable
    /// carried by this value, if any. Structural, not tied to any concrete
    /// type: a foreign [`Thenable`] passes exactly like one of our futures.
    pub fn as_thenable(&self) -> Option<Rc<dyn Thenable>> {
        match self {
            Value::Thenable(thenable) => Some(thenable.clone()),
            _ => None,
        }
    }

    /// Check if the value carries the [`Thenable`] capability.
    pub fn is_thenable(&self) -> bool {
        matches!(self, Value::Thenable(_))
    }

    /// Type name of the value
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Error(_) => "error",
            Value::Thenable(_) => "thenable",
        }
    }

    /// Convert to a plain JSON value.
    ///
    /// `Undefined` maps to JSON null and errors serialize as
    /// `{name, message, errors}` objects. Thenables have no data
    /// representation and fail with a `TypeError`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        match self {
            Value::Undefined | Value::Null => Ok(serde_json::Value::Null),
            Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
            Value::Number(n) => Ok(serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)),
            Value::String(s) => Ok(serde_json::Value::String(s.clone())),
            Value::List(items) => Ok(serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json())
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), value.to_json()?);
                }
                Ok(serde_json::Value::Object(out))
            }
            Value::Error(err) => {
                let mut out = serde_json::Map::new();
                out.insert("name".to_string(), serde_json::Value::String(err.name.clone()));
                out.insert(
                    "message".to_string(),
                    serde_json::Value::String(err.message.clone()),
                );
                out.insert(
                    "errors".to_string(),
                    serde_json::Value::Array(
                        err.errors
                            .iter()
                            .map(|e| e.to_json())
                            .collect::<Result<Vec<_>>>()?,
                    ),
                );
                Ok(serde_json::Value::Object(out))
            }
            Value::Thenable(_) => Err(Error::type_error("thenable is not serializable")),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            // Thenables compare by identity, never by state.
            (Value::Thenable(a), Value::Thenable(b)) => {
                std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Error(err) => write!(f, "{}", err),
            Value::Thenable(_) => write!(f, "[Thenable]"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::List(items)
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Value {
        Value::Error(err)
    }
}
