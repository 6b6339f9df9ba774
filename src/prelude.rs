//! Prelude module for convenient imports
//!
//! This module provides the most commonly used types for working with vow.
//! Import everything from this module for quick access:
//!
//! ```
//! use vow::prelude::*;
//!
//! let ready = Future::resolve(Value::from(1));
//! assert_eq!(ready.state(), FutureState::Fulfilled);
//! ```

// Core future types
pub use crate::future::{Future, FutureState, Handler, SettleFn};

// Settlement values
pub use crate::value::{Callback, ErrorValue, Thenable, Value};

// Error handling
pub use crate::error::{Error, ErrorKind, Result};

// Scheduling
pub use crate::scheduler::{self, Schedule, SchedulerConfig, SchedulerStats};

// Version constant
pub use crate::VERSION;
