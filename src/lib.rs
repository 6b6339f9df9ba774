//! Vow: promise-style deferred values for Rust
//!
//! A [`Future`] represents the eventual result of an asynchronous operation:
//! a value, an error, or still-pending. Settlement happens exactly once;
//! callbacks registered before settlement are deferred through the
//! [`scheduler`] and run after the current synchronous stack unwinds, while
//! registration on an already-settled future reacts immediately. Chaining
//! composes values and errors across links, flattening nested futures, and
//! the combinators (`all`, `race`, `all_settled`, `any`) settle a whole
//! family of inputs at once.
//!
//! # Quick Start
//!
//! ```
//! use vow::{scheduler, Future, Value};
//!
//! let (future, settle_ok, _settle_fail) = Future::with_resolvers();
//! let chained = future.then(|v| Ok(Value::List(vec![v])));
//!
//! settle_ok(Value::from("ready"));
//! scheduler::run_until_idle();
//! assert_eq!(chained.result(), Some(Value::List(vec![Value::from("ready")])));
//! ```
//!
//! # Module Overview
//!
//! | Category | Modules |
//! |----------|---------|
//! | **Core** | [`future`] (handle, chaining, combinators), [`error`](Error) |
//! | **Values** | [`value`] (dynamically typed outcomes, thenable capability) |
//! | **Scheduling** | [`scheduler`] (the "asap" primitive) |

pub mod future;
pub mod prelude;
pub mod scheduler;
pub mod value;

mod error;

pub use error::{Error, ErrorKind, Result};
pub use future::{Future, FutureState, Handler, SettleFn};
pub use value::{ErrorValue, Thenable, Value};

/// Vow version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
