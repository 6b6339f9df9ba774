//! Futures: the public handle for eventual values
//!
//! A [`Future`] wraps exactly one settlement cell and exposes chaining
//! (`then`/`catch`/`finally`) plus the static combinators (`resolve`,
//! `reject`, `all`, `race`, `all_settled`, `any`). Chaining allocates a new
//! future whose settlement is derived from this one's outcome through the
//! supplied handlers; nothing ever blocks.

mod combinators;
mod deferred;

pub use deferred::FutureState;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use deferred::Deferred;

use crate::error::{Error, Result};
use crate::value::{Callback, Thenable, Value};

/// A settle callback handed to executors; call it with the outcome.
/// Cloneable so producers can move it into whatever drives the result.
pub type SettleFn = Rc<dyn Fn(Value)>;

/// A chain handler: receives the settled value (or reason) and produces the
/// next link's value. Returning `Err` raises, which rejects the next link.
pub type Handler = Box<dyn FnOnce(Value) -> Result<Value>>;

/// The eventual result of an asynchronous operation.
///
/// Cloning shares the underlying cell; identity is per cell, not per handle
/// (see [`Future::ptr_eq`]).
///
/// # Examples
///
/// ```
/// use vow::{scheduler, Future, Value};
///
/// let doubled = Future::new(|settle_ok, _settle_fail| {
///     settle_ok(Value::from(21));
///     Ok(())
/// })
/// .then(|v| match v {
///     Value::Number(n) => Ok(Value::Number(n * 2.0)),
///     other => Ok(other),
/// });
///
/// scheduler::run_until_idle();
/// assert_eq!(doubled.result(), Some(Value::from(42)));
/// ```
#[derive(Clone)]
pub struct Future {
    inner: Rc<RefCell<Deferred>>,
}

impl Future {
    /// Creates a future driven by `executor`, which runs synchronously and
    /// receives the two settle callbacks.
    ///
    /// An `Err` raised by the executor rejects the future with that error's
    /// value; it never escapes the constructor.
    pub fn new<F>(executor: F) -> Future
    where
        F: FnOnce(SettleFn, SettleFn) -> Result<()>,
    {
        let future = Future::pending();
        let settle_ok = future.settle_ok();
        let settle_fail = future.settle_fail();
        if let Err(raised) = executor(settle_ok, settle_fail) {
            future.reject_with(Value::from(raised));
        }
        future
    }

    /// Creates a pending future along with its settle callbacks, for callers
    /// driving settlement from outside an executor.
    pub fn with_resolvers() -> (Future, SettleFn, SettleFn) {
        let future = Future::pending();
        let settle_ok = future.settle_ok();
        let settle_fail = future.settle_fail();
        (future, settle_ok, settle_fail)
    }

    pub(crate) fn pending() -> Future {
        Future {
            inner: Rc::new(RefCell::new(Deferred::new())),
        }
    }

    pub(crate) fn from_cell(cell: Deferred) -> Future {
        Future {
            inner: Rc::new(RefCell::new(cell)),
        }
    }

    fn settle_ok(&self) -> SettleFn {
        let inner = self.inner.clone();
        Rc::new(move |value| inner.borrow_mut().resolve(value))
    }

    fn settle_fail(&self) -> SettleFn {
        let inner = self.inner.clone();
        Rc::new(move |reason| inner.borrow_mut().reject(reason))
    }

    /// Current settlement state.
    pub fn state(&self) -> FutureState {
        self.inner.borrow().state()
    }

    /// The settled outcome: fulfillment value or rejection reason.
    /// `None` while pending.
    pub fn result(&self) -> Option<Value> {
        self.inner.borrow().result().cloned()
    }

    /// Whether two handles share the same settlement cell.
    pub fn ptr_eq(&self, other: &Future) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn resolve_with(&self, value: Value) {
        self.inner.borrow_mut().resolve(value);
    }

    pub(crate) fn reject_with(&self, reason: Value) {
        self.inner.borrow_mut().reject(reason);
    }

    /// Cell-level registration. Callbacks on a pending cell wait for the
    /// transition; on a settled cell the matching callback runs immediately,
    /// after the cell's borrow is released.
    pub(crate) fn register(&self, on_fulfilled: Callback, on_rejected: Callback) {
        let immediate = self.inner.borrow_mut().register(on_fulfilled, on_rejected);
        if let Some((callback, outcome)) = immediate {
            callback(outcome);
        }
    }

    /// Chain with both handlers optional.
    ///
    /// Returns the new future immediately. A missing `on_fulfilled` passes
    /// the value through unchanged; a missing `on_rejected` passes the reason
    /// through unchanged. A handler's thenable result defers the new future's
    /// settlement until that thenable settles.
    pub fn then_with(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Future {
        let child = Future::pending();
        self.register(
            fulfil_reaction(child.clone(), on_fulfilled),
            reject_reaction(child.clone(), on_rejected),
        );
        child
    }

    /// Chain a fulfillment handler; rejections pass through unchanged.
    pub fn then<F>(&self, on_fulfilled: F) -> Future
    where
        F: FnOnce(Value) -> Result<Value> + 'static,
    {
        self.then_with(Some(Box::new(on_fulfilled)), None)
    }

    /// Chain a rejection handler; fulfillments pass through unchanged.
    /// Shorthand for `then_with(None, Some(on_rejected))`.
    pub fn catch<F>(&self, on_rejected: F) -> Future
    where
        F: FnOnce(Value) -> Result<Value> + 'static,
    {
        self.then_with(None, Some(Box::new(on_rejected)))
    }

    /// Run a callback once this future settles, either way, passing the
    /// original outcome through unchanged.
    pub fn finally<F>(&self, on_settled: F) -> Future
    where
        F: FnOnce() + 'static,
    {
        // One FnOnce, two possible entry points; only one ever fires.
        let hook = Rc::new(RefCell::new(Some(on_settled)));
        let rejected_hook = hook.clone();
        self.then_with(
            Some(Box::new(move |value| {
                if let Some(f) = hook.borrow_mut().take() {
                    f();
                }
                Ok(value)
            })),
            Some(Box::new(move |reason| {
                if let Some(f) = rejected_hook.borrow_mut().take() {
                    f();
                }
                Err(Error::thrown(reason))
            })),
        )
    }
}

/// Settle `child` from a handler result: a thenable result is adopted (the
/// child waits for it), anything else fulfills the child directly.
fn settle_from_result(child: &Future, value: Value) {
    if let Some(thenable) = value.as_thenable() {
        let fulfil = {
            let child = child.clone();
            Box::new(move |value| child.resolve_with(value)) as Callback
        };
        let reject = {
            let child = child.clone();
            Box::new(move |reason| child.reject_with(reason)) as Callback
        };
        thenable.subscribe(fulfil, reject);
    } else {
        child.resolve_with(value);
    }
}

fn fulfil_reaction(child: Future, handler: Option<Handler>) -> Callback {
    Box::new(move |value| match handler {
        Some(handler) => match handler(value) {
            Ok(result) => settle_from_result(&child, result),
            Err(raised) => child.reject_with(Value::from(raised)),
        },
        None => settle_from_result(&child, value),
    })
}

fn reject_reaction(child: Future, handler: Option<Handler>) -> Callback {
    Box::new(move |reason| match handler {
        // A handler that returns Ok recovers: the child fulfills.
        Some(handler) => match handler(reason) {
            Ok(result) => settle_from_result(&child, result),
            Err(raised) => child.reject_with(Value::from(raised)),
        },
        None => child.reject_with(reason),
    })
}

impl Thenable for Future {
    fn subscribe(&self, on_fulfilled: Callback, on_rejected: Callback) {
        self.register(on_fulfilled, on_rejected);
    }

    fn as_future(&self) -> Option<Future> {
        Some(self.clone())
    }
}

impl From<Future> for Value {
    fn from(future: Future) -> Value {
        Value::Thenable(Rc::new(future))
    }
}

impl fmt::Debug for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Future").field("state", &self.state()).finish()
    }
}
