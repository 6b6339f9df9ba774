//! Static combinators: constructing futures from one or many inputs
//!
//! Every element of a many-input combinator is first normalized through
//! [`Future::resolve`], so plain values, foreign thenables and existing
//! futures combine uniformly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap as HashMap;

use super::deferred::Deferred;
use super::Future;
use crate::value::{Callback, ErrorValue, Value};

impl Future {
    /// Wraps a value in a fulfilled future.
    ///
    /// A value that already is one of this library's futures is returned
    /// unchanged: same cell, no new wrapper. Foreign thenables are stored as
    /// the fulfillment value and adopted at the next chain link.
    pub fn resolve(value: impl Into<Value>) -> Future {
        let value = value.into();
        if let Some(existing) = value.as_thenable().and_then(|t| t.as_future()) {
            return existing;
        }
        let future = Future::pending();
        future.resolve_with(value);
        future
    }

    /// A future constructed directly in the rejected state.
    ///
    /// Skips the scheduled-callback path: a future rejected by design has no
    /// callbacks yet, and going through the usual transition would only trip
    /// the unhandled-rejection diagnostic. Caller-driven `settle_fail`
    /// invocations always take the scheduled path instead.
    pub fn reject(reason: impl Into<Value>) -> Future {
        Future::from_cell(Deferred::rejected(reason.into()))
    }

    /// Waits for every input to fulfill, preserving input order.
    ///
    /// Fulfills with the list of results positionally matching the inputs,
    /// regardless of settlement order. Rejects with the first rejection's
    /// reason. Empty input fulfills immediately with an empty list.
    pub fn all<I>(iterable: I) -> Future
    where
        I: IntoIterator<Item = Value>,
    {
        let entries: Vec<Value> = iterable.into_iter().collect();
        let combined = Future::pending();
        let total = entries.len();
        if total == 0 {
            combined.resolve_with(Value::List(Vec::new()));
            return combined;
        }

        let results = Rc::new(RefCell::new(vec![Value::Undefined; total]));
        let remaining = Rc::new(Cell::new(total));

        for (index, entry) in entries.into_iter().enumerate() {
            let fulfil = {
                let combined = combined.clone();
                let results = results.clone();
                let remaining = remaining.clone();
                Box::new(move |value| {
                    results.borrow_mut()[index] = value;
                    remaining.set(remaining.get() - 1);
                    if remaining.get() == 0 {
                        combined.resolve_with(Value::List(results.borrow().clone()));
                    }
                }) as Callback
            };
            let reject = {
                let combined = combined.clone();
                Box::new(move |reason| combined.reject_with(reason)) as Callback
            };
            Future::resolve(entry).register(fulfil, reject);
        }

        combined
    }

    /// Settles with the outcome of whichever input settles first.
    ///
    /// Later settlements lose to the settle-once guard and are ignored.
    /// Empty input fulfills with `Null`: with no competitor, the race
    /// completes trivially rather than hanging forever.
    pub fn race<I>(iterable: I) -> Future
    where
        I: IntoIterator<Item = Value>,
    {
        let entries: Vec<Value> = iterable.into_iter().collect();
        let winner = Future::pending();
        if entries.is_empty() {
            winner.resolve_with(Value::Null);
            return winner;
        }

        for entry in entries {
            let fulfil = {
                let winner = winner.clone();
                Box::new(move |value| winner.resolve_with(value)) as Callback
            };
            let reject = {
                let winner = winner.clone();
                Box::new(move |reason| winner.reject_with(reason)) as Callback
            };
            Future::resolve(entry).register(fulfil, reject);
        }

        winner
    }

    /// Waits for every input to settle, never rejecting.
    ///
    /// Fulfills with a list of `{status, value}` / `{status, reason}`
    /// objects positionally matching the inputs.
    pub fn all_settled<I>(iterable: I) -> Future
    where
        I: IntoIterator<Item = Value>,
    {
        let entries: Vec<Value> = iterable.into_iter().collect();
        let combined = Future::pending();
        let total = entries.len();
        if total == 0 {
            combined.resolve_with(Value::List(Vec::new()));
            return combined;
        }

        let results = Rc::new(RefCell::new(vec![Value::Undefined; total]));
        let remaining = Rc::new(Cell::new(total));

        for (index, entry) in entries.into_iter().enumerate() {
            let fulfil = {
                let combined = combined.clone();
                let results = results.clone();
                let remaining = remaining.clone();
                Box::new(move |value| {
                    results.borrow_mut()[index] = settled_entry("fulfilled", "value", value);
                    if decrement(&remaining) == 0 {
                        combined.resolve_with(Value::List(results.borrow().clone()));
                    }
                }) as Callback
            };
            let reject = {
                let combined = combined.clone();
                let results = results.clone();
                let remaining = remaining.clone();
                Box::new(move |reason| {
                    results.borrow_mut()[index] = settled_entry("rejected", "reason", reason);
                    if decrement(&remaining) == 0 {
                        combined.resolve_with(Value::List(results.borrow().clone()));
                    }
                }) as Callback
            };
            Future::resolve(entry).register(fulfil, reject);
        }

        combined
    }

    /// Fulfills with the first input to fulfill.
    ///
    /// Rejects with an `AggregateError` carrying the reasons in input order
    /// when every input rejects; empty input rejects the same way.
    pub fn any<I>(iterable: I) -> Future
    where
        I: IntoIterator<Item = Value>,
    {
        let entries: Vec<Value> = iterable.into_iter().collect();
        let total = entries.len();
        if total == 0 {
            return Future::reject(ErrorValue::aggregate(Vec::new()));
        }

        let first = Future::pending();
        let reasons = Rc::new(RefCell::new(vec![Value::Undefined; total]));
        let remaining = Rc::new(Cell::new(total));

        for (index, entry) in entries.into_iter().enumerate() {
            let fulfil = {
                let first = first.clone();
                Box::new(move |value| first.resolve_with(value)) as Callback
            };
            let reject = {
                let first = first.clone();
                let reasons = reasons.clone();
                let remaining = remaining.clone();
                Box::new(move |reason| {
                    reasons.borrow_mut()[index] = reason;
                    if decrement(&remaining) == 0 {
                        first.reject_with(Value::Error(ErrorValue::aggregate(
                            reasons.borrow().clone(),
                        )));
                    }
                }) as Callback
            };
            Future::resolve(entry).register(fulfil, reject);
        }

        first
    }
}

fn decrement(remaining: &Cell<usize>) -> usize {
    remaining.set(remaining.get() - 1);
    remaining.get()
}

fn settled_entry(status: &str, key: &str, outcome: Value) -> Value {
    let mut entry = HashMap::default();
    entry.insert("status".to_string(), Value::from(status));
    entry.insert(key.to_string(), outcome);
    Value::Object(entry)
}
