//! The settlement cell backing every future
//!
//! One cell tracks one asynchronous result: its pending/fulfilled/rejected
//! status, the settled outcome, and the callbacks waiting on each side.
//! Settlement happens exactly once; the losing transition is a silent no-op.

use tracing::{debug, trace};

use crate::scheduler;
use crate::value::{Callback, Value};

/// Settlement status of a future.
///
/// Once settled (Fulfilled or Rejected), a future cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureState {
    /// The initial state; neither fulfilled nor rejected.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a rejection reason.
    Rejected,
}

/// The state machine tracking one asynchronous result.
///
/// Shared behind `Rc<RefCell<..>>` by every handle and callback that can
/// observe or drive it; single-threaded interior mutability is all the
/// synchronization this needs.
pub(crate) struct Deferred {
    state: FutureState,
    /// Fulfillment value or rejection reason; which one is meaningful is
    /// determined by `state`.
    result: Option<Value>,
    on_fulfilled: Vec<Callback>,
    on_rejected: Vec<Callback>,
    /// Whether any reaction was ever registered; gates the
    /// unhandled-rejection diagnostic.
    handled: bool,
}

impl Deferred {
    pub(crate) fn new() -> Self {
        Self {
            state: FutureState::Pending,
            result: None,
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
            handled: false,
        }
    }

    /// A cell born in the rejected state.
    ///
    /// Skips the scheduled-callback path entirely: no queue exists yet, so
    /// nothing is scheduled and the unhandled-rejection diagnostic stays
    /// quiet. This is the construction path for programmatic rejection.
    pub(crate) fn rejected(reason: Value) -> Self {
        Self {
            state: FutureState::Rejected,
            result: Some(reason),
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
            handled: false,
        }
    }

    pub(crate) fn state(&self) -> FutureState {
        self.state
    }

    pub(crate) fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Transition to Fulfilled. No-op unless pending; first writer wins.
    ///
    /// Queued fulfill-callbacks are handed to the scheduler in registration
    /// order; both queues are cleared, the outcome is now permanent.
    pub(crate) fn resolve(&mut self, value: Value) {
        if self.state != FutureState::Pending {
            return;
        }
        self.state = FutureState::Fulfilled;
        self.result = Some(value.clone());
        trace!(waiting = self.on_fulfilled.len(), "cell fulfilled");

        for callback in self.on_fulfilled.drain(..) {
            let value = value.clone();
            scheduler::asap(move || callback(value));
        }
        self.on_rejected.clear();
    }

    /// Transition to Rejected. No-op unless pending; first writer wins.
    pub(crate) fn reject(&mut self, reason: Value) {
        if self.state != FutureState::Pending {
            return;
        }
        self.state = FutureState::Rejected;
        self.result = Some(reason.clone());
        trace!(waiting = self.on_rejected.len(), "cell rejected");

        if self.on_rejected.is_empty() && !self.handled {
            debug!(reason = ?reason, "rejection with no registered handler");
        }
        for callback in self.on_rejected.drain(..) {
            let reason = reason.clone();
            scheduler::asap(move || callback(reason));
        }
        self.on_fulfilled.clear();
    }

    /// Register callbacks for this cell's outcome.
    ///
    /// Pending cells enqueue both; settled cells owe the matching callback an
    /// immediate invocation, which is returned to the caller instead of run
    /// here; invoking user code under the cell's borrow would make
    /// re-registration from inside a callback a re-entrant borrow.
    pub(crate) fn register(
        &mut self,
        on_fulfilled: Callback,
        on_rejected: Callback,
    ) -> Option<(Callback, Value)> {
        self.handled = true;
        match self.state {
            FutureState::Pending => {
                self.on_fulfilled.push(on_fulfilled);
                self.on_rejected.push(on_rejected);
                None
            }
            FutureState::Fulfilled => {
                let value = self.result.clone().unwrap_or(Value::Undefined);
                Some((on_fulfilled, value))
            }
            FutureState::Rejected => {
                let reason = self.result.clone().unwrap_or(Value::Undefined);
                Some((on_rejected, reason))
            }
        }
    }
}
