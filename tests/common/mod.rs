//! Shared test helpers for integration tests

use vow::prelude::*;

/// Drain the scheduler, then return the future's settled outcome.
pub fn settle(future: &Future) -> (FutureState, Option<Value>) {
    scheduler::run_until_idle();
    (future.state(), future.result())
}

/// Drain the scheduler and unwrap a fulfillment value.
#[allow(dead_code)]
pub fn fulfilled(future: &Future) -> Value {
    let (state, result) = settle(future);
    assert_eq!(
        state,
        FutureState::Fulfilled,
        "expected fulfillment, got {:?}",
        result
    );
    result.expect("fulfilled future has a value")
}

/// Drain the scheduler and unwrap a rejection reason.
#[allow(dead_code)]
pub fn rejected(future: &Future) -> Value {
    let (state, result) = settle(future);
    assert_eq!(
        state,
        FutureState::Rejected,
        "expected rejection, got {:?}",
        result
    );
    result.expect("rejected future has a reason")
}

/// Extract a number, panicking on any other variant.
#[allow(dead_code)]
pub fn as_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        other => panic!("expected number, got {:?}", other),
    }
}

/// Install a tracing subscriber reading `RUST_LOG`, for debugging test runs.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
