//! Integration tests for the static combinators.

mod common;
use common::{fulfilled, rejected, settle};
use pretty_assertions::assert_eq;
use vow::prelude::*;

mod resolve_and_reject {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_wraps_plain_values() {
        let future = Future::resolve(Value::from("plain"));
        assert_eq!(future.state(), FutureState::Fulfilled);
        assert_eq!(fulfilled(&future), Value::from("plain"));
    }

    #[test]
    fn test_resolve_returns_existing_futures_unchanged() {
        let (existing, _settle_ok, _settle_fail) = Future::with_resolvers();
        let wrapped = Future::resolve(Value::from(existing.clone()));
        assert!(wrapped.ptr_eq(&existing));
        // Still the same pending cell, not a future fulfilled with a thenable.
        assert_eq!(wrapped.state(), FutureState::Pending);
    }

    #[test]
    fn test_reject_is_settled_at_construction() {
        let future = Future::reject(Value::from("no"));
        assert_eq!(future.state(), FutureState::Rejected);
        assert_eq!(rejected(&future), Value::from("no"));
    }

    #[test]
    fn test_rejected_future_still_chains() {
        let chained = Future::reject(Value::from("reason")).catch(|r| Ok(r));
        assert_eq!(fulfilled(&chained), Value::from("reason"));
    }
}

mod all {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_results_preserve_input_order_not_settlement_order() {
        let (p1, settle1, _) = Future::with_resolvers();
        let (p2, settle2, _) = Future::with_resolvers();
        let (p3, settle3, _) = Future::with_resolvers();

        let combined = Future::all(vec![
            Value::from(p2.clone()),
            Value::from(p1.clone()),
            Value::from(p3.clone()),
        ]);

        // Settle out of positional order: p1 fastest, p3 last.
        settle1(Value::from("v1"));
        scheduler::run_until_idle();
        settle2(Value::from("v2"));
        scheduler::run_until_idle();
        assert_eq!(combined.state(), FutureState::Pending);
        settle3(Value::from("v3"));

        assert_eq!(
            fulfilled(&combined),
            Value::List(vec![Value::from("v2"), Value::from("v1"), Value::from("v3")])
        );
    }

    #[test]
    fn test_plain_values_and_futures_mix() {
        let combined = Future::all(vec![
            Value::from(1),
            Value::from(Future::resolve(Value::from(2))),
            Value::from(3),
        ]);
        assert_eq!(
            fulfilled(&combined),
            Value::List(vec![Value::from(1), Value::from(2), Value::from(3)])
        );
    }

    #[test]
    fn test_first_rejection_wins_over_later_fulfillments() {
        let (slow, settle_slow, _) = Future::with_resolvers();
        let combined = Future::all(vec![
            Value::from(slow.clone()),
            Value::from(Future::reject(Value::from("fatal"))),
        ]);

        assert_eq!(rejected(&combined), Value::from("fatal"));

        // The straggler fulfilling afterwards changes nothing.
        settle_slow(Value::from("late"));
        let (state, result) = settle(&combined);
        assert_eq!(state, FutureState::Rejected);
        assert_eq!(result, Some(Value::from("fatal")));
    }

    #[test]
    fn test_empty_input_fulfills_immediately() {
        let combined = Future::all(Vec::new());
        assert_eq!(combined.state(), FutureState::Fulfilled);
        assert_eq!(fulfilled(&combined), Value::List(Vec::new()));
    }
}

mod race {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_settler_wins() {
        let (never, _keep_ok, _keep_fail) = Future::with_resolvers();
        let winner = Future::race(vec![
            Value::from(never.clone()),
            Value::from(Future::resolve(Value::from(5))),
        ]);
        assert_eq!(fulfilled(&winner), Value::from(5));
        assert_eq!(never.state(), FutureState::Pending);
    }

    #[test]
    fn test_rejection_can_win() {
        let winner = Future::race(vec![
            Value::from(Future::reject(Value::from("lost"))),
            Value::from(Future::resolve(Value::from(1))),
        ]);
        assert_eq!(rejected(&winner), Value::from("lost"));
    }

    #[test]
    fn test_later_settlements_are_ignored() {
        let (a, settle_a, _) = Future::with_resolvers();
        let (b, settle_b, _) = Future::with_resolvers();
        let winner = Future::race(vec![Value::from(a), Value::from(b)]);

        settle_b(Value::from("fast"));
        scheduler::run_until_idle();
        settle_a(Value::from("slow"));

        assert_eq!(fulfilled(&winner), Value::from("fast"));
    }

    #[test]
    fn test_empty_race_completes_with_null() {
        let winner = Future::race(Vec::new());
        assert_eq!(fulfilled(&winner), Value::Null);
    }
}

mod all_settled {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reports_every_outcome_in_order() {
        let combined = Future::all_settled(vec![
            Value::from(Future::resolve(Value::from(1))),
            Value::from(Future::reject(Value::from("err"))),
            Value::from(3),
        ]);

        let results = match fulfilled(&combined) {
            Value::List(items) => items,
            other => panic!("expected list, got {:?}", other),
        };
        assert_eq!(results.len(), 3);

        for (index, (status, key, outcome)) in [
            ("fulfilled", "value", Value::from(1)),
            ("rejected", "reason", Value::from("err")),
            ("fulfilled", "value", Value::from(3)),
        ]
        .into_iter()
        .enumerate()
        {
            match &results[index] {
                Value::Object(entry) => {
                    assert_eq!(entry.get("status"), Some(&Value::from(status)));
                    assert_eq!(entry.get(key), Some(&outcome));
                }
                other => panic!("expected status object, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_never_rejects() {
        let combined = Future::all_settled(vec![
            Value::from(Future::reject(Value::from("a"))),
            Value::from(Future::reject(Value::from("b"))),
        ]);
        let (state, _) = settle(&combined);
        assert_eq!(state, FutureState::Fulfilled);
    }

    #[test]
    fn test_empty_input_fulfills_immediately() {
        assert_eq!(fulfilled(&Future::all_settled(Vec::new())), Value::List(Vec::new()));
    }
}

mod any {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_fulfillment_wins_over_rejections() {
        let first = Future::any(vec![
            Value::from(Future::reject(Value::from("r1"))),
            Value::from(Future::resolve(Value::from("winner"))),
            Value::from(Future::reject(Value::from("r2"))),
        ]);
        assert_eq!(fulfilled(&first), Value::from("winner"));
    }

    #[test]
    fn test_all_rejected_aggregates_reasons_in_order() {
        let first = Future::any(vec![
            Value::from(Future::reject(Value::from("a"))),
            Value::from(Future::reject(Value::from("b"))),
        ]);

        match rejected(&first) {
            Value::Error(err) => {
                assert_eq!(err.name, "AggregateError");
                assert_eq!(err.errors, vec![Value::from("a"), Value::from("b")]);
            }
            other => panic!("expected aggregate error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_rejects_with_empty_aggregate() {
        match rejected(&Future::any(Vec::new())) {
            Value::Error(err) => {
                assert_eq!(err.name, "AggregateError");
                assert!(err.errors.is_empty());
            }
            other => panic!("expected aggregate error, got {:?}", other),
        }
    }
}
