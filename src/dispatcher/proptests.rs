//! Property tests for dispatch ordering
//!
//! For any handler set: at most one handler executes, and it is the first
//! claiming handler in (priority, registration) order.

use super::Dispatcher;
use crate::context::ContextBundle;
use crate::testing::{Applies, StubHandler};
use proptest::prelude::*;

fn arb_handlers() -> impl Strategy<Value = Vec<(i32, bool)>> {
    proptest::collection::vec((0i32..4, any::<bool>()), 0..8)
}

proptest! {
    #[test]
    fn prop_lowest_claiming_priority_runs_once(specs in arb_handlers()) {
        let stubs: Vec<StubHandler> = specs
            .iter()
            .enumerate()
            .map(|(i, (priority, claims))| {
                StubHandler::new(format!("h{i}"), *priority)
                    .claiming(if *claims { Applies::Yes } else { Applies::No })
            })
            .collect();
        let executions: Vec<_> = stubs.iter().map(StubHandler::executions).collect();
        let dispatcher = Dispatcher::with_handlers(stubs.into_iter().map(StubHandler::arc)).unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let envelope = runtime.block_on(dispatcher.dispatch("msg", &ContextBundle::detached("u", "s")));

        // Stable sort by priority gives the expected consultation order
        let mut order: Vec<usize> = (0..specs.len()).collect();
        order.sort_by_key(|&i| specs[i].0);
        let expected = order.into_iter().find(|&i| specs[i].1);

        let total_runs: usize = executions.iter().map(crate::testing::Counter::get).sum();
        prop_assert!(total_runs <= 1);

        match expected {
            Some(i) => {
                prop_assert!(envelope.success);
                prop_assert_eq!(envelope.response, format!("h{i}"));
                prop_assert_eq!(executions[i].get(), 1);
            }
            None => {
                prop_assert!(!envelope.success);
                prop_assert!(envelope.error.is_some_and(|e| !e.is_empty()));
                prop_assert_eq!(total_runs, 0);
            }
        }
    }
}
