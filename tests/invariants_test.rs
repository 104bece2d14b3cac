/*!
 * Invariant Tests
 * Property-based checks over arbitrary operation sequences
 */

mod common;

use common::FlakyExecutor;
use lotsched::{LoggingExecutor, SchedConfig, Scheduler, StartRequest, StdRandom};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const USER_TIER_START: u8 = 8;
const NUM_QUEUES: u8 = 16;

#[derive(Debug, Clone)]
enum Op {
    StartExplicit { pid: u32, ceiling: u8 },
    StartInherit { pid: u32, parent: u32 },
    Stop { pid: u32 },
    Expire { pid: u32 },
    SetCeiling { pid: u32, ceiling: u8 },
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let pid = 1u32..=6;
    // Ceilings deliberately include out-of-range values so rejection
    // paths run under the same invariant checks.
    let ceiling = 0u8..=16;
    prop_oneof![
        (pid.clone(), ceiling.clone()).prop_map(|(pid, ceiling)| Op::StartExplicit { pid, ceiling }),
        (pid.clone(), 1u32..=6).prop_map(|(pid, parent)| Op::StartInherit { pid, parent }),
        pid.clone().prop_map(|pid| Op::Stop { pid }),
        pid.clone().prop_map(|pid| Op::Expire { pid }),
        (pid, ceiling).prop_map(|(pid, ceiling)| Op::SetCeiling { pid, ceiling }),
        Just(Op::Tick),
    ]
}

fn apply(scheduler: &Scheduler, op: &Op) {
    let quantum = Duration::from_millis(200);
    let baseline = NUM_QUEUES - 1;
    match *op {
        Op::StartExplicit { pid, ceiling } => {
            let _ = scheduler.request_start(StartRequest::explicit(pid, ceiling, quantum));
        }
        Op::StartInherit { pid, parent } => {
            let _ = scheduler.request_start(StartRequest::inherit(pid, parent, baseline));
        }
        Op::Stop { pid } => {
            let _ = scheduler.request_stop(pid);
        }
        Op::Expire { pid } => {
            let _ = scheduler.notify_quantum_expired(pid);
        }
        Op::SetCeiling { pid, ceiling } => {
            let _ = scheduler.request_set_ceiling(pid, ceiling);
        }
        Op::Tick => scheduler.on_periodic_tick(),
    }
}

/// Ticket pool equals the recomputed sum over user-tier holdings, every
/// priority and ceiling stays inside the queue range, and participants
/// hold tickets within the configured bounds.
fn check_invariants(scheduler: &Scheduler) {
    let snapshot = scheduler.all_process_stats();

    let recomputed: u64 = snapshot
        .iter()
        .filter(|s| s.priority >= USER_TIER_START)
        .map(|s| u64::from(s.tickets))
        .sum();
    assert_eq!(scheduler.total_tickets(), recomputed);

    for stats in &snapshot {
        assert!(stats.priority < NUM_QUEUES, "priority out of range: {:?}", stats);
        assert!(stats.ceiling < NUM_QUEUES, "ceiling out of range: {:?}", stats);
        assert!(
            stats.tickets == 0 || (1..=100).contains(&stats.tickets),
            "ticket bounds violated: {:?}",
            stats
        );
    }

    if let Some(winner) = scheduler.last_winner() {
        assert!(
            snapshot.iter().any(|s| s.pid == winner),
            "round memory references a removed process"
        );
    }

    assert_eq!(scheduler.len(), snapshot.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pool_and_bounds_hold_under_any_sequence(
        ops in prop::collection::vec(op_strategy(), 1..120),
        seed in any::<u64>(),
    ) {
        let scheduler = Scheduler::with_config(
            SchedConfig::default().with_capacity(8),
            Arc::new(LoggingExecutor),
            Arc::new(StdRandom::seeded(seed)),
        )
        .unwrap();

        for op in &ops {
            apply(&scheduler, op);
            check_invariants(&scheduler);
        }
    }

    #[test]
    fn invariants_survive_commit_failures(
        ops in prop::collection::vec(op_strategy(), 1..120),
        seed in any::<u64>(),
    ) {
        // Every third commit is rejected, exercising both the rollback
        // path (ceiling changes) and the forward-only paths.
        let scheduler = Scheduler::with_config(
            SchedConfig::default().with_capacity(8),
            Arc::new(FlakyExecutor::new(3)),
            Arc::new(StdRandom::seeded(seed)),
        )
        .unwrap();

        for op in &ops {
            apply(&scheduler, op);
            check_invariants(&scheduler);
        }
    }
}
