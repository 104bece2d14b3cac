/*!
 * Shared Test Fixtures
 * Recording/failing executor and deterministic randomness fakes
 */

// Each integration test binary compiles its own copy; not every binary
// uses every fixture.
#![allow(dead_code)]

use lotsched::{ExecutorError, Executor, Pid, Priority, RandomSource};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Executor that records every committed decision and can be switched
/// into a failing mode to exercise rollback paths.
#[derive(Default)]
pub struct RecordingExecutor {
    commits: Mutex<Vec<(Pid, Priority, Duration)>>,
    failing: AtomicBool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn commits(&self) -> Vec<(Pid, Priority, Duration)> {
        self.commits.lock().clone()
    }

    #[allow(dead_code)]
    pub fn last_commit_for(&self, pid: Pid) -> Option<(Pid, Priority, Duration)> {
        self.commits
            .lock()
            .iter()
            .rev()
            .find(|(p, _, _)| *p == pid)
            .copied()
    }
}

impl Executor for RecordingExecutor {
    fn commit(&self, pid: Pid, priority: Priority, quantum: Duration) -> Result<(), ExecutorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ExecutorError::Rejected("injected failure".into()));
        }
        self.commits.lock().push((pid, priority, quantum));
        Ok(())
    }
}

/// Executor that rejects every `period`-th commit
pub struct FlakyExecutor {
    calls: Mutex<u64>,
    period: u64,
}

impl FlakyExecutor {
    #[allow(dead_code)]
    pub fn new(period: u64) -> Self {
        Self {
            calls: Mutex::new(0),
            period,
        }
    }
}

impl Executor for FlakyExecutor {
    fn commit(&self, _pid: Pid, _priority: Priority, _quantum: Duration) -> Result<(), ExecutorError> {
        let mut calls = self.calls.lock();
        *calls += 1;
        if *calls % self.period == 0 {
            Err(ExecutorError::Unavailable("flaky".into()))
        } else {
            Ok(())
        }
    }
}

/// Randomness fake replaying a fixed sequence of draws; returns zero once
/// the sequence is exhausted. Values are clamped into `[0, bound)`.
pub struct FixedRandom {
    values: Mutex<VecDeque<u64>>,
}

impl FixedRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl RandomSource for FixedRandom {
    fn random_uniform(&self, bound: u64) -> u64 {
        let value = self.values.lock().pop_front().unwrap_or(0);
        value.min(bound.saturating_sub(1))
    }
}
