/*!
 * Scheduling Policy Core
 * Hybrid lottery / proportional-share engine over a multilevel feedback queue
 *
 * All policy operations run to completion under one exclusive table lock;
 * requests are already serialized by the surrounding system and never
 * interleave over the table. Commit calls are bounded and non-blocking.
 */

mod admission;
mod aging;
mod entry;
mod expiration;
mod lottery;
mod nice;
mod stats;
mod table;
mod task;
pub mod types;

pub use task::{BalancerCommand, BalancerTask};
pub use types::{AdmissionMode, DrawOutcome, ProcessStats, SchedStats, StartRequest};

use crate::core::config::SchedConfig;
use crate::core::errors::SchedError;
use crate::core::types::{Pid, Priority, SchedResult};
use crate::exec::Executor;
use crate::monitoring::{Collector, Event, Payload, Severity};
use crate::random::{RandomSource, StdRandom};
use log::{info, warn};
use parking_lot::Mutex;
use stats::AtomicSchedStats;
use std::sync::Arc;
use std::time::Duration;
use table::ProcTable;

/// The scheduling-policy core
///
/// Cheap to clone: all state lives behind shared handles, so one instance
/// can serve request handlers and the periodic driver at once.
pub struct Scheduler {
    config: SchedConfig,
    table: Arc<Mutex<ProcTable>>,
    executor: Arc<dyn Executor>,
    random: Arc<dyn RandomSource>,
    stats: Arc<AtomicSchedStats>,
    collector: Option<Arc<Collector>>,
}

impl Scheduler {
    /// Create a scheduler with the default configuration and an
    /// entropy-seeded randomness source
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self::build(SchedConfig::default(), executor, Arc::new(StdRandom::new()))
    }

    /// Create a scheduler with explicit configuration and randomness source
    pub fn with_config(
        config: SchedConfig,
        executor: Arc<dyn Executor>,
        random: Arc<dyn RandomSource>,
    ) -> SchedResult<Self> {
        config.validate()?;
        Ok(Self::build(config, executor, random))
    }

    fn build(
        config: SchedConfig,
        executor: Arc<dyn Executor>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        info!(
            "Scheduler initialized: queues={} user_tier_start={} capacity={} interval={:?}",
            config.num_queues, config.user_tier_start, config.capacity, config.balance_interval
        );
        let table = ProcTable::new(&config);
        Self {
            config,
            table: Arc::new(Mutex::new(table)),
            executor,
            random,
            stats: Arc::new(AtomicSchedStats::new()),
            collector: None,
        }
    }

    /// Attach an observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    /// One periodic pass: lottery draw, then the aging balancer, as a
    /// single atomic step over the table
    pub fn on_periodic_tick(&self) {
        let mut table = self.table.lock();
        self.draw_locked(&mut table);
        self.balance_locked(&mut table);
    }

    /// Counters snapshot
    pub fn stats(&self) -> SchedStats {
        let total = self.table.lock().total_tickets();
        self.stats.snapshot(total)
    }

    /// Current ticket pool over active user-tier processes
    pub fn total_tickets(&self) -> u64 {
        self.table.lock().total_tickets()
    }

    /// Handle most recently promoted by the lottery, if any round has run
    pub fn last_winner(&self) -> Option<Pid> {
        self.table.lock().last_winner()
    }

    pub fn len(&self) -> usize {
        self.table.lock().active_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-process scheduling snapshot
    pub fn process_stats(&self, pid: Pid) -> Option<ProcessStats> {
        let table = self.table.lock();
        let slot = table.resolve(pid).ok()?;
        let entry = table.entry(slot);
        Some(ProcessStats {
            pid: entry.pid,
            parent: entry.parent,
            priority: entry.priority,
            ceiling: entry.ceiling,
            quantum_micros: entry.quantum.as_micros() as u64,
            tickets: entry.tickets,
            is_winner: table.last_winner() == Some(pid),
        })
    }

    /// Snapshot of every active process, in slot order
    pub fn all_process_stats(&self) -> Vec<ProcessStats> {
        let table = self.table.lock();
        let winner = table.last_winner();
        (0..table.capacity())
            .filter_map(|slot| {
                let entry = table.entry(slot);
                if !entry.active {
                    return None;
                }
                Some(ProcessStats {
                    pid: entry.pid,
                    parent: entry.parent,
                    priority: entry.priority,
                    ceiling: entry.ceiling,
                    quantum_micros: entry.quantum.as_micros() as u64,
                    tickets: entry.tickets,
                    is_winner: winner == Some(entry.pid),
                })
            })
            .collect()
    }

    /// Push one decision to the executor. Failures are counted, logged,
    /// and surfaced as an event before being returned to the caller.
    fn commit(&self, pid: Pid, priority: Priority, quantum: Duration) -> SchedResult<()> {
        match self.executor.commit(pid, priority, quantum) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stats.inc_commit_failures();
                warn!("commit rejected for {}: {}", pid, err);
                self.emit(
                    Event::new(
                        Severity::Warn,
                        Payload::CommitRejected {
                            error: err.to_string(),
                        },
                    )
                    .with_pid(pid),
                );
                Err(SchedError::CommitFailed(err))
            }
        }
    }

    #[inline]
    fn emit(&self, event: Event) {
        if let Some(collector) = &self.collector {
            collector.emit(event);
        }
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            table: Arc::clone(&self.table),
            executor: Arc::clone(&self.executor),
            random: Arc::clone(&self.random),
            stats: Arc::clone(&self.stats),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}
