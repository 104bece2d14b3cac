/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters for zero-contention tracking in hot policy paths
 */

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Atomic counters updated by every policy operation
///
/// Counter values may not be perfectly consistent with each other under
/// concurrent snapshots, but each individual value is accurate. This is
/// acceptable for monitoring.
#[derive(Debug, Default)]
pub(super) struct AtomicSchedStats {
    admissions: AtomicU64,
    removals: AtomicU64,
    expirations: AtomicU64,
    demotions: AtomicU64,
    promotions: AtomicU64,
    draws: AtomicU64,
    commit_failures: AtomicU64,
    active_processes: AtomicUsize,
}

impl AtomicSchedStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_admissions(&self) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
        self.active_processes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_removals(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
        self.active_processes.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_expirations(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_demotions(&self) {
        self.demotions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_promotions(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_draws(&self) {
        self.draws.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_commit_failures(&self) {
        self.commit_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, total_tickets: u64) -> super::types::SchedStats {
        super::types::SchedStats {
            admissions: self.admissions.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            demotions: self.demotions.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            draws: self.draws.load(Ordering::Relaxed),
            commit_failures: self.commit_failures.load(Ordering::Relaxed),
            active_processes: self.active_processes.load(Ordering::Relaxed),
            total_tickets,
        }
    }
}
