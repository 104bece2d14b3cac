/*!
 * Quantum-Expiration Handler
 * Demotion on exhausted slices; reward of cooperatively blocking winners
 *
 * Running out a quantum without blocking is evidence of CPU-bound
 * behavior: the process drops one queue level and loses one ticket. A
 * loser only gets CPU while the winner is blocked, so a baseline-level
 * expiration re-promotes the remembered winner instead.
 */

use super::table::ProcTable;
use super::Scheduler;
use crate::core::types::{Pid, SchedResult};
use crate::monitoring::{Event, Payload, QueueChangeReason, Severity};
use log::{debug, info};

impl Scheduler {
    /// Handle a fully elapsed quantum. Forward-only: state changes are
    /// never rolled back on commit failure; the error is reported and the
    /// next pass corrects any drift.
    pub fn notify_quantum_expired(&self, pid: Pid) -> SchedResult<()> {
        let mut table = self.table.lock();
        let slot = table.resolve(pid)?;
        self.stats.inc_expirations();

        let cfg = &self.config;
        let priority = table.entry(slot).priority;

        if priority == cfg.winner_queue() {
            // The winner burned its privileged slice instead of blocking:
            // demoted like anyone else, and the round memory is stale now.
            self.demote(&mut table, slot, cfg.baseline(), QueueChangeReason::Demoted);
            if table.last_winner() == Some(pid) {
                table.clear_last_winner();
            }
            self.penalize_tickets(&mut table, slot);
        } else if cfg.is_user_tier(priority) {
            if priority == cfg.baseline() {
                // Already at the worst queue; the interesting party is the
                // winner that must have blocked for this process to run.
                self.reward_blocked_winner(&mut table, pid);
            } else {
                self.demote(&mut table, slot, priority + 1, QueueChangeReason::Demoted);
            }
            self.penalize_tickets(&mut table, slot);
        } else {
            // System tier: plain feedback-queue demotion, clamped so the
            // entry never crosses into the lottery tier.
            let clamp = cfg.user_tier_start - 1;
            if priority < clamp {
                self.demote(&mut table, slot, priority + 1, QueueChangeReason::Demoted);
            }
        }

        let entry = table.entry(slot);
        let (priority, quantum) = (entry.priority, entry.quantum);
        self.commit(pid, priority, quantum)
    }

    fn demote(
        &self,
        table: &mut ProcTable,
        slot: usize,
        to: crate::core::types::Priority,
        reason: QueueChangeReason,
    ) {
        let entry = table.entry(slot);
        let (pid, from) = (entry.pid, entry.priority);
        table.set_priority(slot, to);
        self.stats.inc_demotions();
        debug!("Process {} demoted {} -> {}", pid, from, to);
        self.emit(Event::new(Severity::Debug, Payload::QueueChanged { from, to, reason }).with_pid(pid));
    }

    /// One-ticket penalty for exhausting a slice, floored at the minimum
    fn penalize_tickets(&self, table: &mut ProcTable, slot: usize) {
        let pid = table.entry(slot).pid;
        if table.entry(slot).tickets <= self.config.min_tickets {
            return;
        }
        let applied = table.adjust_tickets(slot, -1);
        if applied != 0 {
            let held = table.entry(slot).tickets;
            debug!(
                "Process {} penalized: tickets {} -> {} (pool={})",
                pid,
                held as i64 - applied,
                held,
                table.total_tickets()
            );
            self.emit(
                Event::new(
                    Severity::Debug,
                    Payload::TicketsAdjusted {
                        delta: applied,
                        held,
                        pool: table.total_tickets(),
                    },
                )
                .with_pid(pid),
            );
        }
    }

    /// Promote the remembered winner back to the privileged queue and
    /// grant it one ticket, capped at the maximum. A stale or missing
    /// round memory is a no-op, never a fault.
    fn reward_blocked_winner(&self, table: &mut ProcTable, expiring: Pid) {
        let winner = match table.last_winner() {
            Some(winner) if winner != expiring => winner,
            _ => return,
        };
        let slot = match table.resolve(winner) {
            Ok(slot) => slot,
            Err(_) => {
                debug!("stale lottery winner {} ignored", winner);
                return;
            }
        };

        let from = table.entry(slot).priority;
        let to = self.config.winner_queue();
        if from != to {
            table.set_priority(slot, to);
            self.stats.inc_promotions();
            self.emit(
                Event::new(
                    Severity::Info,
                    Payload::QueueChanged {
                        from,
                        to,
                        reason: QueueChangeReason::Rewarded,
                    },
                )
                .with_pid(winner),
            );
        }
        let applied = table.adjust_tickets(slot, 1);
        let held = table.entry(slot).tickets;
        if applied != 0 {
            self.emit(Event::new(Severity::Info, Payload::WinnerRewarded { tickets: held }).with_pid(winner));
        }
        info!(
            "Winner {} blocked cooperatively: re-promoted to {} (tickets={})",
            winner, to, held
        );

        let entry = table.entry(slot);
        let (priority, quantum) = (entry.priority, entry.quantum);
        // Best-effort: a rejected commit here is reported by the helper
        // and retried by later passes.
        let _ = self.commit(winner, priority, quantum);
    }
}
