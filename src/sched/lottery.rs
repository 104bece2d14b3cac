/*!
 * Lottery Engine
 * Ticket-weighted draw promoting one winner per balancing pass
 *
 * Eligible = active, user tier, holding tickets. The winner moves to the
 * privileged queue for the round (overriding its ceiling); every other
 * eligible process drops to the baseline queue. Ties break by slot order:
 * the first process driving the remainder negative wins.
 */

use super::table::ProcTable;
use super::types::DrawOutcome;
use super::Scheduler;
use crate::monitoring::{Event, Payload, QueueChangeReason, Severity};
use log::{debug, info};

impl Scheduler {
    /// Run one draw against the current table
    pub fn draw_lottery(&self) -> DrawOutcome {
        let mut table = self.table.lock();
        self.draw_locked(&mut table)
    }

    pub(super) fn draw_locked(&self, table: &mut ProcTable) -> DrawOutcome {
        let pool = table.total_tickets();
        if pool == 0 {
            debug!("lottery skipped: no eligible tickets");
            self.emit(Event::new(Severity::Debug, Payload::LotterySkipped));
            return DrawOutcome::NoEligible;
        }

        let cfg = &self.config;
        let eligible: Vec<usize> = (0..table.capacity())
            .filter(|&slot| {
                let entry = table.entry(slot);
                entry.active && cfg.is_user_tier(entry.priority) && entry.tickets > 0
            })
            .collect();
        debug_assert!(!eligible.is_empty(), "nonzero pool implies participants");

        let ticket = self.random.random_uniform(pool);
        self.stats.inc_draws();

        // The remainder must go negative before the tickets run out, since
        // ticket < pool = sum of all eligible holdings.
        let mut remainder = ticket as i64;
        let mut winner_slot = eligible[0];
        for &slot in &eligible {
            remainder -= i64::from(table.entry(slot).tickets);
            if remainder < 0 {
                winner_slot = slot;
                break;
            }
        }
        let winner_pid = table.entry(winner_slot).pid;

        info!(
            "lottery: pool={} ticket={} winner={}",
            pool, ticket, winner_pid
        );
        self.emit(Event::new(Severity::Info, Payload::LotteryDrawn { pool, ticket }).with_pid(winner_pid));

        for &slot in &eligible {
            let won = slot == winner_slot;
            let mut changed = false;
            if !won {
                changed |= self.apply_growth(table, slot);
            }

            let entry = table.entry(slot);
            let (pid, from) = (entry.pid, entry.priority);
            let to = if won { cfg.winner_queue() } else { cfg.baseline() };
            if from != to {
                table.set_priority(slot, to);
                changed = true;
                if won {
                    self.stats.inc_promotions();
                }
                self.emit(
                    Event::new(
                        Severity::Debug,
                        Payload::QueueChanged {
                            from,
                            to,
                            reason: if won {
                                QueueChangeReason::Won
                            } else {
                                QueueChangeReason::Lost
                            },
                        },
                    )
                    .with_pid(pid),
                );
            }

            if changed {
                let entry = table.entry(slot);
                let (priority, quantum) = (entry.priority, entry.quantum);
                // Forward-only pass: a rejected commit is reported by the
                // helper and the next tick retries.
                let _ = self.commit(pid, priority, quantum);
            }
        }

        table.set_last_winner(winner_pid);
        DrawOutcome::Winner(winner_pid)
    }

    /// Not-chosen ticket adjustment, per the configured growth strategy
    fn apply_growth(&self, table: &mut ProcTable, slot: usize) -> bool {
        use crate::core::config::TicketGrowth;

        let delta = match self.config.ticket_growth {
            TicketGrowth::Static => 0,
            TicketGrowth::LinearGrowth(step) => i64::from(step),
            TicketGrowth::DoublingGrowth => i64::from(table.entry(slot).tickets),
        };
        if delta == 0 {
            return false;
        }
        let applied = table.adjust_tickets(slot, delta);
        if applied == 0 {
            return false;
        }
        let pid = table.entry(slot).pid;
        self.emit(
            Event::new(
                Severity::Debug,
                Payload::TicketsAdjusted {
                    delta: applied,
                    held: table.entry(slot).tickets,
                    pool: table.total_tickets(),
                },
            )
            .with_pid(pid),
        );
        true
    }
}
