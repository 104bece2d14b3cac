/*!
 * Scheduler Configuration
 * Queue geometry, ticket policy, and timing knobs
 */

use crate::core::errors::SchedError;
use crate::core::types::{Priority, Tickets};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ticket adjustment applied to eligible processes that were not chosen
/// by a lottery draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketGrowth {
    /// No adjustment: tickets change only through expiration penalties
    /// and blocked-winner rewards
    Static,
    /// Add a fixed step per missed draw, capped at the ticket ceiling
    LinearGrowth(Tickets),
    /// Double the holding per missed draw, capped at the ticket ceiling
    DoublingGrowth,
}

/// Scheduler configuration
///
/// Queue levels are numeric: lower value = more urgent. Queues below
/// `user_tier_start` are the system tier and never enter the lottery.
/// The two worst user queues are reserved as the per-round privileged
/// ("winner") and baseline ("loser") levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedConfig {
    /// Number of priority queues; valid levels are `[0, num_queues)`
    pub num_queues: Priority,
    /// First user-tier queue level; everything below is system tier
    pub user_tier_start: Priority,
    /// Fixed slot capacity of the scheduling table
    pub capacity: usize,
    /// Quantum granted when an explicit admission does not carry one
    pub default_quantum: Duration,
    /// Ticket grant for inherited admissions
    pub initial_tickets: Tickets,
    /// Floor for ticket penalties
    pub min_tickets: Tickets,
    /// Ceiling for ticket rewards and growth
    pub max_tickets: Tickets,
    /// Interval between periodic lottery/aging passes
    pub balance_interval: Duration,
    /// Not-chosen ticket adjustment strategy
    pub ticket_growth: TicketGrowth,
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            num_queues: 16,
            user_tier_start: 8,
            capacity: 256,
            default_quantum: Duration::from_millis(200),
            initial_tickets: 20,
            min_tickets: 1,
            max_tickets: 100,
            balance_interval: Duration::from_secs(5),
            ticket_growth: TicketGrowth::Static,
        }
    }
}

impl SchedConfig {
    /// Worst user queue: the per-round "loser" level and the entry level
    /// for inherited admissions
    #[inline]
    pub fn baseline(&self) -> Priority {
        self.num_queues - 1
    }

    /// Privileged queue the lottery winner is promoted to for one round
    #[inline]
    pub fn winner_queue(&self) -> Priority {
        self.num_queues - 2
    }

    /// Whether a queue level belongs to the lottery-eligible user tier
    #[inline]
    pub fn is_user_tier(&self, priority: Priority) -> bool {
        priority >= self.user_tier_start
    }

    /// Reject degenerate geometry before a scheduler is built
    pub fn validate(&self) -> Result<(), SchedError> {
        if self.num_queues < 2 {
            return Err(SchedError::InvalidConfig(
                "at least two queues are required (winner + baseline)".into(),
            ));
        }
        if self.user_tier_start > self.winner_queue() {
            return Err(SchedError::InvalidConfig(format!(
                "user tier must contain the winner and baseline queues \
                 (user_tier_start={}, num_queues={})",
                self.user_tier_start, self.num_queues
            )));
        }
        if self.capacity == 0 {
            return Err(SchedError::InvalidConfig("table capacity must be nonzero".into()));
        }
        if self.min_tickets == 0 || self.min_tickets > self.max_tickets {
            return Err(SchedError::InvalidConfig(format!(
                "ticket bounds must satisfy 1 <= min <= max (min={}, max={})",
                self.min_tickets, self.max_tickets
            )));
        }
        if self.initial_tickets < self.min_tickets || self.initial_tickets > self.max_tickets {
            return Err(SchedError::InvalidConfig(format!(
                "initial ticket grant {} outside [{}, {}]",
                self.initial_tickets, self.min_tickets, self.max_tickets
            )));
        }
        if self.default_quantum.is_zero() {
            return Err(SchedError::InvalidConfig("default quantum must be nonzero".into()));
        }
        if self.balance_interval.is_zero() {
            return Err(SchedError::InvalidConfig("balance interval must be nonzero".into()));
        }
        Ok(())
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_balance_interval(mut self, interval: Duration) -> Self {
        self.balance_interval = interval;
        self
    }

    pub fn with_ticket_growth(mut self, growth: TicketGrowth) -> Self {
        self.ticket_growth = growth;
        self
    }

    pub fn with_default_quantum(mut self, quantum: Duration) -> Self {
        self.default_quantum = quantum;
        self
    }
}
