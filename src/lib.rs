/*!
 * Lottery Scheduling Policy Core
 * Hybrid multilevel-feedback-queue / proportional-share policy engine
 *
 * Decides which process runs next and for how long (priority level plus
 * time quantum) and pushes every decision to an external executor through
 * the commit interface. The executor, transport, and timer hardware are
 * collaborators behind traits; this crate owns only the policy.
 */

pub mod core;
pub mod exec;
pub mod monitoring;
pub mod random;
pub mod sched;

// Re-exports
pub use crate::core::config::{SchedConfig, TicketGrowth};
pub use crate::core::errors::{ExecutorError, SchedError};
pub use crate::core::types::{Pid, Priority, SchedResult, Tickets};
pub use exec::{Executor, LoggingExecutor};
pub use monitoring::{Collector, Event, Payload, Severity};
pub use random::{RandomSource, StdRandom};
pub use sched::{
    AdmissionMode, BalancerCommand, BalancerTask, DrawOutcome, ProcessStats, SchedStats,
    Scheduler, StartRequest,
};
