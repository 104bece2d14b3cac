/*!
 * Observability
 * Structured events emitted at every scheduling state transition
 */

mod collector;
pub mod events;

pub use collector::Collector;
pub use events::{Event, Payload, QueueChangeReason, Severity};
