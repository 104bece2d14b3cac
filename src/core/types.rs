/*!
 * Core Types
 * Common types used across the scheduler
 */

/// Opaque process handle, stable for the process's lifetime in the table
pub type Pid = u32;

/// Queue level: lower value = more urgent, scheduled sooner
pub type Priority = u8;

/// Lottery weight held by one process
pub type Tickets = u32;

/// Common result type for policy operations
pub type SchedResult<T> = Result<T, crate::core::errors::SchedError>;
