/*!
 * Core Types and Configuration
 * Shared definitions used across the policy engine
 */

pub mod config;
pub mod errors;
pub mod types;
