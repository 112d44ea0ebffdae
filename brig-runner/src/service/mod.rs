//! Service layer
//!
//! Services wrap job execution: the executor seam that actually runs jobs,
//! and the check/notification state machine that reports them.
//!
//! The executor is trait-based to enable testing and dependency injection.

mod check;
mod execution;
mod notification;

#[cfg(test)]
pub(crate) mod fake;

// Re-export traits
pub use execution::JobExecutor;

// Re-export implementations
pub use check::Check;
pub use notification::{
    CheckError, MAX_TEXT_BYTES, MAX_TEXT_LENGTH, NOTIFICATION_JOB_IMAGE, Notification,
    TRUNCATION_MARKER, truncate_text,
};
