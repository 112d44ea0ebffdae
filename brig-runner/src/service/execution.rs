//! Job execution seam
//!
//! The worker never runs shell tasks itself. Every job, including the
//! short-lived reporting jobs a notification sends, is handed to a
//! `JobExecutor`.

use async_trait::async_trait;
use brig_core::domain::job::{Job, JobOutput};
use brig_core::error::JobError;

/// Service trait for running jobs in isolated containers
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Runs a job to completion
    ///
    /// Schedules exactly one container. Fails with `JobError::Execution`
    /// when a task exits non-zero, the job times out, or it cannot start.
    async fn run(&self, job: &Job) -> Result<JobOutput, JobError>;

    /// Returns the captured output of the job's last run
    ///
    /// Fails with `JobError::LogsUnavailable` when nothing was captured,
    /// e.g. the container was never scheduled.
    async fn logs(&self, job: &Job) -> Result<String, JobError>;
}
