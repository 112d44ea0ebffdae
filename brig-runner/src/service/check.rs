//! GitHub checks
//!
//! A `Check` ties a job to the event that triggered it and reports the job's
//! progress as a check run named after the job.

use brig_core::domain::event::{Event, Revision};
use brig_core::domain::job::{Job, JobOutput};
use brig_core::domain::project::Project;
use tracing::info;

use super::execution::JobExecutor;
use super::notification::{CheckError, Notification};

/// A job reported as a check run
#[derive(Debug, Clone)]
pub struct Check {
    pub event: Event,
    pub project: Project,
    pub job: Job,
    pub notification: Notification,
}

impl Check {
    /// Creates a check with a default notification named after the job
    pub fn new(event: Event, project: Project, job: Job) -> Self {
        let notification = Notification::new(job.name.clone(), &event, None, None);
        Self {
            event,
            project,
            job,
            notification,
        }
    }

    /// Replaces the notification used to report this check
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = notification;
        self
    }

    /// Sets the details URL shown next to the check run
    pub fn with_details_url(mut self, details_url: impl Into<String>) -> Self {
        self.notification.details_url = details_url.into();
        self
    }

    /// Runs the job and reports it
    pub async fn run(&mut self, executor: &dyn JobExecutor) -> Result<JobOutput, CheckError> {
        info!(
            "Checking {} for {} (build {})",
            self.job.name, self.project.repo_name, self.event.build_id
        );
        self.notification.title = format!("Run {}", self.job.name);
        if let Some(Revision { commit, .. }) = &self.event.revision {
            self.notification.summary =
                format!("Running {} target for {}", self.job.name, commit);
        }

        self.notification.wrap(&self.job, executor).await
    }
}
