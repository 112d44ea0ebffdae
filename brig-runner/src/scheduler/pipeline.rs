//! Pipeline composition
//!
//! A pipeline is a tree of jobs. Leaves run as checks; `All` starts every
//! member at once and waits for the lot, `Each` runs members in order and
//! stops at the first failure. Nothing is cancelled or retried here.

use brig_core::domain::event::Event;
use brig_core::domain::job::{Job, JobOutput};
use brig_core::domain::project::Project;
use futures::future::{BoxFuture, FutureExt, join_all};
use std::sync::Arc;
use tracing::{info, warn};

use crate::service::{Check, CheckError, JobExecutor, Notification};

/// A composition of jobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pipeline {
    /// A single job, reported as its own check
    Job(Job),
    /// Members run in parallel; fails if any member fails
    All(Vec<Pipeline>),
    /// Members run in order; the first failure stops the sequence
    Each(Vec<Pipeline>),
}

impl Pipeline {
    /// Parallel group of jobs
    pub fn all(jobs: impl IntoIterator<Item = Job>) -> Self {
        Pipeline::All(jobs.into_iter().map(Pipeline::Job).collect())
    }

    /// Sequential, fail-fast group of jobs
    pub fn each(jobs: impl IntoIterator<Item = Job>) -> Self {
        Pipeline::Each(jobs.into_iter().map(Pipeline::Job).collect())
    }

    /// All jobs in the tree, depth first
    pub fn jobs(&self) -> Vec<&Job> {
        match self {
            Pipeline::Job(job) => vec![job],
            Pipeline::All(members) | Pipeline::Each(members) => {
                members.iter().flat_map(Pipeline::jobs).collect()
            }
        }
    }

    /// Runs the pipeline
    ///
    /// Returns the outputs of every job in declaration order, or the first
    /// failure: for `Each` the failure that stopped it, for `All` the
    /// earliest declared member that failed.
    pub fn run<'a>(
        &'a self,
        ctx: &'a PipelineContext,
    ) -> BoxFuture<'a, Result<Vec<JobOutput>, CheckError>> {
        async move {
            match self {
                Pipeline::Job(job) => ctx.run_check(job).await.map(|output| vec![output]),
                Pipeline::All(members) => {
                    let results = join_all(members.iter().map(|m| m.run(ctx))).await;

                    let mut outputs = Vec::new();
                    let mut failure = None;
                    for result in results {
                        match result {
                            Ok(out) => outputs.extend(out),
                            Err(e) if failure.is_none() => failure = Some(e),
                            Err(e) => warn!("Additional failure in parallel group: {}", e),
                        }
                    }

                    match failure {
                        Some(e) => Err(e),
                        None => Ok(outputs),
                    }
                }
                Pipeline::Each(members) => {
                    let mut outputs = Vec::new();
                    for (idx, member) in members.iter().enumerate() {
                        match member.run(ctx).await {
                            Ok(out) => outputs.extend(out),
                            Err(e) => {
                                let skipped = members.len() - idx - 1;
                                if skipped > 0 {
                                    info!("Stopping sequence, {} step(s) not started", skipped);
                                }
                                return Err(e);
                            }
                        }
                    }
                    Ok(outputs)
                }
            }
        }
        .boxed()
    }
}

/// Everything a pipeline needs to run its jobs as checks
#[derive(Clone)]
pub struct PipelineContext {
    pub event: Event,
    pub project: Project,
    executor: Arc<dyn JobExecutor>,
    details_url: Option<String>,
    notification_image: Option<String>,
}

impl PipelineContext {
    pub fn new(event: Event, project: Project, executor: Arc<dyn JobExecutor>) -> Self {
        Self {
            event,
            project,
            executor,
            details_url: None,
            notification_image: None,
        }
    }

    pub fn with_details_url(mut self, details_url: impl Into<String>) -> Self {
        self.details_url = Some(details_url.into());
        self
    }

    pub fn with_notification_image(mut self, image: impl Into<String>) -> Self {
        self.notification_image = Some(image.into());
        self
    }

    /// Builds the check that reports `job`
    pub fn check(&self, job: &Job) -> Check {
        let notification = Notification::new(
            job.name.clone(),
            &self.event,
            self.details_url.as_deref(),
            self.notification_image.as_deref(),
        );
        Check::new(self.event.clone(), self.project.clone(), job.clone())
            .with_notification(notification)
    }

    /// Runs one job inside its own notification cycle
    pub async fn run_check(&self, job: &Job) -> Result<JobOutput, CheckError> {
        let mut check = self.check(job);
        check.run(self.executor.as_ref()).await
    }
}
