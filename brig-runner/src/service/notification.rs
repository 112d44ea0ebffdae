//! Check run notifications
//!
//! A `Notification` mirrors one GitHub check run. Every `send()` launches a
//! short-lived reporting job whose environment carries the full snapshot;
//! `wrap()` brackets a job run with an in-progress report and a terminal one.
//!
//! The terminal report is best effort: if it cannot be sent, the job's own
//! outcome is still what the caller gets back.

use brig_core::domain::check::Conclusion;
use brig_core::domain::event::Event;
use brig_core::domain::job::{Job, JobOutput};
use brig_core::error::JobError;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::execution::JobExecutor;

/// Image of the job that posts check runs to GitHub
pub const NOTIFICATION_JOB_IMAGE: &str = "brigadecore/brigade-github-check-run:v0.1.0";

/// Hard ceiling the Checks API puts on `text`, in characters
pub const MAX_TEXT_LENGTH: usize = 65535;

/// Ceiling on the encoded size of `text`
///
/// The text reaches the reporter as one environment string, and the kernel
/// refuses any single exec string over 128 KiB.
pub const MAX_TEXT_BYTES: usize = 120 * 1024;

/// Prepended to text that was cut down to `MAX_TEXT_LENGTH`
pub const TRUNCATION_MARKER: &str = "(Previous text omitted)\n";

/// Errors surfaced by `Notification::wrap` and `Notification::send`
#[derive(Debug, Error)]
pub enum CheckError {
    /// The wrapped job failed; the failure was reported when possible
    #[error(transparent)]
    Job(#[from] JobError),

    /// A reporting job could not be run
    #[error("failed to send notification {name} #{count}: {source}")]
    Send {
        name: String,
        count: u32,
        source: JobError,
    },
}

impl CheckError {
    /// The job failure behind this error, if any
    pub fn job_error(&self) -> Option<&JobError> {
        match self {
            CheckError::Job(err) => Some(err),
            CheckError::Send { .. } => None,
        }
    }
}

/// Keeps the last characters of `text` so that the result fits `budget`
///
/// Text within budget is returned unchanged. Longer text loses its head and
/// gains `TRUNCATION_MARKER`; marker and tail together are exactly `budget`
/// characters long.
pub fn truncate_text(text: &str, budget: usize) -> String {
    truncate_to(text, budget, usize::MAX)
}

/// Like `truncate_text`, also keeping the result within `max_bytes` of UTF-8
fn truncate_to(text: &str, budget: usize, max_bytes: usize) -> String {
    let len = text.chars().count();
    if len <= budget && text.len() <= max_bytes {
        return text.to_string();
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    let (marker, keep, byte_room) = if budget <= marker_len {
        ("", budget, max_bytes)
    } else {
        (
            TRUNCATION_MARKER,
            budget - marker_len,
            max_bytes.saturating_sub(TRUNCATION_MARKER.len()),
        )
    };

    let mut start = text.len();
    for (kept, (idx, _)) in text.char_indices().rev().enumerate() {
        if kept == keep || text.len() - idx > byte_room {
            break;
        }
        start = idx;
    }

    let mut truncated = String::with_capacity(marker.len() + text.len() - start);
    truncated.push_str(marker);
    truncated.push_str(&text[start..]);
    truncated
}

/// State of one check run
#[derive(Debug, Clone)]
pub struct Notification {
    pub name: String,
    pub external_id: String,
    /// Raw event payload, forwarded to the reporter
    pub payload: String,
    pub title: String,
    pub summary: String,
    pub text: String,
    pub details_url: String,
    pub conclusion: Conclusion,
    /// Image of the reporting job
    pub image: String,

    /// Number of sends so far; also suffixes reporting job names
    count: u32,
}

impl Notification {
    /// Creates a notification for the given check name
    ///
    /// # Arguments
    /// * `name` - Check run name, usually the name of the job being wrapped
    /// * `event` - Event that triggered the build
    /// * `details_url` - URL shown in the GitHub UI next to the check
    /// * `image` - Reporting job image, defaults to `NOTIFICATION_JOB_IMAGE`
    pub fn new(
        name: impl Into<String>,
        event: &Event,
        details_url: Option<&str>,
        image: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            external_id: event.build_id.clone(),
            payload: event.payload.clone(),
            title: "running check".to_string(),
            summary: String::new(),
            text: String::new(),
            details_url: details_url.unwrap_or_default().to_string(),
            conclusion: Conclusion::InProgress,
            image: image.unwrap_or(NOTIFICATION_JOB_IMAGE).to_string(),
            count: 0,
        }
    }

    /// Number of sends performed so far
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Sets `text`, truncated to `MAX_TEXT_LENGTH` and `MAX_TEXT_BYTES`
    pub fn set_text(&mut self, text: impl AsRef<str>) {
        self.text = truncate_to(text.as_ref(), MAX_TEXT_LENGTH, MAX_TEXT_BYTES);
    }

    /// Builds the reporting job for send number `count`
    fn reporting_job(&self, count: u32) -> Job {
        let mut job = Job::new(format!("{}-{}", self.name, count), &self.image)
            .with_env("CHECK_CONCLUSION", self.conclusion.as_str())
            .with_env("CHECK_NAME", &self.name)
            .with_env("CHECK_TITLE", &self.title)
            .with_env("CHECK_PAYLOAD", &self.payload)
            .with_env("CHECK_SUMMARY", &self.summary)
            .with_env("CHECK_TEXT", &self.text)
            .with_env("CHECK_DETAILS_URL", &self.details_url)
            .with_env("CHECK_EXTERNAL_ID", &self.external_id);
        job.image_force_pull = true;
        job
    }

    /// Reports the current state
    ///
    /// Bumps the send count first, so a failed send still consumes its
    /// number and the next reporting job never reuses a name.
    pub async fn send(&mut self, executor: &dyn JobExecutor) -> Result<JobOutput, CheckError> {
        self.count += 1;
        let count = self.count;
        let job = self.reporting_job(count);

        if self.conclusion.is_terminal() {
            info!(
                "Reporting {} for check {} (#{})",
                self.conclusion, self.name, count
            );
        } else {
            debug!("Sending notification {} #{} (in progress)", self.name, count);
        }

        executor.run(&job).await.map_err(|source| CheckError::Send {
            name: self.name.clone(),
            count,
            source,
        })
    }

    /// Runs `job` between an in-progress and a terminal report
    ///
    /// A failing first send aborts before the job runs and leaves the
    /// conclusion at `InProgress`; that is the only way `wrap` returns with
    /// an open check. After a job failure the logs are fetched best effort.
    /// A failed terminal send is logged and never replaces the job's own
    /// result.
    pub async fn wrap(
        &mut self,
        job: &Job,
        executor: &dyn JobExecutor,
    ) -> Result<JobOutput, CheckError> {
        self.conclusion = Conclusion::InProgress;
        self.send(executor).await?;

        info!("Running job {}", job.name);

        match executor.run(job).await {
            Ok(output) => {
                info!("Job {} passed", job.name);
                self.conclusion = Conclusion::Success;
                self.summary = format!("Task \"{}\" passed", job.name);
                self.set_text(format!("```{}```\nTest Complete", output));
                if let Err(send_err) = self.send(executor).await {
                    error!("failed to send notification: {}", send_err);
                }
                Ok(output)
            }
            Err(err) => {
                if err.is_timeout() {
                    warn!("Job {} timed out: {}", job.name, err);
                } else {
                    warn!("Job {} failed: {}", job.name, err);
                }

                let logs = match executor.logs(job).await {
                    Ok(logs) => logs,
                    Err(e) => {
                        warn!("Could not fetch logs for job {}: {}", job.name, e);
                        String::new()
                    }
                };

                self.conclusion = Conclusion::Failure;
                self.summary = format!(
                    "Task \"{}\" failed for {}",
                    job.name,
                    err.build_id().unwrap_or(self.external_id.as_str())
                );
                self.set_text(format!("```{}```\nFailed with error: {}", logs, err));

                if let Err(send_err) = self.send(executor).await {
                    error!("failed to send notification: {}", send_err);
                    error!("original error: {}", err);
                }

                Err(CheckError::Job(err))
            }
        }
    }
}
