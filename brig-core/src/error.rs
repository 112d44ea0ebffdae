//! Error types shared by executors and the check state machine

use thiserror::Error;

/// How a job run ended when it did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// A task exited with a non-zero status
    Code(i32),
    /// The job ran past its timeout
    TimedOut { after_ms: u64 },
    /// The executor refused to schedule the job
    Rejected(String),
    /// The container could not be started
    Launch(String),
}

impl std::fmt::Display for Exit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exit::Code(code) => write!(f, "exit code {}", code),
            Exit::TimedOut { after_ms } => write!(f, "timed out after {}ms", after_ms),
            Exit::Rejected(reason) => write!(f, "rejected: {}", reason),
            Exit::Launch(reason) => write!(f, "failed to launch: {}", reason),
        }
    }
}

/// Errors produced when running a job or fetching its logs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    /// The job ran and failed, or never got to run
    #[error("job {job} failed for build {build_id}: {exit}")]
    Execution {
        job: String,
        build_id: String,
        exit: Exit,
    },

    /// The executor has no logs for the job
    #[error("logs unavailable for job {job}: {reason}")]
    LogsUnavailable { job: String, reason: String },
}

impl JobError {
    pub fn execution(job: impl Into<String>, build_id: impl Into<String>, exit: Exit) -> Self {
        Self::Execution {
            job: job.into(),
            build_id: build_id.into(),
            exit,
        }
    }

    pub fn logs_unavailable(job: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LogsUnavailable {
            job: job.into(),
            reason: reason.into(),
        }
    }

    /// Build ID of a failed execution
    pub fn build_id(&self) -> Option<&str> {
        match self {
            Self::Execution { build_id, .. } => Some(build_id),
            Self::LogsUnavailable { .. } => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Execution {
                exit: Exit::TimedOut { .. },
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_message() {
        let err = JobError::execution("proj-build", "01abc", Exit::Code(2));
        assert_eq!(err.to_string(), "job proj-build failed for build 01abc: exit code 2");
        assert_eq!(err.build_id(), Some("01abc"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_detection() {
        let err = JobError::execution("kind", "b", Exit::TimedOut { after_ms: 1000 });
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out after 1000ms"));
    }

    #[test]
    fn test_logs_unavailable_has_no_build() {
        let err = JobError::logs_unavailable("job", "never scheduled");
        assert_eq!(err.build_id(), None);
    }
}
