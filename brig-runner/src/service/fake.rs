//! Fake executor for testing

use async_trait::async_trait;
use brig_core::domain::job::{Job, JobOutput};
use brig_core::error::{Exit, JobError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::execution::JobExecutor;

/// Scripted outcome for a job name
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed(String),
    Fail { code: i32, logs: Option<String> },
}

/// Recorded call to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorCall {
    Run { name: String },
    Logs { name: String },
}

#[derive(Default)]
struct FakeState {
    outcomes: HashMap<String, Outcome>,
    calls: Vec<ExecutorCall>,
    runs: Vec<Job>,
}

/// Executor that records every call and replays scripted outcomes
///
/// Jobs without a scripted outcome succeed with empty output.
#[derive(Default)]
pub struct FakeExecutor {
    state: Mutex<FakeState>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, name: &str, outcome: Outcome) -> Self {
        self.state
            .lock()
            .unwrap()
            .outcomes
            .insert(name.to_string(), outcome);
        self
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Jobs passed to `run`, in call order
    pub fn runs(&self) -> Vec<Job> {
        self.state.lock().unwrap().runs.clone()
    }

    pub fn ran(&self, name: &str) -> bool {
        self.runs().iter().any(|j| j.name == name)
    }

    /// Env of every reporting job sent for the named check, in send order
    pub fn notifications(&self, check: &str) -> Vec<BTreeMap<String, String>> {
        self.runs()
            .into_iter()
            .filter(|j| j.env.get("CHECK_NAME").map(String::as_str) == Some(check))
            .map(|j| j.env)
            .collect()
    }
}

#[async_trait]
impl JobExecutor for FakeExecutor {
    async fn run(&self, job: &Job) -> Result<JobOutput, JobError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ExecutorCall::Run {
            name: job.name.clone(),
        });
        state.runs.push(job.clone());

        match state.outcomes.get(&job.name) {
            Some(Outcome::Fail { code, .. }) => Err(JobError::execution(
                &job.name,
                "fake-build",
                Exit::Code(*code),
            )),
            Some(Outcome::Succeed(output)) => Ok(JobOutput::new(output.clone())),
            None => Ok(JobOutput::new("")),
        }
    }

    async fn logs(&self, job: &Job) -> Result<String, JobError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ExecutorCall::Logs {
            name: job.name.clone(),
        });

        match state.outcomes.get(&job.name) {
            Some(Outcome::Fail {
                logs: Some(logs), ..
            }) => Ok(logs.clone()),
            Some(Outcome::Succeed(output)) => Ok(output.clone()),
            _ => Err(JobError::logs_unavailable(&job.name, "no logs captured")),
        }
    }
}
