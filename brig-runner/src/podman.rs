//! Podman job executor
//!
//! Runs each job in a fresh `podman run --rm` container:
//! - Tasks are joined into one `set -e` shell script, so the first failing
//!   task stops the rest
//! - The project source is mounted at `/src`
//! - Host-path volumes are refused unless the runner allows host mounts
//! - The job timeout is enforced here; a timed out container is removed
//! - Env values travel in podman's own environment and only the names go on
//!   the command line, so secrets never show up in process listings

use anyhow::Context;
use async_trait::async_trait;
use brig_core::domain::job::{Job, JobOutput, VolumeSource};
use brig_core::error::{Exit, JobError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::service::JobExecutor;

/// Exit status podman uses when it could not run the container at all
const PODMAN_LAUNCH_FAILURE: i32 = 125;

/// Executor backed by the podman CLI
pub struct PodmanExecutor {
    podman: String,
    source_dir: PathBuf,
    allow_host_mounts: bool,
    build_id: String,

    /// Captured output of the last run, by job name
    logs: Mutex<HashMap<String, String>>,
}

impl PodmanExecutor {
    /// Creates an executor for the jobs of one build
    pub fn new(config: &Config, build_id: impl Into<String>) -> Self {
        Self {
            podman: config.podman.clone(),
            source_dir: config.source_dir.clone(),
            allow_host_mounts: config.allow_host_mounts,
            build_id: build_id.into(),
            logs: Mutex::new(HashMap::new()),
        }
    }

    /// Checks that podman is installed and working
    pub async fn check_available(&self) -> anyhow::Result<()> {
        let output = Command::new(&self.podman)
            .arg("--version")
            .output()
            .await
            .with_context(|| {
                format!(
                    "Failed to execute '{} --version'. Is podman installed?",
                    self.podman
                )
            })?;

        if !output.status.success() {
            anyhow::bail!("Podman is not working correctly");
        }

        let version = String::from_utf8_lossy(&output.stdout);
        info!("Podman is available: {}", version.trim());
        Ok(())
    }

    /// Shell script running the job's tasks in order
    fn script(job: &Job) -> Option<String> {
        if job.tasks.is_empty() {
            return None;
        }
        Some(format!("set -e\n{}", job.tasks.join("\n")))
    }

    /// Arguments for `podman run`
    fn run_args(&self, job: &Job, container_name: &str) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container_name.to_string(),
            "-v".to_string(),
            format!("{}:/src", self.source_dir.display()),
        ];

        if job.privileged {
            args.push("--privileged".to_string());
        }

        if job.image_force_pull {
            args.push("--pull=always".to_string());
        }

        // values are read from podman's environment, see `run`
        for key in job.env.keys() {
            args.push("-e".to_string());
            args.push(key.clone());
        }

        for volume in &job.volumes {
            args.push("-v".to_string());
            let spec = match &volume.source {
                VolumeSource::HostPath { path } => format!("{}:{}", path, volume.mount_path),
                // anonymous volume, removed with the container
                VolumeSource::EmptyDir => volume.mount_path.clone(),
            };
            if volume.read_only {
                args.push(format!("{}:ro", spec));
            } else {
                args.push(spec);
            }
        }

        match Self::script(job) {
            Some(script) => {
                args.push("--entrypoint".to_string());
                args.push("/bin/sh".to_string());
                args.push(job.image.clone());
                args.push("-c".to_string());
                args.push(script);
            }
            None => args.push(job.image.clone()),
        }

        args
    }

    /// Unique container name for one run of a job
    fn container_name(job: &Job) -> String {
        let name: String = job
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect();
        format!("brig-{}-{}", name, Uuid::new_v4().simple())
    }

    fn failure(&self, job: &Job, exit: Exit) -> JobError {
        JobError::execution(&job.name, &self.build_id, exit)
    }

    fn store_logs(&self, job: &Job, logs: String) {
        if let Ok(mut captured) = self.logs.lock() {
            captured.insert(job.name.clone(), logs);
        }
    }

    /// Force-removes a container, ignoring errors if it is already gone
    async fn remove_container(&self, container_name: &str) {
        let result = Command::new(&self.podman)
            .args(["rm", "-f", container_name])
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                debug!("Container {} removed", container_name);
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!("Failed to remove container {}: {}", container_name, stderr.trim());
            }
            Err(e) => warn!("Failed to remove container {}: {}", container_name, e),
        }
    }
}

#[async_trait]
impl JobExecutor for PodmanExecutor {
    async fn run(&self, job: &Job) -> Result<JobOutput, JobError> {
        if job.needs_host_mounts() && !self.allow_host_mounts {
            return Err(self.failure(
                job,
                Exit::Rejected("host mounts are not allowed for this runner".to_string()),
            ));
        }

        let container_name = Self::container_name(job);
        let started_at = chrono::Utc::now();
        info!(
            "Starting container {} for job {} (image: {})",
            container_name, job.name, job.image
        );

        let child = Command::new(&self.podman)
            .args(self.run_args(job, &container_name))
            .envs(&job.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(job, Exit::Launch(e.to_string())))?;

        let timeout = Duration::from_millis(job.timeout_ms);
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(self.failure(job, Exit::Launch(e.to_string()))),
            Err(_) => {
                warn!(
                    "Job {} timed out after {}ms, removing container {}",
                    job.name, job.timeout_ms, container_name
                );
                self.remove_container(&container_name).await;
                return Err(self.failure(
                    job,
                    Exit::TimedOut {
                        after_ms: job.timeout_ms,
                    },
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        self.store_logs(job, format!("{}{}", stdout, stderr));

        if output.status.success() {
            debug!(
                "Job {} completed: stdout_len={}, stderr_len={}",
                job.name,
                stdout.len(),
                stderr.len()
            );
            return Ok(JobOutput {
                output: stdout,
                started_at,
                completed_at: chrono::Utc::now(),
            });
        }

        let exit = match output.status.code() {
            Some(PODMAN_LAUNCH_FAILURE) => Exit::Launch(stderr.trim().to_string()),
            Some(code) => Exit::Code(code),
            None => Exit::Launch("terminated by signal".to_string()),
        };
        debug!("Job {} failed: {}", job.name, exit);
        Err(self.failure(job, exit))
    }

    async fn logs(&self, job: &Job) -> Result<String, JobError> {
        let captured = self
            .logs
            .lock()
            .map_err(|e| JobError::logs_unavailable(&job.name, e.to_string()))?;

        captured
            .get(&job.name)
            .cloned()
            .ok_or_else(|| JobError::logs_unavailable(&job.name, "job has not run"))
    }
}
