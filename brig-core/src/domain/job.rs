//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default execution timeout: 15 minutes
pub const DEFAULT_TIMEOUT_MS: u64 = 900_000;

/// A declarative unit of isolated work
///
/// One container image running an ordered list of shell tasks. Tasks run in
/// order inside a single container; the first non-zero exit aborts the rest.
/// Builders produce fully populated jobs; the executor owns scheduling,
/// timeouts and host resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub image: String,
    pub tasks: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub volumes: Vec<VolumeSpec>,
    pub privileged: bool,
    pub timeout_ms: u64,
    /// Always pull the image before running
    pub image_force_pull: bool,
}

impl Job {
    /// Creates an empty job for the given image
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            tasks: Vec::new(),
            env: BTreeMap::new(),
            volumes: Vec::new(),
            privileged: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            image_force_pull: false,
        }
    }

    pub fn with_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    /// Appends tasks after the existing ones
    pub fn append_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks.extend(tasks.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Adds a volume, replacing any existing volume with the same name
    pub fn with_volume(mut self, volume: VolumeSpec) -> Self {
        self.volumes.retain(|v| v.name != volume.name);
        self.volumes.push(volume);
        self
    }

    pub fn privileged(mut self, privileged: bool) -> Self {
        self.privileged = privileged;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Copies this job under a new name
    ///
    /// The copy owns its own task list; appending to it never touches `self`.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        let mut job = self.clone();
        job.name = name.into();
        job
    }

    /// Whether any volume mounts a host path
    pub fn needs_host_mounts(&self) -> bool {
        self.volumes
            .iter()
            .any(|v| matches!(v.source, VolumeSource::HostPath { .. }))
    }
}

/// A volume mounted into the job container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub name: String,
    pub mount_path: String,
    #[serde(default)]
    pub read_only: bool,
    pub source: VolumeSource,
}

/// Where a volume's contents come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    /// A directory on the host
    HostPath { path: String },
    /// Scratch space that lives as long as the container
    EmptyDir,
}

impl VolumeSpec {
    pub fn host_path(
        name: impl Into<String>,
        path: impl Into<String>,
        mount_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            read_only: false,
            source: VolumeSource::HostPath { path: path.into() },
        }
    }

    pub fn empty_dir(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            read_only: false,
            source: VolumeSource::EmptyDir,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Successful result of a job run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    /// Captured standard output
    pub output: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl JobOutput {
    pub fn new(output: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            output: output.into(),
            started_at: now,
            completed_at: now,
        }
    }
}

impl std::fmt::Display for JobOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.output)
    }
}
