//! Runner configuration
//!
//! Defines how the runner reports checks and how it hands jobs to podman.

use std::path::PathBuf;

use crate::jobs::{BUILD_IMAGE, Recipes};
use crate::service::NOTIFICATION_JOB_IMAGE;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Image of the job that posts check runs
    pub notification_image: String,

    /// URL shown next to each check run; empty for none
    pub details_url: String,

    /// Host directory mounted at `/src` in every job
    pub source_dir: PathBuf,

    /// Podman binary
    pub podman: String,

    /// Whether jobs may mount host paths
    pub allow_host_mounts: bool,

    /// Image used by build recipes
    pub job_image: String,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Every variable is optional:
    /// - BRIG_NOTIFICATION_IMAGE (default: brigadecore/brigade-github-check-run:v0.1.0)
    /// - BRIG_DETAILS_URL (default: empty)
    /// - BRIG_SOURCE_DIR (default: .)
    /// - BRIG_PODMAN (default: podman)
    /// - BRIG_ALLOW_HOST_MOUNTS (true/false/1/0, default: false)
    /// - BRIG_JOB_IMAGE (default: node:12.3.1-stretch)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let allow_host_mounts = match std::env::var("BRIG_ALLOW_HOST_MOUNTS") {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                anyhow::anyhow!("BRIG_ALLOW_HOST_MOUNTS must be true or false, got '{}'", value)
            })?,
            Err(_) => defaults.allow_host_mounts,
        };

        Ok(Self {
            notification_image: std::env::var("BRIG_NOTIFICATION_IMAGE")
                .unwrap_or(defaults.notification_image),
            details_url: std::env::var("BRIG_DETAILS_URL").unwrap_or(defaults.details_url),
            source_dir: std::env::var("BRIG_SOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_dir),
            podman: std::env::var("BRIG_PODMAN").unwrap_or(defaults.podman),
            allow_host_mounts,
            job_image: std::env::var("BRIG_JOB_IMAGE").unwrap_or(defaults.job_image),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.notification_image.is_empty() {
            anyhow::bail!("notification_image cannot be empty");
        }

        if self.podman.is_empty() {
            anyhow::bail!("podman cannot be empty");
        }

        if self.job_image.is_empty() {
            anyhow::bail!("job_image cannot be empty");
        }

        if !self.details_url.is_empty()
            && !self.details_url.starts_with("http://")
            && !self.details_url.starts_with("https://")
        {
            anyhow::bail!("details_url must start with http:// or https://");
        }

        Ok(())
    }

    /// Recipes the event handlers build jobs from
    pub fn recipes(&self) -> Recipes {
        Recipes {
            build_image: self.job_image.clone(),
            ..Recipes::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notification_image: NOTIFICATION_JOB_IMAGE.to_string(),
            details_url: String::new(),
            source_dir: PathBuf::from("."),
            podman: "podman".to_string(),
            allow_host_mounts: false,
            job_image: BUILD_IMAGE.to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
