//! Brig Runner
//!
//! Reacts to one repository event and runs the pipeline it asks for,
//! reporting every job as a GitHub check run.
//!
//! Architecture:
//! - Events: routing table, push ref classification, comment commands
//! - Jobs: pure recipes for build, release and kind jobs
//! - Scheduler: parallel (`All`) and sequential (`Each`) composition
//! - Services: the executor seam and the check/notification state machine
//! - Podman: the executor the binary runs jobs with

pub mod config;
pub mod events;
pub mod jobs;
pub mod podman;
pub mod scheduler;
pub mod service;

pub use config::Config;
pub use events::{DispatchError, EventError, EventRouter};
pub use podman::PodmanExecutor;
pub use scheduler::{Pipeline, PipelineContext};
pub use service::{Check, CheckError, JobExecutor, Notification};
