//! Brig Core
//!
//! Core types for the Brig event-driven CI/CD worker.
//!
//! This crate contains:
//! - Domain types: inbound events, project configuration, jobs and check conclusions
//! - Errors: the failure taxonomy shared by executors and the check state machine

pub mod domain;
pub mod error;

pub use error::{Exit, JobError};
