//! Event handling
//!
//! Turns an inbound event into the pipeline it asks for:
//! - router: dispatch table from event type to handler
//! - refs: release tag / other tag / branch classification for pushes
//! - comment: command parsing for issue comments

pub mod comment;
pub mod refs;
pub mod router;

use thiserror::Error;

use crate::service::CheckError;

/// Errors raised while interpreting an event
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("event payload is missing {0}")]
    MissingField(&'static str),
}

/// Errors raised while dispatching an event
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error("pipeline failed: {0}")]
    Pipeline(#[from] CheckError),
}

pub use router::{EventRouter, Handler};
