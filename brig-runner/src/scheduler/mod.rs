//! Pipeline scheduling
//!
//! Arranges jobs into parallel and sequential groups and runs each job
//! as its own check.

mod pipeline;

pub use pipeline::{Pipeline, PipelineContext};
