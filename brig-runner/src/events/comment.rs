//! Issue comment commands

use brig_core::domain::event::Event;
use brig_core::domain::project::Project;
use tracing::info;

use super::EventError;

/// Comment that re-runs the default check suite
pub const RUN_COMMAND: &str = "/brig run";

/// Commands recognised in issue comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
}

impl Command {
    /// Matches a comment body, ignoring surrounding whitespace
    pub fn parse(body: &str) -> Option<Self> {
        match body.trim() {
            RUN_COMMAND => Some(Command::Run),
            _ => None,
        }
    }
}

/// Extracts the comment body from an `issue_comment` payload
///
/// The gateway wraps the GitHub webhook under `body`, so the comment text
/// lives at `body.comment.body`.
pub fn comment_body(event: &Event) -> Result<String, EventError> {
    let payload = event.payload_json()?;
    payload
        .pointer("/body/comment/body")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(EventError::MissingField("body.comment.body"))
}

/// Parses an issue comment and calls `handle` when it holds a command
///
/// Comments without a command are logged and yield `Ok(None)`.
pub fn handle_issue_comment<T, F>(
    event: &Event,
    project: &Project,
    handle: F,
) -> Result<Option<T>, EventError>
where
    F: FnOnce(&Event, &Project) -> Result<Option<T>, EventError>,
{
    info!("Handling issue comment");
    let body = comment_body(event)?;

    match Command::parse(&body) {
        Some(Command::Run) => handle(event, project),
        None => {
            info!("No applicable action found for comment: {}", body.trim());
            Ok(None)
        }
    }
}
