//! Inbound event types

use serde::{Deserialize, Serialize};

/// An event delivered by the trigger source
///
/// Read-only to the worker. `payload` is the source-specific JSON document,
/// still encoded as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event type, e.g. `push` or `check_suite:requested`
    #[serde(rename = "type")]
    pub event_type: String,

    /// Git revision the event refers to
    #[serde(default)]
    pub revision: Option<Revision>,

    /// Identifier of the build this event started
    #[serde(rename = "buildID", default)]
    pub build_id: String,

    /// JSON-encoded payload
    #[serde(default)]
    pub payload: String,
}

/// Git revision attached to an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    #[serde(rename = "ref", default)]
    pub git_ref: String,

    #[serde(default)]
    pub commit: String,
}

impl Event {
    /// Creates an event of the given type with an empty payload
    pub fn new(event_type: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            revision: None,
            build_id: build_id.into(),
            payload: String::new(),
        }
    }

    /// Attaches a revision
    pub fn with_revision(mut self, git_ref: impl Into<String>, commit: impl Into<String>) -> Self {
        self.revision = Some(Revision {
            git_ref: git_ref.into(),
            commit: commit.into(),
        });
        self
    }

    /// Attaches a JSON payload
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// The git ref of the revision, or an empty string when there is none
    pub fn git_ref(&self) -> &str {
        self.revision
            .as_ref()
            .map(|r| r.git_ref.as_str())
            .unwrap_or_default()
    }

    /// Decodes the payload as JSON
    pub fn payload_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}
