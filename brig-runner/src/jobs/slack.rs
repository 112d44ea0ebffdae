//! Slack notification recipe

use brig_core::domain::job::Job;

/// Image that posts to a Slack incoming webhook
pub const SLACK_NOTIFY_IMAGE: &str = "technosophos/slack-notify:latest";

/// Attachment colour used when none is given
pub const DEFAULT_SLACK_COLOR: &str = "#00ff00";

/// Message posted by `slack_job`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackMessage {
    pub title: String,
    pub message: String,
    /// Incoming webhook URL, best kept in a project secret
    pub webhook: String,
    pub username: String,
    pub color: Option<String>,
}

/// Job named `<name>-slack-notify` that posts `message` once
pub fn slack_job(name: &str, message: &SlackMessage, image: Option<&str>) -> Job {
    Job::new(
        format!("{}-slack-notify", name),
        image.unwrap_or(SLACK_NOTIFY_IMAGE),
    )
    .with_env("SLACK_WEBHOOK", &message.webhook)
    .with_env("SLACK_USERNAME", &message.username)
    .with_env("SLACK_TITLE", &message.title)
    .with_env("SLACK_MESSAGE", &message.message)
    .with_env(
        "SLACK_COLOR",
        message.color.as_deref().unwrap_or(DEFAULT_SLACK_COLOR),
    )
    .with_tasks(["/slack-notify"])
}
