//! Event router
//!
//! The dispatch table is built once at startup and never mutated after it
//! is handed to the worker. Handlers only build pipelines; running them is
//! the router's job.

use brig_core::domain::event::Event;
use brig_core::domain::job::JobOutput;
use brig_core::domain::project::Project;
use std::collections::HashMap;
use tracing::info;

use super::comment::handle_issue_comment;
use super::refs::{RELEASE_TAG_PATTERN, RefKind, classify};
use super::{DispatchError, EventError};
use crate::jobs::Recipes;
use crate::scheduler::{Pipeline, PipelineContext};

/// Builds the pipeline for an event, or `None` when nothing should run
pub type Handler = fn(&Event, &Project, &Recipes) -> Result<Option<Pipeline>, EventError>;

/// Dispatch table keyed by event type
pub struct EventRouter {
    handlers: HashMap<String, Handler>,
    recipes: Recipes,
}

impl EventRouter {
    /// Creates a router with no handlers
    pub fn new(recipes: Recipes) -> Self {
        Self {
            handlers: HashMap::new(),
            recipes,
        }
    }

    /// Creates a router with the standard handlers
    ///
    /// - `check_suite:requested` / `check_suite:rerequested`: build job
    /// - `issue_comment:created` / `issue_comment:edited`: build job on `/brig run`
    /// - `push`: release pipeline for release tags, CI pipeline for branches
    pub fn standard(recipes: Recipes) -> Self {
        Self::new(recipes)
            .on("check_suite:requested", check_suite)
            .on("check_suite:rerequested", check_suite)
            .on("issue_comment:created", issue_comment)
            .on("issue_comment:edited", issue_comment)
            .on("push", push)
    }

    /// Registers a handler, replacing any previous one for the event type
    pub fn on(mut self, event_type: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(event_type.into(), handler);
        self
    }

    pub fn handles(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Builds the pipeline for an event
    ///
    /// Event types without a handler are logged and yield `Ok(None)`.
    pub fn route(&self, event: &Event, project: &Project) -> Result<Option<Pipeline>, EventError> {
        match self.handlers.get(&event.event_type) {
            Some(handler) => handler(event, project, &self.recipes),
            None => {
                info!("Ignoring unhandled event type: {}", event.event_type);
                Ok(None)
            }
        }
    }

    /// Routes the context's event and runs the resulting pipeline
    ///
    /// Returns `Ok(None)` when the event needs no pipeline.
    pub async fn dispatch(
        &self,
        ctx: &PipelineContext,
    ) -> Result<Option<Vec<JobOutput>>, DispatchError> {
        let Some(pipeline) = self.route(&ctx.event, &ctx.project)? else {
            return Ok(None);
        };

        info!(
            "Running {} job(s) for {} event (build {})",
            pipeline.jobs().len(),
            ctx.event.event_type,
            ctx.event.build_id
        );

        let outputs = pipeline.run(ctx).await?;
        Ok(Some(outputs))
    }
}

/// Runs the standard build job as a check
pub fn check_suite(
    _event: &Event,
    project: &Project,
    recipes: &Recipes,
) -> Result<Option<Pipeline>, EventError> {
    Ok(Some(Pipeline::Job(recipes.build(project))))
}

/// Runs the check suite when the comment asks for it
pub fn issue_comment(
    event: &Event,
    project: &Project,
    recipes: &Recipes,
) -> Result<Option<Pipeline>, EventError> {
    handle_issue_comment(event, project, |e, p| check_suite(e, p, recipes))
}

/// Releases on release tags, builds on branch pushes, skips other tags
pub fn push(
    event: &Event,
    project: &Project,
    recipes: &Recipes,
) -> Result<Option<Pipeline>, EventError> {
    let git_ref = event.git_ref();

    match classify(git_ref) {
        RefKind::Release { version } => {
            info!("Releasing version {} from {}", version, git_ref);
            Ok(Some(recipes.release_pipeline(project, &version)))
        }
        RefKind::OtherTag => {
            info!(
                "Ref {} does not match release pattern {}; skipping",
                git_ref, RELEASE_TAG_PATTERN
            );
            Ok(None)
        }
        RefKind::Branch => Ok(Some(recipes.ci_pipeline(project))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::{FakeExecutor, Outcome};
    use std::sync::Arc;

    fn router() -> EventRouter {
        EventRouter::standard(Recipes::default())
    }

    fn project() -> Project {
        Project::new("org/lib").with_secret("npmToken", "t")
    }

    fn push_event(git_ref: &str) -> Event {
        Event::new("push", "build-9").with_revision(git_ref, "f00d")
    }

    fn comment_event(event_type: &str, body: &str) -> Event {
        let payload = serde_json::json!({ "body": { "comment": { "body": body } } });
        Event::new(event_type, "build-3").with_payload(payload.to_string())
    }

    fn job_names(pipeline: &Pipeline) -> Vec<String> {
        pipeline.jobs().iter().map(|j| j.name.clone()).collect()
    }

    #[test]
    fn test_standard_table() {
        let router = router();
        for t in [
            "check_suite:requested",
            "check_suite:rerequested",
            "issue_comment:created",
            "issue_comment:edited",
            "push",
        ] {
            assert!(router.handles(t), "missing handler for {}", t);
        }
        assert!(!router.handles("pull_request:opened"));
    }

    #[test]
    fn test_check_suite_builds() {
        for t in ["check_suite:requested", "check_suite:rerequested"] {
            let pipeline = router()
                .route(&Event::new(t, "b"), &project())
                .unwrap()
                .unwrap();
            assert_eq!(pipeline, Pipeline::Job(Recipes::default().build(&project())));
        }
    }

    #[test]
    fn test_release_tag_routes_to_sequential_release() {
        let pipeline = router()
            .route(&push_event("refs/tags/v1.2.3"), &project())
            .unwrap()
            .unwrap();

        assert!(matches!(pipeline, Pipeline::Each(_)));
        assert_eq!(job_names(&pipeline), vec!["lib-build", "lib-release"]);
        assert_eq!(pipeline.jobs()[1].env["VERSION"], "1.2.3");
    }

    #[test]
    fn test_other_tag_runs_nothing() {
        let pipeline = router()
            .route(&push_event("refs/tags/latest"), &project())
            .unwrap();
        assert!(pipeline.is_none());
    }

    #[test]
    fn test_branch_push_routes_to_parallel_ci() {
        let pipeline = router()
            .route(&push_event("refs/heads/main"), &project())
            .unwrap()
            .unwrap();

        assert!(matches!(pipeline, Pipeline::All(_)));
        assert_eq!(job_names(&pipeline), vec!["lib-build", "lib-e2e"]);
    }

    #[test]
    fn test_comment_commands() {
        for t in ["issue_comment:created", "issue_comment:edited"] {
            let run = router()
                .route(&comment_event(t, "  /brig run  "), &project())
                .unwrap();
            assert_eq!(job_names(&run.unwrap()), vec!["lib-build"]);

            let rerun = router()
                .route(&comment_event(t, "/brig rerun"), &project())
                .unwrap();
            assert!(rerun.is_none());
        }
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let routed = router()
            .route(&Event::new("deployment", "b"), &project())
            .unwrap();
        assert!(routed.is_none());
    }

    #[test]
    fn test_malformed_comment_is_an_error() {
        let event = Event::new("issue_comment:created", "b").with_payload("not json");
        assert!(router().route(&event, &project()).is_err());
    }

    #[test]
    fn test_custom_handler_replaces_standard() {
        fn nothing(_: &Event, _: &Project, _: &Recipes) -> Result<Option<Pipeline>, EventError> {
            Ok(None)
        }

        let router = router().on("push", nothing);
        let routed = router
            .route(&push_event("refs/heads/main"), &project())
            .unwrap();
        assert!(routed.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_release_stops_when_build_fails() {
        let executor = Arc::new(FakeExecutor::new().script(
            "lib-build",
            Outcome::Fail {
                code: 1,
                logs: Some("tests failed".to_string()),
            },
        ));
        let ctx = PipelineContext::new(push_event("refs/tags/v2.0.0"), project(), executor.clone());

        let err = router().dispatch(&ctx).await.unwrap_err();

        assert!(matches!(err, DispatchError::Pipeline(_)));
        assert!(executor.ran("lib-build"));
        assert!(!executor.ran("lib-release"));
    }

    #[tokio::test]
    async fn test_dispatch_skipped_tag_runs_no_jobs() {
        let executor = Arc::new(FakeExecutor::new());
        let ctx =
            PipelineContext::new(push_event("refs/tags/nightly"), project(), executor.clone());

        let outputs = router().dispatch(&ctx).await.unwrap();

        assert!(outputs.is_none());
        assert!(executor.runs().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_check_suite_reports_check() {
        let executor = Arc::new(
            FakeExecutor::new().script("lib-build", Outcome::Succeed("ok".to_string())),
        );
        let event =
            Event::new("check_suite:requested", "build-5").with_revision("refs/heads/pr", "abc");
        let ctx = PipelineContext::new(event, project(), executor.clone())
            .with_details_url("https://ci.example.com/5")
            .with_notification_image("reporter:test");

        let outputs = router().dispatch(&ctx).await.unwrap().unwrap();

        assert_eq!(outputs.len(), 1);
        let sent = executor.notifications("lib-build");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1]["CHECK_CONCLUSION"], "success");
        assert_eq!(sent[1]["CHECK_DETAILS_URL"], "https://ci.example.com/5");
        assert_eq!(sent[1]["CHECK_EXTERNAL_ID"], "build-5");
        assert!(executor.runs().iter().any(|j| j.image == "reporter:test"));
    }
}
