//! Job recipes
//!
//! Pure builders: each returns a fully populated `Job`. Recipes that build
//! on another start from a copy of its tasks and append their own.

mod acr;
mod build;
mod kind;
mod npm;
mod o365;
mod slack;

pub use acr::{AZURE_CLI_IMAGE, AcrBuild, acr_build_job};
pub use build::{BUILD_IMAGE, build_job, release_job};
pub use kind::{DEFAULT_KUBERNETES_VERSION, KIND_JOB_IMAGE, KIND_TIMEOUT_MS, kind_job};
pub use npm::{NPM_RELEASE_IMAGE, npm_release_job, publish_tasks};
pub use o365::{O365_NOTIFY_IMAGE, o365_job};
pub use slack::{DEFAULT_SLACK_COLOR, SLACK_NOTIFY_IMAGE, SlackMessage, slack_job};

use brig_core::domain::job::Job;
use brig_core::domain::project::Project;

use crate::scheduler::Pipeline;

/// Images and versions the event handlers build jobs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipes {
    pub build_image: String,
    pub kind_image: String,
    pub kubernetes_version: String,
    /// Task appended to the kind bootstrap for end-to-end tests
    pub e2e_task: String,
}

impl Default for Recipes {
    fn default() -> Self {
        Self {
            build_image: BUILD_IMAGE.to_string(),
            kind_image: KIND_JOB_IMAGE.to_string(),
            kubernetes_version: DEFAULT_KUBERNETES_VERSION.to_string(),
            e2e_task: "cd /src && make e2e".to_string(),
        }
    }
}

impl Recipes {
    /// The standard build job
    pub fn build(&self, project: &Project) -> Job {
        build_job(project, &self.build_image)
    }

    /// End-to-end tests against a fresh kind cluster
    pub fn e2e(&self, project: &Project) -> Job {
        kind_job(
            format!("{}-e2e", project.short_name()),
            Some(&self.kind_image),
            Some(&self.kubernetes_version),
        )
        .append_tasks([self.e2e_task.as_str()])
    }

    /// Build, then publish: the publish never runs if the build fails
    pub fn release_pipeline(&self, project: &Project, version: &str) -> Pipeline {
        Pipeline::each([
            self.build(project),
            release_job(project, &self.build_image, version),
        ])
    }

    /// Build and end-to-end tests side by side
    pub fn ci_pipeline(&self, project: &Project) -> Pipeline {
        Pipeline::all([self.build(project), self.e2e(project)])
    }
}
