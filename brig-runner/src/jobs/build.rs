//! Build and release recipes

use brig_core::domain::job::Job;
use brig_core::domain::project::Project;

use super::npm;

/// Default image for project builds
pub const BUILD_IMAGE: &str = "node:12.3.1-stretch";

/// Installs, compiles, tests and audits the project mounted at `/src`
pub fn build_job(project: &Project, image: &str) -> Job {
    Job::new(format!("{}-build", project.short_name()), image).with_tasks([
        "cd /src",
        "yarn install",
        "yarn compile",
        "yarn test",
        "yarn audit",
    ])
}

/// Builds the project, then publishes it to npm at `version`
///
/// Starts from a copy of the build job's tasks. The npm token comes from the
/// project's `npmToken` secret; without it the publish step fails the job.
pub fn release_job(project: &Project, image: &str, version: &str) -> Job {
    let mut job = build_job(project, image)
        .derive(format!("{}-release", project.short_name()))
        .append_tasks(npm::publish_tasks())
        .with_env("VERSION", version)
        .with_env("WORKSPACE", "/src");

    if let Some(token) = project.secret("npmToken") {
        job = job.with_env("NPM_TOKEN", token);
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_job() {
        let job = build_job(&Project::new("brigadecore/brigade-utils"), BUILD_IMAGE);

        assert_eq!(job.name, "brigade-utils-build");
        assert_eq!(job.image, BUILD_IMAGE);
        assert_eq!(job.tasks.first().map(String::as_str), Some("cd /src"));
        assert_eq!(job.tasks.len(), 5);
    }

    #[test]
    fn test_release_job_copies_build_tasks() {
        let project = Project::new("org/lib").with_secret("npmToken", "s3cret");
        let build = build_job(&project, BUILD_IMAGE);
        let release = release_job(&project, BUILD_IMAGE, "1.2.3");

        assert_eq!(release.name, "lib-release");
        assert_eq!(&release.tasks[..build.tasks.len()], build.tasks.as_slice());
        assert_eq!(release.tasks.last().map(String::as_str), Some("npm publish"));
        assert_eq!(release.env["VERSION"], "1.2.3");
        assert_eq!(release.env["NPM_TOKEN"], "s3cret");
        assert_eq!(build.tasks.len(), 5);
    }

    #[test]
    fn test_release_job_without_token() {
        let release = release_job(&Project::new("org/lib"), BUILD_IMAGE, "2.0.0");
        assert!(!release.env.contains_key("NPM_TOKEN"));
    }
}
