//! npm release recipe

use brig_core::domain::job::Job;

/// Image used by standalone release jobs
pub const NPM_RELEASE_IMAGE: &str = "brigadecore/npm-release:edge";

/// Shell tasks that publish the package in `$WORKSPACE` at `$VERSION`
///
/// Fails early when `NPM_TOKEN` or `VERSION` is missing from the job env.
pub fn publish_tasks() -> Vec<String> {
    vec![
        concat!(
            "if [ -z \"$NPM_TOKEN\" ]; then ",
            "echo 'NPM_TOKEN for npm release must be provided via job environment' && exit 1 ; ",
            "fi ; ",
            "if [ -z \"$VERSION\" ]; then ",
            "echo 'VERSION for npm release must be provided via job environment' && exit 1 ; ",
            "fi"
        )
        .to_string(),
        "cd ${WORKSPACE}".to_string(),
        "echo '//registry.npmjs.org/:_authToken=${NPM_TOKEN}' > .npmrc".to_string(),
        "npm version --no-git-tag-version --allow-same-version \"$VERSION\"".to_string(),
        "npm publish".to_string(),
    ]
}

/// Standalone release job
///
/// Callers supply `NPM_TOKEN`, `VERSION` and `WORKSPACE` through the env.
pub fn npm_release_job(name: impl Into<String>, image: Option<&str>) -> Job {
    Job::new(name, image.unwrap_or(NPM_RELEASE_IMAGE)).with_tasks(publish_tasks())
}
