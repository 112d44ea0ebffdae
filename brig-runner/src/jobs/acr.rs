//! Azure Container Registry build recipe

use brig_core::domain::job::Job;

/// Image carrying the Azure CLI
pub const AZURE_CLI_IMAGE: &str = "microsoft/azure-cli:latest";

/// An image to build with `az acr build`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcrBuild {
    /// Image name, without tag
    pub image: String,
    pub tag: String,
    /// Build context; the Dockerfile must sit at its root
    pub dir: String,
    /// Registry to log in to and push to
    pub registry: String,
    /// Service principal used for `az login`
    pub username: String,
    pub token: String,
    pub tenant: String,
}

/// Job that logs in with a service principal and builds on ACR
///
/// Credentials go through the job env, so they never appear in the task
/// script itself.
pub fn acr_build_job(name: impl Into<String>, build: &AcrBuild, cli_image: Option<&str>) -> Job {
    let image = format!("{}:{}", build.image, build.tag);
    Job::new(name, cli_image.unwrap_or(AZURE_CLI_IMAGE))
        .with_env("AZURE_USERNAME", &build.username)
        .with_env("AZURE_TOKEN", &build.token)
        .with_env("AZURE_TENANT", &build.tenant)
        .with_tasks([
            concat!(
                "az login --service-principal ",
                "-u \"$AZURE_USERNAME\" -p \"$AZURE_TOKEN\" --tenant \"$AZURE_TENANT\""
            )
            .to_string(),
            format!("cd {}", build.dir),
            format!("echo '========> building {}...'", build.image),
            format!("az acr build -r {} -t {} .", build.registry, image),
            format!("echo '<======== finished building {}.'", build.image),
        ])
}
