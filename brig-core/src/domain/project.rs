//! Project configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Project the event belongs to
///
/// Supplies the repository name and the secrets job builders inject into
/// job environments. Never mutated by the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "repoName", alias = "repo_name")]
    pub repo_name: String,

    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

impl Project {
    pub fn new(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            secrets: HashMap::new(),
        }
    }

    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), value.into());
        self
    }

    /// Looks up a secret by key
    pub fn secret(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(String::as_str)
    }

    /// Short project name used to prefix job names
    ///
    /// `brigadecore/brigade-utils` becomes `brigade-utils`.
    pub fn short_name(&self) -> &str {
        self.repo_name
            .rsplit('/')
            .next()
            .unwrap_or(self.repo_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(
            Project::new("brigadecore/brigade-utils").short_name(),
            "brigade-utils"
        );
        assert_eq!(Project::new("standalone").short_name(), "standalone");
    }

    #[test]
    fn test_project_from_json() {
        let project: Project = serde_json::from_str(
            r#"{"repoName": "org/repo", "secrets": {"npmToken": "t0k3n"}}"#,
        )
        .unwrap();
        assert_eq!(project.repo_name, "org/repo");
        assert_eq!(project.secret("npmToken"), Some("t0k3n"));
        assert_eq!(project.secret("missing"), None);
    }
}
