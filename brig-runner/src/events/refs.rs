//! Ref classification for push events

use regex::Regex;
use std::sync::LazyLock;

/// Official release tags: `refs/tags/v<dotted numbers>[-<suffix>]`
pub const RELEASE_TAG_PATTERN: &str = r"^refs/tags/v([0-9]+(?:\.[0-9]+)*(?:-.+)?)$";

static RELEASE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RELEASE_TAG_PATTERN).expect("constant regex pattern is valid"));

/// What a pushed ref asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefKind {
    /// A release tag; carries the version without the leading `v`
    Release { version: String },
    /// A tag that is not a release tag; nothing runs
    OtherTag,
    /// Anything else, e.g. a push to the default branch
    Branch,
}

/// Classifies a pushed ref
pub fn classify(git_ref: &str) -> RefKind {
    if let Some(caps) = RELEASE_TAG.captures(git_ref) {
        return RefKind::Release {
            version: caps[1].to_string(),
        };
    }

    if git_ref.starts_with("refs/tags") {
        RefKind::OtherTag
    } else {
        RefKind::Branch
    }
}
