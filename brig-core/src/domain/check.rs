//! Check run domain types

/// Conclusion of a check run, as accepted by the GitHub Checks API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    /// The run has started but not finished
    InProgress,
    Success,
    Failure,
    Neutral,
    Cancelled,
    TimedOut,
}

impl Conclusion {
    /// Wire value handed to the reporting job
    ///
    /// In-progress is the empty string; the reporter reads that as
    /// status `in_progress`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::InProgress => "",
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Neutral => "neutral",
            Conclusion::Cancelled => "cancelled",
            Conclusion::TimedOut => "timed_out",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Conclusion::InProgress)
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conclusion::InProgress => write!(f, "in_progress"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(Conclusion::InProgress.as_str(), "");
        assert_eq!(Conclusion::Success.as_str(), "success");
        assert_eq!(Conclusion::Failure.as_str(), "failure");
        assert_eq!(Conclusion::Neutral.as_str(), "neutral");
        assert_eq!(Conclusion::Cancelled.as_str(), "cancelled");
        assert_eq!(Conclusion::TimedOut.as_str(), "timed_out");
    }

    #[test]
    fn test_only_in_progress_is_open() {
        assert!(!Conclusion::InProgress.is_terminal());
        assert!(Conclusion::Failure.is_terminal());
        assert_eq!(Conclusion::InProgress.to_string(), "in_progress");
    }
}
