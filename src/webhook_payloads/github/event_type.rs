use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// The `X-GitHub-Event` values the relay forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubEventType {
    IssueComment,
    PullRequest,
}

impl GithubEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssueComment => "issue_comment",
            Self::PullRequest => "pull_request",
        }
    }

    pub fn from_header(value: Option<&str>) -> Result<Self, RelayError> {
        match value {
            Some(v) => v.parse(),
            None => Err(RelayError::UnsupportedEventType(None)),
        }
    }
}

impl FromStr for GithubEventType {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue_comment" => Ok(Self::IssueComment),
            "pull_request" => Ok(Self::PullRequest),
            other => Err(RelayError::UnsupportedEventType(Some(other.to_string()))),
        }
    }
}

impl fmt::Display for GithubEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_two_event_types() {
        assert_eq!(
            GithubEventType::from_header(Some("issue_comment")).unwrap(),
            GithubEventType::IssueComment
        );
        assert_eq!(
            GithubEventType::from_header(Some("pull_request")).unwrap(),
            GithubEventType::PullRequest
        );

        for rejected in ["push", "", "Pull_Request", "pull_request_review", "ping"] {
            assert!(
                GithubEventType::from_header(Some(rejected)).is_err(),
                "{rejected}"
            );
        }
    }

    #[test]
    fn absent_header_is_rejected() {
        let err = GithubEventType::from_header(None).unwrap_err();

        assert!(matches!(err, RelayError::UnsupportedEventType(None)));
    }
}
