use serde::Deserialize;
use serde_json::Value;

use super::GithubRepository;
use crate::error::{RelayError, RelayResult};

/// The fields the relay reads from an `issue_comment` or `pull_request` delivery.
#[derive(Deserialize, Clone, Debug)]
pub struct GithubWebhookPayload {
    #[serde(default)]
    pub action: Option<String>,
    pub repository: GithubRepository,
}

impl GithubWebhookPayload {
    pub fn from_event(event: &Value) -> RelayResult<Self> {
        Self::deserialize(event)
            .map_err(|e| RelayError::malformed(format!("github event: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_repository_and_action() {
        let event = json!({
            "action": "opened",
            "number": 12,
            "repository": { "full_name": "acme/widgets", "default_branch": "main" }
        });

        let payload = GithubWebhookPayload::from_event(&event).unwrap();

        assert_eq!(payload.action.as_deref(), Some("opened"));
        assert_eq!(payload.repository.full_name, "acme/widgets");
    }

    #[test]
    fn missing_full_name_is_malformed() {
        let event = json!({ "action": "created", "repository": { "name": "widgets" } });

        let err = GithubWebhookPayload::from_event(&event).unwrap_err();

        assert_eq!(err.kind(), "malformed_payload");
    }
}
