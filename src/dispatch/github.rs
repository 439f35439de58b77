use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use super::Dispatcher;
use crate::config::GithubSettings;
use crate::error::{RelayError, RelayResult};
use crate::pipeline::{PipelineRun, PipelineScope, RunParameters};
use crate::webhook_payloads::github::{GithubEventType, GithubWebhookPayload};

const CONTEXT_VARIABLE: &str = "GITHUB_CONTEXT";
const OWNER_VARIABLE: &str = "GITHUB_REPO_OWNER";
const TOKEN_VARIABLE: &str = "GITHUB_TOKEN";

/// Normalized view of a GitHub delivery, forwarded to the pipeline as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubContext {
    pub event: Value,
    pub event_name: String,
    pub repository: String,
    pub repository_owner: String,
}

/// Relays GitHub `issue_comment` and `pull_request` deliveries.
pub struct GithubEventDispatcher {
    dispatcher: Arc<Dispatcher>,
    settings: GithubSettings,
}

impl GithubEventDispatcher {
    pub fn new(dispatcher: Arc<Dispatcher>, settings: GithubSettings) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }

    pub async fn handle(
        &self,
        event_header: Option<&str>,
        body: &[u8],
    ) -> RelayResult<PipelineRun> {
        let event_type = GithubEventType::from_header(event_header)?;

        let event: Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::malformed(format!("body is not JSON: {e}")))?;
        let payload = GithubWebhookPayload::from_event(&event)?;
        let (owner, repo_name) = payload.repository.owner_and_name()?;
        let (owner, repo_name) = (owner.to_string(), repo_name.to_string());

        let span = tracing::info_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            source = "github",
            event_type = %event_type,
            project = %repo_name,
        );

        let context = GithubContext {
            event,
            event_name: event_type.to_string(),
            repository: payload.repository.full_name.clone(),
            repository_owner: owner.clone(),
        };
        let context_json = serde_json::to_string(&context)
            .map_err(|e| RelayError::malformed(format!("github context: {e}")))?;

        async move {
            tracing::info!(
                action = payload.action.as_deref().unwrap_or("none"),
                "Dispatching github event"
            );

            let scope = PipelineScope::new(self.settings.organization_url.as_str(), repo_name);
            let parameters = RunParameters::new()
                .variable(CONTEXT_VARIABLE, context_json)
                .variable(OWNER_VARIABLE, owner)
                .secret(TOKEN_VARIABLE, self.settings.github_token.as_str());

            self.dispatcher.dispatch(&scope, &parameters).await
        }
        .instrument(span)
        .await
    }
}
