use std::sync::Arc;

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use super::Dispatcher;
use crate::config::AzureSettings;
use crate::error::{RelayError, RelayResult};
use crate::pipeline::{PipelineRun, PipelineScope, RunParameters};
use crate::webhook_payloads::azure::AzureServiceHookPayload;

const CONTEXT_VARIABLE: &str = "AZURE_CONTEXT";
const TOKEN_VARIABLE: &str = "AZURE_TOKEN";
const BRANCH_VARIABLE: &str = "checkout_branch_ref";

/// Relays Azure DevOps repository push and pull-request notifications.
pub struct AzureEventDispatcher {
    dispatcher: Arc<Dispatcher>,
    settings: AzureSettings,
}

impl AzureEventDispatcher {
    pub fn new(dispatcher: Arc<Dispatcher>, settings: AzureSettings) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }

    pub async fn handle(&self, body: &[u8]) -> RelayResult<PipelineRun> {
        let event: Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::malformed(format!("body is not JSON: {e}")))?;

        let payload = AzureServiceHookPayload::from_event(&event)?;
        let target = payload.target()?;

        let span = tracing::info_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            source = "azure",
            event_type = payload.event_type.as_deref().unwrap_or("unknown"),
            project = %target.project_name,
        );

        async move {
            tracing::info!(branch_ref = %target.branch_ref, "Dispatching azure event");

            let scope = PipelineScope::new(target.organization_url, target.project_name);
            let parameters = RunParameters::new()
                .variable(CONTEXT_VARIABLE, event.to_string())
                .secret(TOKEN_VARIABLE, self.settings.azure_token.as_str())
                .variable(BRANCH_VARIABLE, target.branch_ref);

            self.dispatcher.dispatch(&scope, &parameters).await
        }
        .instrument(span)
        .await
    }
}
