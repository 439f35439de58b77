mod azure;
mod github;

use std::sync::Arc;

pub use azure::AzureEventDispatcher;
pub use github::GithubEventDispatcher;

use crate::error::{RelayError, RelayResult};
use crate::pipeline::{find_pipeline, PipelineRun, PipelineScope, RunParameters};
use crate::pipeline_client::PipelineClient;

/// Looks up the target pipeline by name and queues a run of it.
pub struct Dispatcher {
    client: Arc<dyn PipelineClient>,
    pipeline_name: String,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn PipelineClient>, pipeline_name: &str) -> Self {
        Self {
            client,
            pipeline_name: pipeline_name.to_string(),
        }
    }

    /// Failures are logged here with an `error_kind` field so operators can tell
    /// a missing pipeline apart from an unreachable service.
    pub async fn dispatch(
        &self,
        scope: &PipelineScope,
        parameters: &RunParameters,
    ) -> RelayResult<PipelineRun> {
        let result = self.run_named_pipeline(scope, parameters).await;

        if let Err(e) = &result {
            tracing::error!(error_kind = e.kind(), "Pipeline dispatch failed: {e}");
        }

        result
    }

    async fn run_named_pipeline(
        &self,
        scope: &PipelineScope,
        parameters: &RunParameters,
    ) -> RelayResult<PipelineRun> {
        let pipelines = self.client.list_pipelines(scope).await?;
        tracing::debug!("Found {} pipelines", pipelines.len());

        let Some(pipeline) = find_pipeline(&pipelines, &self.pipeline_name) else {
            return Err(RelayError::PipelineNotFound {
                name: self.pipeline_name.clone(),
                project: scope.project.clone(),
            });
        };

        tracing::debug!(
            pipeline_id = pipeline.id,
            folder = pipeline.folder.as_deref(),
            revision = pipeline.revision,
            "Queueing {} with {} variables",
            pipeline.name,
            parameters.len()
        );

        let run = self
            .client
            .run_pipeline(scope, pipeline.id, parameters)
            .await?;

        tracing::info!(
            pipeline_id = pipeline.id,
            run_id = run.id,
            run_name = run.name.as_deref(),
            state = run.state.as_deref(),
            url = run.url.as_deref(),
            "Pipeline run started with ID: {}",
            run.id
        );

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline_client::fake::FakePipelineClient;

    fn scope() -> PipelineScope {
        PipelineScope::new("https://dev.azure.com/acme", "widgets")
    }

    #[tokio::test]
    async fn runs_first_pipeline_with_matching_name() {
        let client = Arc::new(FakePipelineClient::with_pipelines(&[
            (3, "build"),
            (5, "digger"),
            (8, "digger"),
        ]));
        let dispatcher = Dispatcher::new(client.clone(), "digger");
        let parameters = RunParameters::new().variable("A", "b");

        let run = dispatcher.dispatch(&scope(), &parameters).await.unwrap();

        assert_eq!(run.id, 1001);
        let runs = client.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].pipeline_id, 5);
        assert_eq!(runs[0].scope, scope());
        assert_eq!(runs[0].parameters, parameters);
    }

    #[tokio::test]
    async fn missing_pipeline_triggers_nothing() {
        let client = Arc::new(FakePipelineClient::with_pipelines(&[(3, "build")]));
        let dispatcher = Dispatcher::new(client.clone(), "digger");

        let err = dispatcher
            .dispatch(&scope(), &RunParameters::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RelayError::PipelineNotFound { ref name, ref project } if name == "digger" && project == "widgets"
        ));
        assert_eq!(client.listed(), vec![scope()]);
        assert!(client.runs().is_empty());
    }

    #[tokio::test]
    async fn pipeline_name_is_configurable() {
        let client = Arc::new(FakePipelineClient::with_pipelines(&[
            (5, "digger"),
            (6, "excavator"),
        ]));
        let dispatcher = Dispatcher::new(client.clone(), "excavator");

        dispatcher
            .dispatch(&scope(), &RunParameters::new())
            .await
            .unwrap();

        assert_eq!(client.runs()[0].pipeline_id, 6);
    }

    #[tokio::test]
    async fn listing_failure_is_not_reported_as_missing_pipeline() {
        let client = Arc::new(FakePipelineClient::unreachable());
        let dispatcher = Dispatcher::new(client.clone(), "digger");

        let err = dispatcher
            .dispatch(&scope(), &RunParameters::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "transport_failure");
        assert!(client.runs().is_empty());
    }

    #[tokio::test]
    async fn run_failure_is_a_transport_failure() {
        let client = Arc::new(FakePipelineClient::failing_runs(&[(5, "digger")]));
        let dispatcher = Dispatcher::new(client.clone(), "digger");

        let err = dispatcher
            .dispatch(&scope(), &RunParameters::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RelayError::DispatchTransportFailure { status: Some(500), .. }
        ));
        assert_eq!(client.runs()[0].pipeline_id, 5);
    }
}
