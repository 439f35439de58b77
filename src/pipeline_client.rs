use async_trait::async_trait;

use crate::error::RelayResult;
use crate::pipeline::{Pipeline, PipelineRun, PipelineScope, RunParameters};

#[async_trait]
pub trait PipelineClient: Send + Sync {
    async fn list_pipelines(&self, scope: &PipelineScope) -> RelayResult<Vec<Pipeline>>;

    async fn run_pipeline(
        &self,
        scope: &PipelineScope,
        pipeline_id: u64,
        parameters: &RunParameters,
    ) -> RelayResult<PipelineRun>;
}
