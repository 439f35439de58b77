use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;

use crate::error::{RelayError, RelayResult};
use crate::pipeline::{Pipeline, PipelineRun, PipelineScope, RunParameters};
use crate::pipeline_client::PipelineClient;

const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";
const MAX_PAGES: usize = 100;
const USER_AGENT: &str = concat!("digger-relay/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct PipelineList {
    #[serde(default)]
    value: Vec<Pipeline>,
}

/// Azure DevOps Pipelines REST client, authenticated with a personal access token.
pub struct AzureDevOpsClient {
    client: reqwest::Client,
    personal_access_token: String,
    api_version: String,
}

impl AzureDevOpsClient {
    pub fn new(personal_access_token: &str, api_version: &str) -> RelayResult<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            personal_access_token: personal_access_token.to_string(),
            api_version: api_version.to_string(),
        })
    }

    fn pipelines_url(&self, scope: &PipelineScope, suffix: &[&str]) -> RelayResult<Url> {
        let invalid = || {
            RelayError::malformed(format!(
                "invalid organization url {}",
                scope.organization_url
            ))
        };

        let mut url = Url::parse(&scope.organization_url).map_err(|_| invalid())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments.pop_if_empty();
            segments.push(&scope.project);
            segments.extend(["_apis", "pipelines"]);
            segments.extend(suffix);
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);

        Ok(url)
    }
}

async fn ensure_success(response: Response) -> RelayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(512).collect();

    Err(RelayError::transport(Some(status.as_u16()), message))
}

#[async_trait]
impl PipelineClient for AzureDevOpsClient {
    async fn list_pipelines(&self, scope: &PipelineScope) -> RelayResult<Vec<Pipeline>> {
        let mut pipelines = Vec::new();
        let mut continuation: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        for page in 1.. {
            if page > MAX_PAGES {
                return Err(RelayError::transport(
                    None,
                    format!("pipeline list exceeded {MAX_PAGES} pages"),
                ));
            }

            let mut url = self.pipelines_url(scope, &[])?;
            if let Some(token) = &continuation {
                url.query_pairs_mut().append_pair("continuationToken", token);
            }

            tracing::debug!(project = %scope.project, page, "Listing pipelines");

            let response = self
                .client
                .get(url)
                .basic_auth("", Some(&self.personal_access_token))
                .send()
                .await?;
            let response = ensure_success(response).await?;

            continuation = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let list: PipelineList = response.json().await?;
            pipelines.extend(list.value);

            match &continuation {
                None => break,
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    return Err(RelayError::transport(
                        None,
                        format!("pipeline list repeated continuation token {token}"),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(pipelines)
    }

    async fn run_pipeline(
        &self,
        scope: &PipelineScope,
        pipeline_id: u64,
        parameters: &RunParameters,
    ) -> RelayResult<PipelineRun> {
        let id = pipeline_id.to_string();
        let url = self.pipelines_url(scope, &[id.as_str(), "runs"])?;

        tracing::debug!(project = %scope.project, pipeline_id, "Queueing pipeline run");

        let response = self
            .client
            .post(url)
            .basic_auth("", Some(&self.personal_access_token))
            .json(parameters)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.json().await?)
    }
}
