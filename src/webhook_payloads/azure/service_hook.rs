use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RelayError, RelayResult};

/// The parts of an Azure DevOps service-hook notification the relay routes on.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AzureServiceHookPayload {
    #[serde(default)]
    pub event_type: Option<String>,
    pub resource: AzureResource,
    pub resource_containers: AzureResourceContainers,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AzureResource {
    #[serde(default)]
    pub repository: Option<AzureRepository>,
    #[serde(default)]
    pub source_ref_name: Option<String>,
    #[serde(default)]
    pub pull_request: Option<AzurePullRequest>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AzurePullRequest {
    pub repository: AzureRepository,
    pub source_ref_name: String,
}

#[derive(Deserialize, Debug)]
pub struct AzureRepository {
    pub project: AzureProject,
}

#[derive(Deserialize, Debug)]
pub struct AzureProject {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct AzureResourceContainers {
    pub account: AzureAccount,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AzureAccount {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AzureDispatchTarget {
    pub organization_url: String,
    pub project_name: String,
    pub branch_ref: String,
}

impl AzureServiceHookPayload {
    pub fn from_event(event: &Value) -> RelayResult<Self> {
        Self::deserialize(event)
            .map_err(|e| RelayError::malformed(format!("azure service hook: {e}")))
    }

    /// Resolves project and branch from the push or pull-request resource shape.
    ///
    /// A pull request shape takes precedence when both are present.
    pub fn target(&self) -> RelayResult<AzureDispatchTarget> {
        let resource = &self.resource;
        let (project_name, branch_ref) = match (&resource.pull_request, &resource.repository) {
            (Some(pull_request), _) => (
                pull_request.repository.project.name.clone(),
                pull_request.source_ref_name.clone(),
            ),
            (None, Some(repository)) => {
                let branch_ref = resource.source_ref_name.clone().ok_or_else(|| {
                    RelayError::malformed("resource.sourceRefName is missing")
                })?;
                (repository.project.name.clone(), branch_ref)
            }
            (None, None) => {
                return Err(RelayError::malformed(
                    "resource has neither repository nor pullRequest",
                ))
            }
        };

        let organization_url = self.resource_containers.account.base_url.clone();
        let url = Url::parse(&organization_url).map_err(|e| {
            RelayError::malformed(format!("resourceContainers.account.baseUrl: {e}"))
        })?;
        if !is_azure_devops_host(&url) {
            tracing::warn!(
                host = url.host_str(),
                "Payload names a pipeline service outside Azure DevOps; the access token will be sent to {organization_url}"
            );
        }

        Ok(AzureDispatchTarget {
            organization_url,
            project_name,
            branch_ref,
        })
    }
}

/// Hosted Azure DevOps organizations live on `dev.azure.com` or `*.visualstudio.com`.
fn is_azure_devops_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == "dev.azure.com" || host.ends_with(".visualstudio.com")
        }
        None => false,
    }
}
