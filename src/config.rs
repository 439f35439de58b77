use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use reqwest::Url;
use serde::Deserialize;

use crate::error::{RelayError, Result};

pub const DEFAULT_PIPELINE_NAME: &str = "digger";
pub const DEFAULT_API_VERSION: &str = "7.1";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Non-secret settings that may come from a YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind_address: Option<SocketAddr>,
    pipeline_name: Option<String>,
    api_version: Option<String>,
}

#[derive(Clone)]
pub struct AzureSettings {
    pub azure_token: String,
}

#[derive(Clone)]
pub struct GithubSettings {
    pub github_token: String,
    pub organization_url: String,
}

/// Process-wide configuration, read once at startup.
#[derive(Clone)]
pub struct RelayConfig {
    pub bind_address: SocketAddr,
    pub pipeline_name: String,
    pub api_version: String,
    pub personal_access_token: String,
    pub azure: Option<AzureSettings>,
    pub github: Option<GithubSettings>,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let file = match lookup("RELAY_CONFIG") {
            Some(path) => load_file(Path::new(&path))?,
            None => FileSettings::default(),
        };

        let bind_address = match lookup("RELAY_BIND_ADDRESS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("RELAY_BIND_ADDRESS is not a socket address: {v}"))?,
            None => match file.bind_address {
                Some(v) => v,
                None => DEFAULT_BIND_ADDRESS.parse()?,
            },
        };

        let pipeline_name = lookup("RELAY_PIPELINE_NAME")
            .or(file.pipeline_name)
            .unwrap_or_else(|| DEFAULT_PIPELINE_NAME.to_string());
        let api_version = lookup("RELAY_API_VERSION")
            .or(file.api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let personal_access_token = lookup("AZURE_DEVOPS_EXT_PAT")
            .ok_or(RelayError::MissingConfiguration("AZURE_DEVOPS_EXT_PAT"))?;

        let azure = lookup("AZURE_TOKEN").map(|azure_token| AzureSettings { azure_token });

        let github = match (lookup("GITHUB_TOKEN"), lookup("AZURE_DEVOPS_EXT_ORG_URL")) {
            (Some(github_token), Some(organization_url)) => {
                check_organization_url(&organization_url)?;

                Some(GithubSettings {
                    github_token,
                    organization_url,
                })
            }
            (Some(_), None) => {
                tracing::warn!("GITHUB_TOKEN is set without AZURE_DEVOPS_EXT_ORG_URL");
                None
            }
            _ => None,
        };

        if azure.is_none() && github.is_none() {
            anyhow::bail!(
                "no event source configured: set AZURE_TOKEN and/or GITHUB_TOKEN with AZURE_DEVOPS_EXT_ORG_URL"
            );
        }

        Ok(Self {
            bind_address,
            pipeline_name,
            api_version,
            personal_access_token,
            azure,
            github,
        })
    }
}

/// The organization url is the base every pipeline request path is appended to.
fn check_organization_url(organization_url: &str) -> Result<()> {
    let url = Url::parse(organization_url)
        .with_context(|| format!("AZURE_DEVOPS_EXT_ORG_URL is not a url: {organization_url}"))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("AZURE_DEVOPS_EXT_ORG_URL must be an http(s) base url: {organization_url}");
    }

    Ok(())
}

fn load_file(path: &Path) -> Result<FileSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Can't read config file {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Can't parse config file {}", path.display()))
}
