use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A pipeline definition as listed by the pipeline service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub revision: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Organization and project a pipeline lookup is scoped to.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineScope {
    pub organization_url: String,
    pub project: String,
}

impl PipelineScope {
    pub fn new(organization_url: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            organization_url: organization_url.into(),
            project: project.into(),
        }
    }
}

/// First pipeline in service order whose name matches exactly.
pub fn find_pipeline<'a>(pipelines: &'a [Pipeline], name: &str) -> Option<&'a Pipeline> {
    pipelines.iter().find(|p| p.name == name)
}

#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub value: String,
    pub is_secret: bool,
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.is_secret {
            "***"
        } else {
            self.value.as_str()
        };

        f.debug_struct("Variable")
            .field("value", &value)
            .field("is_secret", &self.is_secret)
            .finish()
    }
}

/// Variables forwarded to a pipeline run.
///
/// Credentials go through [`RunParameters::secret`], everything else through
/// [`RunParameters::variable`], so a value's secrecy is fixed by how it was added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunParameters {
    variables: BTreeMap<String, Variable>,
}

impl RunParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value.into(), false);
        self
    }

    pub fn secret(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value.into(), true);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn is_secret(&self, name: &str) -> Option<bool> {
        self.variables.get(name).map(|v| v.is_secret)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    fn insert(&mut self, name: &str, value: String, is_secret: bool) {
        self.variables
            .insert(name.to_string(), Variable { value, is_secret });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipeline(id: u64, name: &str) -> Pipeline {
        Pipeline {
            id,
            name: name.to_string(),
            folder: None,
            revision: None,
        }
    }

    #[test]
    fn find_pipeline_returns_first_exact_match() {
        let pipelines = vec![
            pipeline(1, "build"),
            pipeline(2, "digger"),
            pipeline(3, "digger"),
        ];

        assert_eq!(find_pipeline(&pipelines, "digger").map(|p| p.id), Some(2));
        assert!(find_pipeline(&pipelines, "Digger").is_none());
        assert!(find_pipeline(&[], "digger").is_none());
    }

    #[test]
    fn secrecy_follows_the_builder_used() {
        let parameters = RunParameters::new()
            .variable("AZURE_CONTEXT", "{}")
            .secret("AZURE_TOKEN", "t0ken");

        assert_eq!(parameters.is_secret("AZURE_CONTEXT"), Some(false));
        assert_eq!(parameters.is_secret("AZURE_TOKEN"), Some(true));
        assert_eq!(parameters.is_secret("missing"), None);
        assert_eq!(parameters.len(), 2);
    }

    #[test]
    fn serializes_in_pipeline_service_shape() {
        let parameters = RunParameters::new()
            .variable("checkout_branch_ref", "refs/heads/main")
            .secret("AZURE_TOKEN", "t0ken");

        let value = serde_json::to_value(&parameters).unwrap();

        assert_eq!(
            value,
            json!({
                "variables": {
                    "checkout_branch_ref": { "value": "refs/heads/main", "isSecret": false },
                    "AZURE_TOKEN": { "value": "t0ken", "isSecret": true }
                }
            })
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let parameters = RunParameters::new()
            .variable("GITHUB_REPO_OWNER", "acme")
            .secret("GITHUB_TOKEN", "ghp_very_secret");

        let debug = format!("{parameters:?}");

        assert!(debug.contains("acme"));
        assert!(!debug.contains("ghp_very_secret"));
    }
}
