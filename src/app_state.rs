use std::sync::Arc;

use crate::config::RelayConfig;
use crate::dispatch::{AzureEventDispatcher, Dispatcher, GithubEventDispatcher};
use crate::pipeline_client::PipelineClient;

pub struct AppState {
    azure: Option<AzureEventDispatcher>,
    github: Option<GithubEventDispatcher>,
}

impl AppState {
    pub fn new(config: &RelayConfig, client: Arc<dyn PipelineClient>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(client, &config.pipeline_name));

        let azure = config
            .azure
            .clone()
            .map(|settings| AzureEventDispatcher::new(dispatcher.clone(), settings));
        let github = config
            .github
            .clone()
            .map(|settings| GithubEventDispatcher::new(dispatcher.clone(), settings));

        Self { azure, github }
    }

    pub fn azure(&self) -> Option<&AzureEventDispatcher> {
        self.azure.as_ref()
    }

    pub fn github(&self) -> Option<&GithubEventDispatcher> {
        self.github.as_ref()
    }
}
