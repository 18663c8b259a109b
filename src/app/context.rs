use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::store::MemoryStore;
use crate::sync::{Endpoints, Reconciler};

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub endpoints: Endpoints,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.remote)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let endpoints = Endpoints::from_config(&config.remote);
        Self {
            config,
            fetcher,
            endpoints,
        }
    }

    /// A reconciler over `store`, sized from the configuration.
    pub fn reconciler(&self, store: Arc<MemoryStore>) -> Reconciler<MemoryStore> {
        Reconciler::new(self.fetcher.clone(), store, self.endpoints.clone())
            .with_page_size(self.config.remote.page_size)
            .with_workers(self.config.sync.effective_workers())
    }
}
