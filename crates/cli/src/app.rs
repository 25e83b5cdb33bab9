use std::sync::Arc;

use anyhow::{Context, Result};
use services::services::{
    api_client::ApiClient,
    endpoints::Endpoints,
    notification::Notifier,
    preferences::PreferenceStore,
    session::Session,
};
use utils::storage::LocalStorage;

use crate::{args::Cli, config::Config, output::ConsoleNotifier};

/// Shared state of one CLI invocation.
pub struct App {
    pub config: Config,
    pub storage: Arc<LocalStorage>,
    pub session: Arc<Session>,
    pub notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?.with_base_url(cli.base_url.clone());

        let storage = match LocalStorage::default_path() {
            Some(path) => LocalStorage::open(&path)
                .with_context(|| format!("failed to open local storage at {}", path.display()))?,
            None => {
                tracing::warn!("no data directory available; settings will not persist");
                LocalStorage::in_memory()
            }
        };
        let storage = Arc::new(storage);
        let session = Arc::new(Session::with_override(storage.clone(), cli.token.clone()));

        Ok(Self {
            config,
            storage,
            session,
            notifier: Arc::new(ConsoleNotifier),
        })
    }

    pub fn client(&self) -> Result<ApiClient> {
        let endpoints = Endpoints::new(&self.config.api.base_url)
            .with_context(|| format!("invalid base URL: {}", self.config.api.base_url))?;
        let client = ApiClient::new(endpoints, self.session.clone(), Some(self.config.timeout()))?;
        Ok(client)
    }

    pub fn preferences(&self) -> PreferenceStore {
        PreferenceStore::load(self.storage.clone())
    }
}
