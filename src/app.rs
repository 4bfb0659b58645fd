//! Composition root wiring the session core together.
//!
//! One `App` per application lifetime owns the single credential store,
//! interceptor, API client, and session service instance. There are no
//! ambient globals; collaborators (router, toasts) are injected.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::api::ApiClient;
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::hooks::{Navigator, Notifier};
use crate::interceptor::RequestInterceptor;
use crate::service::SessionService;

pub struct App {
    config: Config,
    session: SessionService,
}

impl App {
    pub fn new(
        config: Config,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let session_file = config.session_file()?;
        debug!(path = %session_file.display(), "Using session file");

        let store = Arc::new(CredentialStore::new(session_file));
        let interceptor = RequestInterceptor::new(store.clone(), navigator);
        let api = ApiClient::new(&config, interceptor).context("Failed to build API client")?;
        let session = SessionService::new(store, api, notifier);

        Ok(Self { config, session })
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
