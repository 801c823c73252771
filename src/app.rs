//! Application wiring: one backend, one session store, one event bus.

use std::sync::Arc;

use anyhow::{Context, Result};
use pondwatch_client::{
    AuthEvents, FileSessionStore, HttpApi, MonitoringApi, SessionManager, SessionStore,
};
use pondwatch_types::Locale;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::MonitorConfig;
use crate::data::DashboardStateStore;
use crate::monitor::Monitor;

/// The assembled pipeline.
///
/// Holds the expiry listener for its lifetime, so an unauthorized response
/// from any call clears the session while the app is alive.
#[derive(Debug)]
pub struct App {
    locale: Locale,
    store: Arc<dyn SessionStore>,
    monitor: Monitor,
    expiry: JoinHandle<()>,
}

impl App {
    /// Connect to the configured backend with a file-backed session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let store: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::open(&config.session.store_path));
        let events = AuthEvents::new();

        let api = HttpApi::builder()
            .base_url(config.api.base_url.clone())
            .timeout(config.api.timeout())
            .store(store.clone())
            .events(events.clone())
            .locale(config.locale)
            .build()
            .context("Failed to create backend client")?;

        debug!(
            "Using backend {} with session file {}",
            api.base_url(),
            config.session.store_path.display()
        );

        Ok(Self::new(config, Arc::new(api), store, events))
    }

    /// Assemble the pipeline around an existing backend and store.
    pub fn new(
        config: &MonitorConfig,
        api: Arc<dyn MonitoringApi>,
        store: Arc<dyn SessionStore>,
        events: AuthEvents,
    ) -> Self {
        let sessions = Arc::new(
            SessionManager::new(api.clone(), store.clone(), events).with_locale(config.locale),
        );
        let expiry = sessions.spawn_expiry_listener();
        let dashboard = Arc::new(DashboardStateStore::new(api, config.locale));
        let monitor = Monitor::new(sessions, dashboard, config.polling);

        Self {
            locale: config.locale,
            store,
            monitor,
            expiry,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        self.monitor.sessions()
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.expiry.abort();
    }
}
