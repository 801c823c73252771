//! The mounted dashboard view: two polling schedules gated on the session.

use std::sync::Arc;

use parking_lot::Mutex;
use pondwatch_client::{AuthEvent, ClientError, CurrentUser, SessionManager};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::PollingConfig;
use crate::data::DashboardStateStore;
use crate::scheduler::PollingScheduler;

/// Task id of the latest-reading and history refresh.
pub const DASHBOARD_TASK: &str = "dashboard";
/// Task id of the notification refresh.
pub const NOTIFICATIONS_TASK: &str = "notifications";

/// Keeps the dashboard fresh while mounted and a session exists.
///
/// Polling stops on [`Monitor::unmount`], on [`Monitor::logout`], on drop,
/// and as soon as the session is cleared from anywhere.
#[derive(Debug)]
pub struct Monitor {
    sessions: Arc<SessionManager>,
    dashboard: Arc<DashboardStateStore>,
    scheduler: Arc<PollingScheduler>,
    polling: PollingConfig,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Monitor {
    pub fn new(
        sessions: Arc<SessionManager>,
        dashboard: Arc<DashboardStateStore>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            sessions,
            dashboard,
            scheduler: Arc::new(PollingScheduler::new()),
            polling,
            watcher: Mutex::new(None),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn dashboard(&self) -> &Arc<DashboardStateStore> {
        &self.dashboard
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.scheduler
    }

    /// Start both schedules.
    ///
    /// Returns `false` without scheduling anything when no session is
    /// stored; the caller should send the user to login. Mounting again
    /// restarts the schedules.
    pub fn mount(&self) -> bool {
        if !self.sessions.is_authenticated() {
            info!("No session, not mounting the dashboard");
            return false;
        }

        // Subscribe before scheduling so a clear caused by the first run is seen.
        let mut events = self.sessions.events().subscribe();
        let scheduler = self.scheduler.clone();
        let dashboard = self.dashboard.clone();
        let watcher = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SessionCleared { reason }) => {
                        info!("Session cleared ({:?}), stopping polling", reason);
                        scheduler.cancel_all();
                        dashboard.reset();
                        break;
                    }
                    Ok(AuthEvent::Unauthorized { .. }) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Session watcher lagged by {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        if let Some(previous) = self.watcher.lock().replace(watcher) {
            previous.abort();
        }

        let dashboard = self.dashboard.clone();
        self.scheduler.schedule(
            DASHBOARD_TASK,
            move || {
                let dashboard = dashboard.clone();
                async move { dashboard.refresh().await }
            },
            self.polling.dashboard_interval(),
        );

        let dashboard = self.dashboard.clone();
        self.scheduler.schedule(
            NOTIFICATIONS_TASK,
            move || {
                let dashboard = dashboard.clone();
                async move { dashboard.refresh_notifications().await }
            },
            self.polling.notifications_interval(),
        );

        info!(
            "Dashboard mounted (data every {:?}, notifications every {:?})",
            self.polling.dashboard_interval(),
            self.polling.notifications_interval()
        );
        true
    }

    /// Stop polling. Safe to call when not mounted.
    pub fn unmount(&self) {
        self.scheduler.cancel_all();
        if let Some(watcher) = self.watcher.lock().take() {
            watcher.abort();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.scheduler.is_scheduled(DASHBOARD_TASK)
    }

    /// Refresh the dashboard now, outside the schedule.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.dashboard.refresh().await
    }

    /// Resolve the current user, as on every navigation.
    pub async fn navigate(&self) -> Option<CurrentUser> {
        self.sessions.on_navigate().await
    }

    /// Stop polling, then end the session.
    pub async fn logout(&self) {
        self.unmount();
        self.sessions.logout().await;
        self.dashboard.reset();
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.unmount();
    }
}
