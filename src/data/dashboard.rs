//! Dashboard state and its publication to the presentation layer.
//!
//! [`DashboardStateStore`] owns the single [`DashboardSnapshot`]. Refreshes
//! replace data wholesale on success and keep the previous data on failure,
//! so a flaky backend never blanks the dashboard. Subscribers get a
//! [`watch::Receiver`] that always holds the latest snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pondwatch_client::{ClientError, ErrorKind, MonitoringApi};
use pondwatch_types::{Locale, ParameterReading, Reading};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::history::History;
use super::notifications::NotificationFeed;

/// A refresh failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Localized retry message.
    pub message: String,
    pub kind: ErrorKind,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub latest: Option<Reading>,
    pub history: History,
    pub notifications: NotificationFeed,
    /// True until the first refresh settles.
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            latest: None,
            history: History::new(),
            notifications: NotificationFeed::default(),
            loading: true,
            error: None,
            last_updated_at: None,
        }
    }
}

impl DashboardSnapshot {
    /// Per-parameter value and status of the latest reading, in display order.
    pub fn latest_statuses(&self) -> Vec<ParameterReading> {
        self.latest
            .as_ref()
            .map(|reading| reading.statuses().collect())
            .unwrap_or_default()
    }
}

/// Holds the dashboard snapshot and refreshes it from the backend.
#[derive(Debug)]
pub struct DashboardStateStore {
    api: Arc<dyn MonitoringApi>,
    locale: Locale,
    state: watch::Sender<DashboardSnapshot>,
}

impl DashboardStateStore {
    pub fn new(api: Arc<dyn MonitoringApi>, locale: Locale) -> Self {
        let (state, _) = watch::channel(DashboardSnapshot::default());
        Self { api, locale, state }
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.state.subscribe()
    }

    /// Fetch the latest reading and the history concurrently.
    ///
    /// Both are replaced only if both calls succeed, and an empty latest
    /// reading never clears the one already shown. On failure the error is
    /// recorded, the previous data stays, and the error is also returned so
    /// the caller can log it.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let (latest, history) = tokio::join!(self.api.latest_reading(), self.api.history());

        match latest.and_then(|latest| history.map(|history| (latest, history))) {
            Ok((latest, history)) => {
                debug!("Dashboard refreshed with {} history readings", history.len());
                self.state.send_modify(|state| {
                    if latest.is_some() {
                        state.latest = latest;
                    }
                    state.history.replace(history);
                    state.loading = false;
                    state.error = None;
                    state.last_updated_at = Some(Utc::now());
                });
                Ok(())
            }
            Err(e) => {
                warn!("Dashboard refresh failed: {}", e);
                let message = match e.kind() {
                    ErrorKind::SessionExpired => self.locale.session_expired(),
                    ErrorKind::Auth | ErrorKind::Network => self.locale.load_failed(),
                };
                let error = ErrorInfo {
                    message: message.to_string(),
                    kind: e.kind(),
                };
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(error);
                });
                Err(e)
            }
        }
    }

    /// Fetch and classify the notification readings.
    ///
    /// A failure keeps the previous notifications and does not touch the
    /// dashboard error.
    pub async fn refresh_notifications(&self) -> Result<(), ClientError> {
        let readings = self.api.notifications().await?;
        let feed = NotificationFeed::aggregate(readings, self.locale);
        debug!(
            "Notifications refreshed: {} total, {} unread",
            feed.total, feed.unread
        );
        self.state.send_modify(|state| state.notifications = feed);
        Ok(())
    }

    /// Drop all data, back to the initial loading state.
    pub fn reset(&self) {
        self.state.send_replace(DashboardSnapshot::default());
    }
}
