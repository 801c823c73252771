//! # pondwatch
//!
//! The monitoring pipeline behind the pond dashboard: session-gated polling,
//! notification aggregation and the published dashboard state.
//!
//! ## Architecture
//!
//! - [`Monitor`] mounts two schedules on a [`PollingScheduler`]: the
//!   dashboard refresh and the notification refresh, each with its own
//!   cadence. Polling stops when the session is cleared.
//! - [`DashboardStateStore`] owns the [`DashboardSnapshot`] and publishes it
//!   through a `watch` channel.
//! - [`NotificationFeed`] classifies raw readings into warnings and keeps
//!   the newest few for display.
//!
//! Backend access and session handling live in `pondwatch-client`; the
//! reading schema and thresholds live in `pondwatch-types`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pondwatch::{App, MonitorConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = MonitorConfig::load(None)?;
//! let app = App::from_config(&config)?;
//!
//! if app.monitor().mount() {
//!     let mut snapshots = app.monitor().dashboard().subscribe();
//!     snapshots.changed().await?;
//!     println!("{} unread", snapshots.borrow().notifications.unread);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod logging;
pub mod monitor;
pub mod report;
pub mod scheduler;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::{MonitorConfig, PollingConfig};
pub use data::{
    DashboardSnapshot, DashboardStateStore, ErrorInfo, History, Notification, NotificationFeed,
    Severity,
};
pub use monitor::{Monitor, DASHBOARD_TASK, NOTIFICATIONS_TASK};
pub use scheduler::PollingScheduler;
