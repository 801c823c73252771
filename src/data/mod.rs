//! Dashboard data: the reading history window, notification aggregation and
//! the published dashboard state.

pub mod dashboard;
pub mod history;
pub mod notifications;

pub use dashboard::{DashboardSnapshot, DashboardStateStore, ErrorInfo};
pub use history::{History, MAX_HISTORY_SIZE};
pub use notifications::{Notification, NotificationFeed, Severity, DISPLAY_LIMIT};
