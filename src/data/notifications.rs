//! Turning raw readings into alert notifications.

use chrono::{DateTime, Utc};
use pondwatch_types::{Deviation, Locale, ParameterStatus, Reading};

/// Number of notifications shown at once.
pub const DISPLAY_LIMIT: usize = 5;

/// How a notification is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// At least one parameter is out of range.
    Warning,
    /// Everything in range (or unmeasured).
    Info,
}

/// A reading with its classification and a generated message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub reading: Reading,
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    /// Classify `reading` and describe its out-of-range parameters.
    pub fn from_reading(reading: Reading, locale: Locale) -> Self {
        let clauses: Vec<String> = reading
            .statuses()
            .filter_map(|row| {
                let deviation = match row.status {
                    ParameterStatus::Low => Deviation::TooLow,
                    ParameterStatus::High => Deviation::TooHigh,
                    ParameterStatus::Normal | ParameterStatus::Unknown => return None,
                };
                Some(locale.alert_clause(row.definition.parameter, deviation))
            })
            .collect();

        let (severity, message) = if clauses.is_empty() {
            (Severity::Info, locale.all_normal().to_string())
        } else {
            (Severity::Warning, clauses.join(", "))
        };

        Self {
            reading,
            severity,
            message,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.reading.time
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// The notification set shown in the header dropdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    /// Newest first, at most [`DISPLAY_LIMIT`] entries.
    pub items: Vec<Notification>,
    /// Warnings across the whole set, not just `items`.
    pub unread: usize,
    /// Size of the whole set.
    pub total: usize,
}

impl NotificationFeed {
    /// Classify every reading and keep the newest few for display.
    ///
    /// Identical alerts are not merged.
    pub fn aggregate(readings: Vec<Reading>, locale: Locale) -> Self {
        let mut all: Vec<Notification> = readings
            .into_iter()
            .map(|reading| Notification::from_reading(reading, locale))
            .collect();

        let unread = all.iter().filter(|n| n.is_warning()).count();
        let total = all.len();

        // Backend order is newest last; reverse first so the stable sort keeps ties newest first.
        all.reverse();
        all.sort_by(|a, b| b.time().cmp(&a.time()));
        all.truncate(DISPLAY_LIMIT);

        Self {
            items: all,
            unread,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
