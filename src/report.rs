//! Plain text rendering of a dashboard snapshot.

use std::fmt::{Display, Write};

use chrono::TimeZone;
use pondwatch_types::{format_timestamp, format_with_unit, Locale};

use crate::data::{DashboardSnapshot, Severity};

/// Width of the parameter label column.
const LABEL_WIDTH: usize = 26;

/// Render `snapshot` as a block of lines, timestamps shown in `tz`.
pub fn render<Tz>(snapshot: &DashboardSnapshot, locale: Locale, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();

    if snapshot.loading {
        let _ = writeln!(out, "{}", locale.loading());
        return out;
    }

    if let Some(updated) = snapshot.last_updated_at {
        let _ = writeln!(
            out,
            "{}: {}",
            locale.last_updated(),
            format_timestamp(&updated.with_timezone(tz))
        );
    }

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {}", error.message);
    }

    if let Some(latest) = &snapshot.latest {
        let _ = writeln!(out, "[{}]", format_timestamp(&latest.time.with_timezone(tz)));
    }
    for row in snapshot.latest_statuses() {
        let _ = writeln!(
            out,
            "  {:<width$}{:>12}  {}",
            row.definition.label(locale),
            format_with_unit(row.value, row.definition),
            locale.status_label(row.status),
            width = LABEL_WIDTH
        );
    }

    let feed = &snapshot.notifications;
    let _ = writeln!(out, "{}", locale.unread_summary(feed.unread, feed.total));
    for notification in &feed.items {
        let marker = match notification.severity {
            Severity::Warning => '!',
            Severity::Info => '-',
        };
        let _ = writeln!(
            out,
            "  {} {}  {}",
            marker,
            format_timestamp(&notification.time().with_timezone(tz)),
            notification.message
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{History, NotificationFeed};
    use chrono::Utc;
    use pondwatch_types::{Parameter, Reading};

    fn snapshot() -> DashboardSnapshot {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let reading = Reading::builder()
            .time(time)
            .value(Parameter::DissolvedOxygen, 3.5)
            .value(Parameter::Ph, 8.0)
            .build();

        DashboardSnapshot {
            latest: Some(reading.clone()),
            history: History::from_readings(vec![reading.clone()]),
            notifications: NotificationFeed::aggregate(vec![reading], Locale::English),
            loading: false,
            error: None,
            last_updated_at: Some(time),
        }
    }

    #[test]
    fn loading_snapshot_shows_only_loading() {
        let text = render(&DashboardSnapshot::default(), Locale::Indonesian, &Utc);
        assert_eq!(text, "Memuat data...\n");
    }

    #[test]
    fn renders_values_statuses_and_notifications() {
        let text = render(&snapshot(), Locale::English, &Utc);

        assert!(text.starts_with("Last updated: 01/05/2024 08:30:00\n"));
        let oxygen = text.lines().find(|l| l.contains("Dissolved Oxygen")).unwrap();
        assert!(oxygen.contains("3.50 mg/L"));
        assert!(oxygen.ends_with("Low"));

        let ammonia = text.lines().find(|l| l.contains("Ammonia")).unwrap();
        assert!(ammonia.contains("N/A"));

        assert!(text.contains("1 unread of 1 notifications"));
        assert!(text.contains("! 01/05/2024 08:30:00  Oxygen too low"));
    }

    #[test]
    fn error_is_shown_above_retained_data() {
        let mut snapshot = snapshot();
        snapshot.error = Some(crate::data::ErrorInfo {
            message: Locale::English.load_failed().to_string(),
            kind: pondwatch_client::ErrorKind::Network,
        });

        let text = render(&snapshot, Locale::English, &Utc);
        assert!(text.contains("! Failed to load data. Please try again."));
        assert!(text.contains("Dissolved Oxygen"));
    }
}
