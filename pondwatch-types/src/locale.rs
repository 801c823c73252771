//! User-facing strings in the supported languages.

use crate::{Parameter, ParameterStatus};

/// Display language for generated messages and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Locale {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "id"))]
    Indonesian,
    #[cfg_attr(feature = "serde", serde(rename = "en"))]
    English,
}

/// Direction of an out-of-range value, used in alert clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deviation {
    TooLow,
    TooHigh,
}

impl Locale {
    /// Full parameter label, as shown on cards and table headers.
    pub fn parameter_label(self, parameter: Parameter) -> &'static str {
        use Parameter::*;
        match (self, parameter) {
            (Locale::Indonesian, RoomTemperature) => "Suhu Ruang",
            (Locale::Indonesian, SurfaceTemperature) => "Suhu Air Permukaan",
            (Locale::Indonesian, BottomTemperature) => "Suhu Air Dasar",
            (Locale::Indonesian, Salinity) => "Salinitas",
            (Locale::Indonesian, DissolvedOxygen) => "Oksigen Terlarut",
            (Locale::Indonesian, Ph) => "pH",
            (Locale::Indonesian, Ammonia) => "Amonia",
            (Locale::English, RoomTemperature) => "Room Temperature",
            (Locale::English, SurfaceTemperature) => "Surface Water Temperature",
            (Locale::English, BottomTemperature) => "Bottom Water Temperature",
            (Locale::English, Salinity) => "Salinity",
            (Locale::English, DissolvedOxygen) => "Dissolved Oxygen",
            (Locale::English, Ph) => "pH",
            (Locale::English, Ammonia) => "Ammonia",
        }
    }

    /// Short subject used at the start of an alert clause.
    fn alert_subject(self, parameter: Parameter) -> &'static str {
        use Parameter::*;
        match (self, parameter) {
            (Locale::Indonesian, RoomTemperature) => "Suhu ruang",
            (Locale::Indonesian, SurfaceTemperature) => "Suhu permukaan",
            (Locale::Indonesian, BottomTemperature) => "Suhu dasar",
            (Locale::Indonesian, Salinity) => "Salinitas",
            (Locale::Indonesian, DissolvedOxygen) => "Oksigen",
            (Locale::Indonesian, Ph) => "pH",
            (Locale::Indonesian, Ammonia) => "Amonia",
            (Locale::English, RoomTemperature) => "Room temperature",
            (Locale::English, SurfaceTemperature) => "Surface temperature",
            (Locale::English, BottomTemperature) => "Bottom temperature",
            (Locale::English, Salinity) => "Salinity",
            (Locale::English, DissolvedOxygen) => "Oxygen",
            (Locale::English, Ph) => "pH",
            (Locale::English, Ammonia) => "Ammonia",
        }
    }

    /// One alert clause, e.g. "Oxygen too low".
    pub fn alert_clause(self, parameter: Parameter, deviation: Deviation) -> String {
        let direction = match (self, deviation) {
            (Locale::Indonesian, Deviation::TooLow) => "terlalu rendah",
            (Locale::Indonesian, Deviation::TooHigh) => "terlalu tinggi",
            (Locale::English, Deviation::TooLow) => "too low",
            (Locale::English, Deviation::TooHigh) => "too high",
        };
        format!("{} {}", self.alert_subject(parameter), direction)
    }

    /// Message used when no parameter is out of range.
    pub fn all_normal(self) -> &'static str {
        match self {
            Locale::Indonesian => "Semua parameter normal",
            Locale::English => "All parameters normal",
        }
    }

    pub fn status_label(self, status: ParameterStatus) -> &'static str {
        match (self, status) {
            (_, ParameterStatus::Unknown) => "N/A",
            (_, ParameterStatus::Normal) => "Normal",
            (Locale::Indonesian, ParameterStatus::Low) => "Rendah",
            (Locale::Indonesian, ParameterStatus::High) => "Tinggi",
            (Locale::English, ParameterStatus::Low) => "Low",
            (Locale::English, ParameterStatus::High) => "High",
        }
    }

    /// Fallback when the server gives no error message.
    pub fn generic_error(self) -> &'static str {
        match self {
            Locale::Indonesian => "Terjadi kesalahan",
            Locale::English => "Something went wrong",
        }
    }

    /// Shown when a dashboard refresh fails.
    pub fn load_failed(self) -> &'static str {
        match self {
            Locale::Indonesian => "Gagal memuat data. Silakan coba lagi.",
            Locale::English => "Failed to load data. Please try again.",
        }
    }

    /// Shown when the session has been rejected by the backend.
    pub fn session_expired(self) -> &'static str {
        match self {
            Locale::Indonesian => "Sesi berakhir. Silakan login kembali.",
            Locale::English => "Session expired. Please log in again.",
        }
    }

    pub fn password_mismatch(self) -> &'static str {
        match self {
            Locale::Indonesian => "Password dan konfirmasi password tidak sama",
            Locale::English => "Password and password confirmation do not match",
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Locale::Indonesian => "Memuat data...",
            Locale::English => "Loading data...",
        }
    }

    pub fn last_updated(self) -> &'static str {
        match self {
            Locale::Indonesian => "Terakhir diperbarui",
            Locale::English => "Last updated",
        }
    }

    /// Notification header line, e.g. "2 unread of 5 notifications".
    pub fn unread_summary(self, unread: usize, total: usize) -> String {
        match self {
            Locale::Indonesian => format!("{} belum dibaca dari {} notifikasi", unread, total),
            Locale::English => format!("{} unread of {} notifications", unread, total),
        }
    }

    /// Parse a language tag such as `"id"`, `"en"` or `"en-US"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "id" | "in" => Some(Locale::Indonesian),
            "en" => Some(Locale::English),
            _ => None,
        }
    }
}
