//! Bounded reading history for the chart and the data table.

use std::collections::VecDeque;

use pondwatch_types::Reading;

/// Maximum number of readings to keep.
pub const MAX_HISTORY_SIZE: usize = 100;

/// The most recent readings, ordered ascending by time.
///
/// The chart reads it oldest first, the table newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    readings: VecDeque<Reading>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole window with `readings`, in any order.
    ///
    /// Only the newest [`MAX_HISTORY_SIZE`] are kept.
    pub fn replace(&mut self, mut readings: Vec<Reading>) {
        readings.sort_by(|a, b| a.time.cmp(&b.time));
        let excess = readings.len().saturating_sub(MAX_HISTORY_SIZE);
        self.readings = readings.into_iter().skip(excess).collect();
    }

    /// Build a history from `readings`, in any order.
    pub fn from_readings(readings: Vec<Reading>) -> Self {
        let mut history = Self::new();
        history.replace(readings);
        history
    }

    /// Oldest first, for charting.
    pub fn ascending(&self) -> impl DoubleEndedIterator<Item = &Reading> + ExactSizeIterator {
        self.readings.iter()
    }

    /// Newest first, for tabular display.
    pub fn descending(&self) -> impl Iterator<Item = &Reading> + ExactSizeIterator {
        self.readings.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
