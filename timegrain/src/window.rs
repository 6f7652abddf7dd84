use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::bucketer::IntervalBucketer;

/// Everything a query template needs to filter and bin one range.
///
/// Timestamps are ISO-8601 UTC strings with millisecond precision, the form
/// log-analytics backends accept in `datetime(...)` literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub grain: String,
    pub iso_interval: String,
    pub timespan: String,
    pub grain_minutes: u32,
    pub start: String,
    pub end: String,
    pub bucket_count: usize,
    pub real_start: String,
    pub real_end: Option<String>,
}

impl QueryWindow {
    pub fn new(bucketer: &IntervalBucketer, cap_end_at_now: bool) -> Self {
        QueryWindow {
            grain: bucketer.grain_kusto_label().to_owned(),
            iso_interval: bucketer.iso_interval().to_owned(),
            timespan: bucketer.grain_real_interval().to_owned(),
            grain_minutes: bucketer.grain_minutes(),
            start: format_instant(bucketer.best_granular_start()),
            end: format_instant(bucketer.best_granular_end(cap_end_at_now)),
            bucket_count: bucketer.bucket_count(),
            real_start: format_instant(bucketer.real_start()),
            real_end: bucketer.real_end().map(format_instant),
        }
    }

    /// `bin(<column>, <grain>)`, e.g. `bin(TimeGenerated, 5m)`.
    pub fn kusto_bin(&self, column: &str) -> String {
        format!("bin({column}, {})", self.grain)
    }
}

pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
