// Report output models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One group of a grouped-count report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub count: i64,
}

/// Interval of maximum simultaneous viewers. All-zero (None, 0) when no
/// sessions are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakInterval {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub count: i64,
}

impl PeakInterval {
    pub fn zero() -> Self {
        Self {
            start_time: None,
            end_time: None,
            count: 0,
        }
    }
}
