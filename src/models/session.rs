// Wire types for ingested session payloads (camelCase JSON, all fields required)

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{BrowserClient, Platform, Resolution};

/// Client environment of one session. The compound fields arrive as encoded
/// strings and are decoded by serde via the types in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserClientInfo {
    #[serde(rename = "screenData_viewPort")]
    pub screen_data_view_port: Resolution,
    #[serde(rename = "screenData_resolution")]
    pub screen_data_resolution: Resolution,
    pub platform: Platform,
    pub browser_client: BrowserClient,
    #[serde(rename = "userIP")]
    pub user_ip: String,
    /// Enrichment output, not part of the wire payload.
    #[serde(default, skip_serializing)]
    pub user_region: String,
    /// Enrichment output, not part of the wire payload.
    #[serde(default, skip_serializing)]
    pub user_provider: String,
}

/// One viewer session as submitted to POST /collect. Constructed per inbound
/// record, enriched once, flattened into a `stats` row and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSession {
    pub browser_client_info: BrowserClientInfo,
    pub viewer_id: i32,
    pub name: String,
    pub last_name: String,
    pub is_chat_name: bool,
    pub email: String,
    pub is_chat_email: bool,
    pub join_time: DateTime<FixedOffset>,
    pub leave_time: DateTime<FixedOffset>,
    pub spent_time: i64,
    pub spent_time_delta_percent: u8,
    pub chat_comments_total: i32,
    pub chat_comments_delta_percent: u8,
    pub another_fields: Vec<serde_json::Value>,
}
