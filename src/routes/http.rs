// Handlers: ping, stat, collect, report

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::AppState;
use crate::ingest::{self, CollectError};
use crate::models::ReportRow;
use crate::peaks;
use crate::stats_repo::aggregation::{Dimension, FilteredDimension};

/// GET /ping — liveness probe.
pub(super) async fn ping_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({"status": "up"}))
}

/// GET /stat — stored row count and process uptime in seconds.
pub(super) async fn stat_handler(State(state): State<AppState>) -> Response {
    match state.repo.count().await {
        Ok(count) => axum::Json(serde_json::json!({
            "count": count,
            "uptime": state.start_time.elapsed().as_secs_f64(),
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "stat failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /collect — ingest a JSON array of session payloads. All-or-nothing:
/// a malformed or conflicting batch persists zero rows.
pub(super) async fn collect_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match ingest::collect_batch(&state.repo, state.lookup.as_ref(), &body).await {
        Ok(rows) => {
            info!(rows, "collected batch");
            axum::Json(serde_json::json!({"result": "success"})).into_response()
        }
        Err(e @ (CollectError::Rejected(_) | CollectError::Conflict(_))) => {
            warn!(error = %e, "collect rejected");
            (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({"result": "failed"})),
            )
                .into_response()
        }
        Err(CollectError::Store(e)) => {
            error!(error = %e, "collect failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({"result": "failed"})),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ReportParams {
    #[serde(rename = "platformName")]
    platform_name: Option<String>,
    #[serde(rename = "browserClientName")]
    browser_client_name: Option<String>,
    column: Option<String>,
}

/// GET /report — CSV grouped counts for one dimension, or the peak
/// concurrent-viewers interval for column=viewsPeaks. Parameter precedence
/// (platformName, browserClientName, column) matches the original service.
pub(super) async fn report_handler(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Response {
    if let Some(value) = params.platform_name.as_deref() {
        let rows = state
            .repo
            .count_grouped_filtered(FilteredDimension::PlatformVersionByName, value)
            .await;
        return grouped_csv_response(params.column.as_deref().unwrap_or(""), rows);
    }
    if let Some(value) = params.browser_client_name.as_deref() {
        let rows = state
            .repo
            .count_grouped_filtered(FilteredDimension::BrowserClientVersionByName, value)
            .await;
        return grouped_csv_response(params.column.as_deref().unwrap_or(""), rows);
    }
    let Some(column) = params.column.as_deref() else {
        return request_failed();
    };
    if column == "viewsPeaks" {
        return peaks_csv_response(&state).await;
    }
    let Some(dimension) = Dimension::parse(column) else {
        return request_failed();
    };
    grouped_csv_response(column, state.repo.count_grouped(dimension).await)
}

/// 400 for a missing or unrecognized report parameter.
fn request_failed() -> Response {
    (StatusCode::BAD_REQUEST, "failed").into_response()
}

fn grouped_csv_response(column: &str, rows: anyhow::Result<Vec<ReportRow>>) -> Response {
    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "report failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let mut body = format!("{column},count");
    for row in &rows {
        body.push_str(&format!("\n{},{}", row.label, row.count));
    }
    csv(body)
}

async fn peaks_csv_response(state: &AppState) -> Response {
    let events = match state.repo.peak_events().await {
        Ok(events) => events,
        Err(e) => {
            error!(error = %e, "report failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let peak = peaks::count_peaks(&events);
    let body = format!(
        "startTime,endTime,count\n{},{},{}",
        format_peak_ts(peak.start_time),
        format_peak_ts(peak.end_time),
        peak.count
    );
    csv(body)
}

fn format_peak_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn csv(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/csv")], body).into_response()
}
