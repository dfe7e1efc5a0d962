// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ipinfo_repo::IpInfoLookup;
use crate::stats_repo::StatsRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<StatsRepo>,
    pub(crate) lookup: Arc<dyn IpInfoLookup>,
    pub(crate) start_time: Instant,
}

pub fn app(repo: Arc<StatsRepo>, lookup: Arc<dyn IpInfoLookup>, start_time: Instant) -> Router {
    let state = AppState {
        repo,
        lookup,
        start_time,
    };
    Router::new()
        .route("/ping", get(http::ping_handler)) // GET /ping
        .route("/stat", get(http::stat_handler)) // GET /stat
        .route("/collect", post(http::collect_handler)) // POST /collect
        .route("/report", get(http::report_handler)) // GET /report
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
