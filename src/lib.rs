// Library for tests to access modules

pub mod config;
pub mod ingest;
pub mod ipinfo_repo;
pub mod models;
pub mod peaks;
pub mod routes;
pub mod stats_repo;
pub mod version;
