// Shared test helpers

use async_trait::async_trait;
use std::sync::Arc;
use viewstat::ipinfo_repo::{IpInfo, IpInfoLookup};
use viewstat::models::ViewerSession;
use viewstat::stats_repo::StatsRepo;

/// Lookup stub returning a fixed region/provider for every IP.
pub struct StubLookup;

#[async_trait]
impl IpInfoLookup for StubLookup {
    async fn lookup(&self, _ip: &str) -> anyhow::Result<IpInfo> {
        Ok(IpInfo {
            region: "Moscow".into(),
            org: "AS0 Test Carrier".into(),
        })
    }
}

/// Lookup stub that always fails; enrichment must stay best-effort.
pub struct FailingLookup;

#[async_trait]
impl IpInfoLookup for FailingLookup {
    async fn lookup(&self, _ip: &str) -> anyhow::Result<IpInfo> {
        Err(anyhow::anyhow!("lookup unavailable"))
    }
}

pub fn session_json(
    viewer_id: i32,
    join: &str,
    leave: &str,
    platform: &str,
    browser: &str,
    resolution: &str,
) -> serde_json::Value {
    serde_json::json!({
        "viewerId": viewer_id,
        "name": "Roman",
        "lastName": "Testov",
        "isChatName": false,
        "email": "viewer@example.com",
        "isChatEmail": false,
        "joinTime": join,
        "leaveTime": leave,
        "spentTime": 461_000_000_000i64,
        "spentTimeDeltaPercent": 14,
        "chatCommentsTotal": 0,
        "chatCommentsDeltaPercent": 0,
        "anotherFields": [],
        "browserClientInfo": {
            "userIP": "62.152.34.188",
            "platform": platform,
            "browserClient": browser,
            "screenData_viewPort": resolution,
            "screenData_resolution": resolution
        }
    })
}

pub fn session(viewer_id: i32, platform: &str, browser: &str, resolution: &str) -> ViewerSession {
    serde_json::from_value(session_json(
        viewer_id,
        "2021-07-30T15:37:24+03:00",
        "2021-07-30T15:45:43+03:00",
        platform,
        browser,
        resolution,
    ))
    .expect("valid session payload")
}

pub async fn temp_repo(dir: &tempfile::TempDir) -> Arc<StatsRepo> {
    let path = dir.path().join("stats.db");
    let repo = StatsRepo::connect(path.to_str().unwrap(), 2)
        .await
        .expect("connect");
    repo.init().await.expect("init");
    Arc::new(repo)
}
