// IP-info enrichment via ipinfo.io; best-effort with a bounded timeout.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::LookupConfig;

/// Enrichment output for one client IP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpInfo {
    pub region: String,
    pub org: String,
}

/// External lookup capability, injected into the ingestion pipeline so tests
/// can stub it out. Callers must treat every error as non-fatal.
#[async_trait]
pub trait IpInfoLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> anyhow::Result<IpInfo>;
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    #[serde(default)]
    region: String,
    #[serde(default)]
    org: String,
}

/// ipinfo.io client. One shared reqwest client with connection pooling and an
/// explicit timeout; built once at startup, never per record.
pub struct IpinfoRepo {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl IpinfoRepo {
    pub fn new(cfg: &LookupConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("building ipinfo HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
        })
    }
}

#[async_trait]
impl IpInfoLookup for IpinfoRepo {
    async fn lookup(&self, ip: &str) -> anyhow::Result<IpInfo> {
        anyhow::ensure!(
            ip.parse::<std::net::IpAddr>().is_ok(),
            "not an IP address: {ip:?}"
        );
        let url = format!("{}/{}/json", self.base_url, ip);
        let mut req = self.http.get(&url).header("Accept", "application/json");
        if !self.token.is_empty() {
            req = req.query(&[("token", self.token.as_str())]);
        }
        let response = req
            .send()
            .await
            .with_context(|| format!("requesting ip info for {ip}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("unexpected status {status} for {ip}");
        }
        let info: IpInfoResponse = response
            .json()
            .await
            .with_context(|| format!("decoding ip info for {ip}"))?;
        Ok(IpInfo {
            region: info.region,
            org: info.org,
        })
    }
}
