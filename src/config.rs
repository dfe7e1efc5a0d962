use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the IP-info service, e.g. "https://ipinfo.io".
    pub base_url: String,
    /// API token; sent as a query parameter. May be empty for tests.
    #[serde(default)]
    pub token: String,
    /// Upper bound for one lookup call; a slow upstream must not stall a batch.
    #[serde(default = "default_lookup_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_lookup_timeout_ms() -> u64 {
    3000
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            !self.lookup.base_url.is_empty(),
            "lookup.base_url must be non-empty"
        );
        anyhow::ensure!(
            self.lookup.timeout_ms > 0,
            "lookup.timeout_ms must be > 0, got {}",
            self.lookup.timeout_ms
        );
        Ok(())
    }
}
