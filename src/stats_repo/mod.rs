// SQLite storage for flattened session rows. One append-only `stats` table;
// batches are written inside a single transaction.

pub mod aggregation;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use crate::models::{ReportRow, ViewerSession};
use aggregation::{Dimension, FilteredDimension};

pub struct StatsRepo {
    pool: SqlitePool,
}

const INSERT_SQL: &str = r#"
    INSERT INTO stats
    ("viewerId","name","lastName","isChatName","email","isChatEmail",
     "joinTime","leaveTime","spentTime","spentTimeDeltaPercent",
     "chatCommentsTotal","chatCommentsDeltaPercent","anotherFields",
     "userIP","userRegion","userProvider",
     "platformName","platformVersion","platformArchitecture",
     "browserClientName","browserClientVersion",
     "screenData_viewPortX","screenData_viewPortY",
     "screenData_resolutionX","screenData_resolutionY")
    VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22,$23,$24,$25)
"#;

impl StatsRepo {
    pub async fn connect(path: &str, max_pool_size: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                "viewerId" INTEGER NOT NULL UNIQUE,
                "name" TEXT NOT NULL,
                "lastName" TEXT NOT NULL,
                "isChatName" INTEGER NOT NULL,
                "email" TEXT NOT NULL,
                "isChatEmail" INTEGER NOT NULL,
                "joinTime" TEXT NOT NULL,
                "leaveTime" TEXT NOT NULL,
                "spentTime" INTEGER NOT NULL,
                "spentTimeDeltaPercent" INTEGER NOT NULL,
                "chatCommentsTotal" INTEGER NOT NULL,
                "chatCommentsDeltaPercent" INTEGER NOT NULL,
                "anotherFields" TEXT NOT NULL,
                "userIP" TEXT NOT NULL,
                "userRegion" TEXT NOT NULL,
                "userProvider" TEXT NOT NULL,
                "platformName" TEXT NOT NULL,
                "platformVersion" TEXT NOT NULL,
                "platformArchitecture" TEXT NOT NULL,
                "browserClientName" TEXT NOT NULL,
                "browserClientVersion" TEXT NOT NULL,
                "screenData_viewPortX" INTEGER NOT NULL,
                "screenData_viewPortY" INTEGER NOT NULL,
                "screenData_resolutionX" INTEGER NOT NULL,
                "screenData_resolutionY" INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_stats_platform_name ON stats("platformName")"#)
            .execute(&self.pool)
            .await?;
        sqlx::query(
            r#"CREATE INDEX IF NOT EXISTS idx_stats_browser_client_name ON stats("browserClientName")"#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a validated, enriched batch inside one transaction. Either
    /// every row is committed or none is; callers decide how to surface a
    /// failed insert (e.g. a UNIQUE violation for a duplicate viewerId).
    #[instrument(skip(self, sessions), fields(repo = "stats", operation = "insert_batch", batch_size = sessions.len()))]
    pub async fn insert_batch(&self, sessions: &[ViewerSession]) -> Result<(), sqlx::Error> {
        if sessions.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for s in sessions {
            let info = &s.browser_client_info;
            let another_fields = serde_json::to_string(&s.another_fields)
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query(INSERT_SQL)
                .bind(s.viewer_id)
                .bind(&s.name)
                .bind(&s.last_name)
                .bind(s.is_chat_name)
                .bind(&s.email)
                .bind(s.is_chat_email)
                .bind(format_ts(&s.join_time.with_timezone(&Utc)))
                .bind(format_ts(&s.leave_time.with_timezone(&Utc)))
                .bind(s.spent_time)
                .bind(s.spent_time_delta_percent as i64)
                .bind(s.chat_comments_total)
                .bind(s.chat_comments_delta_percent as i64)
                .bind(another_fields)
                .bind(&info.user_ip)
                .bind(&info.user_region)
                .bind(&info.user_provider)
                .bind(&info.platform.name)
                .bind(&info.platform.version)
                .bind(&info.platform.architecture)
                .bind(&info.browser_client.name)
                .bind(&info.browser_client.version)
                .bind(info.screen_data_view_port.width as i64)
                .bind(info.screen_data_view_port.height as i64)
                .bind(info.screen_data_resolution.width as i64)
                .bind(info.screen_data_resolution.height as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM stats")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Grouped row counts for one report dimension, one row per distinct label.
    #[instrument(skip(self), fields(repo = "stats", operation = "count_grouped"))]
    pub async fn count_grouped(&self, dimension: Dimension) -> anyhow::Result<Vec<ReportRow>> {
        let rows = sqlx::query(dimension.group_sql())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(parse_report_row).collect()
    }

    /// Grouped version counts restricted to one platform/browser name.
    #[instrument(skip(self, value), fields(repo = "stats", operation = "count_grouped_filtered"))]
    pub async fn count_grouped_filtered(
        &self,
        dimension: FilteredDimension,
        value: &str,
    ) -> anyhow::Result<Vec<ReportRow>> {
        let rows = sqlx::query(dimension.group_sql())
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(parse_report_row).collect()
    }

    /// All join (+1) and leave (-1) events, ascending by timestamp. Rows are
    /// stored as fixed-width UTC RFC 3339, so the TEXT ordering is
    /// chronological.
    #[instrument(skip(self), fields(repo = "stats", operation = "peak_events"))]
    pub async fn peak_events(&self) -> anyhow::Result<Vec<(DateTime<Utc>, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT "joinTime" AS ts, 1 AS delta FROM stats
            UNION ALL
            SELECT "leaveTime" AS ts, -1 AS delta FROM stats
            ORDER BY ts
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let ts: String = row.try_get("ts")?;
            let delta: i64 = row.try_get("delta")?;
            let ts = DateTime::parse_from_rfc3339(&ts)
                .map_err(|e| anyhow::anyhow!("stored timestamp {ts:?}: {e}"))?
                .with_timezone(&Utc);
            out.push((ts, delta));
        }
        Ok(out)
    }
}

/// Fixed-width (millisecond) UTC RFC 3339 so lexicographic order on the TEXT
/// column matches chronological order.
fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_report_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<ReportRow> {
    let label: String = row.try_get("label")?;
    let count: i64 = row.try_get("cnt")?;
    Ok(ReportRow { label, count })
}
