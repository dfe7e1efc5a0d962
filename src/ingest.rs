// Ingestion pipeline: validate the whole batch, enrich, persist atomically.

use thiserror::Error;
use tracing::warn;

use crate::ipinfo_repo::IpInfoLookup;
use crate::models::ViewerSession;
use crate::stats_repo::StatsRepo;

#[derive(Debug, Error)]
pub enum CollectError {
    /// Malformed batch: bad JSON, schema violation or compound-field decode
    /// failure. Raised before any write, so rejection has zero side effects.
    #[error("batch rejected: {0}")]
    Rejected(#[from] serde_json::Error),
    /// A row collides with an already persisted one (duplicate viewerId).
    /// The transaction is rolled back; nothing from the batch is kept.
    #[error("batch conflicts with stored rows: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(anyhow::Error),
}

/// Ingests one POST /collect body. The entire batch is deserialized (and
/// every compound field decoded) before any write; rows are then enriched
/// via the lookup capability and written in a single transaction.
///
/// Returns the number of rows persisted.
pub async fn collect_batch(
    repo: &StatsRepo,
    lookup: &dyn IpInfoLookup,
    body: &[u8],
) -> Result<usize, CollectError> {
    let mut sessions: Vec<ViewerSession> = serde_json::from_slice(body)?;

    // Best-effort enrichment: a failed or timed-out lookup leaves
    // region/provider empty and never aborts the batch.
    for session in &mut sessions {
        let info = &mut session.browser_client_info;
        match lookup.lookup(&info.user_ip).await {
            Ok(ip_info) => {
                info.user_region = ip_info.region;
                info.user_provider = ip_info.org;
            }
            Err(e) => {
                warn!(viewer_id = session.viewer_id, ip = %info.user_ip, error = %e, "ip lookup failed");
            }
        }
    }

    if let Err(e) = repo.insert_batch(&sessions).await {
        return Err(match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CollectError::Conflict(db.message().to_string())
            }
            other => CollectError::Store(other.into()),
        });
    }

    Ok(sessions.len())
}
