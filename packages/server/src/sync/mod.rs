use async_trait::async_trait;
use common::leaderboard::ScraperProbe;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use serde_json::json;
use thiserror::Error;
use tracing::{info, instrument};

use crate::entity::user;

/// Failures a [`SyncService`] implementation can report.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Platform '{platform}' request failed: {message}")]
    Platform { platform: String, message: String },
    /// Another sync holds the upstream rate budget.
    #[error("Sync already running")]
    Busy,
}

/// Result of pulling profiles from the external platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub added: u64,
    pub updated: u64,
}

/// Result of refreshing every stored profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub updated: u64,
    pub total_users: u64,
}

/// Source of external platform data.
///
/// The admin endpoints delegate here. Implementations own any scraping or
/// upstream API access.
#[async_trait]
pub trait SyncService: Send + Sync {
    async fn sync_profiles(&self) -> Result<SyncOutcome, SyncError>;

    async fn update_all(&self) -> Result<UpdateOutcome, SyncError>;

    /// Diagnostic probe of the scrapers. Returns a free-form JSON report.
    async fn test_scrapers(&self, probe: &ScraperProbe) -> Result<serde_json::Value, SyncError>;

    async fn refresh(&self) -> Result<(), SyncError>;

    async fn test_url_extraction(&self) -> Result<serde_json::Value, SyncError>;
}

/// Sync service used until real platform scrapers are wired in.
///
/// Reports zero changes and never writes.
pub struct NoopSyncService {
    db: DatabaseConnection,
}

impl NoopSyncService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncService for NoopSyncService {
    #[instrument(skip(self))]
    async fn sync_profiles(&self) -> Result<SyncOutcome, SyncError> {
        info!("Profile sync requested, no scrapers configured");
        Ok(SyncOutcome::default())
    }

    #[instrument(skip(self))]
    async fn update_all(&self) -> Result<UpdateOutcome, SyncError> {
        let total_users = user::Entity::find().count(&self.db).await?;
        info!(total_users, "Full update requested, no scrapers configured");
        Ok(UpdateOutcome {
            updated: 0,
            total_users,
        })
    }

    #[instrument(skip(self, probe))]
    async fn test_scrapers(&self, probe: &ScraperProbe) -> Result<serde_json::Value, SyncError> {
        let entry = |username: &Option<String>| {
            username.as_ref().map(|name| {
                json!({
                    "username": name,
                    "implemented": false,
                })
            })
        };

        Ok(json!({
            "leetcode": entry(&probe.leetcode_username),
            "codeforces": entry(&probe.codeforces_username),
        }))
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<(), SyncError> {
        info!("Refresh requested, no scrapers configured");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn test_url_extraction(&self) -> Result<serde_json::Value, SyncError> {
        Ok(json!({
            "leetcode": { "implemented": false },
            "codeforces": { "implemented": false },
            "codechef": { "implemented": false },
        }))
    }
}
