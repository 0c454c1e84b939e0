use common::Platform;
use common::leaderboard::DailySubmission;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tracked competitive-programming profile.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique across all platforms.
    #[sea_orm(unique)]
    pub username: String,
    pub platform: Platform,
    pub name: Option<String>,
    pub avatar: Option<String>,

    #[sea_orm(default_value = 0)]
    pub solved_count: i32,
    pub contest_rank: Option<i32>,
    pub rating: Option<f64>,

    /// Per-day activity stored as a JSON array of `DailySubmission`.
    #[sea_orm(column_type = "Json")]
    pub submissions: Json,

    #[sea_orm(has_many)]
    pub submission_events: HasMany<super::submission::Entity>,

    pub last_updated: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Decode the embedded per-day activity list.
    pub fn daily_submissions(&self) -> Result<Vec<DailySubmission>, serde_json::Error> {
        if self.submissions.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(self.submissions.clone())
    }
}

impl ActiveModelBehavior for ActiveModel {}
