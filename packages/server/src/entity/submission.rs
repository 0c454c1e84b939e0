use common::{Difficulty, Platform, SubmissionStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single judged submission reported by a platform. Immutable once written.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub submitted_at: DateTimeUtc,
    pub platform: Platform,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub problem_id: String,
    pub problem_title: String,
    pub difficulty: Difficulty,
    pub status: SubmissionStatus,
    pub language: String,
    pub execution_time: Option<f64>, // in milliseconds
    pub memory_used: Option<f64>,    // in megabytes

    /// Set for contest submissions only.
    pub contest_id: Option<String>,
    pub rating: Option<f64>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
