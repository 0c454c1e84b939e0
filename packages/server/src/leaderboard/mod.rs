pub mod ranking;

use std::collections::HashMap;

use chrono::{Duration, Utc};
use common::leaderboard::{
    ActivityEntry, DailySubmission, LeaderboardRow, UserActivitySummary, UserSubmissionHistory,
};
use common::{Platform, SubmissionStatus, TimeRange};
use sea_orm::sea_query::{Expr, Func, NullOrdering};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, instrument};

use crate::entity::{submission, user};
use crate::models::admin::SubmissionInput;
use crate::models::leaderboard::HistoryFilter;
use ranking::{RatingTally, SolvedTally};

pub struct LeaderboardService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LeaderboardService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Users ranked by number of accepted submissions.
    #[instrument(skip(self))]
    pub async fn solved(&self, platform: Option<Platform>) -> Result<Vec<LeaderboardRow>, DbErr> {
        let mut query = submission::Entity::find()
            .filter(submission::Column::Status.eq(SubmissionStatus::Accepted));
        if let Some(p) = platform {
            query = query.filter(submission::Column::Platform.eq(p));
        }

        let tallies = query
            .select_only()
            .column(submission::Column::UserId)
            .column_as(submission::Column::Id.count(), "total_solved")
            .group_by(submission::Column::UserId)
            .into_model::<SolvedTally>()
            .all(self.conn)
            .await?;

        let users = self
            .profiles(tallies.iter().map(|t| t.user_id), platform)
            .await?;
        Ok(ranking::rank_by_solved(tallies, &users, platform))
    }

    /// Users ranked by mean rating across their rated submissions.
    #[instrument(skip(self))]
    pub async fn contest(&self, platform: Option<Platform>) -> Result<Vec<LeaderboardRow>, DbErr> {
        let mut query =
            submission::Entity::find().filter(submission::Column::Rating.is_not_null());
        if let Some(p) = platform {
            query = query.filter(submission::Column::Platform.eq(p));
        }

        let tallies = query
            .select_only()
            .column(submission::Column::UserId)
            .column_as(
                Expr::expr(Func::avg(Expr::col(submission::Column::Rating))),
                "contest_rating",
            )
            .group_by(submission::Column::UserId)
            .into_model::<RatingTally>()
            .all(self.conn)
            .await?;

        let users = self
            .profiles(tallies.iter().map(|t| t.user_id), platform)
            .await?;
        Ok(ranking::rank_by_rating(tallies, &users, platform))
    }

    async fn profiles(
        &self,
        ids: impl Iterator<Item = i32>,
        platform: Option<Platform>,
    ) -> Result<HashMap<i32, user::Model>, DbErr> {
        let ids: Vec<i32> = ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = user::Entity::find().filter(user::Column::Id.is_in(ids));
        if let Some(p) = platform {
            query = query.filter(user::Column::Platform.eq(p));
        }
        let users = query.all(self.conn).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Profiles updated within the time range, most solved first.
    #[instrument(skip(self))]
    pub async fn activity(
        &self,
        platform: Option<Platform>,
        range: TimeRange,
    ) -> Result<Vec<ActivityEntry>, DbErr> {
        let since = Utc::now() - Duration::days(range.days());
        let mut query = user::Entity::find().filter(user::Column::LastUpdated.gte(since));
        if let Some(p) = platform {
            query = query.filter(user::Column::Platform.eq(p));
        }

        let users = query
            .order_by_desc(user::Column::SolvedCount)
            .order_by_with_nulls(user::Column::Rating, Order::Desc, NullOrdering::Last)
            .order_by_asc(user::Column::Username)
            .all(self.conn)
            .await?;

        Ok(users
            .into_iter()
            .map(|u| ActivityEntry {
                username: u.username,
                platform: u.platform,
                solved_count: u.solved_count,
                contest_rank: u.contest_rank,
                rating: u.rating,
                last_updated: u.last_updated,
            })
            .collect())
    }

    /// Daily activity per user for one calendar year. Users with no activity
    /// in that year are left out.
    #[instrument(skip(self))]
    pub async fn submission_history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<UserSubmissionHistory>, DbErr> {
        let mut query = user::Entity::find();
        if let Some(p) = filter.platform {
            query = query.filter(user::Column::Platform.eq(p));
        }
        if let Some(id) = filter.user_id {
            query = query.filter(user::Column::Id.eq(id));
        }
        let users = query
            .order_by_asc(user::Column::Username)
            .all(self.conn)
            .await?;

        let mut history = Vec::with_capacity(users.len());
        for u in users {
            let points = ranking::points_in_year(decode_points(&u)?, filter.year);
            if points.is_empty() {
                continue;
            }
            history.push(UserSubmissionHistory {
                username: u.username,
                platform: u.platform,
                submissions: points,
            });
        }
        debug!(users = history.len(), "Built submission history");
        Ok(history)
    }

    /// Profile stats with weekly and monthly rollups. `None` if the user does not exist.
    #[instrument(skip(self))]
    pub async fn user_summary(&self, user_id: i32) -> Result<Option<UserActivitySummary>, DbErr> {
        let Some(u) = user::Entity::find_by_id(user_id).one(self.conn).await? else {
            return Ok(None);
        };

        let activity = ranking::rollup(decode_points(&u)?, Utc::now());
        Ok(Some(UserActivitySummary {
            username: u.username,
            platform: u.platform,
            solved_count: u.solved_count,
            contest_rank: u.contest_rank,
            rating: u.rating,
            last_updated: u.last_updated,
            activity,
        }))
    }
}

fn decode_points(u: &user::Model) -> Result<Vec<DailySubmission>, DbErr> {
    u.daily_submissions()
        .map_err(|e| DbErr::Json(format!("Malformed submissions for user {}: {}", u.username, e)))
}

/// Outcome of [`record_submissions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted(u64),
    UnknownUser,
    /// The batch targets a different platform than the stored profile.
    PlatformMismatch { profile: Platform },
}

/// Store a batch of submission events for one profile.
///
/// Runs in a single transaction. Nothing is written unless the user exists
/// and `platform` matches the profile's platform.
#[instrument(skip(db, submissions), fields(count = submissions.len()))]
pub async fn record_submissions(
    db: &DatabaseConnection,
    user_id: i32,
    platform: Platform,
    submissions: Vec<SubmissionInput>,
) -> Result<RecordOutcome, DbErr> {
    let txn = db.begin().await?;

    let Some(profile) = user::Entity::find_by_id(user_id).one(&txn).await? else {
        return Ok(RecordOutcome::UnknownUser);
    };
    if profile.platform != platform {
        return Ok(RecordOutcome::PlatformMismatch {
            profile: profile.platform,
        });
    }

    let now = Utc::now();
    let inserted = submissions.len() as u64;
    if !submissions.is_empty() {
        let models = submissions.into_iter().map(|s| submission::ActiveModel {
            submitted_at: Set(s.submitted_at),
            platform: Set(platform),
            user_id: Set(user_id),
            problem_id: Set(s.problem_id),
            problem_title: Set(s.problem_title),
            difficulty: Set(s.difficulty),
            status: Set(s.status),
            language: Set(s.language),
            execution_time: Set(s.execution_time),
            memory_used: Set(s.memory_used),
            contest_id: Set(s.contest_id),
            rating: Set(s.rating),
            created_at: Set(now),
            ..Default::default()
        });
        submission::Entity::insert_many(models).exec(&txn).await?;

        user::Entity::update_many()
            .col_expr(user::Column::LastUpdated, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(RecordOutcome::Inserted(inserted))
}
