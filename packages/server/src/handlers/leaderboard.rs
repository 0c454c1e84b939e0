use axum::{
    Json,
    extract::{Path, State},
};
use common::leaderboard::{
    ActivityLeaderboardResponse, LeaderboardRow, SubmissionHistoryResponse,
    UserActivitySummaryResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::query::AppQuery;
use crate::leaderboard::LeaderboardService;
use crate::models::leaderboard::{
    ActivityQuery, PlatformQuery, SubmissionHistoryQuery, parse_platform, parse_time_range,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/solved",
    tag = "Leaderboard",
    operation_id = "getSolvedLeaderboard",
    summary = "Rank users by accepted submissions",
    description = "Counts accepted submissions per user, optionally restricted to one platform. Users with no accepted submission are omitted. Sorted by `totalSolved` descending, ties by username.",
    params(PlatformQuery),
    responses(
        (status = 200, description = "Ranked rows", body = Vec<LeaderboardRow>),
        (status = 400, description = "Unknown platform (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Database failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(platform = ?query.platform))]
pub async fn solved_leaderboard(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PlatformQuery>,
) -> Result<Json<Vec<LeaderboardRow>>, AppError> {
    let platform = parse_platform(query.platform.as_deref())?;
    let rows = LeaderboardService::new(&state.db).solved(platform).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/contest",
    tag = "Leaderboard",
    operation_id = "getContestLeaderboard",
    summary = "Rank users by mean contest rating",
    description = "Averages the rating of rated submissions per user, optionally restricted to one platform. Users with no rated submission are omitted.",
    params(PlatformQuery),
    responses(
        (status = 200, description = "Ranked rows", body = Vec<LeaderboardRow>),
        (status = 400, description = "Unknown platform (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Database failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(platform = ?query.platform))]
pub async fn contest_leaderboard(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PlatformQuery>,
) -> Result<Json<Vec<LeaderboardRow>>, AppError> {
    let platform = parse_platform(query.platform.as_deref())?;
    let rows = LeaderboardService::new(&state.db).contest(platform).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/activity",
    tag = "Leaderboard",
    operation_id = "getActivityLeaderboard",
    summary = "List recently updated profiles",
    description = "Profiles whose stats were updated within the time range (`day`, `week` or `month`), sorted by solved count, then rating, then username.",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Recently active profiles", body = ActivityLeaderboardResponse),
        (status = 400, description = "Unknown platform or time range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Database failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(platform = ?query.platform, time_range = ?query.time_range))]
pub async fn activity_leaderboard(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ActivityQuery>,
) -> Result<Json<ActivityLeaderboardResponse>, AppError> {
    let platform = parse_platform(query.platform.as_deref())?;
    let time_range = parse_time_range(query.time_range.as_deref())?;

    let data = LeaderboardService::new(&state.db)
        .activity(platform, time_range)
        .await?;

    Ok(Json(ActivityLeaderboardResponse {
        success: true,
        total_users: data.len(),
        data,
        time_range,
    }))
}

#[utoipa::path(
    get,
    path = "/submissions",
    tag = "Leaderboard",
    operation_id = "getSubmissionHistory",
    summary = "Daily submission history for the heatmap",
    description = "Per-user daily activity within one UTC calendar year. `year` defaults to the current year. Users without activity in that year are omitted.",
    params(SubmissionHistoryQuery),
    responses(
        (status = 200, description = "Daily activity per user", body = SubmissionHistoryResponse),
        (status = 400, description = "Malformed filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Database failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn submission_history(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SubmissionHistoryQuery>,
) -> Result<Json<SubmissionHistoryResponse>, AppError> {
    let filter = query.validate()?;
    let data = LeaderboardService::new(&state.db)
        .submission_history(filter)
        .await?;

    Ok(Json(SubmissionHistoryResponse {
        success: true,
        data,
        year: filter.year,
    }))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}/summary",
    tag = "Leaderboard",
    operation_id = "getUserActivitySummary",
    summary = "Profile stats with weekly and monthly rollups",
    params(("user_id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Activity summary", body = UserActivitySummaryResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Database failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn user_activity_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserActivitySummaryResponse>, AppError> {
    let not_found = || AppError::NotFound("User not found".into());

    // IDs that cannot exist are reported the same as missing ones.
    let id = user_id.parse::<i32>().map_err(|_| not_found())?;
    let data = LeaderboardService::new(&state.db)
        .user_summary(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(UserActivitySummaryResponse {
        success: true,
        data,
    }))
}
