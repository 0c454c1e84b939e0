use axum::{Json, extract::State};
use common::leaderboard::{
    DiagnosticResponse, MessageResponse, ScraperProbe, SyncResponse, UpdateAllResponse,
};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::leaderboard::{RecordOutcome, record_submissions};
use crate::models::admin::{UpdateUserRequest, UpdateUserResponse, validate_update_user};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/sync",
    tag = "Admin",
    operation_id = "syncProfiles",
    summary = "Pull profiles from the external platforms",
    responses(
        (status = 200, description = "Sync finished", body = SyncResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Sync failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(by = %auth_user.username))]
pub async fn sync_profiles(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, AppError> {
    let outcome = state.sync.sync_profiles().await?;
    info!(
        added = outcome.added,
        updated = outcome.updated,
        "Profile sync finished"
    );

    Ok(Json(SyncResponse {
        message: "Users synced successfully".into(),
        added_count: outcome.added,
        updated_count: outcome.updated,
    }))
}

#[utoipa::path(
    post,
    path = "/update-user",
    tag = "Admin",
    operation_id = "updateUserSubmissions",
    summary = "Record submissions for one profile",
    description = "Stores a batch of submission events for an existing profile in one transaction. Either every event is stored or none is.",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Submissions recorded", body = UpdateUserResponse),
        (status = 400, description = "Invalid body or platform mismatch (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Database failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(by = %auth_user.username, user_id = payload.user_id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    validate_update_user(&payload)?;

    let inserted = match record_submissions(
        &state.db,
        payload.user_id,
        payload.platform,
        payload.submissions,
    )
    .await?
    {
        RecordOutcome::Inserted(n) => n,
        RecordOutcome::UnknownUser => return Err(AppError::NotFound("User not found".into())),
        RecordOutcome::PlatformMismatch { profile } => {
            return Err(AppError::Validation(format!(
                "User is registered on {}, not {}",
                profile.label(),
                payload.platform.label()
            )));
        }
    };

    Ok(Json(UpdateUserResponse {
        message: "User stats updated successfully".into(),
        inserted_count: inserted,
    }))
}

#[utoipa::path(
    post,
    path = "/update-all",
    tag = "Admin",
    operation_id = "updateAllUsers",
    summary = "Refresh stats for every profile",
    description = "Requires the `admin` role.",
    responses(
        (status = 200, description = "Update finished", body = UpdateAllResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 500, description = "Update failed (UPSTREAM_ERROR, INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(by = %auth_user.username))]
pub async fn update_all(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UpdateAllResponse>, AppError> {
    auth_user.require_admin()?;

    let outcome = state.sync.update_all().await?;
    Ok(Json(UpdateAllResponse {
        message: "All user stats updated successfully".into(),
        updated_count: outcome.updated,
        total_users: outcome.total_users,
    }))
}

#[utoipa::path(
    post,
    path = "/test-scrapers",
    tag = "Admin",
    operation_id = "testScrapers",
    summary = "Probe the platform scrapers",
    request_body = ScraperProbe,
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticResponse),
        (status = 400, description = "Invalid body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(by = %auth_user.username))]
pub async fn test_scrapers(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(probe): AppJson<ScraperProbe>,
) -> Result<Json<DiagnosticResponse>, AppError> {
    let results = state.sync.test_scrapers(&probe).await?;
    Ok(Json(DiagnosticResponse {
        message: "Scrapers tested successfully".into(),
        results,
    }))
}

#[utoipa::path(
    post,
    path = "/refresh",
    tag = "Admin",
    operation_id = "refreshLeaderboard",
    summary = "Refresh leaderboard data",
    responses(
        (status = 200, description = "Refresh finished", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(by = %auth_user.username))]
pub async fn refresh(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.sync.refresh().await?;
    Ok(Json(MessageResponse {
        message: "Leaderboard refreshed successfully".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/test-url-extraction",
    tag = "Admin",
    operation_id = "testUrlExtraction",
    summary = "Check profile URL parsing for each platform",
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(by = %auth_user.username))]
pub async fn test_url_extraction(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DiagnosticResponse>, AppError> {
    let results = state.sync.test_url_extraction().await?;
    Ok(Json(DiagnosticResponse {
        message: "URL extraction tested successfully".into(),
        results,
    }))
}
