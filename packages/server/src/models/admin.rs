use chrono::{DateTime, Utc};
use common::{Difficulty, Platform, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Maximum number of submission events accepted in one update.
pub const MAX_SUBMISSIONS_PER_UPDATE: usize = 1000;

/// One submission event reported for a profile.
#[derive(Clone, Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[schema(example = "2025-03-14T10:22:00Z")]
    pub submitted_at: DateTime<Utc>,
    #[schema(example = "1")]
    pub problem_id: String,
    #[schema(example = "Two Sum")]
    pub problem_title: String,
    pub difficulty: Difficulty,
    pub status: SubmissionStatus,
    #[schema(example = "cpp")]
    pub language: String,
    /// Milliseconds.
    pub execution_time: Option<f64>,
    /// Megabytes.
    pub memory_used: Option<f64>,
    pub contest_id: Option<String>,
    pub rating: Option<f64>,
}

/// Request body for recording submissions against a profile.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[schema(example = 1)]
    pub user_id: i32,
    pub platform: Platform,
    pub submissions: Vec<SubmissionInput>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    #[schema(example = "User stats updated successfully")]
    pub message: String,
    #[schema(example = 3)]
    pub inserted_count: u64,
}

fn require_non_empty(value: &str, field: &str, index: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "submissions[{index}].{field} must not be empty"
        )));
    }
    Ok(())
}

fn require_non_negative(value: Option<f64>, field: &str, index: usize) -> Result<(), AppError> {
    if let Some(v) = value
        && !(v.is_finite() && v >= 0.0)
    {
        return Err(AppError::Validation(format!(
            "submissions[{index}].{field} must be a non-negative number"
        )));
    }
    Ok(())
}

pub fn validate_update_user(req: &UpdateUserRequest) -> Result<(), AppError> {
    if req.submissions.len() > MAX_SUBMISSIONS_PER_UPDATE {
        return Err(AppError::Validation(format!(
            "Too many submissions: max {MAX_SUBMISSIONS_PER_UPDATE}"
        )));
    }

    for (i, sub) in req.submissions.iter().enumerate() {
        require_non_empty(&sub.problem_id, "problemId", i)?;
        require_non_empty(&sub.problem_title, "problemTitle", i)?;
        require_non_empty(&sub.language, "language", i)?;
        require_non_negative(sub.execution_time, "executionTime", i)?;
        require_non_negative(sub.memory_used, "memoryUsed", i)?;
        if let Some(rating) = sub.rating
            && !rating.is_finite()
        {
            return Err(AppError::Validation(format!(
                "submissions[{i}].rating must be a finite number"
            )));
        }
    }

    Ok(())
}
