use chrono::{Datelike, Utc};
use common::{Platform, TimeRange};
use serde::Deserialize;

use crate::error::AppError;

/// Query parameters shared by the solved and contest leaderboards.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlatformQuery {
    /// Restrict to one platform: `leetcode`, `codeforces` or `codechef`.
    #[param(example = "leetcode")]
    pub platform: Option<String>,
}

/// Query parameters for the activity leaderboard.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ActivityQuery {
    #[param(example = "codeforces")]
    pub platform: Option<String>,
    /// `day`, `week` (default) or `month`.
    #[param(example = "week")]
    pub time_range: Option<String>,
}

/// Query parameters for the heatmap history.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SubmissionHistoryQuery {
    #[param(example = "leetcode")]
    pub platform: Option<String>,
    /// Restrict to one profile.
    #[param(example = 1)]
    pub user_id: Option<String>,
    /// Calendar year (UTC). Defaults to the current year.
    #[param(example = 2025)]
    pub year: Option<String>,
}

/// Validated heatmap filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFilter {
    pub platform: Option<Platform>,
    pub user_id: Option<i32>,
    pub year: i32,
}

/// Treat a missing or blank value as "no filter".
fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_platform(raw: Option<&str>) -> Result<Option<Platform>, AppError> {
    non_blank(raw)
        .map(|s| s.parse::<Platform>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))
}

pub fn parse_time_range(raw: Option<&str>) -> Result<TimeRange, AppError> {
    match non_blank(raw) {
        Some(s) => s
            .parse::<TimeRange>()
            .map_err(|e| AppError::Validation(e.to_string())),
        None => Ok(TimeRange::default()),
    }
}

pub fn parse_year(raw: Option<&str>) -> Result<i32, AppError> {
    let Some(s) = non_blank(raw) else {
        return Ok(Utc::now().year());
    };
    match s.parse::<i32>() {
        Ok(year) if (1..=9999).contains(&year) => Ok(year),
        _ => Err(AppError::Validation(format!(
            "year must be an integer between 1 and 9999, got '{s}'"
        ))),
    }
}

pub fn parse_user_id(raw: Option<&str>) -> Result<Option<i32>, AppError> {
    non_blank(raw)
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| AppError::Validation(format!("userId must be an integer, got '{s}'")))
        })
        .transpose()
}

impl SubmissionHistoryQuery {
    pub fn validate(&self) -> Result<HistoryFilter, AppError> {
        Ok(HistoryFilter {
            platform: parse_platform(self.platform.as_deref())?,
            user_id: parse_user_id(self.user_id.as_deref())?,
            year: parse_year(self.year.as_deref())?,
        })
    }
}
