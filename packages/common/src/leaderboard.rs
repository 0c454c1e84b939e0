//! Wire types shared by the HTTP API and the dashboard client.
//!
//! Every leaderboard endpoint returns [`LeaderboardRow`]; only the metric field
//! for the requested ranking is populated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;
use crate::platform::{Difficulty, Platform};

/// Which metric a leaderboard is ranked by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardKind {
    /// Accepted submissions per user.
    #[default]
    Solved,
    /// Mean contest rating per user.
    Contest,
}

impl LeaderboardKind {
    /// Path segment of the endpoint serving this ranking.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solved => "solved",
            Self::Contest => "contest",
        }
    }

    /// Column heading for the metric.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Solved => "Problems Solved",
            Self::Contest => "Contest Rating",
        }
    }
}

impl fmt::Display for LeaderboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solved" => Ok(Self::Solved),
            "contest" => Ok(Self::Contest),
            _ => Err(ParseEnumError::new("leaderboard", s, &["solved", "contest"])),
        }
    }
}

/// Window of the activity leaderboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    #[default]
    Week,
    Month,
}

impl TimeRange {
    const NAMES: &'static [&'static str] = &["day", "week", "month"];

    /// Length of the window in days.
    pub fn days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(ParseEnumError::new("timeRange", s, Self::NAMES)),
        }
    }
}

/// One ranked user under one metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    /// Profile ID.
    #[serde(rename = "_id")]
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "tourist")]
    pub username: String,
    /// Display name, if the profile has one.
    #[serde(default)]
    #[schema(example = "Gennady")]
    pub name: Option<String>,
    /// Avatar image URL, if the profile has one.
    #[serde(default)]
    pub avatar: Option<String>,
    pub platform: Platform,
    /// Accepted submission count. Present on the solved leaderboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 412)]
    pub total_solved: Option<i64>,
    /// Mean rating over rated submissions. Present on the contest leaderboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1843.5)]
    pub contest_rating: Option<f64>,
}

impl LeaderboardRow {
    /// The value this row is ranked by, formatted for display.
    pub fn metric_display(&self, kind: LeaderboardKind) -> String {
        match kind {
            LeaderboardKind::Solved => self.total_solved.unwrap_or(0).to_string(),
            LeaderboardKind::Contest => match self.contest_rating {
                Some(rating) => format!("{rating:.0}"),
                None => "0".to_string(),
            },
        }
    }
}

/// One activity day embedded in a profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DailySubmission {
    #[schema(example = "2025-03-14T00:00:00Z")]
    pub date: DateTime<Utc>,
    /// Number of submissions made that day.
    #[serde(default)]
    #[schema(example = 3)]
    pub count: i32,
    pub difficulty: Difficulty,
}

/// Profile row on the time-windowed activity leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[schema(example = "tourist")]
    pub username: String,
    pub platform: Platform,
    #[schema(example = 412)]
    pub solved_count: i32,
    pub contest_rank: Option<i32>,
    pub rating: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLeaderboardResponse {
    pub success: bool,
    pub data: Vec<ActivityEntry>,
    pub time_range: TimeRange,
    pub total_users: usize,
}

/// Daily activity of one profile, as consumed by the heatmap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserSubmissionHistory {
    pub username: String,
    pub platform: Platform,
    pub submissions: Vec<DailySubmission>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmissionHistoryResponse {
    pub success: bool,
    pub data: Vec<UserSubmissionHistory>,
    #[schema(example = 2025)]
    pub year: i32,
}

/// Rolling submission totals for one profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRollup {
    /// Sum of daily counts over the last 7 days.
    pub weekly_submissions: i64,
    /// Sum of daily counts over the last 30 days.
    pub monthly_submissions: i64,
    pub submission_history: Vec<DailySubmission>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserActivitySummary {
    pub username: String,
    pub platform: Platform,
    pub solved_count: i32,
    pub contest_rank: Option<i32>,
    pub rating: Option<f64>,
    pub last_updated: DateTime<Utc>,
    pub activity: ActivityRollup,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserActivitySummaryResponse {
    pub success: bool,
    pub data: UserActivitySummary,
}

/// Plain acknowledgement returned by admin actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Leaderboard refreshed successfully")]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[schema(example = "Users synced successfully")]
    pub message: String,
    pub added_count: u64,
    pub updated_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAllResponse {
    #[schema(example = "All user stats updated successfully")]
    pub message: String,
    pub updated_count: u64,
    pub total_users: u64,
}

/// Usernames to probe when testing the scrapers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScraperProbe {
    #[serde(default)]
    #[schema(example = "leetcode")]
    pub leetcode_username: Option<String>,
    #[serde(default)]
    #[schema(example = "tourist")]
    pub codeforces_username: Option<String>,
}

/// Acknowledgement carrying a free-form diagnostic payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DiagnosticResponse {
    #[schema(example = "Scrapers tested successfully")]
    pub message: String,
    #[schema(value_type = Object)]
    pub results: serde_json::Value,
}
