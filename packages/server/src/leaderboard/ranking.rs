use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use common::Platform;
use common::leaderboard::{ActivityRollup, DailySubmission, LeaderboardRow};
use sea_orm::FromQueryResult;

use crate::entity::user;

/// Accepted-submission count for one user.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SolvedTally {
    pub user_id: i32,
    pub total_solved: i64,
}

/// Mean contest rating for one user. `None` when the user has no rated submissions.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct RatingTally {
    pub user_id: i32,
    pub contest_rating: Option<f64>,
}

fn base_row(user: &user::Model) -> LeaderboardRow {
    LeaderboardRow {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        avatar: user.avatar.clone(),
        platform: user.platform,
        total_solved: None,
        contest_rating: None,
    }
}

/// Keep the profile only if it matches the platform filter.
fn matching<'a>(
    users: &'a HashMap<i32, user::Model>,
    user_id: i32,
    platform: Option<Platform>,
) -> Option<&'a user::Model> {
    users
        .get(&user_id)
        .filter(|u| platform.is_none_or(|p| u.platform == p))
}

/// Join solved tallies to their profiles and rank them.
///
/// Tallies without a profile, or with a zero count, are dropped. Ties are
/// broken by username so the order is stable across backends.
pub fn rank_by_solved(
    tallies: Vec<SolvedTally>,
    users: &HashMap<i32, user::Model>,
    platform: Option<Platform>,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = tallies
        .into_iter()
        .filter(|t| t.total_solved > 0)
        .filter_map(|t| {
            matching(users, t.user_id, platform).map(|u| LeaderboardRow {
                total_solved: Some(t.total_solved),
                ..base_row(u)
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_solved
            .cmp(&a.total_solved)
            .then_with(|| a.username.cmp(&b.username))
    });
    rows
}

/// Join rating averages to their profiles and rank them.
///
/// Users without any rated submission are omitted.
pub fn rank_by_rating(
    tallies: Vec<RatingTally>,
    users: &HashMap<i32, user::Model>,
    platform: Option<Platform>,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = tallies
        .into_iter()
        .filter_map(|t| {
            let rating = t.contest_rating?;
            matching(users, t.user_id, platform).map(|u| LeaderboardRow {
                contest_rating: Some(rating),
                ..base_row(u)
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let (ra, rb) = (a.contest_rating.unwrap_or(0.0), b.contest_rating.unwrap_or(0.0));
        rb.partial_cmp(&ra)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.username.cmp(&b.username))
    });
    rows
}

/// `[Jan 1 of year, Jan 1 of year + 1)` in UTC.
pub fn year_bounds(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?.and_hms_opt(0, 0, 0)?;
    Some((start.and_utc(), end.and_utc()))
}

/// Points dated within the given calendar year, in their original order.
pub fn points_in_year(points: Vec<DailySubmission>, year: i32) -> Vec<DailySubmission> {
    let Some((start, end)) = year_bounds(year) else {
        return Vec::new();
    };
    points
        .into_iter()
        .filter(|p| p.date >= start && p.date < end)
        .collect()
}

fn sum_since(points: &[DailySubmission], since: DateTime<Utc>) -> i64 {
    points
        .iter()
        .filter(|p| p.date >= since)
        .map(|p| i64::from(p.count))
        .sum()
}

/// Weekly and monthly submission totals relative to `now`.
pub fn rollup(points: Vec<DailySubmission>, now: DateTime<Utc>) -> ActivityRollup {
    ActivityRollup {
        weekly_submissions: sum_since(&points, now - Duration::days(7)),
        monthly_submissions: sum_since(&points, now - Duration::days(30)),
        submission_history: points,
    }
}
