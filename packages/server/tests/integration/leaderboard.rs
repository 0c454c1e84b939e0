use chrono::{Duration, TimeZone, Utc};
use ::common::{Platform, SubmissionStatus};
use sea_orm::Set;

use crate::common::{TestApp, point, routes};

mod solved {
    use super::*;

    #[tokio::test]
    async fn ranks_users_by_accepted_count() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::LeetCode).await;
        let b = app.create_user("bob", Platform::LeetCode).await;
        app.add_submissions(a, Platform::LeetCode, SubmissionStatus::Accepted, None, 5)
            .await;
        app.add_submissions(b, Platform::LeetCode, SubmissionStatus::Accepted, None, 2)
            .await;

        let res = app.get(routes::SOLVED).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.usernames(), ["alice", "bob"]);
        assert_eq!(res.body[0]["totalSolved"], 5);
        assert_eq!(res.body[1]["totalSolved"], 2);
        assert_eq!(res.body[0]["_id"], a);
        assert!(res.body[0].get("contestRating").is_none());
    }

    #[tokio::test]
    async fn ignores_rejected_submissions() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::Codeforces).await;
        let b = app.create_user("bob", Platform::Codeforces).await;
        app.add_submissions(a, Platform::Codeforces, SubmissionStatus::Accepted, None, 1)
            .await;
        app.add_submissions(a, Platform::Codeforces, SubmissionStatus::WrongAnswer, None, 4)
            .await;
        app.add_submissions(b, Platform::Codeforces, SubmissionStatus::RuntimeError, None, 3)
            .await;

        let res = app.get(routes::SOLVED).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.usernames(), ["alice"]);
        assert_eq!(res.body[0]["totalSolved"], 1);
    }

    #[tokio::test]
    async fn platform_filter_keeps_only_matching_rows() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::LeetCode).await;
        let b = app.create_user("bob", Platform::Codeforces).await;
        app.add_submissions(a, Platform::LeetCode, SubmissionStatus::Accepted, None, 2)
            .await;
        app.add_submissions(b, Platform::Codeforces, SubmissionStatus::Accepted, None, 9)
            .await;

        let res = app
            .get(&format!("{}?platform=leetcode", routes::SOLVED))
            .await;

        assert_eq!(res.status, 200);
        let rows = res.body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r["platform"] == "leetcode"));
    }

    #[tokio::test]
    async fn empty_database_yields_empty_list() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::SOLVED).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_platform_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?platform=hackerrank", routes::SOLVED))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod contest {
    use super::*;

    #[tokio::test]
    async fn ranks_by_mean_rating_and_skips_unrated_users() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::Codeforces).await;
        let b = app.create_user("bob", Platform::Codeforces).await;
        let c = app.create_user("carol", Platform::Codeforces).await;
        app.add_submissions(a, Platform::Codeforces, SubmissionStatus::Accepted, Some(1400.0), 1)
            .await;
        app.add_submissions(a, Platform::Codeforces, SubmissionStatus::Accepted, Some(1600.0), 1)
            .await;
        app.add_submissions(b, Platform::Codeforces, SubmissionStatus::Accepted, Some(1900.0), 2)
            .await;
        app.add_submissions(c, Platform::Codeforces, SubmissionStatus::Accepted, None, 3)
            .await;

        let res = app.get(routes::CONTEST).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.usernames(), ["bob", "alice"]);
        assert_eq!(res.body[0]["contestRating"].as_f64(), Some(1900.0));
        assert_eq!(res.body[1]["contestRating"].as_f64(), Some(1500.0));
        assert!(res.body[0].get("totalSolved").is_none());
    }

    #[tokio::test]
    async fn platform_filter_applies_to_contest_rows() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::CodeChef).await;
        let b = app.create_user("bob", Platform::Codeforces).await;
        app.add_submissions(a, Platform::CodeChef, SubmissionStatus::Accepted, Some(1700.0), 1)
            .await;
        app.add_submissions(b, Platform::Codeforces, SubmissionStatus::Accepted, Some(2100.0), 1)
            .await;

        let res = app
            .get(&format!("{}?platform=codechef", routes::CONTEST))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.usernames(), ["alice"]);
        assert_eq!(res.body[0]["platform"], "codechef");
    }
}

mod activity {
    use super::*;

    #[tokio::test]
    async fn lists_recent_profiles_by_solved_count() {
        let app = TestApp::spawn().await;
        app.create_user_with("alice", Platform::LeetCode, |u| {
            u.solved_count = Set(10);
        })
        .await;
        app.create_user_with("bob", Platform::LeetCode, |u| {
            u.solved_count = Set(30);
        })
        .await;
        app.create_user_with("stale", Platform::LeetCode, |u| {
            u.solved_count = Set(99);
            u.last_updated = Set(Utc::now() - Duration::days(3));
        })
        .await;

        let res = app
            .get(&format!("{}?timeRange=day", routes::ACTIVITY))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["timeRange"], "day");
        assert_eq!(res.body["totalUsers"], 2);
        assert_eq!(res.usernames(), ["bob", "alice"]);
        assert_eq!(res.body["data"][0]["solvedCount"], 30);
    }

    #[tokio::test]
    async fn defaults_to_week_and_breaks_ties_by_rating() {
        let app = TestApp::spawn().await;
        app.create_user_with("unrated", Platform::Codeforces, |u| {
            u.solved_count = Set(5);
        })
        .await;
        app.create_user_with("rated", Platform::Codeforces, |u| {
            u.solved_count = Set(5);
            u.rating = Set(Some(1200.0));
        })
        .await;

        let res = app.get(routes::ACTIVITY).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["timeRange"], "week");
        assert_eq!(res.usernames(), ["rated", "unrated"]);
    }

    #[tokio::test]
    async fn unknown_time_range_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?timeRange=year", routes::ACTIVITY))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod submission_history {
    use super::*;

    #[tokio::test]
    async fn returns_only_points_inside_the_year() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::LeetCode).await;
        app.set_daily_submissions(
            a,
            &[
                point(Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap(), 1),
                point(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 2),
                point(Utc.with_ymd_and_hms(2024, 7, 4, 9, 30, 0).unwrap(), 3),
                point(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(), 4),
            ],
        )
        .await;

        let res = app
            .get(&format!("{}?year=2024", routes::SUBMISSIONS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["year"], 2024);
        let points = res.body["data"][0]["submissions"].as_array().unwrap();
        let counts: Vec<_> = points.iter().map(|p| p["count"].as_i64().unwrap()).collect();
        assert_eq!(counts, [2, 3]);
    }

    #[tokio::test]
    async fn empty_year_yields_empty_data() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?year=2024&platform=leetcode", routes::SUBMISSIONS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            serde_json::json!({"success": true, "data": [], "year": 2024})
        );
    }

    #[tokio::test]
    async fn filters_by_user_and_drops_inactive_users() {
        let app = TestApp::spawn().await;
        let a = app.create_user("alice", Platform::LeetCode).await;
        let b = app.create_user("bob", Platform::LeetCode).await;
        app.create_user("idle", Platform::LeetCode).await;
        let day = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        app.set_daily_submissions(a, &[point(day, 1)]).await;
        app.set_daily_submissions(b, &[point(day, 5)]).await;

        let all = app
            .get(&format!("{}?year=2024", routes::SUBMISSIONS))
            .await;
        assert_eq!(all.usernames(), ["alice", "bob"]);

        let one = app
            .get(&format!("{}?year=2024&userId={b}", routes::SUBMISSIONS))
            .await;
        assert_eq!(one.usernames(), ["bob"]);
    }

    #[tokio::test]
    async fn malformed_year_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?year=last", routes::SUBMISSIONS))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod user_summary {
    use super::*;

    #[tokio::test]
    async fn rolls_up_recent_activity() {
        let app = TestApp::spawn().await;
        let a = app
            .create_user_with("alice", Platform::Codeforces, |u| {
                u.solved_count = Set(42);
                u.contest_rank = Set(Some(120));
            })
            .await;
        let now = Utc::now();
        app.set_daily_submissions(
            a,
            &[
                point(now - Duration::days(1), 3),
                point(now - Duration::days(10), 5),
            ],
        )
        .await;

        let res = app.get(&routes::user_summary(a)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        let data = &res.body["data"];
        assert_eq!(data["username"], "alice");
        assert_eq!(data["solvedCount"], 42);
        assert_eq!(data["contestRank"], 120);
        assert_eq!(data["activity"]["weeklySubmissions"], 3);
        assert_eq!(data["activity"]["monthlySubmissions"], 8);
        assert_eq!(
            data["activity"]["submissionHistory"].as_array().unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::user_summary(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "User not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::user_summary("not-an-id")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn openapi_document_lists_leaderboard_paths() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    assert!(paths.contains_key(routes::SOLVED));
    assert!(paths.contains_key("/api/leaderboard/user/{user_id}/summary"));
    assert!(paths.contains_key(routes::UPDATE_USER));
}
