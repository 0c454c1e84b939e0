use ::common::Platform;
use serde_json::json;

use crate::common::{TestApp, routes};

fn submission(problem_id: &str, status: &str) -> serde_json::Value {
    json!({
        "submittedAt": "2025-02-01T10:00:00Z",
        "problemId": problem_id,
        "problemTitle": format!("Problem {problem_id}"),
        "difficulty": "easy",
        "status": status,
        "language": "rust",
        "executionTime": 12.5,
    })
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = TestApp::spawn().await;

        for path in [
            routes::SYNC,
            routes::UPDATE_ALL,
            routes::REFRESH,
            routes::TEST_URL_EXTRACTION,
            routes::TEST_SCRAPERS,
            routes::UPDATE_USER,
        ] {
            let res = app.post_without_token(path, &json!({})).await;
            assert_eq!(res.status, 401, "{path} should require auth");
            assert_eq!(res.body["code"], "TOKEN_MISSING");
        }
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let app = TestApp::spawn().await;
        let forged = server::utils::jwt::sign(1, "mallory", "admin", "wrong-secret").unwrap();

        let res = app.post_with_token(routes::SYNC, &json!({}), &forged).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod sync_actions {
    use super::*;

    #[tokio::test]
    async fn sync_reports_counts() {
        let app = TestApp::spawn().await;
        let token = app.token("bob", "user");

        let res = app.post_with_token(routes::SYNC, &json!({}), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Users synced successfully");
        assert_eq!(res.body["addedCount"], 0);
        assert_eq!(res.body["updatedCount"], 0);
    }

    #[tokio::test]
    async fn update_all_requires_admin_role() {
        let app = TestApp::spawn().await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(routes::UPDATE_ALL, &json!({}), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn update_all_counts_stored_profiles() {
        let app = TestApp::spawn().await;
        app.create_user("alice", Platform::LeetCode).await;
        app.create_user("bob", Platform::Codeforces).await;
        let token = app.token("admin", "admin");

        let res = app
            .post_with_token(routes::UPDATE_ALL, &json!({}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["updatedCount"], 0);
        assert_eq!(res.body["totalUsers"], 2);
    }

    #[tokio::test]
    async fn scraper_probe_echoes_usernames() {
        let app = TestApp::spawn().await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(
                routes::TEST_SCRAPERS,
                &json!({"leetcodeUsername": "lc_user", "codeforcesUsername": "tourist"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Scrapers tested successfully");
        assert_eq!(res.body["results"]["leetcode"]["username"], "lc_user");
        assert_eq!(res.body["results"]["codeforces"]["username"], "tourist");
        assert_eq!(res.body["results"]["codeforces"]["implemented"], false);
    }

    #[tokio::test]
    async fn refresh_and_url_extraction_acknowledge() {
        let app = TestApp::spawn().await;
        let token = app.token("bob", "user");

        let refresh = app
            .post_with_token(routes::REFRESH, &json!({}), &token)
            .await;
        assert_eq!(refresh.status, 200);
        assert_eq!(refresh.body["message"], "Leaderboard refreshed successfully");

        let extraction = app
            .post_with_token(routes::TEST_URL_EXTRACTION, &json!({}), &token)
            .await;
        assert_eq!(extraction.status, 200);
        assert!(extraction.body["results"].is_object());
    }
}

mod update_user {
    use super::*;

    #[tokio::test]
    async fn recorded_submissions_feed_the_leaderboard() {
        let app = TestApp::spawn().await;
        let id = app.create_user("alice", Platform::LeetCode).await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(
                routes::UPDATE_USER,
                &json!({
                    "userId": id,
                    "platform": "leetcode",
                    "submissions": [
                        submission("1", "accepted"),
                        submission("2", "accepted"),
                        submission("3", "wrong_answer"),
                    ],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["insertedCount"], 3);

        let board = app.get(routes::SOLVED).await;
        assert_eq!(board.usernames(), ["alice"]);
        assert_eq!(board.body[0]["totalSolved"], 2);
    }

    #[tokio::test]
    async fn empty_batch_inserts_nothing() {
        let app = TestApp::spawn().await;
        let id = app.create_user("alice", Platform::LeetCode).await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(
                routes::UPDATE_USER,
                &json!({"userId": id, "platform": "leetcode", "submissions": []}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["insertedCount"], 0);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(
                routes::UPDATE_USER,
                &json!({
                    "userId": 4242,
                    "platform": "leetcode",
                    "submissions": [submission("1", "accepted")],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_item_rejects_the_whole_batch() {
        let app = TestApp::spawn().await;
        let id = app.create_user("alice", Platform::LeetCode).await;
        let token = app.token("bob", "user");
        let mut bad = submission("2", "accepted");
        bad["language"] = json!("");

        let res = app
            .post_with_token(
                routes::UPDATE_USER,
                &json!({
                    "userId": id,
                    "platform": "leetcode",
                    "submissions": [submission("1", "accepted"), bad],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let board = app.get(routes::SOLVED).await;
        assert_eq!(board.body, json!([]));
    }

    #[tokio::test]
    async fn batch_for_another_platform_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_user("alice", Platform::LeetCode).await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(
                routes::UPDATE_USER,
                &json!({
                    "userId": id,
                    "platform": "codeforces",
                    "submissions": [submission("1", "accepted")],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let board = app.get(routes::SOLVED).await;
        assert_eq!(board.body, json!([]));
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.token("bob", "user");

        let res = app
            .post_with_token(
                routes::UPDATE_USER,
                &json!({"userId": "one", "platform": "leetcode"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
