use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ::common::leaderboard::DailySubmission;
use ::common::{Difficulty, Platform, SubmissionStatus};
use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;

use server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use server::entity::{submission, user};
use server::state::AppState;
use server::sync::NoopSyncService;
use server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const SOLVED: &str = "/api/leaderboard/solved";
    pub const CONTEST: &str = "/api/leaderboard/contest";
    pub const ACTIVITY: &str = "/api/leaderboard/activity";
    pub const SUBMISSIONS: &str = "/api/leaderboard/submissions";
    pub const SYNC: &str = "/api/leaderboard/sync";
    pub const UPDATE_USER: &str = "/api/leaderboard/update-user";
    pub const UPDATE_ALL: &str = "/api/leaderboard/update-all";
    pub const TEST_SCRAPERS: &str = "/api/leaderboard/test-scrapers";
    pub const REFRESH: &str = "/api/leaderboard/refresh";
    pub const TEST_URL_EXTRACTION: &str = "/api/leaderboard/test-url-extraction";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn user_summary(id: impl std::fmt::Display) -> String {
        format!("/api/leaderboard/user/{id}/summary")
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    /// Start the router against a fresh in-memory SQLite database.
    pub async fn spawn() -> Self {
        // Every connection to `sqlite::memory:` opens its own database, so the
        // pool must hold exactly one.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory database");

        server::database::create_schema(&db)
            .await
            .expect("Failed to create schema");
        server::database::ensure_indexes(&db).await;

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
        };

        let state = AppState {
            sync: Arc::new(NoopSyncService::new(db.clone())),
            db: db.clone(),
            config: app_config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Token for a caller with the given role.
    pub fn token(&self, username: &str, role: &str) -> String {
        jwt::sign(1, username, role, JWT_SECRET).expect("Failed to sign token")
    }

    /// Insert a profile directly and return its `id`.
    pub async fn create_user(&self, username: &str, platform: Platform) -> i32 {
        self.create_user_with(username, platform, |_| {}).await
    }

    /// Insert a profile, letting the caller adjust fields before it is written.
    pub async fn create_user_with(
        &self,
        username: &str,
        platform: Platform,
        customize: impl FnOnce(&mut user::ActiveModel),
    ) -> i32 {
        let now = Utc::now();
        let mut model = user::ActiveModel {
            username: Set(username.to_string()),
            platform: Set(platform),
            name: Set(None),
            avatar: Set(None),
            solved_count: Set(0),
            contest_rank: Set(None),
            rating: Set(None),
            submissions: Set(serde_json::json!([])),
            last_updated: Set(now),
            created_at: Set(now),
            ..Default::default()
        };
        customize(&mut model);

        model
            .insert(&self.db)
            .await
            .expect("Failed to insert user")
            .id
    }

    /// Replace a profile's embedded daily activity.
    pub async fn set_daily_submissions(&self, user_id: i32, points: &[DailySubmission]) {
        let model = user::ActiveModel {
            id: Set(user_id),
            submissions: Set(serde_json::to_value(points).unwrap()),
            ..Default::default()
        };
        model
            .update(&self.db)
            .await
            .expect("Failed to update daily submissions");
    }

    /// Insert `count` submission events for a profile.
    pub async fn add_submissions(
        &self,
        user_id: i32,
        platform: Platform,
        status: SubmissionStatus,
        rating: Option<f64>,
        count: usize,
    ) {
        let now = Utc::now();
        for i in 0..count {
            submission::ActiveModel {
                submitted_at: Set(now),
                platform: Set(platform),
                user_id: Set(user_id),
                problem_id: Set(format!("P{i}")),
                problem_title: Set(format!("Problem {i}")),
                difficulty: Set(Difficulty::Medium),
                status: Set(status),
                language: Set("cpp".to_string()),
                execution_time: Set(None),
                memory_used: Set(None),
                contest_id: Set(rating.map(|_| "1000".to_string())),
                rating: Set(rating),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .expect("Failed to insert submission");
        }
    }
}

pub fn point(date: DateTime<Utc>, count: i32) -> DailySubmission {
    DailySubmission {
        date,
        count,
        difficulty: Difficulty::Easy,
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// The `username` of every element of a JSON array body (or of `data`).
    pub fn usernames(&self) -> Vec<String> {
        let list = if self.body.is_array() {
            &self.body
        } else {
            &self.body["data"]
        };
        list.as_array()
            .expect("response should contain an array")
            .iter()
            .map(|row| row["username"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
