use async_trait::async_trait;
use common::leaderboard::{
    DiagnosticResponse, LeaderboardKind, LeaderboardRow, MessageResponse, ScraperProbe,
    SubmissionHistoryResponse, SyncResponse, UpdateAllResponse, UserSubmissionHistory,
};
use common::Platform;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

/// Privileged actions exposed on the leaderboard page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AdminAction {
    Sync,
    UpdateAll,
    TestScrapers,
    Refresh,
    TestUrlExtraction,
}

impl AdminAction {
    pub const ALL: [AdminAction; 5] = [
        AdminAction::Sync,
        AdminAction::UpdateAll,
        AdminAction::TestScrapers,
        AdminAction::Refresh,
        AdminAction::TestUrlExtraction,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            AdminAction::Sync => "/sync",
            AdminAction::UpdateAll => "/update-all",
            AdminAction::TestScrapers => "/test-scrapers",
            AdminAction::Refresh => "/refresh",
            AdminAction::TestUrlExtraction => "/test-url-extraction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminAction::Sync => "Sync Profiles",
            AdminAction::UpdateAll => "Update Stats",
            AdminAction::TestScrapers => "Test Scrapers",
            AdminAction::Refresh => "Refresh",
            AdminAction::TestUrlExtraction => "Test URL Extraction",
        }
    }

    /// Message shown when the action fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            AdminAction::Sync => "Failed to sync profiles. Please try again later.",
            AdminAction::UpdateAll => "Failed to update stats. Please try again later.",
            AdminAction::TestScrapers => "Failed to test scrapers. Check the logs for details.",
            AdminAction::Refresh => "Failed to refresh the leaderboard.",
            AdminAction::TestUrlExtraction => "Failed to test URL extraction.",
        }
    }
}

/// The leaderboard endpoints the dashboard consumes.
#[async_trait]
pub trait LeaderboardApi: Send + Sync {
    async fn leaderboard(
        &self,
        kind: LeaderboardKind,
        platform: Option<Platform>,
    ) -> Result<Vec<LeaderboardRow>, ClientError>;

    async fn submission_history(
        &self,
        platform: Option<Platform>,
        year: i32,
    ) -> Result<Vec<UserSubmissionHistory>, ClientError>;

    /// Run an admin action and return the message to show the user.
    async fn run_admin(&self, action: AdminAction) -> Result<String, ClientError>;
}

/// HTTP client for the leaderboard API.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` points at the leaderboard route group, e.g.
    /// `http://localhost:3002/api/leaderboard`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let res = self.authorized(req).send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Pull `message` out of an error body, falling back to the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_owned())
}

fn platform_query(platform: Option<Platform>) -> Vec<(&'static str, String)> {
    platform
        .map(|p| vec![("platform", p.as_str().to_owned())])
        .unwrap_or_default()
}

#[async_trait]
impl LeaderboardApi for ApiClient {
    #[instrument(skip(self))]
    async fn leaderboard(
        &self,
        kind: LeaderboardKind,
        platform: Option<Platform>,
    ) -> Result<Vec<LeaderboardRow>, ClientError> {
        let req = self
            .http
            .get(self.url(&format!("/{}", kind.as_str())))
            .query(&platform_query(platform));
        let rows: Vec<LeaderboardRow> = self.send(req).await?;
        debug!(rows = rows.len(), "Fetched leaderboard");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn submission_history(
        &self,
        platform: Option<Platform>,
        year: i32,
    ) -> Result<Vec<UserSubmissionHistory>, ClientError> {
        let mut query = platform_query(platform);
        query.push(("year", year.to_string()));
        let req = self.http.get(self.url("/submissions")).query(&query);
        let res: SubmissionHistoryResponse = self.send(req).await?;
        Ok(res.data)
    }

    #[instrument(skip(self))]
    async fn run_admin(&self, action: AdminAction) -> Result<String, ClientError> {
        let req = self.http.post(self.url(action.path()));
        let message = match action {
            AdminAction::Sync => {
                let res: SyncResponse = self.send(req.json(&serde_json::json!({}))).await?;
                format!(
                    "Successfully synced profiles! Added {} new users, updated {} existing users.",
                    res.added_count, res.updated_count
                )
            }
            AdminAction::UpdateAll => {
                let res: UpdateAllResponse = self.send(req.json(&serde_json::json!({}))).await?;
                format!(
                    "Successfully updated stats for {} out of {} users.",
                    res.updated_count, res.total_users
                )
            }
            AdminAction::TestScrapers => {
                let probe = ScraperProbe {
                    leetcode_username: Some("leetcode".into()),
                    codeforces_username: Some("tourist".into()),
                };
                let res: DiagnosticResponse = self.send(req.json(&probe)).await?;
                debug!(results = %res.results, "Scraper test results");
                res.message
            }
            AdminAction::Refresh => {
                let res: MessageResponse = self.send(req.json(&serde_json::json!({}))).await?;
                res.message
            }
            AdminAction::TestUrlExtraction => {
                let res: DiagnosticResponse = self.send(req.json(&serde_json::json!({}))).await?;
                debug!(results = %res.results, "URL extraction results");
                res.message
            }
        };
        Ok(message)
    }
}
