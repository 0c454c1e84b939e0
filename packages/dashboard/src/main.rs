use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, Utc};
use clap::Parser;
use common::Platform;
use common::leaderboard::LeaderboardKind;
use tracing::Level;

use dashboard::client::{AdminAction, ApiClient};
use dashboard::page::LeaderboardPage;
use dashboard::render::render_page;
use dashboard::session::Session;

/// Show the competitive programming leaderboard in the terminal.
#[derive(Debug, Parser)]
#[command(name = "leaderboard-dashboard", version)]
struct Args {
    /// Base URL of the leaderboard routes.
    #[arg(
        long,
        env = "LEADERBOARD_API_URL",
        default_value = "http://localhost:3002/api/leaderboard"
    )]
    base_url: String,

    /// Bearer token sent with admin actions.
    #[arg(long, env = "LEADERBOARD_TOKEN")]
    token: Option<String>,

    /// Signed-in username.
    #[arg(long, env = "LEADERBOARD_USERNAME")]
    username: Option<String>,

    /// Role of the signed-in user.
    #[arg(long, env = "LEADERBOARD_ROLE", default_value = "user")]
    role: String,

    /// Ranking metric: `solved` or `contest`.
    #[arg(long, default_value = "solved")]
    kind: LeaderboardKind,

    /// Restrict to one platform.
    #[arg(long)]
    platform: Option<Platform>,

    /// Heatmap year. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Admin action to run before rendering.
    #[arg(long, value_enum)]
    action: Option<AdminAction>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let session = match args.username {
        Some(username) => Session::signed_in(username, args.role),
        None => Session::anonymous(),
    };
    let api = Arc::new(ApiClient::new(args.base_url, args.token));
    let year = args.year.unwrap_or_else(|| Utc::now().year());

    let mut page =
        LeaderboardPage::new(api, session, year).with_filters(args.kind, args.platform);
    page.load();
    page.settle().await;

    if let Some(action) = args.action {
        page.run_admin_action(action).await;
        page.settle().await;
    }

    print!("{}", render_page(&page, Instant::now()));
    Ok(())
}
