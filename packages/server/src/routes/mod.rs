use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/leaderboard", leaderboard_routes())
}

fn leaderboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::leaderboard::solved_leaderboard))
        .routes(routes!(handlers::leaderboard::contest_leaderboard))
        .routes(routes!(handlers::leaderboard::activity_leaderboard))
        .routes(routes!(handlers::leaderboard::submission_history))
        .routes(routes!(handlers::leaderboard::user_activity_summary))
        .merge(admin_routes())
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::sync_profiles))
        .routes(routes!(handlers::admin::update_user))
        .routes(routes!(handlers::admin::update_all))
        .routes(routes!(handlers::admin::test_scrapers))
        .routes(routes!(handlers::admin::refresh))
        .routes(routes!(handlers::admin::test_url_extraction))
}
