use crate::LeagueAppData;
use axum::Router;
use axum::routing::{get, post};

pub fn routes() -> Router<LeagueAppData> {
    Router::new()
        .route("/api/seasons/current", get(super::season_current_action))
        .route("/api/seasons/{season_id}/advance", post(super::season_advance_action))
        .route("/api/seasons/{season_id}/close", post(super::season_close_action))
        .route("/api/seasons/{season_id}/summary", get(super::season_summary_action))
        .route(
            "/api/seasons/{season_id}/standings/{tier}",
            get(super::season_standings_action),
        )
}
