use crate::LeagueAppData;
use axum::Router;
use axum::routing::{get, post};

pub fn routes() -> Router<LeagueAppData> {
    Router::new()
        .route(
            "/api/challenges",
            post(super::challenge_initiate_action).delete(super::challenge_abandon_action),
        )
        .route("/api/challenges/quote/{opponent_id}", get(super::challenge_quote_action))
        .route("/api/challenges/live", post(super::challenge_live_action))
        .route("/api/challenges/play", post(super::challenge_play_action))
        .route("/api/challenges/finalize", post(super::challenge_finalize_action))
}
