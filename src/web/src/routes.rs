use crate::api::challenges::challenge_routes;
use crate::api::seasons::season_routes;
use crate::{ApiError, LeagueAppData};
use axum::Router;
use axum::http::Uri;
use axum::response::IntoResponse;

async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

pub struct ServerRoutes;

impl ServerRoutes {
    pub fn create() -> Router<LeagueAppData> {
        Router::<LeagueAppData>::new()
            .merge(challenge_routes())
            .merge(season_routes())
            .fallback(not_found_handler)
    }
}
