pub mod routes;

use crate::{ApiError, ApiResult, LeagueAppData};
use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use chrono::Utc;
use engine::{
    ClubId, DivisionTier, GameweekReport, GatewayTransaction, LeagueResult, MemoryStore,
    PersistenceGateway, SeasonId, SeasonManager, SeasonPhase, SeasonState, SeasonSummary,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

pub fn season_routes() -> Router<LeagueAppData> {
    routes::routes()
}

#[derive(Deserialize)]
pub struct StandingsRequest {
    pub season_id: SeasonId,
    pub tier: String,
}

#[derive(Serialize)]
pub struct SeasonView {
    #[serde(flatten)]
    pub state: SeasonState,
    pub phase: SeasonPhase,
}

#[derive(Serialize)]
pub struct StandingsItem {
    pub position: usize,
    pub club_id: ClubId,
    pub club_name: String,
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub goal_difference: i32,
    pub points: u16,
}

pub async fn season_current_action(State(state): State<LeagueAppData>) -> ApiResult<Json<SeasonView>> {
    let view = with_manager(&state, |manager| {
        let season = manager.season_state(manager.current_season()?)?;
        Ok(SeasonView {
            phase: season.phase(),
            state: season,
        })
    })
    .await?;

    Ok(Json(view))
}

pub async fn season_advance_action(
    State(state): State<LeagueAppData>,
    Path(season_id): Path<SeasonId>,
) -> ApiResult<Json<GameweekReport>> {
    let report = with_manager(&state, move |manager| manager.advance_gameweek(season_id)).await?;

    Ok(Json(report))
}

pub async fn season_close_action(
    State(state): State<LeagueAppData>,
    Path(season_id): Path<SeasonId>,
) -> ApiResult<Json<SeasonSummary>> {
    let summary = with_manager(&state, move |manager| {
        manager.close_season(season_id, Utc::now().naive_utc())
    })
    .await?;

    Ok(Json(summary))
}

pub async fn season_summary_action(
    State(state): State<LeagueAppData>,
    Path(season_id): Path<SeasonId>,
) -> ApiResult<Json<SeasonSummary>> {
    let summary = with_manager(&state, move |manager| manager.season_summary(season_id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("season {} has no summary yet", season_id)))?;

    Ok(Json(summary))
}

pub async fn season_standings_action(
    State(state): State<LeagueAppData>,
    Path(request): Path<StandingsRequest>,
) -> ApiResult<Json<Vec<StandingsItem>>> {
    let tier = DivisionTier::from_str(&request.tier).map_err(ApiError::BadRequest)?;
    let season_id = request.season_id;

    let store = Arc::clone(&state.store);

    let items = tokio::task::spawn_blocking(move || -> LeagueResult<Vec<StandingsItem>> {
        let tx = store.begin()?;

        let names: HashMap<ClubId, String> =
            tx.clubs()?.into_iter().map(|club| (club.id, club.name)).collect();

        Ok(tx
            .standings(season_id, tier)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| StandingsItem {
                position: index + 1,
                club_id: row.club_id,
                club_name: names.get(&row.club_id).cloned().unwrap_or_default(),
                played: row.played,
                won: row.won,
                drawn: row.drawn,
                lost: row.lost,
                goals_for: row.goals_for,
                goals_against: row.goals_against,
                goal_difference: row.goal_difference(),
                points: row.points,
            })
            .collect())
    })
    .await??;

    Ok(Json(items))
}

async fn with_manager<T, F>(state: &LeagueAppData, action: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&SeasonManager<'_, MemoryStore>) -> LeagueResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let settings = Arc::clone(&state.settings);

    let result = tokio::task::spawn_blocking(move || {
        let manager = SeasonManager::new(store.as_ref(), &settings.season);
        action(&manager)
    })
    .await?;

    Ok(result?)
}
