pub mod routes;

use crate::{ApiResult, LeagueAppData, SessionHeaders};
use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use chrono::Utc;
use engine::{
    ChallengeHandle, ChallengeQuote, ChallengeService, ChallengeSettlement, ClubId, LeagueResult,
    LiveUpdate, MemoryStore, PendingChallenge, SessionContext,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn challenge_routes() -> Router<LeagueAppData> {
    routes::routes()
}

#[derive(Deserialize)]
pub struct ChallengeInitiateRequest {
    pub opponent_id: ClubId,
}

#[derive(Deserialize)]
pub struct ChallengeLiveRequest {
    pub challenger_goals: u8,
    pub opponent_goals: u8,
}

#[derive(Serialize)]
pub struct ChallengeAbandonResponse {
    pub abandoned: Option<PendingChallenge>,
}

pub async fn challenge_quote_action(
    State(state): State<LeagueAppData>,
    headers: HeaderMap,
    Path(opponent_id): Path<ClubId>,
) -> ApiResult<Json<ChallengeQuote>> {
    let identity = SessionHeaders::from_headers(&headers)?;

    let quote = in_session(&state, identity, move |service, session| {
        service.quote(session, opponent_id)
    })
    .await?;

    Ok(Json(quote))
}

pub async fn challenge_initiate_action(
    State(state): State<LeagueAppData>,
    headers: HeaderMap,
    Json(request): Json<ChallengeInitiateRequest>,
) -> ApiResult<Json<ChallengeHandle>> {
    let identity = SessionHeaders::from_headers(&headers)?;

    let handle = in_session(&state, identity, move |service, session| {
        service.initiate(session, request.opponent_id, Utc::now().naive_utc())
    })
    .await?;

    Ok(Json(handle))
}

pub async fn challenge_live_action(
    State(state): State<LeagueAppData>,
    headers: HeaderMap,
    Json(request): Json<ChallengeLiveRequest>,
) -> ApiResult<Json<LiveUpdate>> {
    let identity = SessionHeaders::from_headers(&headers)?;

    let update = in_session(&state, identity, move |service, session| {
        service.report_live(session, request.challenger_goals, request.opponent_goals)
    })
    .await?;

    Ok(Json(update))
}

pub async fn challenge_play_action(
    State(state): State<LeagueAppData>,
    headers: HeaderMap,
) -> ApiResult<Json<LiveUpdate>> {
    let identity = SessionHeaders::from_headers(&headers)?;

    let update = in_session(&state, identity, |service, session| service.play(session)).await?;

    Ok(Json(update))
}

pub async fn challenge_finalize_action(
    State(state): State<LeagueAppData>,
    headers: HeaderMap,
) -> ApiResult<Json<ChallengeSettlement>> {
    let identity = SessionHeaders::from_headers(&headers)?;

    let settlement = in_session(&state, identity, |service, session| service.finalize(session)).await?;

    Ok(Json(settlement))
}

pub async fn challenge_abandon_action(
    State(state): State<LeagueAppData>,
    headers: HeaderMap,
) -> ApiResult<Json<ChallengeAbandonResponse>> {
    let identity = SessionHeaders::from_headers(&headers)?;

    let abandoned = in_session(&state, identity, |service, session| Ok(service.abandon(session))).await?;

    Ok(Json(ChallengeAbandonResponse { abandoned }))
}

/// Runs `action` on a blocking thread against the caller's session. Stale
/// pending challenges are abandoned first. Only this session is locked.
async fn in_session<T, F>(state: &LeagueAppData, identity: SessionHeaders, action: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ChallengeService<'_, MemoryStore>, &mut SessionContext) -> LeagueResult<T> + Send + 'static,
{
    let mut session = state.session(&identity.session_id).await.lock_owned().await;
    let store = Arc::clone(&state.store);
    let settings = Arc::clone(&state.settings);

    let result = tokio::task::spawn_blocking(move || {
        session.club_id = identity.club_id;

        let service = ChallengeService::new(
            store.as_ref(),
            &settings.challenge,
            settings.season.scoring,
            settings.season.base_seed,
        );

        if let Some(expired) =
            service.expire_stale(&mut *session, Utc::now().naive_utc(), service.default_timeout())
        {
            debug!("session {}: challenge {} expired", session.session_id, expired.id);
        }

        action(&service, &mut *session)
    })
    .await?;

    Ok(result?)
}
