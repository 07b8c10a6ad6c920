use crate::{ApiError, ApiResult};
use axum::http::HeaderMap;
use engine::ClubId;

pub const SESSION_HEADER: &str = "x-session-id";
pub const CLUB_HEADER: &str = "x-club-id";

/// Session and club identity supplied by the auth layer in front of us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHeaders {
    pub session_id: String,
    pub club_id: Option<ClubId>,
}

impl SessionHeaders {
    pub fn from_headers(headers: &HeaderMap) -> ApiResult<Self> {
        let session_id = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::BadRequest(format!("missing {} header", SESSION_HEADER)))?
            .to_string();

        let club_id = match headers.get(CLUB_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .ok()
                    .and_then(|v| v.trim().parse::<ClubId>().ok())
                    .ok_or_else(|| ApiError::BadRequest(format!("invalid {} header", CLUB_HEADER)))?,
            ),
            None => None,
        };

        Ok(SessionHeaders { session_id, club_id })
    }
}
