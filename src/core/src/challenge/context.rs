use crate::club::ClubLevel;
use crate::error::{LeagueError, LeagueResult};
use crate::r#match::{MatchOutcome, Score, derive_seed};
use crate::shared::{ClubId, Money};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

pub type ChallengeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Initiated,
    LiveTracking,
    Finalized,
    Abandoned,
}

impl ChallengeStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, ChallengeStatus::Initiated | ChallengeStatus::LiveTracking)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveUpdate {
    pub score: Score,
    pub outcome: MatchOutcome,
    pub tentative_reward: Money,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingChallenge {
    pub id: ChallengeId,
    pub challenger_id: ClubId,
    pub opponent_id: ClubId,
    pub cost: Money,
    /// Challenger level at initiation; rewards are computed against it.
    pub level: ClubLevel,
    pub initiated_at: NaiveDateTime,
    pub status: ChallengeStatus,
    pub live: Option<LiveUpdate>,
    /// Simulated scoreline. Once set, live reports can no longer change it
    /// and it is what finalize pays for.
    pub result: Option<Score>,
}

impl PendingChallenge {
    pub fn new(
        id: ChallengeId,
        challenger_id: ClubId,
        opponent_id: ClubId,
        cost: Money,
        level: ClubLevel,
        initiated_at: NaiveDateTime,
    ) -> Self {
        PendingChallenge {
            id,
            challenger_id,
            opponent_id,
            cost,
            level,
            initiated_at,
            status: ChallengeStatus::Initiated,
            live: None,
            result: None,
        }
    }

    pub fn tentative_reward(&self) -> Money {
        self.live.as_ref().map(|l| l.tentative_reward).unwrap_or(0)
    }

    /// The live update carrying the simulated result, if the match was played.
    pub fn played(&self) -> Option<&LiveUpdate> {
        self.result.and(self.live.as_ref())
    }

    /// Per-challenge key for the match seed. Stable for the lifetime of the
    /// challenge, so replaying cannot draw a different result.
    pub fn seed_key(&self) -> u64 {
        let clubs = derive_seed(self.challenger_id as u64, self.opponent_id as u64);
        let initiated = self.initiated_at.and_utc().timestamp_micros() as u64;

        derive_seed(derive_seed(clubs, self.id), initiated)
    }

    pub fn is_stale(&self, now: NaiveDateTime, timeout: Duration) -> bool {
        now - self.initiated_at > timeout
    }

    /// Initiated | LiveTracking -> LiveTracking
    ///
    /// After the result is recorded only a report of that same scoreline
    /// is accepted.
    pub fn track(&mut self, update: LiveUpdate) -> LeagueResult<&LiveUpdate> {
        if !self.status.is_open() {
            return Err(LeagueError::NoPendingChallenge);
        }

        if self.result.is_some_and(|result| result != update.score) {
            return Err(LeagueError::ChallengeResultFixed(self.id));
        }

        self.status = ChallengeStatus::LiveTracking;

        Ok(self.live.insert(update))
    }

    /// Initiated | LiveTracking -> LiveTracking, fixing the result.
    pub fn record_result(&mut self, update: LiveUpdate) -> LeagueResult<&LiveUpdate> {
        if !self.status.is_open() {
            return Err(LeagueError::NoPendingChallenge);
        }

        if self.result.is_some() {
            return Err(LeagueError::ChallengeResultFixed(self.id));
        }

        self.status = ChallengeStatus::LiveTracking;
        self.result = Some(update.score);

        Ok(self.live.insert(update))
    }

    /// Initiated | LiveTracking -> Finalized
    pub fn finalize(&mut self) -> LeagueResult<Money> {
        if !self.status.is_open() {
            return Err(LeagueError::NoPendingChallenge);
        }

        self.status = ChallengeStatus::Finalized;

        Ok(self.tentative_reward())
    }

    /// Initiated | LiveTracking -> Abandoned
    pub fn abandon(&mut self) -> LeagueResult<()> {
        if !self.status.is_open() {
            return Err(LeagueError::NoPendingChallenge);
        }

        self.status = ChallengeStatus::Abandoned;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeSettlement {
    pub challenge_id: ChallengeId,
    pub cost: Money,
    pub reward: Money,
    /// `reward - cost`
    pub net: Money,
    pub budget: Money,
    pub outcome: Option<MatchOutcome>,
    /// True when this settlement was already paid by an earlier call.
    pub already_settled: bool,
}

/// Challenge state of one session. Lives as long as the session and is
/// passed explicitly to every challenge operation.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub session_id: String,
    pub club_id: Option<ClubId>,
    pub pending: Option<PendingChallenge>,
    pub last_settlement: Option<ChallengeSettlement>,
    challenge_sequence: ChallengeId,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, club_id: Option<ClubId>) -> Self {
        SessionContext {
            session_id: session_id.into(),
            club_id,
            ..Default::default()
        }
    }

    pub fn authenticated_club(&self) -> LeagueResult<ClubId> {
        self.club_id.ok_or(LeagueError::Unauthenticated)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.status.is_open())
    }

    pub(crate) fn next_challenge_id(&mut self) -> ChallengeId {
        self.challenge_sequence += 1;
        self.challenge_sequence
    }
}
