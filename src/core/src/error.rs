use crate::challenge::ChallengeId;
use crate::shared::{ClubId, FixtureId, Gameweek, Money, SeasonId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any mutation; the caller has to change its input.
    Validation,
    /// An idempotency guard fired; state is intact.
    StateConflict,
    /// The transaction could not commit and was rolled back.
    Persistence,
    /// The season is in the wrong phase for the requested operation.
    Sequencing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    #[error("a division needs at least 2 clubs, got {size}")]
    InvalidDivisionSize { size: usize },

    #[error("insufficient budget: {required} required, {available} available")]
    InsufficientBudget { required: Money, available: Money },

    #[error("club {club_id} has an incomplete squad: {players} of {required} players")]
    IncompleteSquad {
        club_id: ClubId,
        players: usize,
        required: usize,
    },

    #[error("invalid challenge cost: {0}")]
    InvalidCost(Money),

    #[error("you must be signed in to a club to do that")]
    Unauthenticated,

    #[error("a club cannot challenge itself")]
    SelfChallenge,

    #[error("club {0} not found")]
    ClubNotFound(ClubId),

    #[error("season {0} not found")]
    SeasonNotFound(SeasonId),

    #[error("fixture {0} not found")]
    FixtureNotFound(FixtureId),

    #[error("invalid roster data: {0}")]
    InvalidRoster(String),

    #[error("fixture {0} has already been played")]
    FixtureAlreadyPlayed(FixtureId),

    #[error("fixture {0} has already been applied to the standings")]
    FixtureAlreadyProcessed(FixtureId),

    #[error("fixture {0} has no final score")]
    FixtureNotPlayed(FixtureId),

    #[error("season {0} is already closed")]
    SeasonAlreadyClosed(SeasonId),

    #[error("season {season} moved past gameweek {expected}")]
    GameweekConflict { season: SeasonId, expected: Gameweek },

    #[error("a challenge is already in progress")]
    ChallengeInProgress,

    #[error("there is no pending challenge")]
    NoPendingChallenge,

    #[error("challenge {0} has already been played, its result is final")]
    ChallengeResultFixed(ChallengeId),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("season {season} is still in progress at gameweek {gameweek} of {total}")]
    SeasonNotComplete {
        season: SeasonId,
        gameweek: Gameweek,
        total: Gameweek,
    },

    #[error("season {0} has no gameweeks left to play")]
    SeasonAlreadyComplete(SeasonId),
}

impl LeagueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeagueError::InvalidDivisionSize { .. }
            | LeagueError::InsufficientBudget { .. }
            | LeagueError::IncompleteSquad { .. }
            | LeagueError::InvalidCost(_)
            | LeagueError::Unauthenticated
            | LeagueError::SelfChallenge
            | LeagueError::ClubNotFound(_)
            | LeagueError::SeasonNotFound(_)
            | LeagueError::FixtureNotFound(_)
            | LeagueError::InvalidRoster(_) => ErrorKind::Validation,

            LeagueError::FixtureAlreadyPlayed(_)
            | LeagueError::FixtureAlreadyProcessed(_)
            | LeagueError::FixtureNotPlayed(_)
            | LeagueError::SeasonAlreadyClosed(_)
            | LeagueError::GameweekConflict { .. }
            | LeagueError::ChallengeInProgress
            | LeagueError::NoPendingChallenge
            | LeagueError::ChallengeResultFixed(_) => ErrorKind::StateConflict,

            LeagueError::Persistence(_) => ErrorKind::Persistence,

            LeagueError::SeasonNotComplete { .. } | LeagueError::SeasonAlreadyComplete(_) => {
                ErrorKind::Sequencing
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Persistence
    }
}

pub type LeagueResult<T> = Result<T, LeagueError>;
