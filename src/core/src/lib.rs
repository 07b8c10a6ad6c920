pub mod challenge;
pub mod club;
pub mod error;
pub mod league;
pub mod r#match;
pub mod season;
pub mod settings;
pub mod shared;
pub mod store;

#[cfg(test)]
mod testing;

pub use challenge::{
    ChallengeHandle, ChallengeId, ChallengePricing, ChallengeQuote, ChallengeReward,
    ChallengeService, ChallengeSettlement, ChallengeStatus, LiveUpdate, PendingChallenge,
    SessionContext,
};
pub use club::{
    Club, ClubController, ClubLevel, ClubStrength, Player, PlayerPosition, PlayerSeasonStatistics,
    Roster, StrengthModifiers, STARTING_ELEVEN,
};
pub use error::{ErrorKind, LeagueError, LeagueResult};
pub use league::{
    DivisionTier, Fixture, FixtureScheduler, LeagueTable, LeagueTableRow, Schedule,
    StandingsDelta,
};
pub use r#match::{MatchOutcome, MatchSimulator, Score, ScoringModel};
pub use season::{
    FixtureResult, GameweekReport, SeasonManager, SeasonPhase, SeasonState, SeasonSummary,
};
pub use settings::{ChallengeSettings, LeagueSettings, SeasonSettings};
pub use shared::*;
pub use store::{GatewayTransaction, MemoryStore, PersistenceGateway, StoreData};
