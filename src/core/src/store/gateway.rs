use crate::club::Club;
use crate::error::LeagueResult;
use crate::league::{DivisionTier, Fixture, LeagueTableRow, Schedule, StandingsDelta};
use crate::r#match::{PlayerMatchLine, Score};
use crate::season::{SeasonState, SeasonSummary};
use crate::shared::{ClubId, FixtureId, Gameweek, Money, SeasonId};

/// Storage seen by the engine. Every mutation happens inside a transaction
/// obtained from [`PersistenceGateway::begin`]; dropping a transaction
/// without calling `commit` discards everything it wrote.
pub trait PersistenceGateway: Send + Sync {
    type Transaction<'a>: GatewayTransaction
    where
        Self: 'a;

    fn begin(&self) -> LeagueResult<Self::Transaction<'_>>;
}

pub trait GatewayTransaction {
    fn club(&self, id: ClubId) -> LeagueResult<Club>;

    fn clubs(&self) -> LeagueResult<Vec<Club>>;

    /// Adds `delta` to the club budget and returns the new budget. A result
    /// below zero is rejected and the budget stays as it was.
    fn update_budget(&mut self, id: ClubId, delta: Money) -> LeagueResult<Money>;

    /// Charges at most the whole budget and returns the amount charged.
    fn charge_maintenance(&mut self, id: ClubId, amount: Money) -> LeagueResult<Money>;

    fn unplayed_fixtures(&self, season: SeasonId, gameweek: Gameweek) -> LeagueResult<Vec<Fixture>>;

    fn fixtures(&self, season: SeasonId) -> LeagueResult<Vec<Fixture>>;

    /// Stores the final score; fails with `FixtureAlreadyPlayed` if the
    /// fixture already has one.
    fn mark_fixture_played(&mut self, fixture_id: FixtureId, score: Score) -> LeagueResult<Fixture>;

    fn upsert_standings_row(
        &mut self,
        season: SeasonId,
        division: DivisionTier,
        club_id: ClubId,
        delta: &StandingsDelta,
    ) -> LeagueResult<()>;

    fn standings(&self, season: SeasonId, division: DivisionTier) -> LeagueResult<Vec<LeagueTableRow>>;

    fn current_season(&self) -> LeagueResult<SeasonId>;

    fn season_state(&self, season: SeasonId) -> LeagueResult<SeasonState>;

    /// Adds a season and makes it the current one.
    fn insert_season(&mut self, state: SeasonState) -> LeagueResult<()>;

    /// Moves the gameweek counter from `expected` to `next`; fails with
    /// `GameweekConflict` if somebody else already moved it.
    fn set_current_gameweek(&mut self, season: SeasonId, expected: Gameweek, next: Gameweek) -> LeagueResult<()>;

    fn set_season_closed(&mut self, season: SeasonId) -> LeagueResult<()>;

    fn division_members(&self, tier: DivisionTier) -> LeagueResult<Vec<ClubId>>;

    /// Moves `promoted` into the Premier division and `relegated` into the
    /// Championship.
    fn swap_division_membership(&mut self, promoted: &[ClubId], relegated: &[ClubId]) -> LeagueResult<()>;

    fn insert_fixtures(
        &mut self,
        season: SeasonId,
        division: DivisionTier,
        schedule: &Schedule,
    ) -> LeagueResult<Vec<FixtureId>>;

    fn record_player_stats(&mut self, club_id: ClubId, lines: &[PlayerMatchLine]) -> LeagueResult<()>;

    fn reset_player_stats(&mut self) -> LeagueResult<()>;

    fn save_season_summary(&mut self, summary: SeasonSummary) -> LeagueResult<()>;

    fn season_summary(&self, season: SeasonId) -> LeagueResult<Option<SeasonSummary>>;

    fn commit(self) -> LeagueResult<()>;
}
