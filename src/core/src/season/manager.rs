use crate::club::{Club, ClubStrength};
use crate::error::{LeagueError, LeagueResult};
use crate::league::{
    DivisionTier, Fixture, FixtureScheduler, LeagueTable, LeagueTableRow, Schedule,
};
use crate::r#match::{GoalAttribution, MatchSimulator, PlayerMatchLine, Score, derive_seed};
use crate::season::{
    FinalTable, FinalTableRow, SeasonLeaders, SeasonRewardCalculator, SeasonState, SeasonSummary,
};
use crate::settings::SeasonSettings;
use crate::shared::{ClubId, FixtureId, Gameweek, Money, SeasonId};
use crate::store::{GatewayTransaction, PersistenceGateway};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureResult {
    pub fixture_id: FixtureId,
    pub division: DivisionTier,
    pub home_club_id: ClubId,
    pub home_club_name: String,
    pub away_club_id: ClubId,
    pub away_club_name: String,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameweekReport {
    pub season: SeasonId,
    pub gameweek: Gameweek,
    pub results: Vec<FixtureResult>,
    /// Fixtures somebody else played before this run got to them.
    pub skipped: Vec<FixtureId>,
    pub maintenance_charged: Money,
    /// False when another run moved the gameweek counter first.
    pub gameweek_advanced: bool,
    pub season_complete: bool,
}

struct SimulatedFixture {
    fixture: Fixture,
    score: Score,
    home_lines: Vec<PlayerMatchLine>,
    away_lines: Vec<PlayerMatchLine>,
}

pub struct SeasonManager<'a, G: PersistenceGateway> {
    gateway: &'a G,
    settings: &'a SeasonSettings,
    simulator: MatchSimulator,
}

impl<'a, G: PersistenceGateway> SeasonManager<'a, G> {
    pub fn new(gateway: &'a G, settings: &'a SeasonSettings) -> Self {
        SeasonManager {
            gateway,
            settings,
            simulator: MatchSimulator::new(settings.scoring),
        }
    }

    /// Creates season `season` from the current division membership,
    /// together with the calendar of both divisions.
    pub fn initialize_season(&self, season: SeasonId) -> LeagueResult<SeasonState> {
        let mut tx = self.gateway.begin()?;

        let state = Self::create_season(&mut tx, season)?;

        tx.commit()?;

        info!(
            "📅 Season {} created: {} gameweeks",
            state.id, state.total_gameweeks
        );

        Ok(state)
    }

    pub fn current_season(&self) -> LeagueResult<SeasonId> {
        self.gateway.begin()?.current_season()
    }

    pub fn season_state(&self, season: SeasonId) -> LeagueResult<SeasonState> {
        self.gateway.begin()?.season_state(season)
    }

    pub fn standings(&self, season: SeasonId, tier: DivisionTier) -> LeagueResult<Vec<LeagueTableRow>> {
        self.gateway.begin()?.standings(season, tier)
    }

    pub fn fixtures(&self, season: SeasonId) -> LeagueResult<Vec<Fixture>> {
        self.gateway.begin()?.fixtures(season)
    }

    pub fn season_summary(&self, season: SeasonId) -> LeagueResult<Option<SeasonSummary>> {
        self.gateway.begin()?.season_summary(season)
    }

    /// Plays every unplayed fixture of the current gameweek, then charges
    /// maintenance and moves the season to the next gameweek.
    pub fn advance_gameweek(&self, season: SeasonId) -> LeagueResult<GameweekReport> {
        let (state, fixtures, clubs) = {
            let tx = self.gateway.begin()?;
            let state = tx.season_state(season)?;

            if state.closed || state.current_gameweek > state.total_gameweeks {
                warn!("season {}: no gameweek left to advance", season);
                return Err(LeagueError::SeasonAlreadyComplete(season));
            }

            let fixtures = tx.unplayed_fixtures(season, state.current_gameweek)?;
            let clubs: BTreeMap<ClubId, Club> =
                tx.clubs()?.into_iter().map(|club| (club.id, club)).collect();

            (state, fixtures, clubs)
        };

        let gameweek = state.current_gameweek;

        info!(
            "⚽ Season {}: simulating gameweek {} of {} ({} fixtures)",
            season,
            gameweek,
            state.total_gameweeks,
            fixtures.len()
        );

        let simulated = fixtures
            .into_par_iter()
            .map(|fixture| self.simulate_fixture(fixture, &clubs))
            .collect::<LeagueResult<Vec<SimulatedFixture>>>()?;

        let mut results = Vec::with_capacity(simulated.len());
        let mut skipped = Vec::new();

        for item in simulated {
            match self.apply_fixture(&item) {
                Ok(()) => {
                    debug!(
                        "fixture {}: {} {} {}",
                        item.fixture.id, item.fixture.home_club_id, item.score, item.fixture.away_club_id
                    );

                    results.push(FixtureResult {
                        fixture_id: item.fixture.id,
                        division: item.fixture.division,
                        home_club_id: item.fixture.home_club_id,
                        home_club_name: club_name(&clubs, item.fixture.home_club_id),
                        away_club_id: item.fixture.away_club_id,
                        away_club_name: club_name(&clubs, item.fixture.away_club_id),
                        score: item.score,
                    });
                }
                Err(LeagueError::FixtureAlreadyPlayed(id)) => {
                    warn!("fixture {} was already played, skipping", id);
                    skipped.push(id);
                }
                Err(err) => return Err(err),
            }
        }

        let mut tx = self.gateway.begin()?;

        let next = gameweek + 1;

        match tx.set_current_gameweek(season, gameweek, next) {
            Ok(()) => {}
            Err(LeagueError::GameweekConflict { .. }) => {
                warn!(
                    "season {}: gameweek {} was advanced concurrently, maintenance not charged",
                    season, gameweek
                );

                return Ok(GameweekReport {
                    season,
                    gameweek,
                    results,
                    skipped,
                    maintenance_charged: 0,
                    gameweek_advanced: false,
                    season_complete: false,
                });
            }
            Err(err) => return Err(err),
        }

        let mut maintenance_charged = 0;
        for club_id in clubs.keys() {
            maintenance_charged += tx.charge_maintenance(*club_id, self.settings.weekly_maintenance)?;
        }

        tx.commit()?;

        let season_complete = next > state.total_gameweeks;

        if season_complete {
            info!("🏁 Season {}: all {} gameweeks played", season, state.total_gameweeks);
        }

        Ok(GameweekReport {
            season,
            gameweek,
            results,
            skipped,
            maintenance_charged,
            gameweek_advanced: true,
            season_complete,
        })
    }

    /// Ranks both divisions, pays rewards, moves clubs between divisions and
    /// opens the next season. Closing a closed season returns its summary.
    pub fn close_season(&self, season: SeasonId, now: NaiveDateTime) -> LeagueResult<SeasonSummary> {
        let mut tx = self.gateway.begin()?;

        let state = tx.season_state(season)?;

        if state.closed {
            info!("season {} is already closed", season);
            return tx
                .season_summary(season)?
                .ok_or(LeagueError::SeasonAlreadyClosed(season));
        }

        if state.current_gameweek <= state.total_gameweeks {
            warn!(
                "season {}: close requested at gameweek {} of {}",
                season, state.current_gameweek, state.total_gameweeks
            );
            return Err(LeagueError::SeasonNotComplete {
                season,
                gameweek: state.current_gameweek,
                total: state.total_gameweeks,
            });
        }

        tx.set_season_closed(season)?;

        let clubs: BTreeMap<ClubId, Club> =
            tx.clubs()?.into_iter().map(|club| (club.id, club)).collect();

        let mut tables = Vec::with_capacity(DivisionTier::ALL.len());
        let mut rankings: BTreeMap<DivisionTier, LeagueTable> = BTreeMap::new();
        let mut rewards = Vec::new();

        for tier in DivisionTier::ALL {
            let table = Self::load_table(&tx, season, tier)?;
            let club_count = table.rows.len();

            for (index, row) in table.rows.iter().enumerate() {
                let reward =
                    SeasonRewardCalculator::reward(row.club_id, tier, index + 1, club_count, self.settings);
                tx.update_budget(row.club_id, reward.total)?;
                rewards.push(reward);
            }

            tables.push(FinalTable {
                division: tier,
                rows: table
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| FinalTableRow {
                        position: index + 1,
                        club_name: club_name(&clubs, row.club_id),
                        row: row.clone(),
                    })
                    .collect(),
            });

            rankings.insert(tier, table);
        }

        let (promoted, relegated) = Self::movements(&rankings, self.settings.promotion_slots);

        let leaders = SeasonLeaders::collect(
            &clubs.values().cloned().collect::<Vec<Club>>(),
            self.settings.min_rated_appearances,
        );

        tx.swap_division_membership(&promoted, &relegated)?;

        let next_season = season + 1;
        Self::create_season(&mut tx, next_season)?;

        tx.reset_player_stats()?;

        let summary = SeasonSummary {
            season,
            next_season,
            closed_at: now,
            tables,
            rewards,
            leaders,
            promoted,
            relegated,
        };

        tx.save_season_summary(summary.clone())?;
        tx.commit()?;

        info!("🏆 Season {} closed", season);
        for tier in DivisionTier::ALL {
            if let Some(champion) = summary.champion(tier) {
                info!("🥇 {} champions: {}", tier, club_name(&clubs, champion));
            }
        }
        info!(
            "⬆️ promoted: {:?}, ⬇️ relegated: {:?}",
            summary.promoted, summary.relegated
        );

        Ok(summary)
    }

    fn create_season<T: GatewayTransaction>(tx: &mut T, season: SeasonId) -> LeagueResult<SeasonState> {
        let mut schedules: Vec<(DivisionTier, Schedule)> = Vec::with_capacity(DivisionTier::ALL.len());

        for tier in DivisionTier::ALL {
            let members = tx.division_members(tier)?;
            schedules.push((tier, FixtureScheduler::generate_season(&members)?));
        }

        let total_gameweeks = schedules
            .iter()
            .map(|(_, schedule)| schedule.gameweeks())
            .max()
            .unwrap_or_default();

        let state = SeasonState::new(season, total_gameweeks);
        tx.insert_season(state.clone())?;

        for (tier, schedule) in schedules.iter() {
            tx.insert_fixtures(season, *tier, schedule)?;
        }

        Ok(state)
    }

    /// Top of the Championship goes up, bottom of the Premier division goes
    /// down. Never more than half of the smaller division moves.
    fn movements(rankings: &BTreeMap<DivisionTier, LeagueTable>, slots: usize) -> (Vec<ClubId>, Vec<ClubId>) {
        let (Some(premier), Some(championship)) = (
            rankings.get(&DivisionTier::Premier),
            rankings.get(&DivisionTier::Championship),
        ) else {
            return (Vec::new(), Vec::new());
        };

        let slots = slots
            .min(premier.rows.len() / 2)
            .min(championship.rows.len() / 2);

        (championship.top(slots), premier.bottom(slots))
    }

    fn simulate_fixture(
        &self,
        fixture: Fixture,
        clubs: &BTreeMap<ClubId, Club>,
    ) -> LeagueResult<SimulatedFixture> {
        let home = clubs
            .get(&fixture.home_club_id)
            .ok_or(LeagueError::ClubNotFound(fixture.home_club_id))?;
        let away = clubs
            .get(&fixture.away_club_id)
            .ok_or(LeagueError::ClubNotFound(fixture.away_club_id))?;

        let home_strength = ClubStrength::evaluate(home) * self.settings.home_advantage;
        let away_strength = ClubStrength::evaluate(away);

        let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(self.settings.base_seed, fixture.id));

        let score = self.simulator.simulate(home_strength, away_strength, &mut rng);

        let home_lines =
            GoalAttribution::attribute(&home.roster.starting_eleven(), score.home, score.away, &mut rng);
        let away_lines =
            GoalAttribution::attribute(&away.roster.starting_eleven(), score.away, score.home, &mut rng);

        Ok(SimulatedFixture {
            fixture,
            score,
            home_lines,
            away_lines,
        })
    }

    /// Stored table of one division, aware of every fixture already
    /// counted in it.
    fn load_table<T: GatewayTransaction>(
        tx: &T,
        season: SeasonId,
        tier: DivisionTier,
    ) -> LeagueResult<LeagueTable> {
        let applied = tx
            .fixtures(season)?
            .into_iter()
            .filter(|f| f.division == tier && f.is_played())
            .map(|f| f.id);

        Ok(LeagueTable::from_rows(tx.standings(season, tier)?, applied))
    }

    fn apply_fixture(&self, item: &SimulatedFixture) -> LeagueResult<()> {
        let mut tx = self.gateway.begin()?;

        let mut table = Self::load_table(&tx, item.fixture.season, item.fixture.division)?;

        let played = tx.mark_fixture_played(item.fixture.id, item.score)?;

        for (club_id, delta) in table.apply_result(&played)? {
            tx.upsert_standings_row(played.season, played.division, club_id, &delta)?;
        }

        tx.record_player_stats(played.home_club_id, &item.home_lines)?;
        tx.record_player_stats(played.away_club_id, &item.away_lines)?;

        tx.commit()
    }
}

fn club_name(clubs: &BTreeMap<ClubId, Club>, id: ClubId) -> String {
    clubs
        .get(&id)
        .map(|club| club.name.clone())
        .unwrap_or_else(|| format!("Club {}", id))
}
