use crate::club::Club;
use crate::error::{LeagueError, LeagueResult};
use crate::league::{
    DivisionTier, Fixture, LeagueTableRow, Schedule, StandingsDelta, compare_rows,
};
use crate::r#match::{PlayerMatchLine, Score};
use crate::season::{SeasonState, SeasonSummary};
use crate::shared::{ClubId, FixtureId, Gameweek, Money, SeasonId};
use crate::store::{GatewayTransaction, PersistenceGateway};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct StoreData {
    pub clubs: BTreeMap<ClubId, Club>,
    pub divisions: BTreeMap<DivisionTier, Vec<ClubId>>,
    pub seasons: BTreeMap<SeasonId, SeasonState>,
    pub current_season: Option<SeasonId>,
    pub fixtures: BTreeMap<FixtureId, Fixture>,
    pub next_fixture_id: FixtureId,
    pub standings: BTreeMap<(SeasonId, DivisionTier, ClubId), LeagueTableRow>,
    pub summaries: BTreeMap<SeasonId, SeasonSummary>,
}

impl StoreData {
    pub fn with_clubs(clubs: Vec<Club>) -> Self {
        let mut data = StoreData {
            next_fixture_id: 1,
            ..Default::default()
        };

        for club in clubs {
            data.divisions.entry(club.division).or_default().push(club.id);
            data.clubs.insert(club.id, club);
        }

        data
    }
}

/// Reference gateway. Transactions are serialised by a mutex and work on a
/// private copy of the data that replaces the shared one on commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    pub fn new(data: StoreData) -> Self {
        MemoryStore {
            data: Mutex::new(data),
            fail_next_commit: AtomicBool::new(false),
        }
    }

    /// The next commit fails with a persistence error and is rolled back.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> LeagueResult<StoreData> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> LeagueResult<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|_| LeagueError::Persistence(String::from("store lock poisoned")))
    }
}

impl PersistenceGateway for MemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> LeagueResult<MemoryTransaction<'_>> {
        let guard = self.lock()?;
        let working = guard.clone();

        Ok(MemoryTransaction {
            guard,
            working,
            fail_commit: &self.fail_next_commit,
        })
    }
}

pub struct MemoryTransaction<'a> {
    guard: MutexGuard<'a, StoreData>,
    working: StoreData,
    fail_commit: &'a AtomicBool,
}

impl MemoryTransaction<'_> {
    fn club_mut(&mut self, id: ClubId) -> LeagueResult<&mut Club> {
        self.working.clubs.get_mut(&id).ok_or(LeagueError::ClubNotFound(id))
    }

    fn season_mut(&mut self, season: SeasonId) -> LeagueResult<&mut SeasonState> {
        self.working
            .seasons
            .get_mut(&season)
            .ok_or(LeagueError::SeasonNotFound(season))
    }
}

impl GatewayTransaction for MemoryTransaction<'_> {
    fn club(&self, id: ClubId) -> LeagueResult<Club> {
        self.working.clubs.get(&id).cloned().ok_or(LeagueError::ClubNotFound(id))
    }

    fn clubs(&self) -> LeagueResult<Vec<Club>> {
        Ok(self.working.clubs.values().cloned().collect())
    }

    fn update_budget(&mut self, id: ClubId, delta: Money) -> LeagueResult<Money> {
        self.club_mut(id)?.finance.apply(delta)
    }

    fn charge_maintenance(&mut self, id: ClubId, amount: Money) -> LeagueResult<Money> {
        Ok(self.club_mut(id)?.finance.charge_up_to(amount))
    }

    fn unplayed_fixtures(&self, season: SeasonId, gameweek: Gameweek) -> LeagueResult<Vec<Fixture>> {
        Ok(self
            .working
            .fixtures
            .values()
            .filter(|f| f.season == season && f.gameweek == gameweek && !f.is_played())
            .cloned()
            .collect())
    }

    fn fixtures(&self, season: SeasonId) -> LeagueResult<Vec<Fixture>> {
        Ok(self
            .working
            .fixtures
            .values()
            .filter(|f| f.season == season)
            .cloned()
            .collect())
    }

    fn mark_fixture_played(&mut self, fixture_id: FixtureId, score: Score) -> LeagueResult<Fixture> {
        let fixture = self
            .working
            .fixtures
            .get_mut(&fixture_id)
            .ok_or(LeagueError::FixtureNotFound(fixture_id))?;

        if fixture.is_played() {
            return Err(LeagueError::FixtureAlreadyPlayed(fixture_id));
        }

        fixture.score = Some(score);

        Ok(fixture.clone())
    }

    fn upsert_standings_row(
        &mut self,
        season: SeasonId,
        division: DivisionTier,
        club_id: ClubId,
        delta: &StandingsDelta,
    ) -> LeagueResult<()> {
        self.working
            .standings
            .entry((season, division, club_id))
            .or_insert_with(|| LeagueTableRow::new(club_id))
            .apply(delta);

        Ok(())
    }

    fn standings(&self, season: SeasonId, division: DivisionTier) -> LeagueResult<Vec<LeagueTableRow>> {
        if !self.working.seasons.contains_key(&season) {
            return Err(LeagueError::SeasonNotFound(season));
        }

        let mut rows: Vec<LeagueTableRow> = self
            .working
            .standings
            .range((season, division, ClubId::MIN)..=(season, division, ClubId::MAX))
            .map(|(_, row)| row.clone())
            .collect();

        rows.sort_by(compare_rows);

        Ok(rows)
    }

    fn current_season(&self) -> LeagueResult<SeasonId> {
        self.working
            .current_season
            .ok_or_else(|| LeagueError::Persistence(String::from("no season has been created")))
    }

    fn season_state(&self, season: SeasonId) -> LeagueResult<SeasonState> {
        self.working
            .seasons
            .get(&season)
            .cloned()
            .ok_or(LeagueError::SeasonNotFound(season))
    }

    fn insert_season(&mut self, state: SeasonState) -> LeagueResult<()> {
        if self.working.seasons.contains_key(&state.id) {
            return Err(LeagueError::Persistence(format!("season {} already exists", state.id)));
        }

        self.working.current_season = Some(state.id);
        self.working.seasons.insert(state.id, state);

        Ok(())
    }

    fn set_current_gameweek(&mut self, season: SeasonId, expected: Gameweek, next: Gameweek) -> LeagueResult<()> {
        let state = self.season_mut(season)?;

        if state.current_gameweek != expected {
            warn!(
                "season {}: gameweek is {}, expected {}",
                season, state.current_gameweek, expected
            );
            return Err(LeagueError::GameweekConflict { season, expected });
        }

        state.current_gameweek = next;

        Ok(())
    }

    fn set_season_closed(&mut self, season: SeasonId) -> LeagueResult<()> {
        let state = self.season_mut(season)?;

        if state.closed {
            return Err(LeagueError::SeasonAlreadyClosed(season));
        }

        state.closed = true;

        Ok(())
    }

    fn division_members(&self, tier: DivisionTier) -> LeagueResult<Vec<ClubId>> {
        Ok(self.working.divisions.get(&tier).cloned().unwrap_or_default())
    }

    fn swap_division_membership(&mut self, promoted: &[ClubId], relegated: &[ClubId]) -> LeagueResult<()> {
        for (ids, from, to) in [
            (promoted, DivisionTier::Championship, DivisionTier::Premier),
            (relegated, DivisionTier::Premier, DivisionTier::Championship),
        ] {
            for id in ids {
                let club = self.club_mut(*id)?;
                if club.division != from {
                    return Err(LeagueError::Persistence(format!(
                        "club {} is not in the {}",
                        id, from
                    )));
                }
                club.division = to;
            }

            self.working.divisions.entry(from).or_default().retain(|c| !ids.contains(c));
            self.working.divisions.entry(to).or_default().extend_from_slice(ids);
        }

        for members in self.working.divisions.values_mut() {
            members.sort_unstable();
        }

        Ok(())
    }

    fn insert_fixtures(
        &mut self,
        season: SeasonId,
        division: DivisionTier,
        schedule: &Schedule,
    ) -> LeagueResult<Vec<FixtureId>> {
        let mut ids = Vec::with_capacity(schedule.fixture_count());

        for (gameweek, item) in schedule.items() {
            let id = self.working.next_fixture_id;
            self.working.next_fixture_id += 1;

            self.working.fixtures.insert(
                id,
                Fixture {
                    id,
                    season,
                    division,
                    gameweek,
                    home_club_id: item.home_club_id,
                    away_club_id: item.away_club_id,
                    score: None,
                },
            );

            for club_id in [item.home_club_id, item.away_club_id] {
                self.working
                    .standings
                    .entry((season, division, club_id))
                    .or_insert_with(|| LeagueTableRow::new(club_id));
            }

            ids.push(id);
        }

        debug!("season {}: stored {} fixtures for the {}", season, ids.len(), division);

        Ok(ids)
    }

    fn record_player_stats(&mut self, club_id: ClubId, lines: &[PlayerMatchLine]) -> LeagueResult<()> {
        let club = self.club_mut(club_id)?;

        for line in lines {
            if let Some(player) = club.roster.player_mut(line.player_id) {
                player.statistics.record_match(line.goals, line.assists, line.rating);
            }
        }

        Ok(())
    }

    fn reset_player_stats(&mut self) -> LeagueResult<()> {
        for club in self.working.clubs.values_mut() {
            for player in club.roster.players_mut() {
                player.statistics.clear();
            }
        }

        Ok(())
    }

    fn save_season_summary(&mut self, summary: SeasonSummary) -> LeagueResult<()> {
        self.working.summaries.insert(summary.season, summary);
        Ok(())
    }

    fn season_summary(&self, season: SeasonId) -> LeagueResult<Option<SeasonSummary>> {
        Ok(self.working.summaries.get(&season).cloned())
    }

    fn commit(mut self) -> LeagueResult<()> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            warn!("commit failed, transaction rolled back");
            return Err(LeagueError::Persistence(String::from("commit failed")));
        }

        *self.guard = std::mem::take(&mut self.working);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::FixtureScheduler;
    use crate::testing::club;

    fn store() -> MemoryStore {
        let clubs = vec![
            club(1, DivisionTier::Premier, 70, 1_000_000),
            club(2, DivisionTier::Premier, 70, 1_000_000),
            club(3, DivisionTier::Championship, 60, 1_000_000),
            club(4, DivisionTier::Championship, 60, 1_000_000),
        ];

        MemoryStore::new(StoreData::with_clubs(clubs))
    }

    #[test]
    fn test_commit_persists_changes() {
        let store = store();

        let mut tx = store.begin().unwrap();
        assert_eq!(tx.update_budget(1, 500_000).unwrap(), 1_500_000);
        tx.commit().unwrap();

        let tx = store.begin().unwrap();
        assert_eq!(tx.club(1).unwrap().budget(), 1_500_000);
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let store = store();

        {
            let mut tx = store.begin().unwrap();
            tx.update_budget(1, -400_000).unwrap();
        }

        let tx = store.begin().unwrap();
        assert_eq!(tx.club(1).unwrap().budget(), 1_000_000);
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let store = store();
        store.fail_next_commit();

        let mut tx = store.begin().unwrap();
        tx.update_budget(2, -1_000_000).unwrap();
        let result = tx.commit();

        assert!(result.unwrap_err().is_retryable());
        assert_eq!(store.begin().unwrap().club(2).unwrap().budget(), 1_000_000);
    }

    #[test]
    fn test_negative_budget_rejected() {
        let store = store();
        let mut tx = store.begin().unwrap();

        let result = tx.update_budget(3, -1_000_001);

        assert_eq!(
            result,
            Err(LeagueError::InsufficientBudget {
                required: 1_000_001,
                available: 1_000_000
            })
        );
        assert_eq!(tx.club(3).unwrap().budget(), 1_000_000);
    }

    #[test]
    fn test_fixture_played_only_once() {
        let store = store();
        let mut tx = store.begin().unwrap();
        tx.insert_season(SeasonState::new(1, 2)).unwrap();

        let schedule = FixtureScheduler::generate_season(&[1, 2]).unwrap();
        let ids = tx.insert_fixtures(1, DivisionTier::Premier, &schedule).unwrap();
        assert_eq!(ids.len(), 2);

        tx.mark_fixture_played(ids[0], Score::new(2, 1)).unwrap();
        assert_eq!(
            tx.mark_fixture_played(ids[0], Score::new(0, 0)),
            Err(LeagueError::FixtureAlreadyPlayed(ids[0]))
        );
        assert_eq!(tx.unplayed_fixtures(1, 1).unwrap().len(), 0);
        assert_eq!(tx.unplayed_fixtures(1, 2).unwrap().len(), 1);
    }

    #[test]
    fn test_gameweek_guard() {
        let store = store();
        let mut tx = store.begin().unwrap();
        tx.insert_season(SeasonState::new(1, 2)).unwrap();

        tx.set_current_gameweek(1, 1, 2).unwrap();

        assert_eq!(
            tx.set_current_gameweek(1, 1, 2),
            Err(LeagueError::GameweekConflict { season: 1, expected: 1 })
        );
        assert_eq!(tx.season_state(1).unwrap().current_gameweek, 2);
    }

    #[test]
    fn test_season_closes_once() {
        let store = store();
        let mut tx = store.begin().unwrap();
        tx.insert_season(SeasonState::new(1, 2)).unwrap();

        tx.set_season_closed(1).unwrap();

        assert_eq!(tx.set_season_closed(1), Err(LeagueError::SeasonAlreadyClosed(1)));
    }

    #[test]
    fn test_swap_membership() {
        let store = store();
        let mut tx = store.begin().unwrap();

        tx.swap_division_membership(&[3], &[2]).unwrap();

        assert_eq!(tx.division_members(DivisionTier::Premier).unwrap(), vec![1, 3]);
        assert_eq!(tx.division_members(DivisionTier::Championship).unwrap(), vec![2, 4]);
        assert_eq!(tx.club(3).unwrap().division, DivisionTier::Premier);
    }

    #[test]
    fn test_standings_upsert_and_rank() {
        let store = store();
        let mut tx = store.begin().unwrap();
        tx.insert_season(SeasonState::new(1, 2)).unwrap();

        tx.upsert_standings_row(1, DivisionTier::Premier, 1, &StandingsDelta::from_goals(0, 1))
            .unwrap();
        tx.upsert_standings_row(1, DivisionTier::Premier, 2, &StandingsDelta::from_goals(1, 0))
            .unwrap();

        let rows = tx.standings(1, DivisionTier::Premier).unwrap();
        assert_eq!(rows.iter().map(|r| r.club_id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(rows[0].points, 3);
        assert!(tx.standings(1, DivisionTier::Championship).unwrap().is_empty());
    }
}
