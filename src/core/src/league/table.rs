use crate::error::{LeagueError, LeagueResult};
use crate::league::Fixture;
use crate::shared::{ClubId, FixtureId};
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// What one finished fixture adds to one club's row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StandingsDelta {
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub points: u16,
}

impl StandingsDelta {
    pub fn from_goals(scored: u8, conceded: u8) -> Self {
        let (won, drawn, lost, points) = match scored.cmp(&conceded) {
            Ordering::Greater => (1, 0, 0, 3),
            Ordering::Equal => (0, 1, 0, 1),
            Ordering::Less => (0, 0, 1, 0),
        };

        StandingsDelta {
            played: 1,
            won,
            drawn,
            lost,
            goals_for: scored as u16,
            goals_against: conceded as u16,
            points,
        }
    }

    /// Home and away deltas of a played fixture.
    pub fn for_fixture(fixture: &Fixture) -> LeagueResult<[(ClubId, StandingsDelta); 2]> {
        let score = fixture
            .score
            .ok_or(LeagueError::FixtureNotPlayed(fixture.id))?;

        Ok([
            (fixture.home_club_id, StandingsDelta::from_goals(score.home, score.away)),
            (fixture.away_club_id, StandingsDelta::from_goals(score.away, score.home)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeagueTableRow {
    pub club_id: ClubId,
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub points: u16,
}

impl LeagueTableRow {
    pub fn new(club_id: ClubId) -> Self {
        LeagueTableRow {
            club_id,
            ..Default::default()
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    pub fn apply(&mut self, delta: &StandingsDelta) {
        self.played += delta.played;
        self.won += delta.won;
        self.drawn += delta.drawn;
        self.lost += delta.lost;
        self.goals_for += delta.goals_for;
        self.goals_against += delta.goals_against;
        self.points += delta.points;
    }

    pub fn is_consistent(&self) -> bool {
        self.points == 3 * self.won + self.drawn && self.won + self.drawn + self.lost == self.played
    }
}

/// Points, then goal difference, then goals scored, then club id so that
/// equal records always come out in the same order.
pub fn compare_rows(a: &LeagueTableRow, b: &LeagueTableRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.club_id.cmp(&b.club_id))
}

#[derive(Debug, Clone, Default)]
pub struct LeagueTable {
    pub rows: Vec<LeagueTableRow>,
    applied: HashSet<FixtureId>,
}

impl LeagueTable {
    pub fn new(clubs: &[ClubId]) -> Self {
        LeagueTable {
            rows: clubs.iter().map(|id| LeagueTableRow::new(*id)).collect(),
            applied: HashSet::new(),
        }
    }

    /// Rebuilds a stored table. `applied` are the fixtures already counted
    /// in `rows`; they are rejected by `apply_result`.
    pub fn from_rows(rows: Vec<LeagueTableRow>, applied: impl IntoIterator<Item = FixtureId>) -> Self {
        let mut table = LeagueTable {
            rows,
            applied: applied.into_iter().collect(),
        };
        table.sort();
        table
    }

    pub fn is_applied(&self, fixture_id: FixtureId) -> bool {
        self.applied.contains(&fixture_id)
    }

    /// Adds a played fixture to the table and returns the deltas it applied.
    /// A fixture can only ever be applied once; a repeat leaves the table
    /// untouched.
    pub fn apply_result(&mut self, fixture: &Fixture) -> LeagueResult<[(ClubId, StandingsDelta); 2]> {
        if self.is_applied(fixture.id) {
            return Err(LeagueError::FixtureAlreadyProcessed(fixture.id));
        }

        let deltas = StandingsDelta::for_fixture(fixture)?;

        for (club_id, delta) in deltas.iter() {
            self.row_mut(*club_id).apply(delta);
        }

        self.applied.insert(fixture.id);
        self.sort();

        Ok(deltas)
    }

    pub fn sort(&mut self) {
        self.rows.sort_by(compare_rows);
    }

    pub fn ranked(&self) -> Vec<&LeagueTableRow> {
        self.rows.iter().sorted_by(|a, b| compare_rows(a, b)).collect()
    }

    pub fn position(&self, club_id: ClubId) -> Option<usize> {
        self.ranked().iter().position(|r| r.club_id == club_id).map(|p| p + 1)
    }

    pub fn row(&self, club_id: ClubId) -> Option<&LeagueTableRow> {
        self.rows.iter().find(|r| r.club_id == club_id)
    }

    pub fn top(&self, count: usize) -> Vec<ClubId> {
        self.ranked().iter().take(count).map(|r| r.club_id).collect()
    }

    pub fn bottom(&self, count: usize) -> Vec<ClubId> {
        let ranked = self.ranked();
        let skip = ranked.len().saturating_sub(count);
        ranked.iter().skip(skip).map(|r| r.club_id).collect()
    }

    pub fn goal_difference_total(&self) -> i32 {
        self.rows.iter().map(|r| r.goal_difference()).sum()
    }

    fn row_mut(&mut self, club_id: ClubId) -> &mut LeagueTableRow {
        let index = match self.rows.iter().position(|r| r.club_id == club_id) {
            Some(index) => index,
            None => {
                self.rows.push(LeagueTableRow::new(club_id));
                self.rows.len() - 1
            }
        };

        &mut self.rows[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::DivisionTier;
    use crate::r#match::Score;
    use proptest::prelude::*;

    fn fixture(id: FixtureId, home: ClubId, away: ClubId, score: Option<Score>) -> Fixture {
        Fixture {
            id,
            season: 1,
            division: DivisionTier::Premier,
            gameweek: 1,
            home_club_id: home,
            away_club_id: away,
            score,
        }
    }

    #[test]
    fn test_win_and_draw_points() {
        let mut table = LeagueTable::new(&[1, 2, 3]);

        table.apply_result(&fixture(1, 1, 2, Some(Score::new(2, 0)))).unwrap();
        table.apply_result(&fixture(2, 3, 1, Some(Score::new(1, 1)))).unwrap();

        let first = table.row(1).unwrap();
        assert_eq!((first.played, first.won, first.drawn, first.lost), (2, 1, 1, 0));
        assert_eq!(first.points, 4);
        assert_eq!(first.goal_difference(), 2);

        let second = table.row(2).unwrap();
        assert_eq!((second.lost, second.points), (1, 0));

        let third = table.row(3).unwrap();
        assert_eq!((third.drawn, third.points), (1, 1));

        assert_eq!(table.top(1), vec![1]);
        assert_eq!(table.goal_difference_total(), 0);
    }

    #[test]
    fn test_reapplying_fixture_is_rejected_without_change() {
        let mut table = LeagueTable::new(&[1, 2]);
        let played = fixture(10, 1, 2, Some(Score::new(3, 1)));

        table.apply_result(&played).unwrap();
        let before = table.rows.clone();

        assert_eq!(
            table.apply_result(&played),
            Err(LeagueError::FixtureAlreadyProcessed(10))
        );
        assert_eq!(table.rows, before);
    }

    #[test]
    fn test_rebuilt_table_remembers_applied_fixtures() {
        let mut table = LeagueTable::new(&[1, 2]);
        let played = fixture(1, 1, 2, Some(Score::new(2, 0)));

        table.apply_result(&played).unwrap();

        let mut rebuilt = LeagueTable::from_rows(table.rows.clone(), [played.id]);

        assert_eq!(
            rebuilt.apply_result(&played),
            Err(LeagueError::FixtureAlreadyProcessed(1))
        );

        let row = rebuilt.row(1).unwrap();
        assert_eq!((row.played, row.points), (1, 3));

        let deltas = rebuilt.apply_result(&fixture(2, 2, 1, Some(Score::new(1, 1)))).unwrap();
        assert_eq!(deltas[0], (2, StandingsDelta::from_goals(1, 1)));
        assert_eq!(rebuilt.row(1).unwrap().points, 4);
    }

    #[test]
    fn test_unplayed_fixture_is_rejected() {
        let mut table = LeagueTable::new(&[1, 2]);

        assert_eq!(
            table.apply_result(&fixture(4, 1, 2, None)),
            Err(LeagueError::FixtureNotPlayed(4))
        );
        assert!(table.rows.iter().all(|r| r.played == 0));
    }

    #[test]
    fn test_goals_for_breaks_points_and_difference_tie() {
        let mut table = LeagueTable::new(&[1, 2, 3, 4]);

        // 1 and 3 both win by two, 3 scores more
        table.apply_result(&fixture(1, 1, 2, Some(Score::new(2, 0)))).unwrap();
        table.apply_result(&fixture(2, 3, 4, Some(Score::new(4, 2)))).unwrap();

        assert_eq!(table.top(2), vec![3, 1]);
        assert_eq!(table.position(3), Some(1));
        assert_eq!(table.position(1), Some(2));
    }

    #[test]
    fn test_identical_records_fall_back_to_club_id() {
        let mut table = LeagueTable::new(&[9, 4]);

        table.apply_result(&fixture(1, 9, 4, Some(Score::new(1, 1)))).unwrap();

        assert_eq!(table.top(2), vec![4, 9]);
        assert_eq!(table.bottom(1), vec![9]);
    }

    proptest! {
        #[test]
        fn prop_rows_stay_consistent(results in proptest::collection::vec((0u8..6, 0u8..6), 1..40)) {
            let clubs: Vec<ClubId> = (1..=6).collect();
            let mut table = LeagueTable::new(&clubs);

            for (index, (home_goals, away_goals)) in results.iter().enumerate() {
                let home = clubs[index % 6];
                let away = clubs[(index + 1 + index / 6) % 6];
                if home == away {
                    continue;
                }
                let f = fixture(index as FixtureId, home, away, Some(Score::new(*home_goals, *away_goals)));
                table.apply_result(&f).unwrap();
            }

            prop_assert!(table.rows.iter().all(|r| r.is_consistent()));
            prop_assert_eq!(table.goal_difference_total(), 0);
        }
    }
}
