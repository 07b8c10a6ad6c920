use crate::error::{LeagueError, LeagueResult};
use crate::shared::{ClubId, Gameweek};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleItem {
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
}

impl ScheduleItem {
    pub fn new(home_club_id: ClubId, away_club_id: ClubId) -> Self {
        ScheduleItem {
            home_club_id,
            away_club_id,
        }
    }

    fn reversed(&self) -> Self {
        ScheduleItem::new(self.away_club_id, self.home_club_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleTour {
    pub gameweek: Gameweek,
    pub items: Vec<ScheduleItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub tours: Vec<ScheduleTour>,
}

impl Schedule {
    pub fn gameweeks(&self) -> Gameweek {
        self.tours.len() as Gameweek
    }

    pub fn items(&self) -> impl Iterator<Item = (Gameweek, &ScheduleItem)> {
        self.tours
            .iter()
            .flat_map(|tour| tour.items.iter().map(move |item| (tour.gameweek, item)))
    }

    pub fn fixture_count(&self) -> usize {
        self.tours.iter().map(|t| t.items.len()).sum()
    }
}

pub struct FixtureScheduler;

impl FixtureScheduler {
    /// Double round robin by the circle method. The first club stays put
    /// while the rest rotate; the second half replays the first with venues
    /// swapped. An odd club count gets a bye slot each gameweek.
    pub fn generate_season(clubs: &[ClubId]) -> LeagueResult<Schedule> {
        if clubs.len() < 2 {
            return Err(LeagueError::InvalidDivisionSize { size: clubs.len() });
        }

        let mut slots: Vec<Option<ClubId>> = clubs.iter().copied().map(Some).collect();
        if slots.len() % 2 == 1 {
            slots.push(None);
        }

        let slot_count = slots.len();
        let rounds = slot_count - 1;

        let mut first_half: Vec<Vec<ScheduleItem>> = Vec::with_capacity(rounds);

        for round in 0..rounds {
            let mut items = Vec::with_capacity(slot_count / 2);

            for pair in 0..slot_count / 2 {
                let (Some(a), Some(b)) = (slots[pair], slots[slot_count - 1 - pair]) else {
                    continue;
                };

                // the fixed club alternates venue every round, the others by board position
                let a_at_home = if pair == 0 {
                    round % 2 == 0
                } else {
                    pair % 2 == 1
                };

                items.push(if a_at_home {
                    ScheduleItem::new(a, b)
                } else {
                    ScheduleItem::new(b, a)
                });
            }

            first_half.push(items);
            slots[1..].rotate_right(1);
        }

        let second_half: Vec<Vec<ScheduleItem>> = first_half
            .iter()
            .map(|items| items.iter().map(ScheduleItem::reversed).collect())
            .collect();

        let tours: Vec<ScheduleTour> = first_half
            .into_iter()
            .chain(second_half)
            .enumerate()
            .map(|(index, items)| ScheduleTour {
                gameweek: index as Gameweek + 1,
                items,
            })
            .collect();

        let schedule = Schedule { tours };

        debug!(
            "schedule generated: {} clubs, {} gameweeks, {} fixtures",
            clubs.len(),
            schedule.gameweeks(),
            schedule.fixture_count()
        );

        Ok(schedule)
    }
}
