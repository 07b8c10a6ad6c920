use crate::league::DivisionTier;
use crate::r#match::Score;
use crate::shared::{ClubId, FixtureId, Gameweek, SeasonId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub season: SeasonId,
    pub division: DivisionTier,
    pub gameweek: Gameweek,
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
    pub score: Option<Score>,
}

impl Fixture {
    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }
}
