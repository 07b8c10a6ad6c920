use crate::shared::{Money, PlayerId};
use serde::Serialize;

pub const MIN_PLAYER_RATING: u8 = 1;
pub const MAX_PLAYER_RATING: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PlayerPosition {
    /// Relative chance of this position finishing a move.
    pub fn scoring_weight(&self) -> u32 {
        match self {
            PlayerPosition::Goalkeeper => 0,
            PlayerPosition::Defender => 2,
            PlayerPosition::Midfielder => 5,
            PlayerPosition::Forward => 10,
        }
    }

    pub fn assist_weight(&self) -> u32 {
        match self {
            PlayerPosition::Goalkeeper => 1,
            PlayerPosition::Defender => 3,
            PlayerPosition::Midfielder => 8,
            PlayerPosition::Forward => 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSeasonStatistics {
    pub played: u16,
    pub goals: u16,
    pub assists: u16,
    pub average_rating: f32,
}

impl PlayerSeasonStatistics {
    pub fn record_match(&mut self, goals: u16, assists: u16, match_rating: f32) {
        self.played += 1;
        self.goals += goals;
        self.assists += assists;

        // running average, same as the table keeps points
        let games = self.played as f32;
        self.average_rating = (self.average_rating * (games - 1.0) + match_rating) / games;
    }

    pub fn clear(&mut self) {
        *self = PlayerSeasonStatistics::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: PlayerPosition,
    pub rating: u8,
    pub value: Money,
    pub statistics: PlayerSeasonStatistics,
}

impl Player {
    pub fn new(id: PlayerId, name: String, position: PlayerPosition, rating: u8, value: Money) -> Self {
        Player {
            id,
            name,
            position,
            rating: rating.clamp(MIN_PLAYER_RATING, MAX_PLAYER_RATING),
            value: value.max(0),
            statistics: PlayerSeasonStatistics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_clamps_rating_and_value() {
        let player = Player::new(1, "Test".into(), PlayerPosition::Forward, 150, -10);

        assert_eq!(player.rating, MAX_PLAYER_RATING);
        assert_eq!(player.value, 0);
    }

    #[test]
    fn test_record_match_keeps_running_average() {
        let mut stats = PlayerSeasonStatistics::default();

        stats.record_match(1, 0, 8.0);
        stats.record_match(0, 2, 6.0);

        assert_eq!(stats.played, 2);
        assert_eq!(stats.goals, 1);
        assert_eq!(stats.assists, 2);
        assert!((stats.average_rating - 7.0).abs() < f32::EPSILON);
    }
}
