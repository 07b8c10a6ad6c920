use crate::club::Roster;
use crate::shared::{Money, Rate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubLevel {
    Beginner,
    Amateur,
    SemiProfessional,
    Professional,
    Elite,
}

struct LevelThreshold {
    level: ClubLevel,
    min_average_rating: f32,
    min_average_value: Money,
}

// Highest tier first. A club takes the first tier whose rating AND value
// thresholds it meets.
const LEVEL_THRESHOLDS: [LevelThreshold; 4] = [
    LevelThreshold {
        level: ClubLevel::Elite,
        min_average_rating: 85.0,
        min_average_value: 50_000_000,
    },
    LevelThreshold {
        level: ClubLevel::Professional,
        min_average_rating: 78.0,
        min_average_value: 20_000_000,
    },
    LevelThreshold {
        level: ClubLevel::SemiProfessional,
        min_average_rating: 70.0,
        min_average_value: 8_000_000,
    },
    LevelThreshold {
        level: ClubLevel::Amateur,
        min_average_rating: 60.0,
        min_average_value: 2_000_000,
    },
];

impl ClubLevel {
    pub fn evaluate(roster: &Roster) -> Self {
        Self::from_averages(roster.average_rating(), roster.average_value())
    }

    pub fn from_averages(average_rating: f32, average_value: Money) -> Self {
        LEVEL_THRESHOLDS
            .iter()
            .find(|t| average_rating >= t.min_average_rating && average_value >= t.min_average_value)
            .map(|t| t.level)
            .unwrap_or(ClubLevel::Beginner)
    }

    /// 1 (Beginner) to 5 (Elite).
    pub fn number(&self) -> u8 {
        match self {
            ClubLevel::Beginner => 1,
            ClubLevel::Amateur => 2,
            ClubLevel::SemiProfessional => 3,
            ClubLevel::Professional => 4,
            ClubLevel::Elite => 5,
        }
    }

    pub fn bonus(&self) -> Rate {
        match self {
            ClubLevel::Elite => Rate::from_percent(25),
            ClubLevel::Professional => Rate::from_percent(20),
            ClubLevel::SemiProfessional => Rate::from_percent(15),
            ClubLevel::Amateur => Rate::from_percent(10),
            ClubLevel::Beginner => Rate::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_requires_both_thresholds() {
        // elite rating but semi-pro money
        assert_eq!(
            ClubLevel::from_averages(90.0, 10_000_000),
            ClubLevel::SemiProfessional
        );
        // elite money but amateur rating
        assert_eq!(
            ClubLevel::from_averages(65.0, 80_000_000),
            ClubLevel::Amateur
        );
        assert_eq!(
            ClubLevel::from_averages(86.0, 60_000_000),
            ClubLevel::Elite
        );
    }

    #[test]
    fn test_level_falls_back_to_beginner() {
        assert_eq!(ClubLevel::from_averages(40.0, 100_000), ClubLevel::Beginner);
        assert_eq!(ClubLevel::from_averages(0.0, 0), ClubLevel::Beginner);
    }

    #[test]
    fn test_level_bonus_table() {
        assert_eq!(ClubLevel::Elite.bonus(), Rate::from_percent(25));
        assert_eq!(ClubLevel::Professional.bonus(), Rate::from_percent(20));
        assert_eq!(ClubLevel::SemiProfessional.bonus(), Rate::from_percent(15));
        assert_eq!(ClubLevel::Amateur.bonus(), Rate::from_percent(10));
        assert_eq!(ClubLevel::Beginner.bonus(), Rate::ZERO);
        assert_eq!(ClubLevel::Elite.number(), 5);
        assert_eq!(ClubLevel::Beginner.number(), 1);
    }
}
