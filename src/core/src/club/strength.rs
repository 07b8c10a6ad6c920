use crate::club::{Club, ClubLevel, Roster};
use crate::shared::Rate;
use serde::{Deserialize, Serialize};

/// Bonuses fed in from outside the league core (staff, items, boosts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthModifiers {
    #[serde(default)]
    pub staff_bonus_bp: u32,
    #[serde(default)]
    pub item_bonus_bp: u32,
    #[serde(default)]
    pub boost_bp: u32,
}

impl StrengthModifiers {
    pub fn total(&self) -> Rate {
        Rate::from_basis_points(self.staff_bonus_bp + self.item_bonus_bp + self.boost_bp)
    }
}

// A fifth of the challenge level bonus carries into on-pitch strength.
const LEVEL_STRENGTH_DIVISOR: u32 = 5;

pub struct ClubStrength;

impl ClubStrength {
    pub fn evaluate(club: &Club) -> f32 {
        Self::from_roster(&club.roster, club.level(), club.modifiers)
    }

    pub fn from_roster(roster: &Roster, level: ClubLevel, modifiers: StrengthModifiers) -> f32 {
        let eleven = roster.starting_eleven();
        if eleven.is_empty() {
            return 0.0;
        }

        let base = eleven.iter().map(|p| p.rating as f32).sum::<f32>() / eleven.len() as f32;

        let level_bonus =
            Rate::from_basis_points(level.bonus().basis_points() / LEVEL_STRENGTH_DIVISOR);

        base * (1.0 + level_bonus.plus(modifiers.total()).as_fraction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::roster_of;

    #[test]
    fn test_strength_is_average_of_starting_eleven() {
        let roster = roster_of(11, 70, 1_000_000);

        let strength = ClubStrength::from_roster(&roster, ClubLevel::Beginner, StrengthModifiers::default());

        assert!((strength - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_modifiers_raise_strength() {
        let roster = roster_of(11, 80, 1_000_000);
        let modifiers = StrengthModifiers {
            staff_bonus_bp: 500,
            item_bonus_bp: 0,
            boost_bp: 500,
        };

        let plain = ClubStrength::from_roster(&roster, ClubLevel::Beginner, StrengthModifiers::default());
        let boosted = ClubStrength::from_roster(&roster, ClubLevel::Beginner, modifiers);
        let elite = ClubStrength::from_roster(&roster, ClubLevel::Elite, StrengthModifiers::default());

        assert!((boosted - 88.0).abs() < 1e-3);
        assert!((elite - 84.0).abs() < 1e-3);
        assert!(boosted > plain);
    }

    #[test]
    fn test_empty_roster_has_zero_strength() {
        let strength = ClubStrength::from_roster(&Roster::default(), ClubLevel::Beginner, StrengthModifiers::default());

        assert_eq!(strength, 0.0);
    }
}
