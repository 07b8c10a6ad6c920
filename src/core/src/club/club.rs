use crate::club::finance::ClubFinancialBalance;
use crate::club::{ClubLevel, Player, StrengthModifiers};
use crate::league::DivisionTier;
use crate::shared::{ClubId, Money, PlayerId};
use serde::Serialize;

pub const STARTING_ELEVEN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubController {
    Human,
    Ai,
}

/// Ordered player slots. Empty slots are kept so that slot order (and so
/// the starting eleven) survives players leaving.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Roster {
    slots: Vec<Option<Player>>,
}

impl Roster {
    pub fn new(slots: Vec<Option<Player>>) -> Self {
        Roster { slots }
    }

    pub fn slots(&self) -> &[Option<Player>] {
        &self.slots
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.slots.iter().flatten()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.slots.iter_mut().flatten()
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players_mut().find(|p| p.id == id)
    }

    pub fn player_count(&self) -> usize {
        self.players().count()
    }

    /// The first eleven filled slots, in slot order.
    pub fn starting_eleven(&self) -> Vec<&Player> {
        self.players().take(STARTING_ELEVEN).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.player_count() >= STARTING_ELEVEN
    }

    /// Market value of the starting eleven.
    pub fn team_value(&self) -> Money {
        self.starting_eleven().iter().map(|p| p.value).sum()
    }

    pub fn average_rating(&self) -> f32 {
        let count = self.player_count();
        if count == 0 {
            return 0.0;
        }

        self.players().map(|p| p.rating as f32).sum::<f32>() / count as f32
    }

    pub fn average_value(&self) -> Money {
        let count = self.player_count() as Money;
        if count == 0 {
            return 0;
        }

        self.players().map(|p| p.value).sum::<Money>() / count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub controller: ClubController,
    pub division: DivisionTier,
    pub roster: Roster,
    pub finance: ClubFinancialBalance,
    pub modifiers: StrengthModifiers,
}

impl Club {
    pub fn new(
        id: ClubId,
        name: String,
        controller: ClubController,
        division: DivisionTier,
        roster: Roster,
        budget: Money,
    ) -> Self {
        Club {
            id,
            name,
            controller,
            division,
            roster,
            finance: ClubFinancialBalance::new(budget),
            modifiers: StrengthModifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: StrengthModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn budget(&self) -> Money {
        self.finance.balance
    }

    pub fn level(&self) -> ClubLevel {
        ClubLevel::evaluate(&self.roster)
    }

    pub fn is_human(&self) -> bool {
        self.controller == ClubController::Human
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{player, roster_of};

    #[test]
    fn test_starting_eleven_skips_empty_slots() {
        let mut slots: Vec<Option<Player>> = roster_of(12, 70, 1_000_000).slots().to_vec();
        slots.insert(0, None);
        slots.insert(5, None);
        let roster = Roster::new(slots);

        let eleven = roster.starting_eleven();

        assert_eq!(eleven.len(), STARTING_ELEVEN);
        assert_eq!(eleven[0].id, 1);
        assert_eq!(eleven[10].id, 11);
        assert_eq!(roster.player_count(), 12);
    }

    #[test]
    fn test_team_value_counts_only_starting_eleven() {
        let mut slots: Vec<Option<Player>> = roster_of(11, 70, 1_000_000).slots().to_vec();
        slots.push(Some(player(99, 90, 50_000_000)));
        let roster = Roster::new(slots);

        assert_eq!(roster.team_value(), 11_000_000);
        assert!(roster.is_complete());
    }

    #[test]
    fn test_incomplete_roster() {
        let roster = roster_of(10, 70, 1_000_000);

        assert!(!roster.is_complete());
        assert_eq!(roster.starting_eleven().len(), 10);
    }

    #[test]
    fn test_empty_roster_averages() {
        let roster = Roster::default();

        assert_eq!(roster.average_rating(), 0.0);
        assert_eq!(roster.average_value(), 0);
    }
}
