use crate::r#match::ScoringModel;
use crate::shared::{Money, Rate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonSettings {
    pub division_size: usize,
    /// Clubs relegated from the Premier division and promoted from the
    /// Championship each season.
    pub promotion_slots: usize,
    pub premier_prize_pool: Money,
    pub championship_prize_pool: Money,
    pub participation_bonus: Money,
    pub weekly_maintenance: Money,
    pub home_advantage: f32,
    pub base_seed: u64,
    /// Appearances needed before a player counts for "best rated".
    pub min_rated_appearances: u16,
    pub scoring: ScoringModel,
}

impl Default for SeasonSettings {
    fn default() -> Self {
        SeasonSettings {
            division_size: 20,
            promotion_slots: 3,
            premier_prize_pool: 210_000_000,
            championship_prize_pool: 63_000_000,
            participation_bonus: 5_000_000,
            weekly_maintenance: 250_000,
            home_advantage: 1.05,
            base_seed: 20_240_701,
            min_rated_appearances: 10,
            scoring: ScoringModel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeSettings {
    pub base_cost: Money,
    pub opponent_value_rate_bp: u32,
    pub live_view_path: String,
    pub pending_timeout_minutes: i64,
}

impl ChallengeSettings {
    pub fn opponent_value_rate(&self) -> Rate {
        Rate::from_basis_points(self.opponent_value_rate_bp)
    }
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        ChallengeSettings {
            base_cost: 5_000_000,
            // 0.5% of the opponent's starting eleven value
            opponent_value_rate_bp: 50,
            live_view_path: String::from("/match/live"),
            pending_timeout_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    pub season: SeasonSettings,
    pub challenge: ChallengeSettings,
}
