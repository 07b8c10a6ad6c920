use crate::club::Club;
use crate::error::{LeagueError, LeagueResult};
use crate::settings::ChallengeSettings;
use crate::shared::Money;

pub struct ChallengePricing;

impl ChallengePricing {
    /// Base fee plus a share of the market value of the opponent's
    /// starting eleven.
    pub fn cost(opponent: &Club, settings: &ChallengeSettings) -> LeagueResult<Money> {
        Self::cost_for_value(opponent.roster.team_value(), settings)
    }

    pub fn cost_for_value(team_value: Money, settings: &ChallengeSettings) -> LeagueResult<Money> {
        if settings.base_cost <= 0 || team_value < 0 {
            return Err(LeagueError::InvalidCost(settings.base_cost));
        }

        let cost = settings.base_cost + settings.opponent_value_rate().apply(team_value);

        Ok(cost)
    }
}
