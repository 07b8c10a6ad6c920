use crate::league::DivisionTier;
use crate::settings::SeasonSettings;
use crate::shared::{ClubId, Money};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonReward {
    pub club_id: ClubId,
    pub division: DivisionTier,
    pub position: usize,
    pub prize: Money,
    pub participation_bonus: Money,
    pub total: Money,
}

pub struct SeasonRewardCalculator;

impl SeasonRewardCalculator {
    pub fn prize_pool(tier: DivisionTier, settings: &SeasonSettings) -> Money {
        match tier {
            DivisionTier::Premier => settings.premier_prize_pool,
            DivisionTier::Championship => settings.championship_prize_pool,
        }
    }

    /// Position `p` of `n` takes `n - p + 1` shares of the pool, out of
    /// `n(n+1)/2` shares in total. Every participant also gets the bonus.
    pub fn reward(
        club_id: ClubId,
        tier: DivisionTier,
        position: usize,
        clubs: usize,
        settings: &SeasonSettings,
    ) -> SeasonReward {
        let shares = (clubs * (clubs + 1) / 2).max(1) as i128;
        let own_shares = (clubs + 1).saturating_sub(position) as i128;

        let prize = (Self::prize_pool(tier, settings) as i128 * own_shares / shares) as Money;
        let participation_bonus = settings.participation_bonus;

        SeasonReward {
            club_id,
            division: tier,
            position,
            prize,
            participation_bonus,
            total: prize + participation_bonus,
        }
    }
}
