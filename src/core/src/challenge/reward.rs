use crate::club::ClubLevel;
use crate::r#match::{MatchOutcome, Score};
use crate::shared::{Money, MoneyFormatter, Rate};

const WIN_MULTIPLIER: Rate = Rate::from_basis_points(15_000);
const DRAW_MULTIPLIER: Rate = Rate::from_basis_points(8_000);
const BASE_CONSOLATION: Rate = Rate::from_percent(10);
const CONSOLATION_PER_LEVEL: Rate = Rate::from_percent(5);

pub struct ChallengeReward;

impl ChallengeReward {
    /// `score` is seen from the challenger's side (`home`).
    pub fn compute(cost: Money, level: ClubLevel, score: Score) -> Money {
        Self::for_outcome(cost, level, score.outcome())
    }

    pub fn for_outcome(cost: Money, level: ClubLevel, outcome: MatchOutcome) -> Money {
        let bonus = level.bonus();

        match outcome {
            MatchOutcome::HomeWin => WIN_MULTIPLIER.apply_compound(Rate::ONE.plus(bonus), cost),
            MatchOutcome::Draw => DRAW_MULTIPLIER.apply_compound(Rate::ONE.plus(bonus.half()), cost),
            MatchOutcome::AwayWin => Self::consolation_rate(level).apply(cost),
        }
    }

    /// Share of the cost returned after a defeat.
    pub fn consolation_rate(level: ClubLevel) -> Rate {
        let level = level.number() as u32;

        if level >= 2 {
            BASE_CONSOLATION.plus(Rate::from_basis_points(
                CONSOLATION_PER_LEVEL.basis_points() * level,
            ))
        } else {
            BASE_CONSOLATION
        }
    }

    pub fn message(score: Score, reward: Money) -> String {
        match score.outcome() {
            MatchOutcome::HomeWin => format!(
                "Victory {}! You will receive {}",
                score,
                MoneyFormatter::format(reward)
            ),
            MatchOutcome::Draw => format!(
                "Draw {}. You will receive {}",
                score,
                MoneyFormatter::format(reward)
            ),
            MatchOutcome::AwayWin => format!(
                "Defeat {}. Consolation of {}",
                score,
                MoneyFormatter::format(reward)
            ),
        }
    }
}
