use crate::error::{LeagueError, LeagueResult};
use crate::shared::Money;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubFinancialBalance {
    pub balance: Money,
    pub income: Money,
    pub outcome: Money,
}

impl ClubFinancialBalance {
    pub fn new(balance: Money) -> Self {
        ClubFinancialBalance {
            balance,
            income: 0,
            outcome: 0,
        }
    }

    pub fn push_income(&mut self, amount: Money) {
        self.balance += amount;
        self.income += amount;
    }

    pub fn push_outcome(&mut self, amount: Money) {
        self.balance -= amount;
        self.outcome += amount;
    }

    /// Applies a signed budget change. A change that would leave the
    /// balance negative is rejected and nothing is written.
    pub fn apply(&mut self, delta: Money) -> LeagueResult<Money> {
        if delta < 0 && self.balance + delta < 0 {
            return Err(LeagueError::InsufficientBudget {
                required: -delta,
                available: self.balance,
            });
        }

        if delta >= 0 {
            self.push_income(delta);
        } else {
            self.push_outcome(-delta);
        }

        debug!(
            "finance: applied {}, balance = {}, income = {}, outcome = {}",
            delta, self.balance, self.income, self.outcome
        );

        Ok(self.balance)
    }

    /// Takes as much of `amount` as the balance allows and returns what was taken.
    pub fn charge_up_to(&mut self, amount: Money) -> Money {
        let charged = amount.min(self.balance).max(0);
        self.push_outcome(charged);
        charged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_rejects_overdraft_without_mutation() {
        let mut balance = ClubFinancialBalance::new(100);

        let result = balance.apply(-150);

        assert_eq!(
            result,
            Err(LeagueError::InsufficientBudget {
                required: 150,
                available: 100
            })
        );
        assert_eq!(balance.balance, 100);
        assert_eq!(balance.outcome, 0);
    }

    #[test]
    fn test_apply_tracks_income_and_outcome() {
        let mut balance = ClubFinancialBalance::new(100);

        assert_eq!(balance.apply(50), Ok(150));
        assert_eq!(balance.apply(-120), Ok(30));
        assert_eq!(balance.income, 50);
        assert_eq!(balance.outcome, 120);
    }

    #[test]
    fn test_charge_up_to_never_goes_negative() {
        let mut balance = ClubFinancialBalance::new(40);

        assert_eq!(balance.charge_up_to(100), 40);
        assert_eq!(balance.balance, 0);
        assert_eq!(balance.charge_up_to(10), 0);
    }
}
