/// Whole currency units. Budgets, costs and rewards never use floats.
pub type Money = i64;

const BASIS_POINTS_SCALE: i128 = 10_000;

/// A fraction expressed in basis points (1/100 of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Rate {
    basis_points: u32,
}

impl Rate {
    pub const ZERO: Rate = Rate { basis_points: 0 };
    pub const ONE: Rate = Rate { basis_points: 10_000 };

    pub const fn from_basis_points(basis_points: u32) -> Self {
        Rate { basis_points }
    }

    pub const fn from_percent(percent: u32) -> Self {
        Rate {
            basis_points: percent * 100,
        }
    }

    pub fn basis_points(&self) -> u32 {
        self.basis_points
    }

    pub fn as_fraction(&self) -> f32 {
        self.basis_points as f32 / BASIS_POINTS_SCALE as f32
    }

    pub fn half(&self) -> Rate {
        Rate::from_basis_points(self.basis_points / 2)
    }

    pub fn plus(&self, other: Rate) -> Rate {
        Rate::from_basis_points(self.basis_points + other.basis_points)
    }

    /// Multiplies `amount` by this rate, rounding towards zero.
    pub fn apply(&self, amount: Money) -> Money {
        (amount as i128 * self.basis_points as i128 / BASIS_POINTS_SCALE) as Money
    }

    /// `amount * self * other` with a single rounding step at the end.
    pub fn apply_compound(&self, other: Rate, amount: Money) -> Money {
        (amount as i128 * self.basis_points as i128 * other.basis_points as i128
            / (BASIS_POINTS_SCALE * BASIS_POINTS_SCALE)) as Money
    }
}

pub struct MoneyFormatter;

impl MoneyFormatter {
    pub fn format(amount: Money) -> String {
        let digits = amount.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if amount < 0 {
            format!("-€{}", grouped)
        } else {
            format!("€{}", grouped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_apply_rounds_towards_zero() {
        assert_eq!(Rate::from_percent(15).apply(1_000), 150);
        assert_eq!(Rate::from_basis_points(1).apply(9_999), 0);
        assert_eq!(Rate::ONE.apply(5_500_000), 5_500_000);
    }

    #[test]
    fn test_rate_apply_compound_is_exact() {
        let win = Rate::from_basis_points(15_000);
        let bonus = Rate::ONE.plus(Rate::from_percent(15));

        assert_eq!(win.apply_compound(bonus, 5_500_000), 9_487_500);
    }

    #[test]
    fn test_money_formatter_groups_thousands() {
        assert_eq!(MoneyFormatter::format(5_500_000), "€5,500,000");
        assert_eq!(MoneyFormatter::format(-1_375), "-€1,375");
        assert_eq!(MoneyFormatter::format(0), "€0");
    }
}
