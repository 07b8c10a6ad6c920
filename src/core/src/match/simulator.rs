use crate::r#match::Score;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub const STRENGTH_FLOOR: f32 = 1.0;

const MAX_GOALS: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringModel {
    /// Expected goals of each side when strengths are equal.
    pub base_expected_goals: f64,
    /// How sharply the strength ratio moves expected goals.
    pub strength_exponent: f64,
    pub min_expected_goals: f64,
    pub max_expected_goals: f64,
}

impl Default for ScoringModel {
    fn default() -> Self {
        ScoringModel {
            base_expected_goals: 1.35,
            strength_exponent: 2.0,
            min_expected_goals: 0.15,
            max_expected_goals: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSimulator {
    model: ScoringModel,
}

impl MatchSimulator {
    pub fn new(model: ScoringModel) -> Self {
        MatchSimulator { model }
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn expected_goals(&self, own_strength: f32, opponent_strength: f32) -> f64 {
        let own = own_strength.max(STRENGTH_FLOOR) as f64;
        let opponent = opponent_strength.max(STRENGTH_FLOOR) as f64;

        let expected = self.model.base_expected_goals * (own / opponent).powf(self.model.strength_exponent);

        expected.clamp(self.model.min_expected_goals, self.model.max_expected_goals)
    }

    /// Side A is reported as `home`.
    pub fn simulate<R: Rng + ?Sized>(&self, strength_a: f32, strength_b: f32, rng: &mut R) -> Score {
        let expected_a = self.expected_goals(strength_a, strength_b);
        let expected_b = self.expected_goals(strength_b, strength_a);

        let goals_a = Self::poisson(expected_a, rng);
        let goals_b = Self::poisson(expected_b, rng);

        Score::new(goals_a, goals_b)
    }

    pub fn simulate_seeded(&self, strength_a: f32, strength_b: f32, seed: u64) -> Score {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.simulate(strength_a, strength_b, &mut rng)
    }

    // Knuth's multiplication method; fine for the small rates used here.
    fn poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u8 {
        let limit = (-lambda).exp();
        let mut product: f64 = 1.0;
        let mut goals: u8 = 0;

        loop {
            product *= rng.r#gen::<f64>();
            if product <= limit || goals == MAX_GOALS {
                return goals;
            }
            goals += 1;
        }
    }
}

/// Mixes a base seed with a per-match key so every fixture gets its own
/// independent but reproducible stream.
pub fn derive_seed(base_seed: u64, key: u64) -> u64 {
    let mut z = base_seed ^ key.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
