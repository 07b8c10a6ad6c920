use crate::loaders::PeopleNamesEntity;
use engine::club::{MAX_PLAYER_RATING, MIN_PLAYER_RATING};
use engine::{Money, Player, PlayerId, PlayerPosition};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const RATING_SPREAD: i16 = 6;

/// Slot order of a generated squad. The first eleven form a 4-4-2.
pub const SQUAD_LAYOUT: [PlayerPosition; 16] = [
    PlayerPosition::Goalkeeper,
    PlayerPosition::Defender,
    PlayerPosition::Defender,
    PlayerPosition::Defender,
    PlayerPosition::Defender,
    PlayerPosition::Midfielder,
    PlayerPosition::Midfielder,
    PlayerPosition::Midfielder,
    PlayerPosition::Midfielder,
    PlayerPosition::Forward,
    PlayerPosition::Forward,
    PlayerPosition::Goalkeeper,
    PlayerPosition::Defender,
    PlayerPosition::Defender,
    PlayerPosition::Midfielder,
    PlayerPosition::Forward,
];

pub struct PlayerGenerator {
    rng: ChaCha8Rng,
    first_names: Vec<String>,
    last_names: Vec<String>,
    next_id: PlayerId,
}

impl PlayerGenerator {
    pub fn new(seed: u64, names: &PeopleNamesEntity, first_id: PlayerId) -> Self {
        PlayerGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
            first_names: names.first_names.clone(),
            last_names: names.last_names.clone(),
            next_id: first_id,
        }
    }

    pub fn generate(&mut self, position: PlayerPosition, quality: u8) -> Player {
        let id = self.next_id;
        self.next_id += 1;

        let rating = (quality as i16 + self.rng.gen_range(-RATING_SPREAD..=RATING_SPREAD))
            .clamp(MIN_PLAYER_RATING as i16, MAX_PLAYER_RATING as i16) as u8;

        let value = Self::market_value(rating, self.rng.gen_range(0.8f32..1.2f32));

        Player::new(id, self.generate_name(), position, rating, value)
    }

    /// Value grows with the square of the rating above 40, rounded to
    /// thousands.
    pub fn market_value(rating: u8, factor: f32) -> Money {
        let above = (rating as i64 - 40).max(1);
        let base = above * above * 25_000;

        ((base as f32 * factor) as Money / 1_000) * 1_000
    }

    fn generate_name(&mut self) -> String {
        let first = &self.first_names[self.rng.gen_range(0..self.first_names.len())];
        let last = &self.last_names[self.rng.gen_range(0..self.last_names.len())];

        format!("{} {}", first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> PeopleNamesEntity {
        PeopleNamesEntity {
            first_names: vec![String::from("Alex"), String::from("Sam")],
            last_names: vec![String::from("Reed"), String::from("Stone")],
        }
    }

    #[test]
    fn test_generation_is_seeded() {
        let mut first = PlayerGenerator::new(7, &names(), 1);
        let mut second = PlayerGenerator::new(7, &names(), 1);

        for position in SQUAD_LAYOUT {
            assert_eq!(first.generate(position, 70), second.generate(position, 70));
        }
    }

    #[test]
    fn test_ratings_stay_near_quality() {
        let mut generator = PlayerGenerator::new(3, &names(), 1000);

        for _ in 0..200 {
            let player = generator.generate(PlayerPosition::Midfielder, 97);
            assert!(player.rating >= 91 && player.rating <= MAX_PLAYER_RATING);
            assert!(player.value > 0);
        }

        assert_eq!(generator.generate(PlayerPosition::Forward, 50).id, 1200);
    }

    #[test]
    fn test_market_value_grows_with_rating() {
        assert!(PlayerGenerator::market_value(80, 1.0) > PlayerGenerator::market_value(70, 1.0));
        assert_eq!(PlayerGenerator::market_value(60, 1.0), 10_000_000);
    }
}
