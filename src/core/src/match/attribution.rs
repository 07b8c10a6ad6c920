use crate::club::{Player, PlayerPosition};
use crate::shared::PlayerId;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::Serialize;

const BASE_MATCH_RATING: f32 = 6.0;
const MIN_MATCH_RATING: f32 = 3.0;
const MAX_MATCH_RATING: f32 = 10.0;
const ASSIST_CHANCE: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatchLine {
    pub player_id: PlayerId,
    pub goals: u16,
    pub assists: u16,
    pub rating: f32,
}

impl PlayerMatchLine {
    fn new(player_id: PlayerId) -> Self {
        PlayerMatchLine {
            player_id,
            goals: 0,
            assists: 0,
            rating: BASE_MATCH_RATING,
        }
    }
}

pub struct GoalAttribution;

impl GoalAttribution {
    /// Spreads `scored` goals over the eleven and rates every player.
    pub fn attribute<R: Rng + ?Sized>(
        eleven: &[&Player],
        scored: u8,
        conceded: u8,
        rng: &mut R,
    ) -> Vec<PlayerMatchLine> {
        let mut lines: Vec<PlayerMatchLine> =
            eleven.iter().map(|p| PlayerMatchLine::new(p.id)).collect();

        if eleven.is_empty() {
            return lines;
        }

        for _ in 0..scored {
            let scorer = Self::pick(eleven, None, |p| p.scoring_weight(), rng);
            lines[scorer].goals += 1;

            if eleven.len() > 1 && rng.gen_bool(ASSIST_CHANCE) {
                let assister = Self::pick(eleven, Some(scorer), |p| p.assist_weight(), rng);
                lines[assister].assists += 1;
            }
        }

        let result_adjustment = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => 0.5,
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Less => -0.5,
        };

        for (line, player) in lines.iter_mut().zip(eleven.iter()) {
            let defensive = match player.position {
                PlayerPosition::Goalkeeper | PlayerPosition::Defender => {
                    if conceded == 0 {
                        0.5
                    } else if conceded > 2 {
                        -0.3 * (conceded - 2) as f32
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };

            let noise = rng.gen_range(-0.5f32..=0.5f32);

            line.rating = (BASE_MATCH_RATING
                + result_adjustment
                + defensive
                + line.goals as f32
                + line.assists as f32 * 0.5
                + noise)
                .clamp(MIN_MATCH_RATING, MAX_MATCH_RATING);
        }

        lines
    }

    fn pick<R, F>(eleven: &[&Player], exclude: Option<usize>, weight: F, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
        F: Fn(&PlayerPosition) -> u32,
    {
        let weights: Vec<u32> = eleven
            .iter()
            .enumerate()
            .map(|(index, p)| if Some(index) == exclude { 0 } else { weight(&p.position) })
            .collect();

        match WeightedIndex::new(&weights) {
            Ok(distribution) => distribution.sample(rng),
            Err(_) => {
                // every weight was zero, fall back to anyone but the excluded slot
                let candidates: Vec<usize> =
                    (0..eleven.len()).filter(|i| Some(*i) != exclude).collect();
                candidates[rng.gen_range(0..candidates.len())]
            }
        }
    }
}
