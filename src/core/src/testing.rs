//! Builders shared by the unit tests.

use crate::club::{Club, ClubController, Player, PlayerPosition, Roster};
use crate::league::DivisionTier;
use crate::shared::{ClubId, Money, PlayerId};

pub fn player(id: PlayerId, rating: u8, value: Money) -> Player {
    let position = match id % 11 {
        1 => PlayerPosition::Goalkeeper,
        2..=5 => PlayerPosition::Defender,
        6..=8 => PlayerPosition::Midfielder,
        _ => PlayerPosition::Forward,
    };

    Player::new(id, format!("Player {}", id), position, rating, value)
}

pub fn roster_of(count: u32, rating: u8, value: Money) -> Roster {
    roster_from(1, count, rating, value)
}

pub fn roster_from(first_id: PlayerId, count: u32, rating: u8, value: Money) -> Roster {
    Roster::new(
        (first_id..first_id + count)
            .map(|id| Some(player(id, rating, value)))
            .collect(),
    )
}

pub fn club(id: ClubId, division: DivisionTier, rating: u8, budget: Money) -> Club {
    Club::new(
        id,
        format!("Club {}", id),
        ClubController::Ai,
        division,
        roster_from(id * 100, 16, rating, 5_000_000),
        budget,
    )
}
