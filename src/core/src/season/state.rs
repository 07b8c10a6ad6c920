use crate::shared::{Gameweek, SeasonId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum SeasonPhase {
    InProgress { gameweek: Gameweek },
    /// Every gameweek is played, rewards are not paid yet.
    Closing,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonState {
    pub id: SeasonId,
    pub current_gameweek: Gameweek,
    pub total_gameweeks: Gameweek,
    pub closed: bool,
}

impl SeasonState {
    pub fn new(id: SeasonId, total_gameweeks: Gameweek) -> Self {
        SeasonState {
            id,
            current_gameweek: 1,
            total_gameweeks,
            closed: false,
        }
    }

    pub fn phase(&self) -> SeasonPhase {
        if self.closed {
            SeasonPhase::Closed
        } else if self.current_gameweek > self.total_gameweeks {
            SeasonPhase::Closing
        } else {
            SeasonPhase::InProgress {
                gameweek: self.current_gameweek,
            }
        }
    }
}
