use engine::club::{MAX_PLAYER_RATING, MIN_PLAYER_RATING};
use engine::{
    ClubController, ClubId, DivisionTier, LeagueError, LeagueResult, LeagueSettings, Money,
    PlayerId, PlayerPosition, StrengthModifiers,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

const STATIC_CLUBS_JSON: &str = include_str!("../data/clubs.json");

#[derive(Debug, Clone, Deserialize)]
pub struct ClubEntity {
    pub id: ClubId,
    pub name: String,
    pub division: String,
    #[serde(default = "default_controller")]
    pub controller: String,
    pub budget: Money,
    /// Typical rating of generated players.
    pub quality: u8,
    #[serde(default)]
    pub modifiers: StrengthModifiers,
    #[serde(default)]
    pub players: Vec<PlayerEntity>,
}

fn default_controller() -> String {
    String::from("ai")
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEntity {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    pub rating: u8,
    pub value: Money,
}

impl ClubEntity {
    pub fn tier(&self) -> LeagueResult<DivisionTier> {
        DivisionTier::from_str(&self.division)
            .map_err(|e| LeagueError::InvalidRoster(format!("club {}: {}", self.id, e)))
    }

    pub fn club_controller(&self) -> LeagueResult<ClubController> {
        match self.controller.to_ascii_lowercase().as_str() {
            "human" => Ok(ClubController::Human),
            "ai" => Ok(ClubController::Ai),
            other => Err(LeagueError::InvalidRoster(format!(
                "club {}: unknown controller '{}'",
                self.id, other
            ))),
        }
    }
}

impl PlayerEntity {
    pub fn player_position(&self) -> LeagueResult<PlayerPosition> {
        match self.position.to_ascii_lowercase().as_str() {
            "gk" | "goalkeeper" => Ok(PlayerPosition::Goalkeeper),
            "df" | "defender" => Ok(PlayerPosition::Defender),
            "mf" | "midfielder" => Ok(PlayerPosition::Midfielder),
            "fw" | "forward" => Ok(PlayerPosition::Forward),
            other => Err(LeagueError::InvalidRoster(format!(
                "player {}: unknown position '{}'",
                self.id, other
            ))),
        }
    }
}

pub struct ClubLoader;

impl ClubLoader {
    pub fn load() -> LeagueResult<Vec<ClubEntity>> {
        Self::parse(STATIC_CLUBS_JSON)
    }

    pub fn parse(json: &str) -> LeagueResult<Vec<ClubEntity>> {
        serde_json::from_str(json).map_err(|e| LeagueError::InvalidRoster(format!("clubs: {}", e)))
    }

    /// Rejects anything the engine cannot run a season with.
    pub fn validate(clubs: &[ClubEntity], settings: &LeagueSettings) -> LeagueResult<()> {
        let mut club_ids = HashSet::new();
        let mut player_ids = HashSet::new();
        let mut division_sizes: HashMap<DivisionTier, usize> = HashMap::new();

        for club in clubs {
            if !club_ids.insert(club.id) {
                return Err(LeagueError::InvalidRoster(format!("duplicate club id {}", club.id)));
            }

            if club.budget < 0 {
                return Err(LeagueError::InvalidRoster(format!(
                    "club {}: negative budget {}",
                    club.id, club.budget
                )));
            }

            if !(MIN_PLAYER_RATING..=MAX_PLAYER_RATING).contains(&club.quality) {
                return Err(LeagueError::InvalidRoster(format!(
                    "club {}: quality {} out of range",
                    club.id, club.quality
                )));
            }

            *division_sizes.entry(club.tier()?).or_default() += 1;
            club.club_controller()?;

            for player in club.players.iter() {
                if !player_ids.insert(player.id) {
                    return Err(LeagueError::InvalidRoster(format!("duplicate player id {}", player.id)));
                }

                if !(MIN_PLAYER_RATING..=MAX_PLAYER_RATING).contains(&player.rating) {
                    return Err(LeagueError::InvalidRoster(format!(
                        "player {}: rating {} out of range",
                        player.id, player.rating
                    )));
                }

                if player.value < 0 {
                    return Err(LeagueError::InvalidRoster(format!(
                        "player {}: negative value {}",
                        player.id, player.value
                    )));
                }

                player.player_position()?;
            }
        }

        for tier in DivisionTier::ALL {
            let size = division_sizes.get(&tier).copied().unwrap_or_default();

            if size < 2 {
                return Err(LeagueError::InvalidDivisionSize { size });
            }

            if size != settings.season.division_size {
                return Err(LeagueError::InvalidRoster(format!(
                    "{} has {} clubs, expected {}",
                    tier, size, settings.season.division_size
                )));
            }
        }

        Ok(())
    }
}
