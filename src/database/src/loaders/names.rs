use engine::{LeagueError, LeagueResult};
use serde::Deserialize;

const STATIC_NAMES_JSON: &str = include_str!("../data/names.json");

#[derive(Debug, Clone, Deserialize)]
pub struct PeopleNamesEntity {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

pub struct NamesLoader;

impl NamesLoader {
    pub fn load() -> LeagueResult<PeopleNamesEntity> {
        let names: PeopleNamesEntity = serde_json::from_str(STATIC_NAMES_JSON)
            .map_err(|e| LeagueError::InvalidRoster(format!("names: {}", e)))?;

        if names.first_names.is_empty() || names.last_names.is_empty() {
            return Err(LeagueError::InvalidRoster(String::from("names: empty name pool")));
        }

        Ok(names)
    }
}
