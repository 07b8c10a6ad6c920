use engine::{LeagueError, LeagueResult, LeagueSettings};

const STATIC_SETTINGS_JSON: &str = include_str!("../data/settings.json");

pub struct SettingsLoader;

impl SettingsLoader {
    pub fn load() -> LeagueResult<LeagueSettings> {
        Self::parse(STATIC_SETTINGS_JSON)
    }

    /// Missing fields fall back to their defaults.
    pub fn parse(json: &str) -> LeagueResult<LeagueSettings> {
        serde_json::from_str(json)
            .map_err(|e| LeagueError::InvalidRoster(format!("settings: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_settings_load() {
        let settings = SettingsLoader::load().unwrap();

        assert_eq!(settings.season.division_size, 20);
        assert_eq!(settings.challenge.base_cost, 5_000_000);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings = SettingsLoader::parse(r#"{ "season": { "promotion_slots": 2 } }"#).unwrap();

        assert_eq!(settings.season.promotion_slots, 2);
        assert_eq!(settings.season.division_size, 20);
        assert_eq!(settings.challenge, LeagueSettings::default().challenge);
    }

    #[test]
    fn test_malformed_settings_rejected() {
        assert!(SettingsLoader::parse("{ season: 1 }").is_err());
    }
}
