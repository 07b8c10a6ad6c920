mod generators;
mod loaders;

pub use generators::*;
pub use loaders::*;

use engine::{LeagueResult, LeagueSettings};

pub struct DatabaseEntity {
    pub settings: LeagueSettings,
    pub clubs: Vec<ClubEntity>,
    pub names: PeopleNamesEntity,
}

pub struct DatabaseLoader;

impl DatabaseLoader {
    /// Loads and validates the embedded data set.
    pub fn load() -> LeagueResult<DatabaseEntity> {
        let settings = SettingsLoader::load()?;
        let clubs = ClubLoader::load()?;
        let names = NamesLoader::load()?;

        ClubLoader::validate(&clubs, &settings)?;

        Ok(DatabaseEntity {
            settings,
            clubs,
            names,
        })
    }
}
