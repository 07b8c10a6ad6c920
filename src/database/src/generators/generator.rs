use crate::DatabaseEntity;
use crate::generators::{PlayerGenerator, SQUAD_LAYOUT};
use crate::loaders::ClubEntity;
use engine::{
    Club, LeagueResult, MemoryStore, Player, Roster, SeasonId, SeasonManager, StoreData,
};
use log::info;

pub const FIRST_SEASON: SeasonId = 1;

pub struct DatabaseGenerator;

impl DatabaseGenerator {
    /// Builds the store from the loaded data and opens the first season.
    pub fn generate(data: &DatabaseEntity, seed: u64) -> LeagueResult<MemoryStore> {
        let first_generated_id = data
            .clubs
            .iter()
            .flat_map(|c| c.players.iter().map(|p| p.id))
            .max()
            .unwrap_or_default()
            + 1;

        let mut player_generator = PlayerGenerator::new(seed, &data.names, first_generated_id);

        let clubs = data
            .clubs
            .iter()
            .map(|club| Self::generate_club(club, &mut player_generator))
            .collect::<LeagueResult<Vec<Club>>>()?;

        info!("generated {} clubs", clubs.len());

        let store = MemoryStore::new(StoreData::with_clubs(clubs));

        SeasonManager::new(&store, &data.settings.season).initialize_season(FIRST_SEASON)?;

        Ok(store)
    }

    fn generate_club(club: &ClubEntity, player_generator: &mut PlayerGenerator) -> LeagueResult<Club> {
        let mut slots: Vec<Option<Player>> = club
            .players
            .iter()
            .map(|p| {
                Ok(Some(Player::new(
                    p.id,
                    p.name.clone(),
                    p.player_position()?,
                    p.rating,
                    p.value,
                )))
            })
            .collect::<LeagueResult<_>>()?;

        for position in SQUAD_LAYOUT.iter().skip(slots.len()) {
            slots.push(Some(player_generator.generate(*position, club.quality)));
        }

        Ok(Club::new(
            club.id,
            club.name.clone(),
            club.club_controller()?,
            club.tier()?,
            Roster::new(slots),
            club.budget,
        )
        .with_modifiers(club.modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatabaseLoader;
    use engine::{DivisionTier, GatewayTransaction, PersistenceGateway};

    #[test]
    fn test_generate_from_embedded_data() {
        let data = DatabaseLoader::load().unwrap();

        let store = DatabaseGenerator::generate(&data, 42).unwrap();
        let tx = store.begin().unwrap();

        assert_eq!(tx.current_season().unwrap(), FIRST_SEASON);
        assert_eq!(tx.season_state(FIRST_SEASON).unwrap().total_gameweeks, 38);
        assert_eq!(tx.division_members(DivisionTier::Premier).unwrap().len(), 20);
        assert_eq!(tx.fixtures(FIRST_SEASON).unwrap().len(), 760);

        let clubs = tx.clubs().unwrap();
        assert!(clubs.iter().all(|c| c.roster.is_complete()));
        assert!(clubs.iter().any(|c| c.is_human()));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let data = DatabaseLoader::load().unwrap();

        let first = DatabaseGenerator::generate(&data, 42).unwrap().snapshot().unwrap();
        let second = DatabaseGenerator::generate(&data, 42).unwrap().snapshot().unwrap();

        assert_eq!(first.clubs, second.clubs);
    }

    #[test]
    fn test_listed_players_keep_their_slots() {
        let data = DatabaseLoader::load().unwrap();
        let store = DatabaseGenerator::generate(&data, 1).unwrap();

        let listed = data.clubs.iter().find(|c| !c.players.is_empty()).unwrap();
        let club = store.begin().unwrap().club(listed.id).unwrap();

        assert_eq!(club.roster.player_count(), SQUAD_LAYOUT.len());
        for (slot, entity) in club.roster.slots().iter().zip(listed.players.iter()) {
            assert_eq!(slot.as_ref().map(|p| p.id), Some(entity.id));
        }
    }
}
