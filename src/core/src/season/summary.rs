use crate::club::{Club, Player};
use crate::league::{DivisionTier, LeagueTableRow};
use crate::season::SeasonReward;
use crate::shared::{ClubId, PlayerId, SeasonId};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalTableRow {
    pub position: usize,
    pub club_name: String,
    #[serde(flatten)]
    pub row: LeagueTableRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalTable {
    pub division: DivisionTier,
    pub rows: Vec<FinalTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLeader {
    pub player_id: PlayerId,
    pub player_name: String,
    pub club_id: ClubId,
    pub played: u16,
    pub goals: u16,
    pub assists: u16,
    pub average_rating: f32,
}

impl StatLeader {
    fn new(club: &Club, player: &Player) -> Self {
        StatLeader {
            player_id: player.id,
            player_name: player.name.clone(),
            club_id: club.id,
            played: player.statistics.played,
            goals: player.statistics.goals,
            assists: player.statistics.assists,
            average_rating: player.statistics.average_rating,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonLeaders {
    pub top_scorer: Option<StatLeader>,
    pub top_assists: Option<StatLeader>,
    pub best_rated: Option<StatLeader>,
}

impl SeasonLeaders {
    /// Ties go to the lower player id.
    pub fn collect(clubs: &[Club], min_rated_appearances: u16) -> Self {
        let players: Vec<(&Club, &Player)> = clubs
            .iter()
            .flat_map(|club| club.roster.players().map(move |player| (club, player)))
            .collect();

        let top_scorer = players
            .iter()
            .filter(|(_, p)| p.statistics.goals > 0)
            .max_by(|(_, a), (_, b)| {
                a.statistics
                    .goals
                    .cmp(&b.statistics.goals)
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|(club, player)| StatLeader::new(club, player));

        let top_assists = players
            .iter()
            .filter(|(_, p)| p.statistics.assists > 0)
            .max_by(|(_, a), (_, b)| {
                a.statistics
                    .assists
                    .cmp(&b.statistics.assists)
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|(club, player)| StatLeader::new(club, player));

        let best_rated = players
            .iter()
            .filter(|(_, p)| p.statistics.played >= min_rated_appearances.max(1))
            .max_by(|(_, a), (_, b)| {
                a.statistics
                    .average_rating
                    .partial_cmp(&b.statistics.average_rating)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|(club, player)| StatLeader::new(club, player));

        SeasonLeaders {
            top_scorer,
            top_assists,
            best_rated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: SeasonId,
    pub next_season: SeasonId,
    pub closed_at: NaiveDateTime,
    pub tables: Vec<FinalTable>,
    pub rewards: Vec<SeasonReward>,
    pub leaders: SeasonLeaders,
    pub promoted: Vec<ClubId>,
    pub relegated: Vec<ClubId>,
}

impl SeasonSummary {
    pub fn champion(&self, tier: DivisionTier) -> Option<ClubId> {
        self.tables
            .iter()
            .find(|t| t.division == tier)
            .and_then(|t| t.rows.first())
            .map(|r| r.row.club_id)
    }
}
