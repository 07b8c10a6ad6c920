use crate::challenge::{
    ChallengeId, ChallengePricing, ChallengeReward, ChallengeSettlement, LiveUpdate,
    PendingChallenge, SessionContext,
};
use crate::club::{Club, ClubLevel, ClubStrength, STARTING_ELEVEN};
use crate::error::{LeagueError, LeagueResult};
use crate::r#match::{MatchSimulator, Score, ScoringModel, derive_seed};
use crate::settings::ChallengeSettings;
use crate::shared::{ClubId, Money};
use crate::store::{GatewayTransaction, PersistenceGateway};
use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeQuote {
    pub opponent_id: ClubId,
    pub opponent_team_value: Money,
    pub cost: Money,
    pub level: ClubLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeHandle {
    pub challenge_id: ChallengeId,
    pub opponent_id: ClubId,
    pub cost: Money,
    pub budget: Money,
    pub live_view_path: String,
}

pub struct ChallengeService<'a, G: PersistenceGateway> {
    gateway: &'a G,
    settings: &'a ChallengeSettings,
    simulator: MatchSimulator,
    base_seed: u64,
}

impl<'a, G: PersistenceGateway> ChallengeService<'a, G> {
    pub fn new(
        gateway: &'a G,
        settings: &'a ChallengeSettings,
        scoring: ScoringModel,
        base_seed: u64,
    ) -> Self {
        ChallengeService {
            gateway,
            settings,
            simulator: MatchSimulator::new(scoring),
            base_seed,
        }
    }

    /// Prices a challenge without touching any state.
    pub fn quote(&self, session: &SessionContext, opponent_id: ClubId) -> LeagueResult<ChallengeQuote> {
        let tx = self.gateway.begin()?;
        let (challenger, opponent) = Self::validated_pair(&tx, session, opponent_id)?;

        let cost = ChallengePricing::cost(&opponent, self.settings)?;

        Ok(ChallengeQuote {
            opponent_id,
            opponent_team_value: opponent.roster.team_value(),
            cost,
            level: challenger.level(),
        })
    }

    /// Deducts the cost and opens a pending challenge in the session.
    pub fn initiate(
        &self,
        session: &mut SessionContext,
        opponent_id: ClubId,
        now: NaiveDateTime,
    ) -> LeagueResult<ChallengeHandle> {
        if session.has_pending() {
            warn!("session {}: challenge already in progress", session.session_id);
            return Err(LeagueError::ChallengeInProgress);
        }

        let mut tx = self.gateway.begin()?;

        // both clubs are read inside the transaction that moves the money
        let (challenger, opponent) = Self::validated_pair(&tx, session, opponent_id)?;

        let cost = ChallengePricing::cost(&opponent, self.settings)?;

        if challenger.budget() < cost {
            return Err(LeagueError::InsufficientBudget {
                required: cost,
                available: challenger.budget(),
            });
        }

        let budget = tx.update_budget(challenger.id, -cost)?;
        tx.commit()?;

        let challenge_id = session.next_challenge_id();

        session.pending = Some(PendingChallenge::new(
            challenge_id,
            challenger.id,
            opponent.id,
            cost,
            challenger.level(),
            now,
        ));

        info!(
            "🤝 Challenge {}: {} vs {} for {}",
            challenge_id, challenger.name, opponent.name, cost
        );

        Ok(ChallengeHandle {
            challenge_id,
            opponent_id,
            cost,
            budget,
            live_view_path: format!("{}?challenge={}", self.settings.live_view_path, challenge_id),
        })
    }

    /// Recomputes the tentative reward for an in-progress scoreline. Budget
    /// is not touched. Once the match was played only its final score is
    /// accepted.
    pub fn report_live(
        &self,
        session: &mut SessionContext,
        challenger_goals: u8,
        opponent_goals: u8,
    ) -> LeagueResult<LiveUpdate> {
        let pending = Self::pending_mut(session)?;

        let update = Self::live_update(pending, Score::new(challenger_goals, opponent_goals));

        debug!(
            "challenge {}: live {} -> tentative {}",
            pending.id, update.score, update.tentative_reward
        );

        pending.track(update).cloned()
    }

    /// Simulates the authoritative scoreline from current club strengths.
    /// The seed is derived from the challenge itself, and a challenge is
    /// played once: later calls return the recorded result.
    pub fn play(&self, session: &mut SessionContext) -> LeagueResult<LiveUpdate> {
        let pending = Self::pending_mut(session)?;

        if let Some(played) = pending.played() {
            debug!("challenge {} already played: {}", pending.id, played.score);
            return Ok(played.clone());
        }

        let (challenger, opponent) = {
            let tx = self.gateway.begin()?;
            (tx.club(pending.challenger_id)?, tx.club(pending.opponent_id)?)
        };

        let score = self.simulator.simulate_seeded(
            ClubStrength::evaluate(&challenger),
            ClubStrength::evaluate(&opponent),
            derive_seed(self.base_seed, pending.seed_key()),
        );

        info!(
            "⚽ Challenge {}: {} {} {}",
            pending.id, challenger.name, score, opponent.name
        );

        let update = Self::live_update(pending, score);

        pending.record_result(update).cloned()
    }

    /// Credits the reward for the played result and closes the challenge. A
    /// challenge that was never played is played first, so reported live
    /// scores are never paid out. Calling it again returns the earlier
    /// settlement without paying twice.
    pub fn finalize(&self, session: &mut SessionContext) -> LeagueResult<ChallengeSettlement> {
        if !session.has_pending() {
            return match session.last_settlement.as_ref() {
                Some(settlement) => {
                    debug!("challenge {} already settled", settlement.challenge_id);
                    Ok(ChallengeSettlement {
                        already_settled: true,
                        ..settlement.clone()
                    })
                }
                None => Err(LeagueError::NoPendingChallenge),
            };
        }

        let result = self.play(session)?;
        let reward = result.tentative_reward;
        let challenger_id = Self::pending_mut(session)?.challenger_id;

        let mut tx = self.gateway.begin()?;
        let budget = if reward > 0 {
            tx.update_budget(challenger_id, reward)?
        } else {
            tx.club(challenger_id)?.budget()
        };
        tx.commit()?;

        let mut pending = session.pending.take().ok_or(LeagueError::NoPendingChallenge)?;
        pending.finalize()?;

        let settlement = ChallengeSettlement {
            challenge_id: pending.id,
            cost: pending.cost,
            reward,
            net: reward - pending.cost,
            budget,
            outcome: Some(result.outcome),
            already_settled: false,
        };

        info!(
            "💰 Challenge {} settled: reward {}, net {}",
            settlement.challenge_id, settlement.reward, settlement.net
        );

        session.last_settlement = Some(settlement.clone());

        Ok(settlement)
    }

    /// Clears the pending challenge without a refund.
    pub fn abandon(&self, session: &mut SessionContext) -> Option<PendingChallenge> {
        let mut pending = session.pending.take()?;

        if pending.abandon().is_ok() {
            warn!(
                "challenge {} abandoned, cost {} not refunded",
                pending.id, pending.cost
            );
        }

        Some(pending)
    }

    /// Abandons the pending challenge once it is older than `timeout`.
    pub fn expire_stale(
        &self,
        session: &mut SessionContext,
        now: NaiveDateTime,
        timeout: Duration,
    ) -> Option<PendingChallenge> {
        let stale = session
            .pending
            .as_ref()
            .is_some_and(|p| p.is_stale(now, timeout));

        if stale { self.abandon(session) } else { None }
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::minutes(self.settings.pending_timeout_minutes)
    }

    fn live_update(pending: &PendingChallenge, score: Score) -> LiveUpdate {
        let tentative_reward = ChallengeReward::compute(pending.cost, pending.level, score);

        LiveUpdate {
            score,
            outcome: score.outcome(),
            tentative_reward,
            message: ChallengeReward::message(score, tentative_reward),
        }
    }

    fn pending_mut(session: &mut SessionContext) -> LeagueResult<&mut PendingChallenge> {
        session
            .pending
            .as_mut()
            .filter(|p| p.status.is_open())
            .ok_or(LeagueError::NoPendingChallenge)
    }

    fn validated_pair(
        tx: &G::Transaction<'_>,
        session: &SessionContext,
        opponent_id: ClubId,
    ) -> LeagueResult<(Club, Club)> {
        let challenger_id = session.authenticated_club()?;

        if challenger_id == opponent_id {
            return Err(LeagueError::SelfChallenge);
        }

        let challenger = tx.club(challenger_id)?;
        let opponent = tx.club(opponent_id)?;

        for club in [&challenger, &opponent] {
            if !club.roster.is_complete() {
                return Err(LeagueError::IncompleteSquad {
                    club_id: club.id,
                    players: club.roster.player_count(),
                    required: STARTING_ELEVEN,
                });
            }
        }

        Ok((challenger, opponent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::DivisionTier;
    use crate::r#match::MatchOutcome;
    use crate::store::{MemoryStore, StoreData};
    use crate::club::Roster;
    use crate::testing::{club, player, roster_from};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn store() -> MemoryStore {
        let mut challenger = club(1, DivisionTier::Premier, 72, 20_000_000);
        // average value 8M and rating 72: Semi-Professional, 15% bonus
        challenger.roster = roster_from(100, 16, 72, 8_000_000);

        let mut opponent = club(2, DivisionTier::Premier, 75, 0);
        // starting eleven worth 100M
        let mut slots = roster_from(200, 10, 75, 10_000_000).slots().to_vec();
        slots.push(Some(player(210, 75, 0)));
        opponent.roster = Roster::new(slots);

        let mut short = club(3, DivisionTier::Championship, 60, 50_000_000);
        short.roster = roster_from(300, 9, 60, 1_000_000);

        MemoryStore::new(StoreData::with_clubs(vec![challenger, opponent, short]))
    }

    fn budget(store: &MemoryStore, id: ClubId) -> Money {
        store.snapshot().unwrap().clubs[&id].budget()
    }

    #[test]
    fn test_worked_example_flow() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);
        let mut session = SessionContext::new("s1", Some(1));

        let quote = service.quote(&session, 2).unwrap();
        assert_eq!(quote.cost, 5_500_000);
        assert_eq!(quote.level, ClubLevel::SemiProfessional);

        let handle = service.initiate(&mut session, 2, now()).unwrap();
        assert_eq!(handle.cost, 5_500_000);
        assert_eq!(handle.budget, 14_500_000);
        assert_eq!(handle.live_view_path, "/match/live?challenge=1");

        service.report_live(&mut session, 0, 1).unwrap();
        let update = service.report_live(&mut session, 2, 1).unwrap();
        assert_eq!(update.tentative_reward, 9_487_500);
        assert_eq!(update.message, "Victory 2:1! You will receive €9,487,500");
        assert_eq!(budget(&store, 1), 14_500_000);

        let played = service.play(&mut session).unwrap();

        let settlement = service.finalize(&mut session).unwrap();
        assert_eq!(settlement.reward, played.tentative_reward);
        assert_eq!(settlement.outcome, Some(played.outcome));
        assert_eq!(settlement.net, played.tentative_reward - 5_500_000);
        assert_eq!(settlement.budget, 14_500_000 + played.tentative_reward);
        assert!(!settlement.already_settled);
    }

    #[test]
    fn test_double_finalize_credits_once() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);
        let mut session = SessionContext::new("s1", Some(1));

        service.initiate(&mut session, 2, now()).unwrap();
        let update = service.report_live(&mut session, 1, 1).unwrap();
        assert_eq!(update.tentative_reward, 4_730_000);

        let first = service.finalize(&mut session).unwrap();
        let second = service.finalize(&mut session).unwrap();

        assert!(!first.already_settled);
        assert!(second.already_settled);
        assert_eq!(second.reward, first.reward);
        assert_eq!(budget(&store, 1), 20_000_000 - 5_500_000 + first.reward);
    }

    #[test]
    fn test_preconditions_leave_budget_untouched() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);

        let mut anonymous = SessionContext::new("a", None);
        assert_eq!(service.initiate(&mut anonymous, 2, now()), Err(LeagueError::Unauthenticated));

        let mut session = SessionContext::new("s1", Some(1));
        assert_eq!(service.initiate(&mut session, 1, now()), Err(LeagueError::SelfChallenge));
        assert_eq!(
            service.initiate(&mut session, 3, now()),
            Err(LeagueError::IncompleteSquad {
                club_id: 3,
                players: 9,
                required: 11
            })
        );

        let mut short = SessionContext::new("s3", Some(3));
        assert!(matches!(
            service.initiate(&mut short, 1, now()),
            Err(LeagueError::IncompleteSquad { club_id: 3, .. })
        ));

        let mut broke = SessionContext::new("s2", Some(2));
        assert_eq!(
            service.initiate(&mut broke, 1, now()),
            Err(LeagueError::InsufficientBudget {
                required: 5_000_000 + 440_000,
                available: 0
            })
        );

        assert_eq!(budget(&store, 1), 20_000_000);
        assert!(session.pending.is_none());
    }

    #[test]
    fn test_one_challenge_at_a_time() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);
        let mut session = SessionContext::new("s1", Some(1));

        service.initiate(&mut session, 2, now()).unwrap();

        assert_eq!(service.initiate(&mut session, 2, now()), Err(LeagueError::ChallengeInProgress));
        assert_eq!(budget(&store, 1), 14_500_000);
    }

    #[test]
    fn test_abandon_keeps_cost() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);
        let mut session = SessionContext::new("s1", Some(1));

        service.initiate(&mut session, 2, now()).unwrap();

        assert!(
            service
                .expire_stale(&mut session, now() + Duration::minutes(5), service.default_timeout())
                .is_none()
        );

        let expired = service
            .expire_stale(&mut session, now() + Duration::minutes(31), service.default_timeout())
            .unwrap();
        assert_eq!(expired.status, crate::challenge::ChallengeStatus::Abandoned);
        assert!(session.pending.is_none());
        assert_eq!(service.finalize(&mut session), Err(LeagueError::NoPendingChallenge));
        assert_eq!(budget(&store, 1), 14_500_000);

        // a new challenge can start once the old one is gone
        assert_eq!(service.initiate(&mut session, 2, now()).unwrap().challenge_id, 2);
    }

    #[test]
    fn test_play_is_reproducible() {
        let settings = ChallengeSettings::default();

        let first_store = store();
        let first = ChallengeService::new(&first_store, &settings, ScoringModel::default(), 99);
        let mut first_session = SessionContext::new("s1", Some(1));
        first.initiate(&mut first_session, 2, now()).unwrap();

        let second_store = store();
        let second = ChallengeService::new(&second_store, &settings, ScoringModel::default(), 99);
        let mut second_session = SessionContext::new("s1", Some(1));
        second.initiate(&mut second_session, 2, now()).unwrap();

        let a = first.play(&mut first_session).unwrap();
        let b = second.play(&mut second_session).unwrap();

        assert_eq!(a, b);
        assert_eq!(
            a.tentative_reward,
            ChallengeReward::compute(5_500_000, ClubLevel::SemiProfessional, a.score)
        );
    }

    #[test]
    fn test_replaying_returns_the_recorded_result() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);
        let mut session = SessionContext::new("s1", Some(1));

        service.initiate(&mut session, 2, now()).unwrap();
        let played = service.play(&mut session).unwrap();

        for _ in 0..20 {
            assert_eq!(service.play(&mut session).unwrap(), played);
        }
        assert_eq!(session.pending.as_ref().and_then(|p| p.result), Some(played.score));
    }

    fn underdog_store() -> MemoryStore {
        let challenger = club(1, DivisionTier::Championship, 60, 20_000_000);
        let opponent = club(2, DivisionTier::Premier, 90, 0);

        MemoryStore::new(StoreData::with_clubs(vec![challenger, opponent]))
    }

    #[test]
    fn test_lost_match_cannot_be_reported_as_a_win() {
        let store = underdog_store();
        let settings = ChallengeSettings::default();
        let mut session = SessionContext::new("s1", Some(1));

        // first base seed under which the weaker challenger loses
        let (service, lost) = (0..100)
            .find_map(|seed| {
                let service = ChallengeService::new(&store, &settings, ScoringModel::default(), seed);
                let mut trial = SessionContext::new("s1", Some(1));
                trial.pending = Some(PendingChallenge::new(1, 1, 2, 5_000_000, ClubLevel::Amateur, now()));

                let update = service.play(&mut trial).ok()?;
                (update.outcome == MatchOutcome::AwayWin).then_some((service, update.score))
            })
            .unwrap();

        let handle = service.initiate(&mut session, 2, now()).unwrap();
        let level = session.pending.as_ref().unwrap().level;

        let played = service.play(&mut session).unwrap();
        assert_eq!(played.score, lost);

        assert_eq!(
            service.report_live(&mut session, 9, 0),
            Err(LeagueError::ChallengeResultFixed(handle.challenge_id))
        );
        assert_eq!(service.play(&mut session).unwrap(), played);

        let settlement = service.finalize(&mut session).unwrap();
        let consolation = ChallengeReward::compute(handle.cost, level, lost);

        assert_eq!(settlement.outcome, Some(MatchOutcome::AwayWin));
        assert_eq!(settlement.reward, consolation);
        assert!(settlement.reward < handle.cost);
        assert_eq!(budget(&store, 1), 20_000_000 - handle.cost + consolation);
    }

    #[test]
    fn test_finalize_plays_an_unplayed_challenge() {
        let store = store();
        let settings = ChallengeSettings::default();
        let service = ChallengeService::new(&store, &settings, ScoringModel::default(), 7);
        let mut session = SessionContext::new("s1", Some(1));

        service.initiate(&mut session, 2, now()).unwrap();
        // only a tentative score was ever reported
        service.report_live(&mut session, 9, 0).unwrap();

        let mut replay = SessionContext::new("s1", Some(1));
        replay.pending = session.pending.clone();
        let authoritative = service.play(&mut replay).unwrap();

        let settlement = service.finalize(&mut session).unwrap();

        assert_eq!(settlement.outcome, Some(authoritative.outcome));
        assert_eq!(settlement.reward, authoritative.tentative_reward);
        assert_eq!(settlement.net, authoritative.tentative_reward - 5_500_000);
    }
}
