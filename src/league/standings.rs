use std::cmp::Ordering;
use std::sync::Arc;

use tracing::info;

use super::domain::{Game, LeagueId, Team, TeamId, TeamRecord};
use super::locks::LeagueLocks;
use super::repository::{LeagueStore, StoreError};

/// Recomputes team records from game history and assigns league ranks.
pub struct StandingsEngine<S> {
    store: Arc<S>,
    locks: Arc<LeagueLocks>,
}

impl<S> StandingsEngine<S>
where
    S: LeagueStore + 'static,
{
    pub fn new(store: Arc<S>, locks: Arc<LeagueLocks>) -> Self {
        Self { store, locks }
    }

    /// Recompute every team's record and persist fresh ranks.
    ///
    /// Idempotent and deterministic for a fixed set of game results. Runs
    /// for the same league are serialized so a concurrent caller never
    /// observes a partial rank assignment as the final state.
    pub fn update_standings(&self, league: &LeagueId) -> Result<(), StoreError> {
        let handle = self.locks.handle(league);
        let _guard = handle.lock().expect("standings lock poisoned");

        let games = self.store.games_in_league(league)?;
        let mut teams = self.store.teams_in_league(league)?;

        for team in &mut teams {
            team.record = record_from_games(&team.id, &games);
        }

        teams.sort_by(standing_order);

        // Dense ranking: tied teams share a rank, the next distinct record
        // takes the following value.
        let mut rank = 0;
        for index in 0..teams.len() {
            if index > 0
                && teams[index].record.standing_key() != teams[index - 1].record.standing_key()
            {
                rank += 1;
            }
            teams[index].league_rank = rank;
            self.store.save_team(&teams[index])?;
        }

        info!(league = %league.0, teams = teams.len(), "standings updated");
        Ok(())
    }
}

/// A team's record is a pure function of its game history. A team with no
/// games keeps the zero floor record rather than erroring.
fn record_from_games(team: &TeamId, games: &[Game]) -> TeamRecord {
    let mut record = TeamRecord::default();

    for game in games {
        let (scored, conceded) = if game.home == *team {
            (game.home_score, game.away_score)
        } else if game.away == *team {
            (game.away_score, game.home_score)
        } else {
            continue;
        };

        record.points_for += scored;
        record.points_against += conceded;
        if scored > conceded {
            record.wins += 1;
        } else if scored < conceded {
            record.losses += 1;
        }
    }

    record
}

/// Descending by record strength; team id breaks exact ties so the order is
/// stable regardless of how the storage layer returned the teams.
fn standing_order(a: &Team, b: &Team) -> Ordering {
    b.record
        .standing_key()
        .cmp(&a.record.standing_key())
        .then_with(|| a.id.cmp(&b.id))
}
