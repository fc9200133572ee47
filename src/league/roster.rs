use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{LeagueId, TeamId, UserId};
use super::locks::LeagueLocks;
use super::repository::{LeagueStore, Notification, Notifier, RosterStore, StoreError};

/// Moves players between teams while preserving the one-team-per-league
/// invariant.
pub struct RosterService<S, R, N> {
    store: Arc<S>,
    rosters: Arc<R>,
    notifier: Arc<N>,
    locks: Arc<LeagueLocks>,
}

impl<S, R, N> RosterService<S, R, N>
where
    S: LeagueStore + 'static,
    R: RosterStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, rosters: Arc<R>, notifier: Arc<N>, locks: Arc<LeagueLocks>) -> Self {
        Self {
            store,
            rosters,
            notifier,
            locks,
        }
    }

    /// Put the player on the given team, removing them from any other team
    /// in the league first.
    ///
    /// A no-op when the player is already on that exact team. The four
    /// roster mutations run inside the league's critical section so a
    /// concurrent assignment in the same league cannot interleave and leave
    /// the player on two teams.
    pub fn assign_player_to_team(
        &self,
        league: &LeagueId,
        user: &UserId,
        team: &TeamId,
    ) -> Result<(), RosterError> {
        let target = self
            .store
            .team(team)?
            .ok_or_else(|| RosterError::UnknownTeam(team.clone()))?;
        if target.league_id != *league {
            return Err(RosterError::TeamNotInLeague {
                team: team.clone(),
                league: league.clone(),
            });
        }

        let handle = self.locks.handle(league);
        let _guard = handle.lock().expect("roster lock poisoned");

        let league_teams = self.store.teams_in_league(league)?;
        let team_ids: Vec<TeamId> = league_teams.iter().map(|t| t.id.clone()).collect();

        let already_placed = league_teams
            .iter()
            .any(|t| t.id == *team && t.has_player(user));
        if already_placed {
            return Ok(());
        }

        // Clears any stale membership even if prior state was inconsistent.
        self.rosters.pull_player_from_teams(&team_ids, user)?;
        self.rosters.pull_teams_from_player(user, &team_ids)?;
        self.rosters.add_player_to_team(team, user)?;
        self.rosters.add_team_to_player(user, team)?;

        let notification = Notification::AddedToTeam {
            user: user.clone(),
            team: team.clone(),
        };
        if let Err(source) = self.notifier.notify(notification) {
            warn!(%source, "added-to-team notification failed");
        }

        info!(league = %league.0, user = %user.0, team = %team.0, "player assigned to team");
        Ok(())
    }
}

/// Error raised by roster assignment.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("team {0:?} not found")]
    UnknownTeam(TeamId),
    #[error("team {team:?} is not part of league {league:?}")]
    TeamNotInLeague { team: TeamId, league: LeagueId },
    #[error(transparent)]
    Store(#[from] StoreError),
}
