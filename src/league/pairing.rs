use std::sync::Arc;

use tracing::info;

use super::domain::{Invitation, InvitationKind, LeagueId, Registration, RegistrationGroup, UserId};
use super::locks::LeagueLocks;
use super::repository::{LeagueStore, StoreError};

/// Commits a mutual pair link between two registrations when a pair
/// invitation is accepted.
pub struct PairingService<S> {
    store: Arc<S>,
    locks: Arc<LeagueLocks>,
}

impl<S> PairingService<S>
where
    S: LeagueStore + 'static,
{
    pub fn new(store: Arc<S>, locks: Arc<LeagueLocks>) -> Self {
        Self { store, locks }
    }

    /// Link the sender's and recipient's registrations to each other.
    ///
    /// Only pair invitations apply; anything else returns `Ok(false)`.
    /// Returns `Ok(false)` without mutation when either side is already
    /// linked. Both registrations are resolved and written inside the
    /// league's critical section so two overlapping invitations cannot
    /// double-link. A failed save propagates; rolling back the sibling
    /// write is the caller's responsibility.
    pub fn handle_accepted_invitation(
        &self,
        league: &LeagueId,
        invitation: &Invitation,
    ) -> Result<bool, PairingError> {
        if invitation.kind != InvitationKind::Pair {
            return Ok(false);
        }

        let handle = self.locks.handle(league);
        let _guard = handle.lock().expect("pairing lock poisoned");

        let mut sender = self.registration_of(league, &invitation.sender)?;
        let mut recipient = self.registration_of(league, &invitation.recipient)?;

        let groups = self.store.groups_in_league(league)?;
        if linked(&sender, &groups) || linked(&recipient, &groups) {
            return Ok(false);
        }

        sender.pair = Some(invitation.recipient.clone());
        recipient.pair = Some(invitation.sender.clone());
        self.store.save_registration(&sender)?;
        self.store.save_registration(&recipient)?;

        info!(
            league = %league.0,
            sender = %invitation.sender.0,
            recipient = %invitation.recipient.0,
            "registrations paired"
        );
        Ok(true)
    }

    fn registration_of(
        &self,
        league: &LeagueId,
        user: &UserId,
    ) -> Result<Registration, PairingError> {
        self.store
            .registration_for(league, user)?
            .ok_or_else(|| PairingError::RegistrationNotFound {
                league: league.clone(),
                user: user.clone(),
            })
    }
}

/// A registration is linked when it carries a pair reference or its user is
/// already a member of one of the league's registration groups.
pub fn linked(registration: &Registration, groups: &[RegistrationGroup]) -> bool {
    registration.pair.is_some()
        || groups
            .iter()
            .any(|group| group.contains(&registration.user_id))
}

/// Error raised while handling a pair invitation.
#[derive(Debug, thiserror::Error)]
pub enum PairingError {
    #[error("no registration for user {user:?} in league {league:?}")]
    RegistrationNotFound { league: LeagueId, user: UserId },
    #[error(transparent)]
    Store(#[from] StoreError),
}
