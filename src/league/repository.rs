use super::domain::{
    Game, League, LeagueId, PaymentTransaction, Registration, RegistrationGroup, RegistrationId,
    Team, TeamId, TransactionId, UserId,
};

/// Storage abstraction so the services can be exercised in isolation.
///
/// Implementations must provide atomic single-record saves; the services
/// never assume cross-record transactions (see [`RosterStore`] for the
/// array-mutation primitives roster moves rely on instead).
pub trait LeagueStore: Send + Sync {
    fn league(&self, id: &LeagueId) -> Result<Option<League>, StoreError>;
    fn team(&self, id: &TeamId) -> Result<Option<Team>, StoreError>;
    fn teams_in_league(&self, league: &LeagueId) -> Result<Vec<Team>, StoreError>;
    fn games_in_league(&self, league: &LeagueId) -> Result<Vec<Game>, StoreError>;
    fn groups_in_league(&self, league: &LeagueId) -> Result<Vec<RegistrationGroup>, StoreError>;
    fn registration(&self, id: &RegistrationId) -> Result<Option<Registration>, StoreError>;
    fn registration_for(
        &self,
        league: &LeagueId,
        user: &UserId,
    ) -> Result<Option<Registration>, StoreError>;
    fn save_team(&self, team: &Team) -> Result<(), StoreError>;
    fn save_registration(&self, registration: &Registration) -> Result<(), StoreError>;
    fn transaction_for(
        &self,
        registration: &RegistrationId,
    ) -> Result<Option<PaymentTransaction>, StoreError>;
    fn save_transaction(&self, transaction: &PaymentTransaction) -> Result<(), StoreError>;
}

/// Atomic set/array mutation primitives for roster membership, matching the
/// add-to-set / pull / pull-all semantics the storage layer must honor.
/// Each call is a single atomic update against one record.
pub trait RosterStore: Send + Sync {
    /// Remove the player from every listed team's roster.
    fn pull_player_from_teams(&self, teams: &[TeamId], user: &UserId) -> Result<(), StoreError>;
    /// Remove every listed team from the player's membership record.
    fn pull_teams_from_player(&self, user: &UserId, teams: &[TeamId]) -> Result<(), StoreError>;
    /// Add the player to the team's roster; a no-op when already present.
    fn add_player_to_team(&self, team: &TeamId, user: &UserId) -> Result<(), StoreError>;
    /// Add the team to the player's membership record; a no-op when present.
    fn add_team_to_player(&self, user: &UserId, team: &TeamId) -> Result<(), StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hooks (e-mail adapters and the like).
///
/// Delivery is fire-and-forget: the services log failures and never let them
/// gate a state transition.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Events the core emits after a successful transition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Notification {
    RegistrationAccepted { registration: RegistrationId },
    RegistrationActive { registration: RegistrationId },
    AddedToTeam { user: UserId, team: TeamId },
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Narrow contract over the payment processor's refund endpoint.
pub trait PaymentGateway: Send + Sync {
    fn refund(&self, transaction: &TransactionId) -> Result<RefundReceipt, PaymentError>;
}

/// Successful refund response from the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundReceipt {
    pub amount: u32,
}

/// Refund failure reported by the processor, surfaced verbatim.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("refund declined: {0}")]
    Declined(String),
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}
