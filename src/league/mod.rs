//! League management core: standings, registration lifecycle, roster moves,
//! pairing, and capacity windows.
//!
//! Each service takes its collaborators (storage, notifications, payments)
//! as traits from [`repository`] so the embedding service decides how state
//! is persisted and events are delivered.

pub mod capacity;
pub mod domain;
pub mod lifecycle;
pub mod locks;
pub mod pairing;
pub mod repository;
pub mod roster;
pub mod standings;
pub mod validation;


pub use capacity::{CapacityPolicy, ExpirationTimes, GenderCounts};
pub use domain::{
    AgeDivision, AttendanceBucket, Availability, CoreOptions, Game, Gender, Invitation,
    InvitationKind, League, LeagueId, LeagueOptions, PaymentTransaction, PlayerStrength,
    RankNormalization, RankTransform, Registration, RegistrationGroup, RegistrationId,
    RegistrationStatus, Season, Sport, Team, TeamId, TeamRecord, TransactionId, User, UserId,
};
pub use lifecycle::{RegistrationError, RegistrationService};
pub use locks::LeagueLocks;
pub use pairing::{linked, PairingError, PairingService};
pub use repository::{
    LeagueStore, Notification, Notifier, NotifyError, PaymentError, PaymentGateway, RefundReceipt,
    RosterStore, StoreError,
};
pub use roster::{RosterError, RosterService};
pub use standings::StandingsEngine;
pub use validation::{validate_league, FieldError, RegistrationValidator, ValidationFailure};
