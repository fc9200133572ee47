use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::CoreConfig;

use super::domain::{League, Registration, RegistrationId, RegistrationStatus};
use super::repository::{
    LeagueStore, Notification, Notifier, PaymentError, PaymentGateway, StoreError,
};
use super::validation::{RegistrationValidator, ValidationFailure};

/// State machine driving a registration from signup to active roster
/// membership, including cancellation and refund.
pub struct RegistrationService<S, N, P> {
    store: Arc<S>,
    notifier: Arc<N>,
    payments: Arc<P>,
    validator: RegistrationValidator,
    clock: Arc<dyn Clock>,
    config: CoreConfig,
}

impl<S, N, P> RegistrationService<S, N, P>
where
    S: LeagueStore + 'static,
    N: Notifier + 'static,
    P: PaymentGateway + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        payments: Arc<P>,
        clock: Arc<dyn Clock>,
        config: CoreConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            payments,
            validator: RegistrationValidator,
            clock,
            config,
        }
    }

    /// When no explicit expiry is supplied, offers lapse after the
    /// configured number of days.
    pub fn default_acceptance_expiry(&self) -> DateTime<Utc> {
        self.clock.now() + Duration::days(self.config.acceptance_expiry_days)
    }

    /// Offer the registrant a spot. Clears any earlier expiry warning and
    /// records when the offer lapses. The acceptance notification is
    /// best-effort and never fails the transition.
    pub fn accept(
        &self,
        id: &RegistrationId,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RegistrationError> {
        let mut registration = self.load(id)?;

        registration.status = RegistrationStatus::Accepted;
        registration.warning_email_sent_at = None;
        registration.acceptance_expires_at = expires_at;

        self.save(&mut registration)?;
        self.notify(Notification::RegistrationAccepted {
            registration: id.clone(),
        });
        info!(registration = %id.0, "registration accepted");
        Ok(())
    }

    /// Move an accepted registration onto the active roster track. This is
    /// the durability-critical transition: a failed save propagates.
    pub fn activate(&self, id: &RegistrationId) -> Result<(), RegistrationError> {
        let mut registration = self.load(id)?;

        registration.status = RegistrationStatus::Active;
        self.save(&mut registration)?;

        self.notify(Notification::RegistrationActive {
            registration: id.clone(),
        });
        info!(registration = %id.0, "registration activated");
        Ok(())
    }

    /// A registration can be canceled unless it is already active, already
    /// canceled, or was never persisted.
    pub fn can_cancel(&self, id: &RegistrationId) -> Result<bool, RegistrationError> {
        let registration = match self.store.registration(id)? {
            Some(registration) => registration,
            None => return Ok(false),
        };

        Ok(!matches!(
            registration.status,
            RegistrationStatus::Active | RegistrationStatus::Canceled
        ))
    }

    /// Cancel a not-yet-active registration. Returns `Ok(false)` without
    /// mutation when the registration is active; active spots go through
    /// [`RegistrationService::refund`] instead.
    pub fn cancel(&self, id: &RegistrationId) -> Result<bool, RegistrationError> {
        let mut registration = self.load(id)?;

        if registration.status == RegistrationStatus::Active {
            return Ok(false);
        }

        registration.status = RegistrationStatus::Canceled;
        self.save(&mut registration)?;
        info!(registration = %id.0, "registration canceled");
        Ok(true)
    }

    /// Refund an active, non-comped registration and cancel it.
    ///
    /// The gateway is consulted first; no local state changes until it
    /// reports success. A persistence failure after the gateway succeeded is
    /// surfaced as [`RegistrationError::RefundDiverged`] because the money
    /// has already moved and an operator must reconcile.
    ///
    /// Unlike the other transitions, the post-refund persist writes the
    /// status directly and does not run the registration field gate: once
    /// the gateway has paid out, the cancellation must land regardless of
    /// whether unrelated fields would still validate.
    pub fn refund(&self, id: &RegistrationId) -> Result<bool, RegistrationError> {
        let mut registration = self.load(id)?;

        if registration.status != RegistrationStatus::Active || registration.comped {
            return Ok(false);
        }

        let mut transaction = self
            .store
            .transaction_for(id)?
            .ok_or_else(|| RegistrationError::MissingTransaction(id.clone()))?;

        let receipt = self.payments.refund(&transaction.transaction_id)?;

        transaction.refunded_amount = Some(receipt.amount);
        registration.status = RegistrationStatus::Canceled;

        let commit = self
            .store
            .save_transaction(&transaction)
            .and_then(|()| self.store.save_registration(&registration));
        if let Err(source) = commit {
            error!(
                registration = %id.0,
                transaction = %transaction.transaction_id.0,
                %source,
                "refund executed but local state could not be persisted"
            );
            return Err(RegistrationError::RefundDiverged {
                registration: id.clone(),
                source,
            });
        }

        info!(registration = %id.0, amount = receipt.amount, "registration refunded");
        Ok(true)
    }

    fn load(&self, id: &RegistrationId) -> Result<Registration, RegistrationError> {
        self.store
            .registration(id)?
            .ok_or_else(|| RegistrationError::NotFound(id.clone()))
    }

    /// Validated save: defaults the price from the league, runs the field
    /// gate, and only then writes.
    fn save(&self, registration: &mut Registration) -> Result<(), RegistrationError> {
        let league = self.league_of(registration)?;

        if registration.price.is_none() {
            registration.price = Some(league.price);
        }

        self.validator.validate(registration, &league)?;
        self.store.save_registration(registration)?;
        Ok(())
    }

    fn league_of(&self, registration: &Registration) -> Result<League, RegistrationError> {
        self.store
            .league(&registration.league_id)?
            .ok_or(RegistrationError::Store(StoreError::NotFound))
    }

    fn notify(&self, notification: Notification) {
        if let Err(source) = self.notifier.notify(notification) {
            warn!(%source, "notification dispatch failed");
        }
    }
}

/// Error raised by the registration lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration {0:?} not found")]
    NotFound(RegistrationId),
    #[error("no payment transaction recorded for registration {0:?}")]
    MissingTransaction(RegistrationId),
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("refund for registration {registration:?} completed at the gateway but the local state failed to persist: {source}")]
    RefundDiverged {
        registration: RegistrationId,
        source: StoreError,
    },
}
