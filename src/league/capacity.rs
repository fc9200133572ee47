use chrono::{DateTime, Duration, Utc};

use crate::config::CoreConfig;

use super::domain::{Gender, League, Registration, RegistrationStatus, User};

/// Registration counts per gender, taken at a single point in time.
///
/// Counts include pending, accepted, and active registrations; canceled and
/// waitlisted ones do not hold a capacity slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenderCounts {
    pub male: u32,
    pub female: u32,
}

impl GenderCounts {
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut counts = Self::default();
        for registration in registrations {
            if !holds_slot(registration.status) {
                continue;
            }
            match registration.gender {
                Gender::Male => counts.male += 1,
                Gender::Female => counts.female += 1,
            }
        }
        counts
    }

    pub fn for_gender(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

fn holds_slot(status: RegistrationStatus) -> bool {
    matches!(
        status,
        RegistrationStatus::Pending | RegistrationStatus::Accepted | RegistrationStatus::Active
    )
}

/// Acceptance deadlines per gender once a limit has been reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationTimes {
    pub male: Option<DateTime<Utc>>,
    pub female: Option<DateTime<Utc>>,
}

/// Pure capacity rules: expiration windows and per-user registration
/// eligibility. No mutation, no hidden time reads.
#[derive(Debug, Clone, Copy)]
pub struct CapacityPolicy {
    grace: Duration,
}

impl CapacityPolicy {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(Duration::hours(config.capacity_grace_hours))
    }

    /// For each gender with a configured limit, once the counted
    /// registrations reach that limit new acceptances expire after the
    /// grace window.
    pub fn current_expiration_times(
        &self,
        league: &League,
        counts: GenderCounts,
        now: DateTime<Utc>,
    ) -> ExpirationTimes {
        ExpirationTimes {
            male: self.expiration_for(league.male_limit, counts.male, now),
            female: self.expiration_for(league.female_limit, counts.female, now),
        }
    }

    fn expiration_for(
        &self,
        limit: Option<u32>,
        count: u32,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let limit = limit?;
        (count >= limit).then(|| now + self.grace)
    }

    /// Whether the user may register right now: the window must be open (or
    /// the user invited), and their gender must have a slot remaining when a
    /// limit is configured.
    pub fn registration_open_for(
        &self,
        league: &League,
        user: Option<&User>,
        counts: GenderCounts,
        now: DateTime<Utc>,
    ) -> bool {
        let user = match user {
            Some(user) => user,
            None => return false,
        };

        if !(league.registration_window_open(now) || league.is_invited(&user.id)) {
            return false;
        }

        match league.gender_limit(user.gender) {
            None => true,
            Some(limit) => limit.saturating_sub(counts.for_gender(user.gender)) > 0,
        }
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::from_config(&CoreConfig::default())
    }
}
