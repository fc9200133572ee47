use std::fmt;

use super::domain::{Gender, League, Registration, Sport};

/// A single rejected field with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Registration save rejected; recoverable, the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registration failed validation:")?;
        for error in &self.errors {
            write!(f, " [{}] {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Gate run on every registration save.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationValidator;

impl RegistrationValidator {
    pub fn validate(
        &self,
        registration: &Registration,
        league: &League,
    ) -> Result<(), ValidationFailure> {
        let mut errors = Vec::new();

        if registration.availability.general.is_none() {
            errors.push(FieldError {
                field: "availability",
                message: "Please select an attendance percentage.".to_string(),
            });
        }

        if league.options.allow_self_rank {
            let max_rank = self_rank_ceiling(league.sport, registration.gender);
            let in_range = registration
                .self_rank
                .map(|rank| (1.0..=f64::from(max_rank)).contains(&rank))
                .unwrap_or(false);
            if !in_range {
                errors.push(FieldError {
                    field: "self_rank",
                    message: format!("Please select a rank between 1 and {max_rank}"),
                });
            }
        }

        if registration.player_strength.is_none() {
            errors.push(FieldError {
                field: "player_strength",
                message: "Please select a primary role.".to_string(),
            });
        }

        if registration.waiver_acceptance_date.is_none() {
            errors.push(FieldError {
                field: "waiver_accepted",
                message: "You must accept the liability waiver and refund policy to register."
                    .to_string(),
            });
        }

        if let Some(rank) = registration.commish_rank {
            if !(rank > 0.0 && rank < 10.0) {
                errors.push(FieldError {
                    field: "commish_rank",
                    message: "Commissioner rank must be greater than 0 and less than 10."
                        .to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { errors })
        }
    }
}

/// Goaltimate compresses the women's rank scale; everything else uses 1-9.
fn self_rank_ceiling(sport: Sport, gender: Gender) -> u32 {
    match (sport, gender) {
        (Sport::Goaltimate, Gender::Female) => 6,
        _ => 9,
    }
}

/// Field-level checks applied when a league itself is created or edited.
pub fn validate_league(league: &League) -> Result<(), ValidationFailure> {
    let mut errors = Vec::new();

    if league.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "League name is required.".to_string(),
        });
    }

    if !(1..250).contains(&league.price) {
        errors.push(FieldError {
            field: "price",
            message: "Price must be between 1 and 249.".to_string(),
        });
    }

    if league.registration_open > league.registration_close {
        errors.push(FieldError {
            field: "registration_open",
            message: "Registration must open before it closes.".to_string(),
        });
    }

    if let Some(age) = league.options.max_grank_age {
        if !(1..24).contains(&age) {
            errors.push(FieldError {
                field: "max_grank_age",
                message: "Max g-rank age must be between 1 and 23.".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { errors })
    }
}
