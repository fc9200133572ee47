use std::env;

/// Tunables for the core that the surrounding service may override through
/// the environment.
#[derive(Debug, Clone, Copy)]
pub struct CoreConfig {
    /// Grace window granted once a gender hits its registration limit.
    pub capacity_grace_hours: i64,
    /// Default lifetime of an acceptance offer before it lapses.
    pub acceptance_expiry_days: i64,
}

const DEFAULT_CAPACITY_GRACE_HOURS: i64 = 48;
const DEFAULT_ACCEPTANCE_EXPIRY_DAYS: i64 = 3;

impl CoreConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let capacity_grace_hours =
            parse_positive("LEAGUE_CAPACITY_GRACE_HOURS", DEFAULT_CAPACITY_GRACE_HOURS)?;
        let acceptance_expiry_days =
            parse_positive("LEAGUE_ACCEPTANCE_EXPIRY_DAYS", DEFAULT_ACCEPTANCE_EXPIRY_DAYS)?;

        Ok(Self {
            capacity_grace_hours,
            acceptance_expiry_days,
        })
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            capacity_grace_hours: DEFAULT_CAPACITY_GRACE_HOURS,
            acceptance_expiry_days: DEFAULT_ACCEPTANCE_EXPIRY_DAYS,
        }
    }
}

fn parse_positive(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidDuration { key, found: raw }),
    }
}

/// Error raised when an environment override cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, found {found:?}")]
    InvalidDuration { key: &'static str, found: String },
}
