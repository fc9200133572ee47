use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for leagues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeagueId(pub String);

/// Identifier wrapper for teams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub String);

/// Identifier wrapper for user accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

/// Identifier assigned by the payment processor to a captured charge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sport {
    Ultimate,
    Goaltimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Fall,
    Winter,
    Spring,
    Summer,
    Saturday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeDivision {
    Adult,
    Juniors,
}

/// Status tracked across a registration's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Pending,
    Accepted,
    Active,
    Canceled,
    Waitlisted,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Accepted => "accepted",
            RegistrationStatus::Active => "active",
            RegistrationStatus::Canceled => "canceled",
            RegistrationStatus::Waitlisted => "waitlisted",
        }
    }
}

/// Primary on-field role a player self-identifies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStrength {
    Runner,
    Thrower,
    Both,
}

/// The fixed attendance percentages a registrant may commit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceBucket {
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl AttendanceBucket {
    pub const fn label(self) -> &'static str {
        match self {
            AttendanceBucket::Quarter => "25%",
            AttendanceBucket::Half => "50%",
            AttendanceBucket::ThreeQuarters => "75%",
            AttendanceBucket::Full => "100%",
        }
    }
}

/// Declared attendance commitments for the season and the closing tourney.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub general: Option<AttendanceBucket>,
    pub end_of_season: Option<AttendanceBucket>,
}

/// Feature switches a commissioner configures per league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueOptions {
    pub max_grank_age: Option<u32>,
    pub allow_self_rank: bool,
    pub allow_pairs: bool,
    pub track_spirit_scores: bool,
}

impl Default for LeagueOptions {
    fn default() -> Self {
        Self {
            max_grank_age: None,
            allow_self_rank: true,
            allow_pairs: true,
            track_spirit_scores: false,
        }
    }
}

/// Linear transform applied to a raw rank during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankTransform {
    pub coefficient: f64,
    pub constant: f64,
}

impl Default for RankTransform {
    fn default() -> Self {
        Self {
            coefficient: 1.0,
            constant: 0.0,
        }
    }
}

/// Per-gender normalization coefficients used by [`Registration::core_rank`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankNormalization {
    pub male: RankTransform,
    pub female: RankTransform,
}

impl RankNormalization {
    pub fn transform_for(&self, gender: Gender) -> RankTransform {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// Rank-normalization settings owned by a league.
///
/// Constructed explicitly when the league is created; a league whose
/// `normalization` is unset simply has no core ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreOptions {
    pub normalization: Option<RankNormalization>,
}

/// A scheduled competition instance with its own teams, registrations, and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub age_division: AgeDivision,
    pub season: Season,
    pub sport: Sport,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_open: NaiveDate,
    pub registration_close: NaiveDate,
    pub female_limit: Option<u32>,
    pub male_limit: Option<u32>,
    pub price: u32,
    pub options: LeagueOptions,
    pub core_options: CoreOptions,
    pub invited_players: Vec<UserId>,
}

impl League {
    /// Registration opens at noon on the opening date and closes at the end
    /// of the closing date.
    pub fn registration_window_open(&self, now: DateTime<Utc>) -> bool {
        let opens = match self.registration_open.and_hms_opt(12, 0, 0) {
            Some(naive) => Utc.from_utc_datetime(&naive),
            None => return false,
        };
        let closes = match self.registration_close.and_hms_opt(23, 59, 59) {
            Some(naive) => Utc.from_utc_datetime(&naive),
            None => return false,
        };

        opens <= now && now <= closes
    }

    pub fn started(&self, now: DateTime<Utc>) -> bool {
        let kickoff = match self.start_date.and_hms_opt(0, 0, 0) {
            Some(naive) => Utc.from_utc_datetime(&naive),
            None => return false,
        };
        kickoff < now
    }

    pub fn is_invited(&self, user: &UserId) -> bool {
        self.invited_players.contains(user)
    }

    pub fn requires_grank(&self) -> bool {
        self.options.max_grank_age.is_some()
    }

    pub fn gender_limit(&self, gender: Gender) -> Option<u32> {
        match gender {
            Gender::Male => self.male_limit,
            Gender::Female => self.female_limit,
        }
    }
}

/// Win/loss record plus scoring totals, recomputed from game history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub points_for: i64,
    pub points_against: i64,
}

impl TeamRecord {
    pub fn point_differential(&self) -> i64 {
        self.points_for - self.points_against
    }

    /// Ordering key for standings: record first, then point differential.
    pub fn standing_key(&self) -> (u32, i64) {
        (self.wins, self.point_differential())
    }
}

/// A roster within a league. `league_rank` is only meaningful once the
/// standings engine has run; 0 is the best rank and ties share a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub league_id: LeagueId,
    pub name: String,
    pub roster: Vec<UserId>,
    pub league_rank: u32,
    pub record: TeamRecord,
}

impl Team {
    pub fn has_player(&self, user: &UserId) -> bool {
        self.roster.contains(user)
    }
}

/// A completed game between two of a league's teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub home: TeamId,
    pub away: TeamId,
    pub home_score: i64,
    pub away_score: i64,
}

/// The slice of a user account this core needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub gender: Gender,
}

/// A single player's application to join a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub league_id: LeagueId,
    pub user_id: UserId,
    pub status: RegistrationStatus,
    pub gender: Gender,
    /// Defaulted from the league's price on first save when unset.
    pub price: Option<u32>,
    pub self_rank: Option<f64>,
    pub commish_rank: Option<f64>,
    pub g_rank: Option<f64>,
    /// Lightweight mutual link to another registrant, set by pairing.
    pub pair: Option<UserId>,
    pub acceptance_expires_at: Option<DateTime<Utc>>,
    pub warning_email_sent_at: Option<DateTime<Utc>>,
    pub waiver_acceptance_date: Option<DateTime<Utc>>,
    pub availability: Availability,
    pub player_strength: Option<PlayerStrength>,
    pub comped: bool,
}

impl Registration {
    pub fn new(id: RegistrationId, league_id: LeagueId, user: &User) -> Self {
        Self {
            id,
            league_id,
            user_id: user.id.clone(),
            status: RegistrationStatus::Pending,
            gender: user.gender,
            price: None,
            self_rank: None,
            commish_rank: None,
            g_rank: None,
            pair: None,
            acceptance_expires_at: None,
            warning_email_sent_at: None,
            waiver_acceptance_date: None,
            availability: Availability::default(),
            player_strength: None,
            comped: false,
        }
    }

    pub fn waiver_accepted(&self) -> bool {
        self.waiver_acceptance_date.is_some()
    }

    /// Best available rank: commissioner override, then measured g-rank,
    /// then the player's own estimate.
    pub fn rank(&self) -> Option<f64> {
        self.commish_rank.or(self.g_rank).or(self.self_rank)
    }

    /// Gender-normalized rank used for team balancing. Defined only when the
    /// league configured normalization and a base rank exists.
    pub fn core_rank(&self, league: &League) -> Option<f64> {
        let rank = self.rank()?;
        let normalization = league.core_options.normalization?;
        let transform = normalization.transform_for(self.gender);

        Some(transform.coefficient * rank + transform.constant)
    }
}

/// A league-scoped set of registrants placed together, independent of the
/// lightweight `pair` reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationGroup {
    pub league_id: LeagueId,
    pub members: Vec<UserId>,
}

impl RegistrationGroup {
    pub fn contains(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvitationKind {
    Pair,
    Group,
}

/// One-shot invitation payload consumed when the recipient accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub kind: InvitationKind,
    pub sender: UserId,
    pub recipient: UserId,
}

/// A captured charge against a registration, with refund bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub registration_id: RegistrationId,
    pub transaction_id: TransactionId,
    pub amount: u32,
    pub refunded_amount: Option<u32>,
}
