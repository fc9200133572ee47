use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::clock::FixedClock;
use crate::config::CoreConfig;
use crate::league::domain::{
    AgeDivision, AttendanceBucket, Availability, CoreOptions, Game, Gender, League, LeagueId,
    LeagueOptions, PaymentTransaction, PlayerStrength, Registration, RegistrationGroup,
    RegistrationId, Season, Sport, Team, TeamId, TransactionId, User, UserId,
};
use crate::league::locks::LeagueLocks;
use crate::league::repository::{
    LeagueStore, Notification, Notifier, NotifyError, PaymentError, PaymentGateway, RefundReceipt,
    RosterStore, StoreError,
};
use crate::league::{PairingService, RegistrationService, RosterService, StandingsEngine};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 15, 0, 0).unwrap()
}

pub(super) fn league() -> League {
    League {
        id: LeagueId("summer-ultimate".to_string()),
        name: "Summer Ultimate".to_string(),
        age_division: AgeDivision::Adult,
        season: Season::Summer,
        sport: Sport::Ultimate,
        start_date: NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"),
        registration_open: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        registration_close: NaiveDate::from_ymd_opt(2025, 6, 20).expect("valid date"),
        female_limit: None,
        male_limit: None,
        price: 45,
        options: LeagueOptions::default(),
        core_options: CoreOptions::default(),
        invited_players: Vec::new(),
    }
}

pub(super) fn user(id: &str, gender: Gender) -> User {
    User {
        id: UserId(id.to_string()),
        gender,
    }
}

pub(super) fn team(id: &str, league: &League) -> Team {
    Team {
        id: TeamId(id.to_string()),
        league_id: league.id.clone(),
        name: format!("Team {id}"),
        roster: Vec::new(),
        league_rank: 0,
        record: Default::default(),
    }
}

pub(super) fn game(home: &str, away: &str, home_score: i64, away_score: i64) -> Game {
    Game {
        home: TeamId(home.to_string()),
        away: TeamId(away.to_string()),
        home_score,
        away_score,
    }
}

/// A registration that passes every validation gate.
pub(super) fn valid_registration(id: &str, league: &League, user: &User) -> Registration {
    let mut registration = Registration::new(
        RegistrationId(id.to_string()),
        league.id.clone(),
        user,
    );
    registration.availability = Availability {
        general: Some(AttendanceBucket::Full),
        end_of_season: Some(AttendanceBucket::ThreeQuarters),
    };
    registration.player_strength = Some(PlayerStrength::Both);
    registration.self_rank = Some(5.0);
    registration.waiver_acceptance_date = Some(now());
    registration
}

pub(super) fn transaction(registration: &Registration, amount: u32) -> PaymentTransaction {
    PaymentTransaction {
        registration_id: registration.id.clone(),
        transaction_id: TransactionId(format!("txn-{}", registration.id.0)),
        amount,
        refunded_amount: None,
    }
}

/// In-memory store backing every service under test. Saves can be toggled to
/// fail so persistence-failure paths are reachable.
#[derive(Default)]
pub(super) struct MemoryStore {
    leagues: Mutex<HashMap<LeagueId, League>>,
    teams: Mutex<HashMap<TeamId, Team>>,
    games: Mutex<Vec<Game>>,
    groups: Mutex<Vec<RegistrationGroup>>,
    registrations: Mutex<HashMap<RegistrationId, Registration>>,
    transactions: Mutex<HashMap<RegistrationId, PaymentTransaction>>,
    memberships: Mutex<HashMap<UserId, Vec<TeamId>>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub(super) fn seeded(league: League) -> Arc<Self> {
        let store = Arc::new(Self::default());
        store.put_league(league);
        store
    }

    pub(super) fn put_league(&self, league: League) {
        self.leagues
            .lock()
            .expect("league table poisoned")
            .insert(league.id.clone(), league);
    }

    pub(super) fn put_team(&self, team: Team) {
        self.teams
            .lock()
            .expect("team table poisoned")
            .insert(team.id.clone(), team);
    }

    pub(super) fn put_game(&self, game: Game) {
        self.games.lock().expect("game table poisoned").push(game);
    }

    pub(super) fn put_group(&self, group: RegistrationGroup) {
        self.groups.lock().expect("group table poisoned").push(group);
    }

    pub(super) fn put_registration(&self, registration: Registration) {
        self.registrations
            .lock()
            .expect("registration table poisoned")
            .insert(registration.id.clone(), registration);
    }

    pub(super) fn put_transaction(&self, transaction: PaymentTransaction) {
        self.transactions
            .lock()
            .expect("transaction table poisoned")
            .insert(transaction.registration_id.clone(), transaction.clone());
    }

    pub(super) fn stored_registration(&self, id: &RegistrationId) -> Registration {
        self.registrations
            .lock()
            .expect("registration table poisoned")
            .get(id)
            .cloned()
            .expect("registration present")
    }

    pub(super) fn stored_team(&self, id: &TeamId) -> Team {
        self.teams
            .lock()
            .expect("team table poisoned")
            .get(id)
            .cloned()
            .expect("team present")
    }

    pub(super) fn stored_transaction(&self, id: &RegistrationId) -> PaymentTransaction {
        self.transactions
            .lock()
            .expect("transaction table poisoned")
            .get(id)
            .cloned()
            .expect("transaction present")
    }

    pub(super) fn memberships_of(&self, user: &UserId) -> Vec<TeamId> {
        self.memberships
            .lock()
            .expect("membership table poisoned")
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn fail_next_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("database offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl LeagueStore for MemoryStore {
    fn league(&self, id: &LeagueId) -> Result<Option<League>, StoreError> {
        Ok(self
            .leagues
            .lock()
            .expect("league table poisoned")
            .get(id)
            .cloned())
    }

    fn team(&self, id: &TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self
            .teams
            .lock()
            .expect("team table poisoned")
            .get(id)
            .cloned())
    }

    fn teams_in_league(&self, league: &LeagueId) -> Result<Vec<Team>, StoreError> {
        let table = self.teams.lock().expect("team table poisoned");
        let mut teams: Vec<Team> = table
            .values()
            .filter(|team| team.league_id == *league)
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(teams)
    }

    fn games_in_league(&self, _league: &LeagueId) -> Result<Vec<Game>, StoreError> {
        Ok(self.games.lock().expect("game table poisoned").clone())
    }

    fn groups_in_league(&self, league: &LeagueId) -> Result<Vec<RegistrationGroup>, StoreError> {
        Ok(self
            .groups
            .lock()
            .expect("group table poisoned")
            .iter()
            .filter(|group| group.league_id == *league)
            .cloned()
            .collect())
    }

    fn registration(&self, id: &RegistrationId) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .registrations
            .lock()
            .expect("registration table poisoned")
            .get(id)
            .cloned())
    }

    fn registration_for(
        &self,
        league: &LeagueId,
        user: &UserId,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .registrations
            .lock()
            .expect("registration table poisoned")
            .values()
            .find(|registration| {
                registration.league_id == *league && registration.user_id == *user
            })
            .cloned())
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.check_writable()?;
        self.teams
            .lock()
            .expect("team table poisoned")
            .insert(team.id.clone(), team.clone());
        Ok(())
    }

    fn save_registration(&self, registration: &Registration) -> Result<(), StoreError> {
        self.check_writable()?;
        self.registrations
            .lock()
            .expect("registration table poisoned")
            .insert(registration.id.clone(), registration.clone());
        Ok(())
    }

    fn transaction_for(
        &self,
        registration: &RegistrationId,
    ) -> Result<Option<PaymentTransaction>, StoreError> {
        Ok(self
            .transactions
            .lock()
            .expect("transaction table poisoned")
            .get(registration)
            .cloned())
    }

    fn save_transaction(&self, transaction: &PaymentTransaction) -> Result<(), StoreError> {
        self.check_writable()?;
        self.transactions
            .lock()
            .expect("transaction table poisoned")
            .insert(transaction.registration_id.clone(), transaction.clone());
        Ok(())
    }
}

impl RosterStore for MemoryStore {
    fn pull_player_from_teams(&self, teams: &[TeamId], user: &UserId) -> Result<(), StoreError> {
        let mut table = self.teams.lock().expect("team table poisoned");
        for id in teams {
            if let Some(team) = table.get_mut(id) {
                team.roster.retain(|member| member != user);
            }
        }
        Ok(())
    }

    fn pull_teams_from_player(&self, user: &UserId, teams: &[TeamId]) -> Result<(), StoreError> {
        let mut table = self.memberships.lock().expect("membership table poisoned");
        if let Some(memberships) = table.get_mut(user) {
            memberships.retain(|team| !teams.contains(team));
        }
        Ok(())
    }

    fn add_player_to_team(&self, team: &TeamId, user: &UserId) -> Result<(), StoreError> {
        let mut table = self.teams.lock().expect("team table poisoned");
        let team = table.get_mut(team).ok_or(StoreError::NotFound)?;
        if !team.roster.contains(user) {
            team.roster.push(user.clone());
        }
        Ok(())
    }

    fn add_team_to_player(&self, user: &UserId, team: &TeamId) -> Result<(), StoreError> {
        let mut table = self.memberships.lock().expect("membership table poisoned");
        let memberships = table.entry(user.clone()).or_default();
        if !memberships.contains(team) {
            memberships.push(team.clone());
        }
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    events: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

/// Gateway that records refunds and reports a fixed refunded amount.
pub(super) struct MemoryGateway {
    pub(super) amount: u32,
    calls: Mutex<Vec<TransactionId>>,
}

impl MemoryGateway {
    pub(super) fn refunding(amount: u32) -> Self {
        Self {
            amount,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<TransactionId> {
        self.calls.lock().expect("gateway mutex poisoned").clone()
    }
}

impl PaymentGateway for MemoryGateway {
    fn refund(&self, transaction: &TransactionId) -> Result<RefundReceipt, PaymentError> {
        self.calls
            .lock()
            .expect("gateway mutex poisoned")
            .push(transaction.clone());
        Ok(RefundReceipt {
            amount: self.amount,
        })
    }
}

pub(super) struct DecliningGateway;

impl PaymentGateway for DecliningGateway {
    fn refund(&self, _transaction: &TransactionId) -> Result<RefundReceipt, PaymentError> {
        Err(PaymentError::Declined(
            "transaction already settled".to_string(),
        ))
    }
}

pub(super) type TestRegistrationService =
    RegistrationService<MemoryStore, MemoryNotifier, MemoryGateway>;

pub(super) fn registration_service(
    store: Arc<MemoryStore>,
) -> (TestRegistrationService, Arc<MemoryNotifier>, Arc<MemoryGateway>) {
    let notifier = Arc::new(MemoryNotifier::default());
    let gateway = Arc::new(MemoryGateway::refunding(45));
    let service = RegistrationService::new(
        store,
        notifier.clone(),
        gateway.clone(),
        Arc::new(FixedClock(now())),
        CoreConfig::default(),
    );
    (service, notifier, gateway)
}

pub(super) fn standings_engine(store: Arc<MemoryStore>) -> StandingsEngine<MemoryStore> {
    StandingsEngine::new(store, Arc::new(LeagueLocks::new()))
}

pub(super) fn roster_service(
    store: Arc<MemoryStore>,
) -> (
    RosterService<MemoryStore, MemoryStore, MemoryNotifier>,
    Arc<MemoryNotifier>,
) {
    let notifier = Arc::new(MemoryNotifier::default());
    let service = RosterService::new(
        store.clone(),
        store,
        notifier.clone(),
        Arc::new(LeagueLocks::new()),
    );
    (service, notifier)
}

pub(super) fn pairing_service(store: Arc<MemoryStore>) -> PairingService<MemoryStore> {
    PairingService::new(store, Arc::new(LeagueLocks::new()))
}
