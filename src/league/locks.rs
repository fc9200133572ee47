use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::LeagueId;

/// Per-league critical sections.
///
/// Standings recomputation, roster moves, and pairing commits for the same
/// league must not interleave; operations on different leagues proceed
/// concurrently. Callers hold the returned handle's guard for the duration
/// of the operation.
#[derive(Debug, Default)]
pub struct LeagueLocks {
    inner: Mutex<HashMap<LeagueId, Arc<Mutex<()>>>>,
}

impl LeagueLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, league: &LeagueId) -> Arc<Mutex<()>> {
        let mut table = self.inner.lock().expect("league lock table poisoned");
        table
            .entry(league.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
