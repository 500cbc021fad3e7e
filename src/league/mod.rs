//! League competition lifecycle: fixture generation, the state guard around
//! it, and the standings aggregator.

pub mod fixtures;
pub mod standings;

use crate::db::Database;
use crate::error::EngineResult;
use crate::models::LeagueStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a successful league start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedLeague {
    pub league_id: i64,
    pub status: LeagueStatus,
    pub start_at: DateTime<Utc>,
    pub total_teams: u32,
    pub total_matches: u32,
}

/// Start a league: the only path from `upcoming` to `active`.
///
/// Precondition failures come back in order — NotFound (no such league),
/// Conflict (already started), Validation (fewer than two active teams),
/// Conflict (fixtures already generated) — and the schedule insert plus the
/// status flip commit atomically. The `finished` transition is owned by an
/// external process and never happens here.
pub fn start_league(
    db: &Database,
    league_id: i64,
    now: DateTime<Utc>,
) -> EngineResult<StartedLeague> {
    db.start_league(league_id, now, &mut rand::thread_rng())
}
