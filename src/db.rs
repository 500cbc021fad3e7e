//! SQLite storage for leagues, teams, fixtures, results, and payment audit
//! rows.
//!
//! - WAL mode for concurrent reads during writes
//! - One connection behind a `parking_lot::Mutex`, shared via `Arc`
//! - `BEGIN IMMEDIATE` around fixture generation so racing starts serialize
//! - `UNIQUE(league_id, code)` + `INSERT OR IGNORE` makes enrollment
//!   reconciliation idempotent at the storage layer (no check-then-insert)

use crate::error::{EngineError, EngineResult};
use crate::league::{fixtures, StartedLeague};
use crate::models::{
    match_status, League, LeagueRules, LeagueStatus, Match, MatchResult, PaymentRecord, Standing,
    Team, TeamStatus,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use rusqlite::{params, Connection, OpenFlags};
use std::sync::Arc;
use tracing::{info, warn};

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS leagues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'upcoming',
    start_at TEXT,
    end_at TEXT,
    price INTEGER NOT NULL DEFAULT 0,
    max_team INTEGER NOT NULL DEFAULT 16,
    min_player INTEGER NOT NULL DEFAULT 1,
    rules_json TEXT NOT NULL DEFAULT '{}',
    created_by TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    league_id INTEGER NOT NULL REFERENCES leagues(id),
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    joined_at TEXT NOT NULL
);

-- At most one team per (league, code); the enrollment reconciler relies on
-- this to absorb duplicate payment notifications.
CREATE UNIQUE INDEX IF NOT EXISTS idx_teams_league_code ON teams(league_id, code);

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    league_id INTEGER NOT NULL REFERENCES leagues(id),
    home_team_id INTEGER NOT NULL,
    away_team_id INTEGER NOT NULL,
    round INTEGER NOT NULL,
    stage TEXT NOT NULL DEFAULT 'regular',
    zone TEXT NOT NULL DEFAULT 'default',
    scheduled_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'scheduled',
    CHECK (home_team_id <> away_team_id)
);

CREATE INDEX IF NOT EXISTS idx_matches_league_round ON matches(league_id, round);
CREATE INDEX IF NOT EXISTS idx_matches_status ON matches(status, scheduled_at);

CREATE TABLE IF NOT EXISTS match_results (
    match_id INTEGER PRIMARY KEY REFERENCES matches(id),
    home_score INTEGER NOT NULL,
    away_score INTEGER NOT NULL,
    result_status TEXT NOT NULL,
    winner_team_id INTEGER
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS gang_labels (
    code TEXT PRIMARY KEY,
    label TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS payments (
    invoice_number TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    synced_at TEXT NOT NULL
) WITHOUT ROWID;
"#;

/// Fields for creating a league (admin action)
#[derive(Debug, Clone)]
pub struct NewLeague {
    pub name: String,
    pub price: i64,
    pub max_team: u32,
    pub min_player: u32,
    pub rules: LeagueRules,
    pub created_by: String,
}

/// One row of the standings listing, before the standing itself is computed
#[derive(Debug, Clone)]
pub struct TeamLeagueRow {
    pub league_id: i64,
    pub league_name: String,
    pub league_status: LeagueStatus,
    pub team: Team,
    pub total_teams: u32,
}

/// One row of the schedule listing
#[derive(Debug, Clone)]
pub struct ScheduleRow {
    pub game: Match,
    pub league_id: i64,
    pub home_team: Option<Team>,
    pub away_team: Option<Team>,
    pub result: Option<MatchResult>,
}

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX; // We handle our own locking

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap_or_default();
        if journal_mode.to_lowercase() != "wal" {
            warn!("WAL mode not active, journal_mode = {}", journal_mode);
        }

        info!("League database initialized at: {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // ===== Leagues =====

    pub fn create_league(&self, new: &NewLeague, now: DateTime<Utc>) -> Result<League> {
        let rules_json = serde_json::to_string(&new.rules)?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO leagues (name, status, price, max_team, min_player, rules_json, created_by, created_at)
             VALUES (?1, 'upcoming', ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.name,
                new.price,
                new.max_team,
                new.min_player,
                rules_json,
                new.created_by,
                now.to_rfc3339(),
            ],
        )
        .context("Failed to insert league")?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_league(id)?
            .context("League vanished right after insert")
    }

    pub fn get_league(&self, league_id: i64) -> Result<Option<League>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, status, start_at, end_at, price, max_team, min_player,
                    rules_json, created_by, created_at
             FROM leagues WHERE id = ?1",
        )?;

        match stmt.query_row(params![league_id], map_league) {
            Ok(league) => Ok(Some(league)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ===== Teams =====

    /// Admin seeding: plain insert, duplicate (league, code) is a conflict.
    pub fn insert_team(
        &self,
        league_id: i64,
        code: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Team> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO teams (league_id, code, name, status, joined_at)
             VALUES (?1, ?2, ?3, 'active', ?4)",
            params![league_id, code, name, now.to_rfc3339()],
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                drop(conn);
                self.get_team_by_id(id)?.ok_or_else(|| {
                    EngineError::Internal(anyhow::anyhow!("team {} vanished after insert", id))
                })
            }
            Err(e) if is_unique_violation(&e) => Err(EngineError::conflict(format!(
                "team code '{}' already enrolled in league {}",
                code, league_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotent enrollment insert. Returns `Some(team)` when a new row was
    /// created, `None` when the (league, code) pair already existed. The
    /// unique index decides; there is no read-before-write race window.
    pub fn insert_team_if_absent(
        &self,
        league_id: i64,
        code: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Option<Team>> {
        let conn = self.conn.lock();
        let changes = conn.execute(
            "INSERT OR IGNORE INTO teams (league_id, code, name, status, joined_at)
             VALUES (?1, ?2, ?3, 'active', ?4)",
            params![league_id, code, name, now.to_rfc3339()],
        )?;

        if changes == 0 {
            return Ok(None);
        }

        let id = conn.last_insert_rowid();
        drop(conn);
        Ok(Some(self.get_team_by_id(id)?.ok_or_else(|| {
            EngineError::Internal(anyhow::anyhow!("team {} vanished after insert", id))
        })?))
    }

    pub fn get_team_by_id(&self, team_id: i64) -> EngineResult<Option<Team>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, league_id, code, name, status, joined_at FROM teams WHERE id = ?1",
        )?;

        match stmt.query_row(params![team_id], map_team) {
            Ok(team) => Ok(Some(team)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_team(&self, league_id: i64, code: &str) -> EngineResult<Option<Team>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, league_id, code, name, status, joined_at
             FROM teams WHERE league_id = ?1 AND code = ?2",
        )?;

        match stmt.query_row(params![league_id, code], map_team) {
            Ok(team) => Ok(Some(team)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ===== Gang display labels =====

    pub fn set_gang_label(&self, code: &str, label: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO gang_labels (code, label) VALUES (?1, ?2)
             ON CONFLICT(code) DO UPDATE SET label = excluded.label",
            params![code, label],
        )?;
        Ok(())
    }

    pub fn get_gang_label(&self, code: &str) -> EngineResult<Option<String>> {
        let conn = self.conn.lock();
        match conn.query_row(
            "SELECT label FROM gang_labels WHERE code = ?1",
            params![code],
            |row| row.get(0),
        ) {
            Ok(label) => Ok(Some(label)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ===== Fixture generation (lifecycle guard) =====

    /// Start a league: check preconditions, generate the double round-robin
    /// schedule, insert all fixtures, and flip the league to active — as one
    /// atomic unit. Concurrent calls serialize on the immediate transaction;
    /// at most one succeeds.
    pub fn start_league<R: Rng + ?Sized>(
        &self,
        league_id: i64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> EngineResult<StartedLeague> {
        let conn = self.conn.lock();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let outcome = start_league_locked(&conn, league_id, now, rng);

        match &outcome {
            Ok(_) => {
                conn.execute("COMMIT", [])?;
            }
            Err(_) => {
                conn.execute("ROLLBACK", []).ok();
            }
        }

        if let Ok(started) = &outcome {
            info!(
                league_id,
                total_teams = started.total_teams,
                total_matches = started.total_matches,
                "League started, fixtures generated"
            );
        }

        outcome
    }

    // ===== Matches & results =====

    pub fn count_matches(&self, league_id: i64) -> Result<u32> {
        let conn = self.conn.lock();
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM matches WHERE league_id = ?1",
            params![league_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn matches_with_results(
        &self,
        league_id: i64,
    ) -> Result<Vec<(Match, Option<MatchResult>)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT m.id, m.league_id, m.home_team_id, m.away_team_id, m.round, m.stage,
                    m.zone, m.scheduled_at, m.status,
                    r.match_id, r.home_score, r.away_score, r.result_status, r.winner_team_id
             FROM matches m
             LEFT JOIN match_results r ON r.match_id = m.id
             WHERE m.league_id = ?1
             ORDER BY m.round",
        )?;

        let rows = stmt
            .query_map(params![league_id], |row| {
                let game = map_match(row)?;
                let result = map_optional_result(row, 9)?;
                Ok((game, result))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Ingest seam for the external result writer.
    pub fn record_result(&self, result: &MatchResult) -> EngineResult<()> {
        let conn = self.conn.lock();
        let changes = conn.execute(
            "INSERT INTO match_results (match_id, home_score, away_score, result_status, winner_team_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(match_id) DO UPDATE SET
                home_score = excluded.home_score,
                away_score = excluded.away_score,
                result_status = excluded.result_status,
                winner_team_id = excluded.winner_team_id",
            params![
                result.match_id,
                result.home_score,
                result.away_score,
                result.result_status,
                result.winner_team_id,
            ],
        )?;

        if changes == 0 {
            return Err(EngineError::not_found(format!(
                "match {} not found",
                result.match_id
            )));
        }
        Ok(())
    }

    pub fn set_match_status(&self, match_id: i64, status: &str) -> EngineResult<()> {
        let conn = self.conn.lock();
        let changes = conn.execute(
            "UPDATE matches SET status = ?1 WHERE id = ?2",
            params![status, match_id],
        )?;
        if changes == 0 {
            return Err(EngineError::not_found(format!(
                "match {} not found",
                match_id
            )));
        }
        Ok(())
    }

    // ===== Payments audit =====

    pub fn sync_payment_status(
        &self,
        invoice_number: &str,
        status: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO payments (invoice_number, status, synced_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(invoice_number) DO UPDATE SET
                status = excluded.status,
                synced_at = excluded.synced_at",
            params![invoice_number, status, now.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_payment(&self, invoice_number: &str) -> Result<Option<PaymentRecord>> {
        let conn = self.conn.lock();
        match conn.query_row(
            "SELECT invoice_number, status, synced_at FROM payments WHERE invoice_number = ?1",
            params![invoice_number],
            |row| {
                Ok(PaymentRecord {
                    invoice_number: row.get(0)?,
                    status: row.get(1)?,
                    synced_at: parse_ts(row.get::<_, String>(2)?, 2)?,
                })
            },
        ) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ===== Listing queries =====

    /// Teams joined with their leagues for the standings listing. `q` is a
    /// free-text filter over team/league names and the team code; `status`
    /// filters on the league status. Returns the page plus the unpaged total.
    pub fn list_team_league_rows(
        &self,
        q: Option<&str>,
        status: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<TeamLeagueRow>, u32)> {
        let pattern = q.map(like_pattern);
        let conn = self.conn.lock();

        let filter = "WHERE (?1 IS NULL OR t.name LIKE ?1 OR t.code LIKE ?1 OR l.name LIKE ?1)
               AND (?2 IS NULL OR l.status = ?2)";

        let total: u32 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM teams t JOIN leagues l ON l.id = t.league_id {}",
                filter
            ),
            params![pattern, status],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT l.id, l.name, l.status,
                    t.id, t.league_id, t.code, t.name, t.status, t.joined_at,
                    (SELECT COUNT(*) FROM teams t2 WHERE t2.league_id = l.id) AS total_teams
             FROM teams t
             JOIN leagues l ON l.id = t.league_id
             {}
             ORDER BY l.id, t.id
             LIMIT ?3 OFFSET ?4",
            filter
        ))?;

        let rows = stmt
            .query_map(params![pattern, status, limit, offset], |row| {
                let league_status: String = row.get(2)?;
                Ok(TeamLeagueRow {
                    league_id: row.get(0)?,
                    league_name: row.get(1)?,
                    league_status: LeagueStatus::from_str(&league_status)
                        .unwrap_or(LeagueStatus::Upcoming),
                    team: Team {
                        id: row.get(3)?,
                        league_id: row.get(4)?,
                        code: row.get(5)?,
                        name: row.get(6)?,
                        status: TeamStatus::from_str(&row.get::<_, String>(7)?)
                            .unwrap_or(TeamStatus::Active),
                        joined_at: parse_ts(row.get::<_, String>(8)?, 8)?,
                    },
                    total_teams: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    }

    /// Matches joined with teams and optional results for the schedule
    /// listing. `q` filters over team/league names; `status` filters the
    /// match status.
    pub fn list_schedule_rows(
        &self,
        q: Option<&str>,
        status: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ScheduleRow>, u32)> {
        let pattern = q.map(like_pattern);
        let conn = self.conn.lock();

        let filter = "WHERE (?1 IS NULL OR h.name LIKE ?1 OR a.name LIKE ?1 OR l.name LIKE ?1)
               AND (?2 IS NULL OR m.status = ?2)";

        let total: u32 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM matches m
                 JOIN leagues l ON l.id = m.league_id
                 LEFT JOIN teams h ON h.id = m.home_team_id
                 LEFT JOIN teams a ON a.id = m.away_team_id
                 {}",
                filter
            ),
            params![pattern, status],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT m.id, m.league_id, m.home_team_id, m.away_team_id, m.round, m.stage,
                    m.zone, m.scheduled_at, m.status,
                    r.match_id, r.home_score, r.away_score, r.result_status, r.winner_team_id,
                    h.id, h.league_id, h.code, h.name, h.status, h.joined_at,
                    a.id, a.league_id, a.code, a.name, a.status, a.joined_at
             FROM matches m
             JOIN leagues l ON l.id = m.league_id
             LEFT JOIN teams h ON h.id = m.home_team_id
             LEFT JOIN teams a ON a.id = m.away_team_id
             LEFT JOIN match_results r ON r.match_id = m.id
             {}
             ORDER BY m.scheduled_at, m.id
             LIMIT ?3 OFFSET ?4",
            filter
        ))?;

        let rows = stmt
            .query_map(params![pattern, status, limit, offset], |row| {
                let game = map_match(row)?;
                let league_id = game.league_id;
                Ok(ScheduleRow {
                    game,
                    league_id,
                    result: map_optional_result(row, 9)?,
                    home_team: map_optional_team(row, 14)?,
                    away_team: map_optional_team(row, 20)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    }

    /// Compute a team's standing by replaying its league's matches.
    pub fn standing_for_team(&self, team: &Team) -> Result<Standing> {
        let matches = self.matches_with_results(team.league_id)?;
        Ok(crate::league::standings::compute_standing(
            team.id, &matches,
        ))
    }
}

// ===== Row mapping & helpers =====

fn start_league_locked<R: Rng + ?Sized>(
    conn: &Connection,
    league_id: i64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> EngineResult<StartedLeague> {
    let status: String = match conn.query_row(
        "SELECT status FROM leagues WHERE id = ?1",
        params![league_id],
        |row| row.get(0),
    ) {
        Ok(status) => status,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(EngineError::not_found(format!(
                "league {} not found",
                league_id
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if LeagueStatus::from_str(&status) != Some(LeagueStatus::Upcoming) {
        return Err(EngineError::conflict(format!(
            "league {} already started",
            league_id
        )));
    }

    // Stable ordering by id before the shuffle
    let mut stmt = conn.prepare(
        "SELECT id FROM teams WHERE league_id = ?1 AND status = 'active' ORDER BY id",
    )?;
    let team_ids = stmt
        .query_map(params![league_id], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if team_ids.len() < 2 {
        return Err(EngineError::validation(format!(
            "insufficient teams: league {} has {} active team(s), need at least 2",
            league_id,
            team_ids.len()
        )));
    }

    let existing: u32 = conn.query_row(
        "SELECT COUNT(*) FROM matches WHERE league_id = ?1",
        params![league_id],
        |row| row.get(0),
    )?;
    if existing > 0 {
        return Err(EngineError::conflict(format!(
            "fixtures already generated for league {}",
            league_id
        )));
    }

    let schedule = fixtures::build_schedule(&team_ids, now, rng);

    let mut insert = conn.prepare(
        "INSERT INTO matches (league_id, home_team_id, away_team_id, round, stage, zone, scheduled_at, status)
         VALUES (?1, ?2, ?3, ?4, 'regular', 'default', ?5, ?6)",
    )?;
    for fixture in &schedule {
        insert.execute(params![
            league_id,
            fixture.home_team_id,
            fixture.away_team_id,
            fixture.round,
            fixture.scheduled_at.to_rfc3339(),
            match_status::SCHEDULED,
        ])?;
    }

    conn.execute(
        "UPDATE leagues SET status = 'active', start_at = ?1 WHERE id = ?2",
        params![now.to_rfc3339(), league_id],
    )?;

    Ok(StartedLeague {
        league_id,
        status: LeagueStatus::Active,
        start_at: now,
        total_teams: team_ids.len() as u32,
        total_matches: schedule.len() as u32,
    })
}

fn map_league(row: &rusqlite::Row<'_>) -> rusqlite::Result<League> {
    let status: String = row.get(2)?;
    let rules_json: String = row.get(8)?;
    Ok(League {
        id: row.get(0)?,
        name: row.get(1)?,
        status: LeagueStatus::from_str(&status).unwrap_or(LeagueStatus::Upcoming),
        start_at: parse_optional_ts(row.get::<_, Option<String>>(3)?, 3)?,
        end_at: parse_optional_ts(row.get::<_, Option<String>>(4)?, 4)?,
        price: row.get(5)?,
        max_team: row.get(6)?,
        min_player: row.get(7)?,
        rules: serde_json::from_str(&rules_json).unwrap_or_default(),
        created_by: row.get(9)?,
        created_at: parse_ts(row.get::<_, String>(10)?, 10)?,
    })
}

fn map_team(row: &rusqlite::Row<'_>) -> rusqlite::Result<Team> {
    let status: String = row.get(4)?;
    Ok(Team {
        id: row.get(0)?,
        league_id: row.get(1)?,
        code: row.get(2)?,
        name: row.get(3)?,
        status: TeamStatus::from_str(&status).unwrap_or(TeamStatus::Active),
        joined_at: parse_ts(row.get::<_, String>(5)?, 5)?,
    })
}

fn map_match(row: &rusqlite::Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        league_id: row.get(1)?,
        home_team_id: row.get(2)?,
        away_team_id: row.get(3)?,
        round: row.get(4)?,
        stage: row.get(5)?,
        zone: row.get(6)?,
        scheduled_at: parse_ts(row.get::<_, String>(7)?, 7)?,
        status: row.get(8)?,
    })
}

fn map_optional_result(
    row: &rusqlite::Row<'_>,
    base: usize,
) -> rusqlite::Result<Option<MatchResult>> {
    let match_id: Option<i64> = row.get(base)?;
    match match_id {
        Some(match_id) => Ok(Some(MatchResult {
            match_id,
            home_score: row.get(base + 1)?,
            away_score: row.get(base + 2)?,
            result_status: row.get(base + 3)?,
            winner_team_id: row.get(base + 4)?,
        })),
        None => Ok(None),
    }
}

fn map_optional_team(row: &rusqlite::Row<'_>, base: usize) -> rusqlite::Result<Option<Team>> {
    let id: Option<i64> = row.get(base)?;
    match id {
        Some(id) => {
            let status: String = row.get(base + 4)?;
            Ok(Some(Team {
                id,
                league_id: row.get(base + 1)?,
                code: row.get(base + 2)?,
                name: row.get(base + 3)?,
                status: TeamStatus::from_str(&status).unwrap_or(TeamStatus::Active),
                joined_at: parse_ts(row.get::<_, String>(base + 5)?, base + 5)?,
            }))
        }
        None => Ok(None),
    }
}

fn parse_ts(value: String, col: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_optional_ts(
    value: Option<String>,
    col: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_ts(v, col)).transpose()
}

fn like_pattern(q: &str) -> String {
    format!("%{}%", q.trim())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
