use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// League lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueStatus {
    Upcoming,
    Active,
    Finished,
}

impl LeagueStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeagueStatus::Upcoming => "upcoming",
            LeagueStatus::Active => "active",
            LeagueStatus::Finished => "finished",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(LeagueStatus::Upcoming),
            "active" => Some(LeagueStatus::Active),
            "finished" => Some(LeagueStatus::Finished),
            _ => None,
        }
    }
}

/// Team states within a league
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Active,
    Suspended,
    Withdrawn,
}

impl TeamStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TeamStatus::Active => "active",
            TeamStatus::Suspended => "suspended",
            TeamStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TeamStatus::Active),
            "suspended" => Some(TeamStatus::Suspended),
            "withdrawn" => Some(TeamStatus::Withdrawn),
            _ => None,
        }
    }
}

/// Match status vocabulary written by this service. Results arrive from an
/// external game-server integration, so `Match.status` is carried as raw
/// text and only normalized where it is compared.
pub mod match_status {
    pub const SCHEDULED: &str = "scheduled";
    pub const ONGOING: &str = "ongoing";
    pub const FINISHED: &str = "finished";
    pub const CANCELED: &str = "canceled";
}

/// Result status vocabulary expected from the result writer.
pub mod result_status {
    pub const HOME_WIN: &str = "home_win";
    pub const AWAY_WIN: &str = "away_win";
    pub const DRAW: &str = "draw";
}

/// Structured league rules. Persisted as versioned JSON; unknown or missing
/// payloads deserialize to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeagueRules {
    pub version: u32,
    pub match_duration_min: u32,
    pub roster_size: u32,
    pub allow_substitutes: bool,
}

impl Default for LeagueRules {
    fn default() -> Self {
        Self {
            version: 1,
            match_duration_min: 90,
            roster_size: 5,
            allow_substitutes: true,
        }
    }
}

/// A season-scoped competition instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: i64,
    pub name: String,
    pub status: LeagueStatus,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    /// Enrollment price in minor currency units
    pub price: i64,
    pub max_team: u32,
    pub min_player: u32,
    pub rules: LeagueRules,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// An entrant enrolled into a specific league. `code` is unique per league.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub league_id: i64,
    pub code: String,
    pub name: String,
    pub status: TeamStatus,
    pub joined_at: DateTime<Utc>,
}

/// One scheduled encounter between two teams within a league
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub league_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub round: u32,
    pub stage: String,
    pub zone: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
}

/// Result row attached 1:1 to a finished match, written externally
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_id: i64,
    pub home_score: u32,
    pub away_score: u32,
    pub result_status: String,
    pub winner_team_id: Option<i64>,
}

/// Derived per-team summary of results within a league. Never persisted;
/// recomputed on demand from matches + results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i64,
    pub points: u32,
}

/// Audit row written by the payment completion callback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub invoice_number: String,
    pub status: String,
    pub synced_at: DateTime<Utc>,
}
