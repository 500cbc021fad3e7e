//! HTTP surface of the competition engine.
//!
//! Admin routes (league creation/seeding/start) sit behind JWT auth plus an
//! admin gate; the enrollment verify endpoint requires any authenticated
//! caller; the push endpoint checks a shared secret; the completion
//! callback is public and always redirects.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{auth_middleware, require_admin, JwtHandler};
use crate::config::Config;
use crate::db::{Database, NewLeague};
use crate::enrollment::{self, EnrollError, PaymentGateway};
use crate::error::EngineError;
use crate::league::{self, StartedLeague};
use crate::models::{
    LeagueRules, LeagueStatus, Match, MatchResult, Standing, Team, TeamStatus,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub jwt: Arc<JwtHandler>,
    pub config: Arc<Config>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/leagues", post(create_league))
        .route("/api/leagues/:id/teams", post(seed_team))
        .route("/api/leagues/:id/start", post(start_league))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    let user_routes = Router::new()
        .route("/api/enrollment/verify", get(enrollment_verify))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/standings", get(standings))
        .route("/api/schedule", get(schedule))
        .route("/internal/enrollment/notify", post(enrollment_notify))
        .route("/enrollment/complete", get(enrollment_complete))
        .merge(admin_routes)
        .merge(user_routes)
        .with_state(state)
}

// ===== Route Handlers =====

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn create_league(
    State(state): State<AppState>,
    Json(req): Json<CreateLeagueRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("league name must not be empty".into()));
    }

    let league = state
        .db
        .create_league(
            &NewLeague {
                name: req.name.trim().to_string(),
                price: req.price.unwrap_or(0),
                max_team: req.max_team.unwrap_or(16),
                min_player: req.min_player.unwrap_or(1),
                rules: req.rules.unwrap_or_default(),
                created_by: req.created_by.unwrap_or_else(|| "admin".to_string()),
            },
            Utc::now(),
        )
        .map_err(|e| ApiError::from(EngineError::Internal(e)))?;

    Ok(Json(json!(league)))
}

async fn seed_team(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    Json(req): Json<SeedTeamRequest>,
) -> Result<Json<Team>, ApiError> {
    if league_id <= 0 {
        return Err(ApiError::BadRequest("invalid league id".into()));
    }
    if req.code.trim().is_empty() {
        return Err(ApiError::BadRequest("team code must not be empty".into()));
    }

    if state
        .db
        .get_league(league_id)
        .map_err(EngineError::Internal)?
        .is_none()
    {
        return Err(ApiError::NotFound(format!("league {} not found", league_id)));
    }

    let code = req.code.trim().to_lowercase();
    let name = req.name.unwrap_or_else(|| code.to_uppercase());
    let team = state.db.insert_team(league_id, &code, &name, Utc::now())?;
    Ok(Json(team))
}

/// Generate fixtures and activate the league.
async fn start_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<Json<StartedLeague>, ApiError> {
    if league_id <= 0 {
        return Err(ApiError::BadRequest("invalid league id".into()));
    }

    let started = league::start_league(&state.db, league_id, Utc::now())?;
    Ok(Json(started))
}

async fn standings(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<PageResponse<StandingEntry>>, ApiError> {
    let (page, limit, offset) = params.page_window();

    let (rows, total) = state
        .db
        .list_team_league_rows(params.q.as_deref(), params.status.as_deref(), limit, offset)
        .map_err(EngineError::Internal)?;

    // One match replay per league, shared by its teams on this page
    let mut league_matches: HashMap<i64, Vec<(Match, Option<MatchResult>)>> = HashMap::new();

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let matches = match league_matches.entry(row.league_id) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => e.insert(
                state
                    .db
                    .matches_with_results(row.league_id)
                    .map_err(EngineError::Internal)?,
            ),
        };
        let standing = league::standings::compute_standing(row.team.id, matches);

        entries.push(StandingEntry {
            league_id: row.league_id,
            league_name: row.league_name,
            league_status: row.league_status,
            team_id: row.team.id,
            team_code: row.team.code,
            team_name: row.team.name,
            team_status: row.team.status,
            joined_at: row.team.joined_at,
            total_teams: row.total_teams,
            standing,
        });
    }

    Ok(Json(PageResponse {
        page,
        limit,
        total,
        items: entries,
    }))
}

async fn schedule(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<PageResponse<ScheduleEntry>>, ApiError> {
    let (page, limit, offset) = params.page_window();

    let (rows, total) = state
        .db
        .list_schedule_rows(params.q.as_deref(), params.status.as_deref(), limit, offset)
        .map_err(EngineError::Internal)?;

    let entries = rows
        .into_iter()
        .map(|row| {
            let rosters = [("home", &row.home_team), ("away", &row.away_team)]
                .into_iter()
                .filter_map(|(side, team)| {
                    team.as_ref().map(|t| RosterEntry {
                        side: side.to_string(),
                        team_id: t.id,
                        team_code: t.code.clone(),
                        team_name: t.name.clone(),
                    })
                })
                .collect();

            ScheduleEntry {
                match_id: row.game.id,
                league_id: row.league_id,
                round: row.game.round,
                stage: row.game.stage.clone(),
                zone: row.game.zone.clone(),
                scheduled_at: row.game.scheduled_at,
                match_status: row.game.status.clone(),
                home_team: row.home_team,
                away_team: row.away_team,
                result: row.result,
                rosters,
            }
        })
        .collect();

    Ok(Json(PageResponse {
        page,
        limit,
        total,
        items: entries,
    }))
}

/// Push path: the payment system notifies us that an invoice settled.
async fn enrollment_notify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(expected) = &state.config.enrollment_push_token {
        let provided = headers
            .get("X-Callback-Token")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        if provided != expected {
            return Err(ApiError::Unauthorized("invalid callback token".into()));
        }
    }

    let admission = enrollment::admit_team(&state.db, &req.invoice_number, Utc::now())?;
    Ok(Json(json!({ "ok": true, "inserted": admission.inserted })))
}

/// Poll path: an authenticated user asks us to check their payment.
async fn enrollment_verify(
    State(state): State<AppState>,
    Query(params): Query<InvoiceQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = enrollment::verify_and_admit(
        &state.db,
        state.gateway.as_ref(),
        &params.invoice_number,
        Utc::now(),
    )
    .await?;

    Ok(Json(json!(outcome)))
}

/// Browser redirect after checkout. Never fails visibly: sync what we can,
/// log the rest, send the user to the dashboard.
async fn enrollment_complete(
    State(state): State<AppState>,
    Query(params): Query<CompleteQuery>,
) -> Redirect {
    if let Some(invoice_number) = params
        .invoice_number
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        enrollment::complete_and_sync(&state.db, state.gateway.as_ref(), invoice_number, Utc::now())
            .await;
    } else {
        tracing::warn!("Completion callback hit without an invoice number");
    }

    Redirect::to(&state.config.dashboard_url)
}

// ===== Request/Response Types =====

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLeagueRequest {
    name: String,
    price: Option<i64>,
    max_team: Option<u32>,
    min_player: Option<u32>,
    rules: Option<LeagueRules>,
    created_by: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedTeamRequest {
    code: String,
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotifyRequest {
    invoice_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceQuery {
    invoice_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteQuery {
    invoice_number: Option<String>,
}

#[derive(Deserialize)]
struct ListQuery {
    q: Option<String>,
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl ListQuery {
    /// (page, limit, offset) with defaults and a hard cap
    fn page_window(&self) -> (u32, u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        // Query params are caller-controlled; saturate instead of overflowing
        let offset = (page - 1).saturating_mul(limit);
        (page, limit, offset)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse<T> {
    page: u32,
    limit: u32,
    total: u32,
    items: Vec<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StandingEntry {
    league_id: i64,
    league_name: String,
    league_status: LeagueStatus,
    team_id: i64,
    team_code: String,
    team_name: String,
    team_status: TeamStatus,
    joined_at: DateTime<Utc>,
    total_teams: u32,
    standing: Standing,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    side: String,
    team_id: i64,
    team_code: String,
    team_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleEntry {
    match_id: i64,
    league_id: i64,
    round: u32,
    stage: String,
    zone: String,
    scheduled_at: DateTime<Utc>,
    match_status: String,
    home_team: Option<Team>,
    away_team: Option<Team>,
    result: Option<MatchResult>,
    rosters: Vec<RosterEntry>,
}

// ===== Error Handling =====

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Upstream,
    Internal,
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => ApiError::BadRequest(msg),
            EngineError::NotFound(msg) => ApiError::NotFound(msg),
            EngineError::Conflict(msg) => ApiError::Conflict(msg),
            EngineError::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                ApiError::Upstream
            }
            EngineError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<EnrollError> for ApiError {
    fn from(err: EnrollError) -> Self {
        match err {
            EnrollError::InvalidInvoice => ApiError::BadRequest("invalid invoice number".into()),
            EnrollError::LeagueNotFound(id) => {
                ApiError::NotFound(format!("league {} not found", id))
            }
            EnrollError::Other(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Upstream => (
                StatusCode::BAD_GATEWAY,
                "Payment service unavailable".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_mapping() {
        let err: ApiError = EngineError::validation("insufficient teams").into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = EngineError::not_found("league 9 not found").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = EngineError::conflict("fixtures already generated").into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = EngineError::Internal(anyhow::anyhow!("disk on fire")).into();
        assert!(matches!(err, ApiError::Internal));
    }

    #[test]
    fn test_enroll_error_mapping() {
        let err: ApiError = EnrollError::InvalidInvoice.into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = EnrollError::LeagueNotFound(7).into();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains('7')),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Upstream.into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_page_window_defaults_and_caps() {
        let q = ListQuery {
            q: None,
            status: None,
            page: None,
            limit: None,
        };
        assert_eq!(q.page_window(), (1, 20, 0));

        let q = ListQuery {
            q: None,
            status: None,
            page: Some(3),
            limit: Some(500),
        };
        assert_eq!(q.page_window(), (3, 100, 200));

        let q = ListQuery {
            q: None,
            status: None,
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(q.page_window(), (1, 1, 0));
    }

    #[test]
    fn test_page_window_saturates_on_huge_page_numbers() {
        let q = ListQuery {
            q: None,
            status: None,
            page: Some(u32::MAX),
            limit: Some(100),
        };
        let (page, limit, offset) = q.page_window();
        assert_eq!(page, u32::MAX);
        assert_eq!(limit, 100);
        // Offset pins at the ceiling rather than wrapping
        assert_eq!(offset, u32::MAX);
    }
}
