//! Payment-gated enrollment reconciliation.
//!
//! Admits a team into a league for a paid invoice exactly once. Duplicate
//! and out-of-order notifications are absorbed by the storage layer's
//! unique (league, code) constraint: the insert itself decides whether this
//! call was the first one, so concurrent deliveries cannot double-admit.

use crate::db::Database;
use crate::enrollment::invoice::parse_invoice;
use crate::enrollment::payments::PaymentGateway;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Successful reconciliation; `inserted` is false when the team was already
/// admitted by an earlier delivery of the same invoice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub league_id: i64,
    pub team_code: String,
    pub inserted: bool,
}

#[derive(Debug)]
pub enum EnrollError {
    InvalidInvoice,
    LeagueNotFound(i64),
    Other(EngineError),
}

impl EnrollError {
    pub fn reason(&self) -> &'static str {
        match self {
            EnrollError::InvalidInvoice => "invalid_invoice",
            EnrollError::LeagueNotFound(_) => "league_not_found",
            EnrollError::Other(_) => "other",
        }
    }
}

impl From<EngineError> for EnrollError {
    fn from(err: EngineError) -> Self {
        EnrollError::Other(err)
    }
}

/// Admit the team a paid invoice enrolls. Idempotent: repeated calls for an
/// already-admitted invoice are a no-op success with `inserted: false`.
pub fn admit_team(
    db: &Database,
    invoice_number: &str,
    now: DateTime<Utc>,
) -> Result<Admission, EnrollError> {
    let invoice = parse_invoice(invoice_number).ok_or(EnrollError::InvalidInvoice)?;

    let league = db
        .get_league(invoice.league_id)
        .map_err(EngineError::Internal)?;
    let label = db.get_gang_label(&invoice.gang_code)?;

    let league = league.ok_or(EnrollError::LeagueNotFound(invoice.league_id))?;

    let name = label.unwrap_or_else(|| invoice.gang_code.to_uppercase());
    let inserted = db
        .insert_team_if_absent(league.id, &invoice.gang_code, &name, now)?
        .is_some();

    if inserted {
        info!(
            league_id = league.id,
            gang_code = %invoice.gang_code,
            "Team admitted from paid invoice"
        );
    }

    Ok(Admission {
        league_id: league.id,
        team_code: invoice.gang_code,
        inserted,
    })
}

/// Outcome of the user-triggered verify path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutcome {
    pub paid: bool,
    pub inserted: bool,
    pub status: String,
}

/// Poll upstream for the invoice's payment status and reconcile if settled.
///
/// Upstream errors and timeouts read as "not yet paid"; they never reach the
/// caller as failures.
pub async fn verify_and_admit(
    db: &Database,
    gateway: &dyn PaymentGateway,
    invoice_number: &str,
    now: DateTime<Utc>,
) -> Result<VerifyOutcome, EnrollError> {
    let status = match gateway.invoice_status(invoice_number).await {
        Ok(status) => status,
        Err(err) => {
            warn!(
                invoice = invoice_number,
                error = %err,
                "Payment status lookup failed, treating invoice as unpaid"
            );
            return Ok(VerifyOutcome {
                paid: false,
                inserted: false,
                status: "UNKNOWN".to_string(),
            });
        }
    };

    if !status.is_paid() {
        return Ok(VerifyOutcome {
            paid: false,
            inserted: false,
            status: status.status,
        });
    }

    let admission = admit_team(db, invoice_number, now)?;
    Ok(VerifyOutcome {
        paid: true,
        inserted: admission.inserted,
        status: status.status,
    })
}

/// Completion-callback path: sync whatever status upstream reports onto the
/// local payment record for audit, reconcile only if paid, and swallow every
/// failure. The caller always redirects the browser regardless of outcome.
pub async fn complete_and_sync(
    db: &Database,
    gateway: &dyn PaymentGateway,
    invoice_number: &str,
    now: DateTime<Utc>,
) {
    let status = match gateway.invoice_status(invoice_number).await {
        Ok(status) => status,
        Err(err) => {
            warn!(
                invoice = invoice_number,
                error = %err,
                "Completion callback could not fetch payment status"
            );
            return;
        }
    };

    // Audit row is written for unpaid outcomes too
    if let Err(err) = db.sync_payment_status(invoice_number, &status.status, now) {
        warn!(
            invoice = invoice_number,
            error = %err,
            "Failed to sync payment status"
        );
    }

    if !status.is_paid() {
        return;
    }

    match admit_team(db, invoice_number, now) {
        Ok(admission) => {
            if !admission.inserted {
                info!(
                    invoice = invoice_number,
                    league_id = admission.league_id,
                    "Completion callback found team already admitted"
                );
            }
        }
        Err(err) => {
            warn!(
                invoice = invoice_number,
                reason = err.reason(),
                "Completion callback could not admit team"
            );
        }
    }
}
