//! Client for the external payment-status service.
//!
//! Only the contract matters here: given an invoice number, report its
//! current status string. Callers treat any upstream failure or timeout as
//! "not yet paid" rather than surfacing it.

use crate::error::{EngineError, EngineResult};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Upstream's view of one invoice
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub invoice_number: String,
    pub status: String,
}

impl PaymentStatus {
    /// Upstream reports exact status strings; comparison is normalized to
    /// upper case. Only `SUCCESS` and `PAID` count as settled.
    pub fn is_paid(&self) -> bool {
        matches!(self.status.trim().to_uppercase().as_str(), "SUCCESS" | "PAID")
    }
}

/// Seam to the payment processor, mockable in tests.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn invoice_status(&self, invoice_number: &str) -> EngineResult<PaymentStatus>;
}

/// HTTP implementation talking to the real payment-status service.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    client: Client,
    base_url: String,
}

impl HttpPaymentGateway {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder().timeout(timeout);

        if let Some(key) = api_key {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", key)
                    .parse()
                    .context("Invalid payment API key")?,
            );
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .context("Failed to build payment gateway client")?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn invoice_status(&self, invoice_number: &str) -> EngineResult<PaymentStatus> {
        let url = format!(
            "{}/invoices/{}/status",
            self.base_url.trim_end_matches('/'),
            invoice_number
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::upstream(format!("payment status request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(EngineError::upstream(format!(
                "payment status request returned {}",
                resp.status()
            )));
        }

        resp.json::<PaymentStatus>()
            .await
            .map_err(|e| EngineError::upstream(format!("malformed payment status response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(s: &str) -> PaymentStatus {
        PaymentStatus {
            invoice_number: "LEAGUE-1-shd-001".to_string(),
            status: s.to_string(),
        }
    }

    #[test]
    fn test_success_and_paid_settle() {
        assert!(status("SUCCESS").is_paid());
        assert!(status("PAID").is_paid());
        // Normalized before comparison
        assert!(status("paid").is_paid());
        assert!(status(" success ").is_paid());
    }

    #[test]
    fn test_anything_else_is_unpaid() {
        for s in ["PENDING", "FAILED", "EXPIRED", "REFUNDED", ""] {
            assert!(!status(s).is_paid(), "{s:?} treated as paid");
        }
    }
}
