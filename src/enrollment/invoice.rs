//! Enrollment invoice codec.
//!
//! Wire format: `LEAGUE-<leagueId>-<gangCode>-<suffix>`. The suffix exists
//! only for uniqueness/readability on the payment side and is discarded
//! here. Parsing never panics and has no side effects.

/// Decoded join key between a payment and a pending team enrollment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRef {
    pub league_id: i64,
    /// Lower-cased gang code; may itself contain separators
    pub gang_code: String,
}

const PREFIX: &str = "LEAGUE-";

/// Parse an invoice number into its league id and gang code.
///
/// The literal prefix matches case-insensitively, the league id must be a
/// positive integer, and the gang code is captured permissively: everything
/// between the id and the final `-`-separated token (the suffix) belongs to
/// the gang code, so `LEAGUE-12-a-b-007` yields gang `a-b`.
pub fn parse_invoice(invoice_number: &str) -> Option<InvoiceRef> {
    let trimmed = invoice_number.trim();
    let head = trimmed.get(..PREFIX.len())?;
    if !head.eq_ignore_ascii_case(PREFIX) {
        return None;
    }
    let rest = &trimmed[PREFIX.len()..];

    let (id_part, rest) = rest.split_once('-')?;
    let league_id: i64 = id_part.parse().ok()?;
    if league_id <= 0 {
        return None;
    }

    // Last segment is the discarded suffix; the gang code keeps any inner
    // separators.
    let (gang_part, _suffix) = rest.rsplit_once('-')?;
    if gang_part.is_empty() {
        return None;
    }

    Some(InvoiceRef {
        league_id,
        gang_code: gang_part.to_ascii_lowercase(),
    })
}
