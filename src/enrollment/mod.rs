//! Payment-gated enrollment: invoice decoding, upstream payment status, and
//! the idempotent reconciler that admits teams into leagues.

pub mod invoice;
pub mod payments;
pub mod reconciler;

pub use invoice::{parse_invoice, InvoiceRef};
pub use payments::{HttpPaymentGateway, PaymentGateway, PaymentStatus};
pub use reconciler::{admit_team, complete_and_sync, verify_and_admit, Admission, EnrollError};
