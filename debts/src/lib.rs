//! Debt records for group members
//!
//! Simple peer-to-peer debts: one payer, an even split among the involved
//! members, and an all-or-nothing settlement performed by the payer. These
//! records are not netted against each other or against group expenses.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod types;
pub mod lifecycle;
pub mod document;
pub mod summary;

pub use error::{Error, Result};
pub use types::*;
pub use lifecycle::DebtManager;
pub use document::DebtDocument;
pub use summary::{summarize_for, DebtSummary, DebtSummaryLine};
