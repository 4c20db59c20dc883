//! Settlement Engine
//!
//! Computes who owes whom inside a group from its shared expense history.
//!
//! # Architecture
//!
//! The engine is a pure function of an expense snapshot and a member roster:
//!
//! 1. **Validation**: raw storage documents become typed `Expense` values
//! 2. **Gross ledger**: every participant share accrues to the payer
//! 3. **Netting**: reciprocal debts between each member pair cancel out
//! 4. **Presentation**: per-member debts and credits above the materiality
//!    threshold, rounded to currency scale
//!
//! Nothing is persisted between calls. The caller hands over the complete
//! current snapshot each time the expense collection changes.
//!
//! # Example
//!
//! ```no_run
//! use settlement::SettlementEngine;
//! use split_core::{Config, Member, Roster};
//!
//! fn main() -> settlement::Result<()> {
//!     let engine = SettlementEngine::new(Config::default())?;
//!     let members = vec![Member::new("u1", "Ana"), Member::new("u2", "Beto")];
//!
//!     let dinner = engine.record_expense("Dinner", "80,00", &members[0], &members)?;
//!     let balances = engine.balances(&[dinner], &Roster::from_members(&members))?;
//!
//!     for balance in &balances {
//!         println!("{:?} owes {}", balance.nickname, balance.total_debts());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod expense;
pub mod document;
pub mod netting;
pub mod error;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use expense::{Expense, ExpenseId, Participant};
pub use document::ExpenseDocument;
pub use netting::{net_balances, GrossLedger, NettingEngine};
pub use engine::SettlementEngine;
