//! Split Core
//!
//! Shared vocabulary for the group settlement workspace: member identities,
//! participation status, exact money arithmetic and configuration.
//!
//! # Money
//!
//! - All amounts are `rust_decimal::Decimal`, never floats
//! - Shares keep full precision; rounding happens at presentation
//! - User-entered amounts accept both `,` and `.` as decimal separator

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod money;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{Member, MemberId, ParticipationStatus, Roster};
pub use money::SplitPolicy;
pub use config::{Config, StaleReferencePolicy};
