//! Error types for debt records

use thiserror::Error;

/// Debt lifecycle error
#[derive(Debug, Error)]
pub enum Error {
    /// Core error (money parsing, configuration)
    #[error("Core error: {0}")]
    Core(#[from] split_core::Error),

    /// Invalid creation or edit input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Only the payer may settle, edit or delete a debt
    #[error("Not authorized: {requester} is not the payer of debt {debt_id}")]
    Unauthorized {
        /// Debt the action targeted
        debt_id: String,
        /// Member that attempted the action
        requester: String,
    },
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
