//! Error types for the settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Core error (money parsing, configuration)
    #[error("Core error: {0}")]
    Core(#[from] split_core::Error),

    /// Invalid expense input or document
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requester is not allowed to act on the expense
    #[error("Not authorized: {requester} is not the payer of expense {expense_id}")]
    Unauthorized {
        /// Expense the action targeted
        expense_id: String,
        /// Member that attempted the action
        requester: String,
    },

    /// Expense references members outside the group roster
    #[error("Inconsistent reference: {0}")]
    InconsistentReference(String),
}

impl Error {
    /// True for input validation failures, including core ones
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Core(split_core::Error::Validation(_))
        )
    }
}
