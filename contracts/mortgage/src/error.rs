use thiserror::Error;

use sdk::cosmwasm_std::{Coin, StdError};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("[Mortgage] [Std] {0}")]
    Std(String),

    #[error("[Mortgage] {0}")]
    Platform(#[from] platform::error::Error),

    #[error("[Mortgage] {0}")]
    Unauthorized(#[from] access_control::error::Error),

    #[error("[Mortgage] {0}")]
    Versioning(#[from] versioning::Error),

    #[error("[Mortgage] Invalid borrower address! Cause: {0}")]
    InvalidBorrower(String),

    #[error("[Mortgage] The loan amount should be positive")]
    ZeroLoanAmount {},

    #[error("[Mortgage] The loan denomination should not be empty")]
    EmptyLoanDenom {},

    #[error("[Mortgage] Loan already paid")]
    AlreadyPaid {},

    #[error("[Mortgage] Payment amount mismatch! Expected {expected}, received {received}")]
    AmountMismatch { expected: Coin, received: Coin },
}

impl From<StdError> for ContractError {
    fn from(value: StdError) -> Self {
        Self::Std(value.to_string())
    }
}
