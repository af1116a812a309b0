use thiserror::Error;

use crate::{ledger::ChainId, provider::ProviderError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("[Client] No wallet provider is available")]
    WalletUnavailable,

    #[error("[Client] No account is connected")]
    NotConnected,

    #[error("[Client] No ledger is bound to the current network")]
    Unbound,

    #[error("[Client] The request was rejected in the wallet")]
    UserRejected,

    #[error("[Client] The ledger reverted the transaction! Cause: {0}")]
    ContractReverted(String),

    #[error("[Client] Network failure! Cause: {0}")]
    Network(String),

    #[error("[Client] No ledger is deployed on network \"{0}\"")]
    NoDeployment(ChainId),

    #[error("[Client] A payment is already in flight")]
    PaymentInFlight,

    #[error("[Client] The connected account is not eligible to pay the loan")]
    NotEligible,

    #[error("[Client] A payment cannot move from {from} to {to}")]
    InvalidPaymentTransition { from: String, to: &'static str },

    #[error("[Client] Invalid configuration! Cause: {0}")]
    Config(String),
}

impl From<ProviderError> for Error {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::Unavailable => Self::WalletUnavailable,
            ProviderError::Rejected => Self::UserRejected,
            ProviderError::Reverted(reason) => Self::ContractReverted(reason),
            ProviderError::Network(reason) => Self::Network(reason),
        }
    }
}
