use std::fmt::Debug;

use thiserror::Error;

use sdk::cosmwasm_std::{Api, StdError};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("[Platform] Expecting funds of {0} but found none")]
    NoFunds(String),

    #[error("[Platform] Expecting funds of {0} but found extra ones")]
    UnexpectedFunds(String),

    #[error("[Platform] Expecting funds of {expected} but found {found}")]
    UnexpectedDenom { expected: String, found: String },

    #[error("[Platform] [Std] {0}")]
    CosmWasmError(#[from] StdError),
}

impl Error {
    pub fn no_funds(denom: &str) -> Self {
        Self::NoFunds(denom.into())
    }

    pub fn unexpected_funds(denom: &str) -> Self {
        Self::UnexpectedFunds(denom.into())
    }

    pub fn unexpected_denom(expected: &str, found: &str) -> Self {
        Self::UnexpectedDenom {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Report an error on the host's debug channel before returning it
pub fn log<Err>(api: &dyn Api) -> impl FnOnce(&Err) + '_
where
    Err: Debug,
{
    |err| api.debug(&format!("{:?}", err))
}
