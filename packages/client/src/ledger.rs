use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use mortgage::api::{InterestRate, Periods};
use sdk::cosmwasm_std::{Addr, Coin};

use crate::identity::Identity;

/// Loan terms as read from the ledger, fixed for the ledger's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanTerms {
    pub borrower: Identity,
    pub lender: Identity,
    pub principal: Coin,
    pub interest_rate: InterestRate,
    pub duration: Periods,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoanState {
    pub paid: bool,
}

impl LoanState {
    pub const fn unpaid() -> Self {
        Self { paid: false }
    }

    /// The state after a repayment, there is no way back
    pub const fn settled(self) -> Self {
        Self { paid: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ChainId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A ledger deployment on a network
///
/// Contract addresses are network specific so the binding is dropped on
/// every network change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub chain_id: ChainId,
    pub contract: Addr,
}
