
use sdk::cosmwasm_std::Coin;

use crate::{
    error::Error,
    identity::Identity,
    ledger::{Binding, LoanState, LoanTerms},
    role::{self, Role},
    schedule::NextPayment,
};

/// A snapshot of the ledger as seen by the caller
///
/// A snapshot is never modified. Any change, including the optimistic one
/// after a payment, produces a new snapshot that replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientView {
    binding: Binding,
    terms: LoanTerms,
    state: LoanState,
    caller: Option<Identity>,
    caller_balance: Option<Coin>,
}

impl ClientView {
    pub const fn new(
        binding: Binding,
        terms: LoanTerms,
        state: LoanState,
        caller: Option<Identity>,
        caller_balance: Option<Coin>,
    ) -> Self {
        Self {
            binding,
            terms,
            state,
            caller,
            caller_balance,
        }
    }

    pub const fn binding(&self) -> &Binding {
        &self.binding
    }

    pub const fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub const fn state(&self) -> &LoanState {
        &self.state
    }

    pub const fn caller(&self) -> Option<&Identity> {
        self.caller.as_ref()
    }

    pub const fn caller_balance(&self) -> Option<&Coin> {
        self.caller_balance.as_ref()
    }

    pub fn role(&self) -> Role {
        Role::derive(self.caller(), &self.terms)
    }

    pub fn payment_eligible(&self) -> bool {
        role::payment_eligible(self.role(), &self.state)
    }

    /// The snapshot expected after a successful payment
    pub fn settled(self) -> Self {
        Self {
            state: self.state.settled(),
            ..self
        }
    }

    /// The same ledger data seen by another caller whose balance is not known yet
    pub fn for_caller(self, caller: Option<Identity>) -> Self {
        Self {
            caller,
            caller_balance: None,
            ..self
        }
    }

    /// The informational due date, see [`crate::schedule`]
    pub fn next_payment(&self) -> NextPayment {
        NextPayment::from_today(&self.state)
    }
}

/// How the current [`ClientView`] relates to the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    /// A read is in progress
    #[default]
    Fetching,
    /// Matches the ledger as of the last read
    Fresh,
    /// Optimistically updated after a local payment, until the next read
    Provisional,
    /// The last read failed, the view is the one before it
    Stale(Error),
    /// The reads failed and there is no view
    Failed(Error),
}

impl SyncStatus {
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Stale(error) | Self::Failed(error) => Some(error),
            Self::Fetching | Self::Fresh | Self::Provisional => None,
        }
    }
}
