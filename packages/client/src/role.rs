use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    identity::Identity,
    ledger::{LoanState, LoanTerms},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Borrower,
    Lender,
    Observer,
}

impl Role {
    /// Classify the caller against the loan parties
    ///
    /// The borrower is checked first, so an address that is both borrower and
    /// lender is a borrower. No caller is an observer.
    pub fn derive(caller: Option<&Identity>, terms: &LoanTerms) -> Self {
        match caller {
            Some(caller) if caller == &terms.borrower => Self::Borrower,
            Some(caller) if caller == &terms.lender => Self::Lender,
            _ => Self::Observer,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Borrower => "Borrower",
            Self::Lender => "Lender",
            Self::Observer => "Observer",
        })
    }
}

pub fn payment_eligible(role: Role, state: &LoanState) -> bool {
    role == Role::Borrower && !state.paid
}
