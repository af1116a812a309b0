use sdk::cosmwasm_std::{Addr, Coin};

use platform::bank::{self, BankAccount};

use crate::{
    api::{InterestRate, Periods, TermsResponse},
    error::ContractError,
    result::ContractResult,
};

/// A single-repayment loan
///
/// The terms never change once the loan is open. The only transition is
/// from unpaid to paid, made by [`Loan::pay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Loan {
    borrower: Addr,
    lender: Addr,
    principal: Coin,
    interest_rate: InterestRate,
    duration: Periods,
    paid: bool,
}

impl Loan {
    pub fn open(
        borrower: Addr,
        lender: Addr,
        principal: Coin,
        interest_rate: InterestRate,
        duration: Periods,
    ) -> ContractResult<Self> {
        if principal.amount.is_zero() {
            Err(ContractError::ZeroLoanAmount {})
        } else if principal.denom.is_empty() {
            Err(ContractError::EmptyLoanDenom {})
        } else {
            Ok(Self::restore(
                borrower,
                lender,
                principal,
                interest_rate,
                duration,
                false,
            ))
        }
    }

    pub(crate) const fn restore(
        borrower: Addr,
        lender: Addr,
        principal: Coin,
        interest_rate: InterestRate,
        duration: Periods,
        paid: bool,
    ) -> Self {
        Self {
            borrower,
            lender,
            principal,
            interest_rate,
            duration,
            paid,
        }
    }

    pub const fn borrower(&self) -> &Addr {
        &self.borrower
    }

    pub const fn lender(&self) -> &Addr {
        &self.lender
    }

    pub const fn principal(&self) -> &Coin {
        &self.principal
    }

    pub const fn interest_rate(&self) -> InterestRate {
        self.interest_rate
    }

    pub const fn duration(&self) -> Periods {
        self.duration
    }

    pub const fn paid(&self) -> bool {
        self.paid
    }

    /// Repay the loan with the funds attached to the message
    ///
    /// The principal is forwarded to the lender from `account`.
    pub fn pay<Account>(&mut self, funds: &[Coin], account: &mut Account) -> ContractResult<()>
    where
        Account: BankAccount,
    {
        if self.paid {
            return Err(ContractError::AlreadyPaid {});
        }

        let received = bank::received_one(&self.principal.denom, funds)?;
        if received != self.principal {
            return Err(ContractError::AmountMismatch {
                expected: self.principal.clone(),
                received,
            });
        }

        account.send(received, &self.lender);
        self.paid = true;

        Ok(())
    }

    pub fn into_terms(self) -> TermsResponse {
        TermsResponse {
            borrower: self.borrower,
            lender: self.lender,
            loan: self.principal,
            interest_rate: self.interest_rate,
            duration: self.duration,
            paid: self.paid,
        }
    }
}
