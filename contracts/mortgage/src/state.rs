use std::ops::Deref;

use serde::{Deserialize, Serialize};

use access_control::{ContractOwnerAccess, SingleUserAccess};
use sdk::{
    cosmwasm_std::{Coin, Storage},
    cw_storage_plus::Item,
};

use crate::{
    api::{InterestRate, Periods},
    loan::Loan,
    result::ContractResult,
};

const BORROWER_NAMESPACE: &str = "borrower";

const TERMS: Item<Terms> = Item::new("loan_terms");
const PAID: Item<bool> = Item::new("loan_paid");

#[derive(Serialize, Deserialize)]
struct Terms {
    principal: Coin,
    interest_rate: InterestRate,
    duration: Periods,
}

pub(crate) fn borrower<'storage, S>(storage: S) -> SingleUserAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage>,
{
    SingleUserAccess::new(storage, BORROWER_NAMESPACE)
}

pub(crate) fn lender<'storage, S>(storage: S) -> ContractOwnerAccess<'storage, S>
where
    S: Deref<Target = dyn Storage + 'storage>,
{
    ContractOwnerAccess::new(storage)
}

pub(crate) fn open(storage: &mut dyn Storage, loan: &Loan) -> ContractResult<()> {
    debug_assert!(!loan.paid());

    borrower(&mut *storage).grant_to(loan.borrower())?;
    lender(&mut *storage).grant_to(loan.lender())?;
    TERMS.save(
        storage,
        &Terms {
            principal: loan.principal().clone(),
            interest_rate: loan.interest_rate(),
            duration: loan.duration(),
        },
    )?;
    PAID.save(storage, &false).map_err(Into::into)
}

pub(crate) fn load(storage: &dyn Storage) -> ContractResult<Loan> {
    let borrower = borrower(storage).granted_to()?;
    let lender = lender(storage).owner()?;
    let Terms {
        principal,
        interest_rate,
        duration,
    } = TERMS.load(storage)?;
    let paid = PAID.load(storage)?;

    Ok(Loan::restore(
        borrower,
        lender,
        principal,
        interest_rate,
        duration,
        paid,
    ))
}

pub(crate) fn load_principal(storage: &dyn Storage) -> ContractResult<Coin> {
    TERMS
        .load(storage)
        .map(|terms| terms.principal)
        .map_err(Into::into)
}

pub(crate) fn paid(storage: &dyn Storage) -> ContractResult<bool> {
    PAID.load(storage).map_err(Into::into)
}

/// Persist the paid flag of a loan that has just been repaid
pub(crate) fn settle(storage: &mut dyn Storage, loan: &Loan) -> ContractResult<()> {
    debug_assert!(loan.paid());

    PAID.save(storage, &true).map_err(Into::into)
}
