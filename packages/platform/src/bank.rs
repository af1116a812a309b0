use sdk::cosmwasm_std::{Addr, Coin as CwCoin, QuerierWrapper};

use crate::{batch::Batch, error::Error, result::Result};

pub trait BankAccountView {
    fn balance(&self, denom: &str) -> Result<CwCoin>;
}

pub trait BankAccount
where
    Self: BankAccountView + Into<Batch>,
{
    fn send(&mut self, amount: CwCoin, to: &Addr);
}

pub struct AccountView<'a> {
    account: &'a Addr,
    querier: QuerierWrapper<'a>,
}

impl<'a> AccountView<'a> {
    const fn new(account: &'a Addr, querier: QuerierWrapper<'a>) -> Self {
        Self { account, querier }
    }
}

impl BankAccountView for AccountView<'_> {
    fn balance(&self, denom: &str) -> Result<CwCoin> {
        self.querier
            .query_balance(self.account, denom)
            .map_err(Into::into)
    }
}

pub struct BankStub<View>
where
    View: BankAccountView,
{
    view: View,
    batch: Batch,
}

impl<View> BankStub<View>
where
    View: BankAccountView,
{
    pub fn new(view: View) -> Self {
        Self {
            view,
            batch: Batch::default(),
        }
    }
}

impl<View> BankAccountView for BankStub<View>
where
    View: BankAccountView,
{
    fn balance(&self, denom: &str) -> Result<CwCoin> {
        self.view.balance(denom)
    }
}

impl<View> BankAccount for BankStub<View>
where
    View: BankAccountView,
{
    fn send(&mut self, amount: CwCoin, to: &Addr) {
        self.batch.schedule_transfer(amount, to)
    }
}

impl<View> From<BankStub<View>> for Batch
where
    View: BankAccountView,
{
    fn from(stub: BankStub<View>) -> Self {
        stub.batch
    }
}

pub fn account_view<'a>(account: &'a Addr, querier: QuerierWrapper<'a>) -> AccountView<'a> {
    AccountView::new(account, querier)
}

pub fn account<'a>(account: &'a Addr, querier: QuerierWrapper<'a>) -> BankStub<AccountView<'a>> {
    BankStub::new(account_view(account, querier))
}

/// Ensure a single coin of the specified denomination is received by a contract and return it
pub fn received_one(denom: &str, funds: &[CwCoin]) -> Result<CwCoin> {
    match funds {
        [] => Err(Error::no_funds(denom)),
        [coin] if coin.denom == denom => Ok(coin.clone()),
        [coin] => Err(Error::unexpected_denom(denom, &coin.denom)),
        _ => Err(Error::unexpected_funds(denom)),
    }
}
