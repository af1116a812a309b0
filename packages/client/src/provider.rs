use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    future::Future,
};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use mortgage::api::{ExecuteMsg, QueryMsg};
use sdk::cosmwasm_std::{Addr, Coin};

use crate::{identity::Identity, ledger::ChainId};

/// Notifications pushed by the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The authorized accounts, the first one being the active; empty on disconnect
    AccountsChanged(Vec<Identity>),
    ChainChanged(ChainId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Identity,
    pub contract: Addr,
    pub msg: ExecuteMsg,
    pub funds: Vec<Coin>,
}

impl TxRequest {
    pub fn pay_loan(from: Identity, contract: Addr, amount: Coin) -> Self {
        Self {
            from,
            contract,
            msg: ExecuteMsg::PayLoan {},
            funds: vec![amount],
        }
    }
}

/// A transaction approved by the signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub request: TxRequest,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxHash(pub String);

impl Display for TxHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub hash: TxHash,
    pub height: u64,
    pub confirmations: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("[Provider] No wallet is present")]
    Unavailable,

    #[error("[Provider] Rejected by the user")]
    Rejected,

    #[error("[Provider] Transaction reverted! Cause: {0}")]
    Reverted(String),

    #[error("[Provider] Network failure! Cause: {0}")]
    Network(String),
}

/// An injected wallet connected to a network
///
/// All operations address the network the wallet is currently connected to.
pub trait Provider {
    fn chain_id(&self) -> impl Future<Output = Result<ChainId, ProviderError>>;

    /// The authorized accounts, empty if none is
    fn accounts(&self) -> impl Future<Output = Result<Vec<Identity>, ProviderError>>;

    /// Ask the user to authorize accounts
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Identity>, ProviderError>>;

    fn subscribe(&self) -> UnboundedReceiver<WalletEvent>;

    fn query<T>(
        &self,
        contract: &Addr,
        msg: QueryMsg,
    ) -> impl Future<Output = Result<T, ProviderError>>
    where
        T: DeserializeOwned;

    /// Ask the signer for approval; may never complete if the user walks away
    fn sign(&self, tx: TxRequest) -> impl Future<Output = Result<SignedTx, ProviderError>>;

    fn broadcast(&self, tx: SignedTx) -> impl Future<Output = Result<TxHash, ProviderError>>;

    /// Wait until the transaction is `depth` blocks deep
    fn confirm(
        &self,
        hash: &TxHash,
        depth: u32,
    ) -> impl Future<Output = Result<Receipt, ProviderError>>;
}

impl<P> Provider for &P
where
    P: Provider + ?Sized,
{
    fn chain_id(&self) -> impl Future<Output = Result<ChainId, ProviderError>> {
        (**self).chain_id()
    }

    fn accounts(&self) -> impl Future<Output = Result<Vec<Identity>, ProviderError>> {
        (**self).accounts()
    }

    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Identity>, ProviderError>> {
        (**self).request_accounts()
    }

    fn subscribe(&self) -> UnboundedReceiver<WalletEvent> {
        (**self).subscribe()
    }

    fn query<T>(
        &self,
        contract: &Addr,
        msg: QueryMsg,
    ) -> impl Future<Output = Result<T, ProviderError>>
    where
        T: DeserializeOwned,
    {
        (**self).query(contract, msg)
    }

    fn sign(&self, tx: TxRequest) -> impl Future<Output = Result<SignedTx, ProviderError>> {
        (**self).sign(tx)
    }

    fn broadcast(&self, tx: SignedTx) -> impl Future<Output = Result<TxHash, ProviderError>> {
        (**self).broadcast(tx)
    }

    fn confirm(
        &self,
        hash: &TxHash,
        depth: u32,
    ) -> impl Future<Output = Result<Receipt, ProviderError>> {
        (**self).confirm(hash, depth)
    }
}
