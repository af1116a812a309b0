use std::{cell::Cell, future};

use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedReceiver;

use mortgage::api::QueryMsg;
use mortgage_client::{
    identity::Identity,
    ledger::ChainId,
    localnet::LocalNet,
    provider::{Provider, ProviderError, Receipt, SignedTx, TxHash, TxRequest, WalletEvent},
};
use sdk::cosmwasm_std::Addr;

/// A wallet over [`LocalNet`] whose contract reads can be made to misbehave
pub(crate) struct ScriptedProvider<'net> {
    net: &'net LocalNet,
    switch_on_query: Cell<Option<ChainId>>,
    fail_queries: Cell<bool>,
    stall_broadcast: Cell<bool>,
}

impl<'net> ScriptedProvider<'net> {
    pub fn new(net: &'net LocalNet) -> Self {
        Self {
            net,
            switch_on_query: Cell::default(),
            fail_queries: Cell::default(),
            stall_broadcast: Cell::default(),
        }
    }

    /// Switch the wallet to `chain_id` as soon as the next contract read starts
    pub fn switch_on_next_query(&self, chain_id: ChainId) {
        self.switch_on_query.set(Some(chain_id));
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.set(fail);
    }

    /// Keep broadcast transactions from ever reaching the network
    pub fn stall_broadcast(&self, stall: bool) {
        self.stall_broadcast.set(stall);
    }
}

impl Provider for ScriptedProvider<'_> {
    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.net.chain_id().await
    }

    async fn accounts(&self) -> Result<Vec<Identity>, ProviderError> {
        self.net.accounts().await
    }

    async fn request_accounts(&self) -> Result<Vec<Identity>, ProviderError> {
        self.net.request_accounts().await
    }

    fn subscribe(&self) -> UnboundedReceiver<WalletEvent> {
        self.net.subscribe()
    }

    async fn query<T>(&self, contract: &Addr, msg: QueryMsg) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        if self.fail_queries.get() {
            return Err(ProviderError::Network("connection lost".into()));
        }
        if let Some(chain_id) = self.switch_on_query.take() {
            self.net
                .switch_network(chain_id)
                .map_err(|err| ProviderError::Network(err.to_string()))?;
        }

        self.net.query(contract, msg).await
    }

    async fn sign(&self, tx: TxRequest) -> Result<SignedTx, ProviderError> {
        self.net.sign(tx).await
    }

    async fn broadcast(&self, tx: SignedTx) -> Result<TxHash, ProviderError> {
        if self.stall_broadcast.get() {
            future::pending::<()>().await;
        }
        self.net.broadcast(tx).await
    }

    async fn confirm(&self, hash: &TxHash, depth: u32) -> Result<Receipt, ProviderError> {
        self.net.confirm(hash, depth).await
    }
}
