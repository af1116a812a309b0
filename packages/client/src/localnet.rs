//! An in-process network of `cw-multi-test` chains behind a wallet
//!
//! Every chain runs its own bank and its own copy of the mortgage code. Signer
//! addresses are the same on all chains, contract addresses are not guaranteed to be.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    future,
};

use anyhow::{Context as _, Result as AnyResult, anyhow, bail};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use mortgage::{
    api::{ExecuteMsg, InstantiateMsg, InterestRate, Periods, QueryMsg},
    contract as mortgage_contract,
};
use sdk::{
    cosmwasm_std::{Addr, Coin, Uint128},
    cw_multi_test::AppResponse,
    testing::{self, App, CodeId, ContractWrapper, Executor as _},
};

use crate::{
    identity::Identity,
    ledger::ChainId,
    provider::{Provider, ProviderError, Receipt, SignedTx, TxHash, TxRequest, WalletEvent},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LocalNetConfig {
    pub chain_id: ChainId,
    pub denom: String,
    pub signers: Vec<SignerConfig>,
    pub loan: LoanConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct SignerConfig {
    pub name: String,
    /// Genesis balance in the smallest unit of the configured denomination
    pub balance: Uint128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LoanConfig {
    /// Name of the signer deploying the ledger
    pub lender: String,
    pub borrower: String,
    pub amount: Uint128,
    #[serde(default)]
    pub interest_rate: Option<InterestRate>,
    #[serde(default)]
    pub duration: Option<Periods>,
}

impl LocalNetConfig {
    pub fn from_json(json: &str) -> AnyResult<Self> {
        serde_json::from_str(json).context("Invalid local network configuration!")
    }
}

/// How the signer answers the next approval requests
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Approval {
    #[default]
    Approve,
    /// Decline the next request, then approve again
    RejectOnce,
    /// Never answer, as a user who walked away
    Hold,
}

struct Network {
    app: App,
    code_id: CodeId,
}

impl Network {
    fn new() -> Self {
        let mut app = testing::new_app();
        let code_id = testing::store_code(
            &mut app,
            Box::new(
                ContractWrapper::new(
                    mortgage_contract::execute,
                    mortgage_contract::instantiate,
                    mortgage_contract::query,
                )
                .with_migrate(mortgage_contract::migrate),
            ),
        );

        Self { app, code_id }
    }
}

struct Signer {
    name: String,
    address: Addr,
    genesis: Vec<Coin>,
}

enum Outcome {
    Included { height: u64 },
    Reverted(String),
}

pub struct LocalNet {
    networks: RefCell<BTreeMap<ChainId, Network>>,
    active: RefCell<ChainId>,
    signers: RefCell<Vec<Signer>>,
    selected: Cell<Option<usize>>,
    authorized: Cell<bool>,
    reject_connect: Cell<bool>,
    approval: Cell<Approval>,
    subscribers: RefCell<Vec<UnboundedSender<WalletEvent>>>,
    pending: RefCell<BTreeMap<TxHash, (ChainId, Outcome)>>,
    tx_sequence: Cell<u64>,
}

impl LocalNet {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            networks: RefCell::new(BTreeMap::from([(chain_id.clone(), Network::new())])),
            active: RefCell::new(chain_id),
            signers: RefCell::default(),
            selected: Cell::default(),
            authorized: Cell::default(),
            reject_connect: Cell::default(),
            approval: Cell::default(),
            subscribers: RefCell::default(),
            pending: RefCell::default(),
            tx_sequence: Cell::default(),
        }
    }

    /// Start the configured chain with its funded signers
    pub fn from_config(config: &LocalNetConfig) -> AnyResult<Self> {
        let net = Self::new(config.chain_id.clone());

        config.signers.iter().try_for_each(|signer| {
            net.add_signer(
                &signer.name,
                vec![Coin::new(signer.balance, &config.denom)],
            )
            .map(drop)
        })?;

        Ok(net)
    }

    /// Instantiate the configured loan on the active chain, the lender signing
    pub fn deploy_from_config(&self, config: &LocalNetConfig) -> AnyResult<Addr> {
        let lender = self.address_of(&config.loan.lender)?;
        let borrower = self.address_of(&config.loan.borrower)?;

        let mut msg = InstantiateMsg::new(borrower, Coin::new(config.loan.amount, &config.denom));
        if let Some(interest_rate) = config.loan.interest_rate {
            msg.interest_rate = interest_rate;
        }
        if let Some(duration) = config.loan.duration {
            msg.duration = duration;
        }

        self.deploy(&lender, &msg)
    }

    pub fn deploy(&self, lender: &Addr, msg: &InstantiateMsg) -> AnyResult<Addr> {
        self.with_active(|network| {
            network.app.instantiate_contract(
                network.code_id,
                lender.clone(),
                msg,
                &[],
                "mortgage",
                None,
            )
        })
        .inspect(|contract| debug!(%contract, %lender, "Ledger deployed"))
    }

    /// Add a chain where every known signer gets its genesis balance
    pub fn add_network(&self, chain_id: ChainId) -> AnyResult<()> {
        if self.networks.borrow().contains_key(&chain_id) {
            bail!("Network \"{chain_id}\" already exists!");
        }

        let mut network = Network::new();
        self.signers.borrow().iter().try_for_each(|signer| {
            testing::init_balance(&mut network.app, &signer.address, signer.genesis.clone())
        })?;
        self.networks.borrow_mut().insert(chain_id, network);
        Ok(())
    }

    /// Add a signer funded on every chain
    pub fn add_signer(&self, name: &str, genesis: Vec<Coin>) -> AnyResult<Addr> {
        if self.signer_index(name).is_some() {
            bail!("Signer \"{name}\" already exists!");
        }

        let address = testing::user(name);
        self.networks
            .borrow_mut()
            .values_mut()
            .try_for_each(|network| {
                testing::init_balance(&mut network.app, &address, genesis.clone())
            })?;
        self.signers.borrow_mut().push(Signer {
            name: name.into(),
            address: address.clone(),
            genesis,
        });
        Ok(address)
    }

    pub fn address_of(&self, name: &str) -> AnyResult<Addr> {
        self.signer_index(name)
            .map(|index| self.signers.borrow()[index].address.clone())
            .ok_or_else(|| anyhow!("Unknown signer \"{name}\"!"))
    }

    pub fn active_chain(&self) -> ChainId {
        self.active.borrow().clone()
    }

    /// Connect the wallet to another chain
    pub fn switch_network(&self, chain_id: ChainId) -> AnyResult<()> {
        if !self.networks.borrow().contains_key(&chain_id) {
            bail!("Unknown network \"{chain_id}\"!");
        }

        if self.active.replace(chain_id.clone()) != chain_id {
            self.notify(WalletEvent::ChainChanged(chain_id));
        }
        Ok(())
    }

    /// Make the named signer the active account
    pub fn select_account(&self, name: &str) -> AnyResult<Addr> {
        let index = self
            .signer_index(name)
            .ok_or_else(|| anyhow!("Unknown signer \"{name}\"!"))?;

        if self.selected.replace(Some(index)) != Some(index) && self.authorized.get() {
            self.notify(WalletEvent::AccountsChanged(self.authorized_accounts()));
        }
        self.address_of(name)
    }

    pub fn disconnect(&self) {
        if self.authorized.replace(false) {
            self.notify(WalletEvent::AccountsChanged(vec![]));
        }
    }

    pub fn set_approval(&self, approval: Approval) {
        self.approval.set(approval);
    }

    pub fn reject_connect(&self, reject: bool) {
        self.reject_connect.set(reject);
    }

    /// Push a notification to all subscribers
    pub fn notify(&self, event: WalletEvent) {
        debug!(?event, "Wallet notification");

        self.subscribers
            .borrow_mut()
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn balance(&self, address: &Addr, denom: &str) -> AnyResult<Coin> {
        self.with_active(|network| testing::query_balance(&network.app, address, denom))
    }

    pub fn block_height(&self) -> AnyResult<u64> {
        self.with_active(|network| Ok(network.app.block_info().height))
    }

    /// Execute a message on the active chain bypassing the signer
    pub fn execute(
        &self,
        sender: &Addr,
        contract: &Addr,
        msg: &ExecuteMsg,
        funds: &[Coin],
    ) -> AnyResult<AppResponse> {
        self.with_active(|network| {
            network
                .app
                .execute_contract(sender.clone(), contract.clone(), msg, funds)
        })
    }

    pub fn query_smart<T>(&self, contract: &Addr, msg: &QueryMsg) -> AnyResult<T>
    where
        T: DeserializeOwned,
    {
        self.with_active(|network| {
            network
                .app
                .wrap()
                .query_wasm_smart(contract, msg)
                .map_err(Into::into)
        })
    }

    fn with_active<F, R>(&self, f: F) -> AnyResult<R>
    where
        F: FnOnce(&mut Network) -> AnyResult<R>,
    {
        let active = self.active.borrow();

        self.networks
            .borrow_mut()
            .get_mut(&*active)
            .ok_or_else(|| anyhow!("Unknown network \"{active}\"!"))
            .and_then(f)
    }

    fn signer_index(&self, name: &str) -> Option<usize> {
        self.signers
            .borrow()
            .iter()
            .position(|signer| signer.name == name)
    }

    fn selected_identity(&self) -> Option<Identity> {
        self.selected
            .get()
            .and_then(|index| {
                self.signers
                    .borrow()
                    .get(index)
                    .map(|signer| Identity::from(&signer.address))
            })
    }

    fn authorized_accounts(&self) -> Vec<Identity> {
        if self.authorized.get() {
            self.selected_identity().into_iter().collect()
        } else {
            vec![]
        }
    }

    fn next_sequence(&self) -> u64 {
        let sequence = self.tx_sequence.get() + 1;
        self.tx_sequence.set(sequence);
        sequence
    }
}

impl Provider for LocalNet {
    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        Ok(self.active_chain())
    }

    async fn accounts(&self) -> Result<Vec<Identity>, ProviderError> {
        Ok(self.authorized_accounts())
    }

    async fn request_accounts(&self) -> Result<Vec<Identity>, ProviderError> {
        if self.reject_connect.get() {
            return Err(ProviderError::Rejected);
        }
        if self.selected.get().is_none() {
            if self.signers.borrow().is_empty() {
                return Err(ProviderError::Unavailable);
            }
            self.selected.set(Some(0));
        }

        self.authorized.set(true);
        Ok(self.authorized_accounts())
    }

    fn subscribe(&self) -> UnboundedReceiver<WalletEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    async fn query<T>(&self, contract: &Addr, msg: QueryMsg) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        self.query_smart(contract, &msg)
            .map_err(|err| ProviderError::Network(testing::revert_reason(&err)))
    }

    async fn sign(&self, tx: TxRequest) -> Result<SignedTx, ProviderError> {
        if !self.authorized.get() || self.selected_identity().as_ref() != Some(&tx.from) {
            return Err(ProviderError::Rejected);
        }

        match self.approval.get() {
            Approval::Approve => {}
            Approval::RejectOnce => {
                self.approval.set(Approval::Approve);
                return Err(ProviderError::Rejected);
            }
            Approval::Hold => future::pending::<()>().await,
        }

        Ok(SignedTx {
            request: tx,
            sequence: self.next_sequence(),
        })
    }

    async fn broadcast(&self, tx: SignedTx) -> Result<TxHash, ProviderError> {
        let hash = TxHash(format!("{:064X}", tx.sequence));
        let chain = self.active_chain();
        let SignedTx {
            request:
                TxRequest {
                    from,
                    contract,
                    msg,
                    funds,
                },
            ..
        } = tx;

        let outcome = self
            .with_active(|network| {
                Ok(
                    match network
                        .app
                        .execute_contract(from.to_addr(), contract, &msg, &funds)
                    {
                        Ok(_response) => Outcome::Included {
                            height: network.app.block_info().height,
                        },
                        Err(err) => Outcome::Reverted(testing::revert_reason(&err)),
                    },
                )
            })
            .map_err(|err| ProviderError::Network(err.to_string()))?;

        debug!(%hash, %chain, "Transaction broadcast");
        self.pending
            .borrow_mut()
            .insert(hash.clone(), (chain, outcome));
        Ok(hash)
    }

    async fn confirm(&self, hash: &TxHash, depth: u32) -> Result<Receipt, ProviderError> {
        let (chain, outcome) = self
            .pending
            .borrow_mut()
            .remove(hash)
            .ok_or_else(|| ProviderError::Network(format!("Unknown transaction {hash}")))?;

        if let Some(network) = self.networks.borrow_mut().get_mut(&chain) {
            testing::advance_blocks(&mut network.app, depth);
        }

        match outcome {
            Outcome::Included { height } => Ok(Receipt {
                hash: hash.clone(),
                height,
                confirmations: depth,
            }),
            Outcome::Reverted(reason) => Err(ProviderError::Reverted(reason)),
        }
    }
}
