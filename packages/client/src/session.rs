use tokio::{sync::mpsc::UnboundedReceiver, time};
use tracing::{debug, info, warn};

use mortgage::api::{InterestRate, Periods, QueryMsg};
use sdk::cosmwasm_std::{Addr, Coin};

use crate::{
    config::ClientConfig,
    error::Error,
    identity::Identity,
    ledger::{Binding, ChainId, LoanState, LoanTerms},
    payment::{PaymentFailure, PaymentPhase, PaymentTracker},
    provider::{Provider, ProviderError, Receipt, TxRequest, WalletEvent},
    role::Role,
    view::{ClientView, SyncStatus},
};

/// The client side of a single ledger
///
/// The session is the only owner of the current [`ClientView`] and of the
/// payment in flight. Wallet notifications are taken from one subscription
/// made at construction and every identity or network change moves the
/// epoch forward, which invalidates any read started before it.
pub struct Session<P>
where
    P: Provider,
{
    provider: Option<P>,
    config: ClientConfig,
    events: Option<UnboundedReceiver<WalletEvent>>,
    chain: Option<ChainId>,
    binding: Option<Binding>,
    caller: Option<Identity>,
    view: Option<ClientView>,
    status: SyncStatus,
    payment: PaymentTracker,
    epoch: u64,
    rebind_pending: bool,
}

impl<P> Session<P>
where
    P: Provider,
{
    pub fn new(provider: Option<P>, config: ClientConfig) -> Self {
        let events = provider.as_ref().map(Provider::subscribe);

        Self {
            provider,
            config,
            events,
            chain: None,
            binding: None,
            caller: None,
            view: None,
            status: SyncStatus::Fetching,
            payment: PaymentTracker::default(),
            epoch: 0,
            rebind_pending: true,
        }
    }

    pub const fn view(&self) -> Option<&ClientView> {
        self.view.as_ref()
    }

    pub const fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub const fn payment(&self) -> &PaymentPhase {
        self.payment.phase()
    }

    pub const fn caller(&self) -> Option<&Identity> {
        self.caller.as_ref()
    }

    pub const fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn role(&self) -> Role {
        self.view
            .as_ref()
            .map_or(Role::Observer, ClientView::role)
    }

    /// Whether the pay action may be offered, false while a payment is in flight
    pub fn payment_eligible(&self) -> bool {
        !self.payment.in_flight()
            && self
                .view
                .as_ref()
                .is_some_and(ClientView::payment_eligible)
    }

    /// Bind to the ledger on the current network and read it
    pub async fn start(&mut self) -> Result<(), Error> {
        self.rebind_pending = true;
        self.refresh().await
    }

    /// Ask the wallet to authorize an account and read the ledger as it
    pub async fn connect(&mut self) -> Result<(), Error> {
        let provider = self.provider.as_ref().ok_or(Error::WalletUnavailable)?;

        let accounts = provider.request_accounts().await.map_err(Error::from)?;
        self.apply_event(WalletEvent::AccountsChanged(accounts));
        self.refresh().await
    }

    /// Read the ledger and replace the view
    ///
    /// All reads are issued together and succeed or fail together. A read
    /// that overlaps an identity or network change is discarded and repeated.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        if self.provider.is_none() {
            return Err(self.fail_refresh(Error::WalletUnavailable));
        }

        self.status = SyncStatus::Fetching;
        loop {
            let epoch = self.epoch;
            let fetched = self.fetch().await;

            self.drain_events();
            if self.epoch != epoch {
                debug!(epoch = self.epoch, "Discarding a read overlapping a wallet change");
                continue;
            }

            return match fetched {
                Ok(view) => {
                    self.commit(view);
                    Ok(())
                }
                Err(error) => Err(self.fail_refresh(error)),
            };
        }
    }

    /// Apply the notifications received so far and refresh if any of them changed
    /// the identity or the network
    ///
    /// Return whether a refresh took place.
    pub async fn process_events(&mut self) -> Result<bool, Error> {
        let epoch = self.epoch;
        self.drain_events();

        if self.epoch == epoch {
            Ok(false)
        } else {
            self.refresh().await.map(|()| true)
        }
    }

    /// Wait for the next notification and handle it as [`Self::process_events`] does
    ///
    /// Return `None` once the wallet stops sending notifications.
    pub async fn next_event(&mut self) -> Option<Result<bool, Error>> {
        let event = self.events.as_mut()?.recv().await?;

        let epoch = self.epoch;
        self.apply_event(event);
        Some(if self.epoch == epoch {
            self.process_events().await
        } else {
            self.drain_events();
            self.refresh().await.map(|()| true)
        })
    }

    /// Repay the loan from the connected account
    ///
    /// The amount is read from the ledger right before signing. On success the
    /// view is replaced optimistically with a settled one until the next refresh.
    pub async fn pay(&mut self) -> Result<Receipt, Error> {
        let provider = self.provider.as_ref().ok_or(Error::WalletUnavailable)?;
        let binding = self.binding.as_ref().ok_or(Error::Unbound)?;
        let caller = self.caller.clone().ok_or(Error::NotConnected)?;

        if self.payment.in_flight() {
            return Err(Error::PaymentInFlight);
        }
        if !self
            .view
            .as_ref()
            .is_some_and(ClientView::payment_eligible)
        {
            return Err(Error::NotEligible);
        }

        self.payment.begin()?;
        info!(%caller, contract = %binding.contract, "Payment started");

        let outcome = submit(
            provider,
            &mut self.payment,
            &self.config,
            &binding.contract,
            caller,
        )
        .await;

        match outcome {
            Ok(receipt) => {
                self.payment.succeed(receipt.clone())?;
                self.view = self.view.take().map(ClientView::settled);
                self.status = SyncStatus::Provisional;
                info!(hash = %receipt.hash, height = receipt.height, "Payment settled");
                Ok(receipt)
            }
            Err(error) => {
                warn!(%error, "Payment failed");
                self.payment.fail(PaymentFailure::from(&error))?;
                Err(error)
            }
        }
    }

    /// The user abandoned the signer approval of the payment in flight
    pub fn abandon_payment(&mut self) -> Result<(), Error> {
        self.payment
            .abandon()
            .inspect(|()| info!("Payment abandoned in the wallet"))
    }

    async fn fetch(&mut self) -> Result<ClientView, Error> {
        if self.rebind_pending {
            self.rebind().await?;
        }

        let provider = self.provider.as_ref().ok_or(Error::WalletUnavailable)?;
        let binding = self.binding.clone().ok_or(Error::Unbound)?;

        read_view(provider, binding, self.caller.clone()).await
    }

    /// Resolve the network, the ledger on it and the authorized account anew
    async fn rebind(&mut self) -> Result<(), Error> {
        let provider = self.provider.as_ref().ok_or(Error::WalletUnavailable)?;

        let (chain, accounts) = tokio::try_join!(provider.chain_id(), provider.accounts())?;
        debug!(%chain, accounts = accounts.len(), "Wallet state read");

        self.caller = accounts.into_iter().next();
        self.binding = None;
        self.chain = Some(chain.clone());
        // stays pending until a ledger is found on the network
        self.binding = Some(self.config.binding(&chain)?);
        self.rebind_pending = false;
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Some(event) = self
            .events
            .as_mut()
            .and_then(|events| events.try_recv().ok())
        {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                let caller = accounts.into_iter().next();
                if caller != self.caller {
                    info!(
                        caller = ?caller.as_ref().map(Identity::short),
                        "Account changed"
                    );
                    self.view = self
                        .view
                        .take()
                        .map(|view| view.for_caller(caller.clone()));
                    self.caller = caller;
                    self.epoch += 1;
                }
            }
            WalletEvent::ChainChanged(chain) => {
                if self.chain.as_ref() != Some(&chain) {
                    info!(%chain, "Network changed, resetting");
                    self.chain = Some(chain);
                    self.binding = None;
                    self.view = None;
                    self.status = SyncStatus::Fetching;
                    self.payment.reset();
                    self.rebind_pending = true;
                    self.epoch += 1;
                }
            }
        }
    }

    fn commit(&mut self, view: ClientView) {
        // no submission runs while the session is borrowed for a refresh
        if view.state().paid {
            if self.payment.reconcile_paid() {
                info!("Payment in flight reconciled with the ledger");
            }
        } else if self.payment.reconcile_unpaid() {
            warn!("Interrupted payment failed, the ledger reports the loan unpaid");
        }

        info!(
            chain = %view.binding().chain_id,
            role = %view.role(),
            paid = view.state().paid,
            "Ledger view refreshed"
        );
        self.view = Some(view);
        self.status = SyncStatus::Fresh;
    }

    fn fail_refresh(&mut self, error: Error) -> Error {
        warn!(%error, "Ledger read failed");

        self.status = if self.view.is_some() {
            SyncStatus::Stale(error.clone())
        } else {
            SyncStatus::Failed(error.clone())
        };
        error
    }
}

async fn read_view<P>(
    provider: &P,
    binding: Binding,
    caller: Option<Identity>,
) -> Result<ClientView, Error>
where
    P: Provider,
{
    let contract = &binding.contract;
    let caller_balance = async {
        match &caller {
            Some(caller) => provider
                .query::<Coin>(
                    contract,
                    QueryMsg::Balance {
                        address: caller.to_addr(),
                    },
                )
                .await
                .map(Some),
            None => Ok(None),
        }
    };

    let (borrower, lender, principal, paid, interest_rate, duration, caller_balance) = tokio::try_join!(
        provider.query::<Addr>(contract, QueryMsg::Borrower {}),
        provider.query::<Addr>(contract, QueryMsg::Lender {}),
        provider.query::<Coin>(contract, QueryMsg::LoanAmount {}),
        provider.query::<bool>(contract, QueryMsg::LoanPaid {}),
        provider.query::<InterestRate>(contract, QueryMsg::InterestRate {}),
        provider.query::<Periods>(contract, QueryMsg::Duration {}),
        caller_balance,
    )?;
    debug!(%contract, paid, "Ledger read");

    let terms = LoanTerms {
        borrower: borrower.into(),
        lender: lender.into(),
        principal,
        interest_rate,
        duration,
    };

    Ok(ClientView::new(
        binding,
        terms,
        LoanState { paid },
        caller,
        caller_balance,
    ))
}

async fn submit<P>(
    provider: &P,
    payment: &mut PaymentTracker,
    config: &ClientConfig,
    contract: &Addr,
    caller: Identity,
) -> Result<Receipt, Error>
where
    P: Provider,
{
    let amount = provider
        .query::<Coin>(contract, QueryMsg::LoanAmount {})
        .await?;
    debug!(%amount, "Loan amount read before signing");

    let signed = provider
        .sign(TxRequest::pay_loan(caller, contract.clone(), amount))
        .await?;
    payment.submitted()?;

    let hash = bounded(config, "broadcast", provider.broadcast(signed)).await?;
    payment.settling(hash.clone())?;
    debug!(%hash, "Payment broadcast");

    bounded(
        config,
        "confirmation",
        provider.confirm(&hash, config.confirmations),
    )
    .await
}

/// Wait for a provider step at most the configured settlement timeout
async fn bounded<F, T>(config: &ClientConfig, step: &str, step_future: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    time::timeout(config.settle_timeout(), step_future)
        .await
        .map_err(|_elapsed| {
            Error::Network(format!(
                "{step} not completed within {} ms",
                config.settle_timeout_ms
            ))
        })?
        .map_err(Into::into)
}
