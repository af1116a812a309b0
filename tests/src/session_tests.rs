use std::time::Duration;

use tokio::time;

use mortgage::api::InstantiateMsg;
use mortgage_client::{
    config::ClientConfig,
    error::Error,
    identity::Identity,
    ledger::ChainId,
    localnet::{Approval, LocalNet},
    payment::{PaymentFailure, PaymentPhase},
    provider::WalletEvent,
    role::Role,
    schedule::NextPayment,
    session::Session,
    view::SyncStatus,
};
use sdk::cosmwasm_std::{Addr, coin};

use crate::common::{DENOM, GENESIS, PRINCIPAL, principal, provider::ScriptedProvider};

const LOCAL: &str = "localnet-1";
const OTHER: &str = "localnet-2";
const UNDEPLOYED: &str = "localnet-3";

struct Deployment {
    net: LocalNet,
    contract: Addr,
    other_contract: Addr,
}

impl Deployment {
    /// Two chains with a loan each, the one on [`OTHER`] twice as large
    fn new() -> Self {
        let net = LocalNet::new(LOCAL.into());
        net.add_network(OTHER.into()).unwrap();
        net.add_network(UNDEPLOYED.into()).unwrap();
        ["lender", "borrower", "stranger"].iter().for_each(|name| {
            net.add_signer(name, vec![coin(GENESIS, DENOM)]).unwrap();
        });

        let lender = net.address_of("lender").unwrap();
        let borrower = net.address_of("borrower").unwrap();

        net.switch_network(OTHER.into()).unwrap();
        let other_contract = net
            .deploy(
                &lender,
                &InstantiateMsg::new(borrower.clone(), coin(2 * PRINCIPAL, DENOM)),
            )
            .unwrap();

        net.switch_network(LOCAL.into()).unwrap();
        let contract = net
            .deploy(&lender, &InstantiateMsg::new(borrower, principal()))
            .unwrap();

        Self {
            net,
            contract,
            other_contract,
        }
    }

    fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_deployment(LOCAL.into(), self.contract.clone())
            .with_deployment(OTHER.into(), self.other_contract.clone())
    }

    fn session(&self) -> Session<&LocalNet> {
        Session::new(Some(&self.net), self.config())
    }

    fn balance(&self, name: &str) -> u128 {
        let address = self.net.address_of(name).unwrap();
        self.net.balance(&address, DENOM).unwrap().amount.u128()
    }

    fn paid_on_chain(&self) -> bool {
        self.net
            .query_smart(&self.contract, &mortgage::api::QueryMsg::LoanPaid {})
            .unwrap()
    }
}

async fn connected<'net>(deployment: &'net Deployment, name: &str) -> Session<&'net LocalNet> {
    deployment.net.select_account(name).unwrap();
    let mut session = deployment.session();
    session.connect().await.unwrap();
    session
}

#[tokio::test]
async fn observer_until_connected() {
    let deployment = Deployment::new();
    let mut session = deployment.session();

    session.start().await.unwrap();

    assert_eq!(session.status(), &SyncStatus::Fresh);
    assert_eq!(session.role(), Role::Observer);
    assert!(session.caller().is_none());
    assert!(!session.payment_eligible());
    assert_eq!(session.pay().await, Err(Error::NotConnected));

    let view = session.view().unwrap();
    assert_eq!(view.terms().principal, principal());
    assert_eq!(view.terms().interest_rate, 5);
    assert_eq!(view.terms().duration, 360);
    assert!(!view.state().paid);
    assert!(view.caller_balance().is_none());
}

#[tokio::test]
async fn roles_of_participants() {
    let deployment = Deployment::new();

    let borrower = connected(&deployment, "borrower").await;
    assert_eq!(borrower.role(), Role::Borrower);
    assert!(borrower.payment_eligible());
    assert_eq!(
        borrower.view().unwrap().caller_balance(),
        Some(&coin(GENESIS, DENOM))
    );

    let lender = connected(&deployment, "lender").await;
    assert_eq!(lender.role(), Role::Lender);
    assert!(!lender.payment_eligible());

    let mut stranger = connected(&deployment, "stranger").await;
    assert_eq!(stranger.role(), Role::Observer);
    assert_eq!(stranger.pay().await, Err(Error::NotEligible));
    assert_eq!(stranger.payment(), &PaymentPhase::Idle);
}

#[tokio::test]
async fn connect_rejected() {
    let deployment = Deployment::new();
    deployment.net.reject_connect(true);
    let mut session = deployment.session();

    assert_eq!(session.connect().await, Err(Error::UserRejected));
    assert!(session.caller().is_none());
}

#[tokio::test]
async fn borrower_pays() {
    let deployment = Deployment::new();
    let mut session = connected(&deployment, "borrower").await;

    assert!(matches!(
        session.view().unwrap().next_payment(),
        NextPayment::Due(_)
    ));
    let receipt = session.pay().await.unwrap();

    assert_eq!(receipt.confirmations, 1);
    assert_eq!(deployment.net.block_height().unwrap(), receipt.height + 1);
    assert_eq!(
        session.payment(),
        &PaymentPhase::Succeeded {
            receipt: Some(receipt)
        }
    );
    assert_eq!(session.status(), &SyncStatus::Provisional);
    assert!(session.view().unwrap().state().paid);
    assert_eq!(
        session.view().unwrap().next_payment(),
        NextPayment::PaidInFull
    );
    assert!(!session.payment_eligible());
    assert_eq!(session.role(), Role::Borrower);

    assert!(deployment.paid_on_chain());
    assert_eq!(deployment.balance("borrower"), GENESIS - PRINCIPAL);
    assert_eq!(deployment.balance("lender"), GENESIS + PRINCIPAL);

    session.refresh().await.unwrap();
    assert_eq!(session.status(), &SyncStatus::Fresh);
    assert!(session.view().unwrap().state().paid);
    assert_eq!(
        session.view().unwrap().caller_balance(),
        Some(&coin(GENESIS - PRINCIPAL, DENOM))
    );
    assert!(!session.payment_eligible());
    assert_eq!(session.pay().await, Err(Error::NotEligible));
}

#[tokio::test]
async fn signer_rejection() {
    let deployment = Deployment::new();
    let mut session = connected(&deployment, "borrower").await;
    deployment.net.set_approval(Approval::RejectOnce);

    assert_eq!(session.pay().await, Err(Error::UserRejected));
    assert_eq!(
        session.payment(),
        &PaymentPhase::Failed(PaymentFailure::UserRejected)
    );
    assert_eq!(
        PaymentFailure::UserRejected.message(),
        "Transaction rejected in wallet."
    );
    assert!(!session.view().unwrap().state().paid);
    assert!(session.payment_eligible());
    assert!(!deployment.paid_on_chain());

    session.pay().await.unwrap();
    assert!(deployment.paid_on_chain());
}

#[tokio::test]
async fn stale_view_payment_reverts() {
    let deployment = Deployment::new();
    let mut first = connected(&deployment, "borrower").await;
    let mut second = connected(&deployment, "borrower").await;

    first.pay().await.unwrap();
    assert!(second.payment_eligible());

    let Err(Error::ContractReverted(reason)) = second.pay().await else {
        panic!("the second payment should revert");
    };
    assert!(reason.contains("already paid"));
    assert_eq!(
        second.payment(),
        &PaymentPhase::Failed(PaymentFailure::Reverted(reason))
    );
    assert!(!second.view().unwrap().state().paid);

    assert_eq!(deployment.balance("borrower"), GENESIS - PRINCIPAL);
    assert_eq!(deployment.balance("lender"), GENESIS + PRINCIPAL);

    second.refresh().await.unwrap();
    assert!(!second.payment_eligible());
}

#[tokio::test]
async fn payment_in_flight() {
    let deployment = Deployment::new();
    let mut session = connected(&deployment, "borrower").await;
    deployment.net.set_approval(Approval::Hold);

    assert!(
        time::timeout(Duration::from_millis(50), session.pay())
            .await
            .is_err()
    );
    assert_eq!(session.payment(), &PaymentPhase::Confirming);
    assert!(!session.payment_eligible());
    assert_eq!(session.pay().await, Err(Error::PaymentInFlight));

    session.abandon_payment().unwrap();
    assert_eq!(
        session.payment(),
        &PaymentPhase::Failed(PaymentFailure::UserRejected)
    );
    assert!(session.payment_eligible());

    deployment.net.set_approval(Approval::Approve);
    session.pay().await.unwrap();
    assert!(deployment.paid_on_chain());
}

#[tokio::test]
async fn account_changes() {
    let deployment = Deployment::new();
    let mut session = connected(&deployment, "borrower").await;

    deployment
        .net
        .notify(WalletEvent::AccountsChanged(vec![Identity::from(
            deployment.net.address_of("borrower").unwrap(),
        )]));
    assert_eq!(session.process_events().await, Ok(false));

    deployment.net.select_account("lender").unwrap();
    assert_eq!(session.next_event().await, Some(Ok(true)));
    assert_eq!(session.role(), Role::Lender);
    assert_eq!(session.status(), &SyncStatus::Fresh);

    deployment.net.disconnect();
    assert_eq!(session.process_events().await, Ok(true));
    assert!(session.caller().is_none());
    assert_eq!(session.role(), Role::Observer);
    assert!(session.view().unwrap().caller_balance().is_none());
}

#[tokio::test]
async fn network_switch() {
    let deployment = Deployment::new();
    let mut session = connected(&deployment, "borrower").await;

    deployment.net.switch_network(OTHER.into()).unwrap();
    assert_eq!(session.process_events().await, Ok(true));

    let view = session.view().unwrap();
    assert_eq!(view.binding().chain_id, ChainId::from(OTHER));
    assert_eq!(view.binding().contract, deployment.other_contract);
    assert_eq!(view.terms().principal, coin(2 * PRINCIPAL, DENOM));
    assert_eq!(session.role(), Role::Borrower);

    deployment.net.switch_network(UNDEPLOYED.into()).unwrap();
    assert_eq!(
        session.process_events().await,
        Err(Error::NoDeployment(UNDEPLOYED.into()))
    );
    assert_eq!(
        session.status(),
        &SyncStatus::Failed(Error::NoDeployment(UNDEPLOYED.into()))
    );
    assert!(session.view().is_none());
    assert!(session.binding().is_none());
    assert_eq!(session.pay().await, Err(Error::Unbound));

    deployment.net.switch_network(LOCAL.into()).unwrap();
    assert_eq!(session.process_events().await, Ok(true));
    assert_eq!(session.status(), &SyncStatus::Fresh);
    assert_eq!(session.view().unwrap().terms().principal, principal());
}

#[tokio::test]
async fn network_switch_during_refresh() {
    let deployment = Deployment::new();
    let provider = ScriptedProvider::new(&deployment.net);
    let mut session = Session::new(Some(&provider), deployment.config());
    session.start().await.unwrap();
    assert_eq!(
        session.view().unwrap().binding().chain_id,
        ChainId::from(LOCAL)
    );

    provider.switch_on_next_query(OTHER.into());
    session.refresh().await.unwrap();

    let view = session.view().unwrap();
    assert_eq!(session.status(), &SyncStatus::Fresh);
    assert_eq!(view.binding().chain_id, ChainId::from(OTHER));
    assert_eq!(view.binding().contract, deployment.other_contract);
    assert_eq!(view.terms().principal, coin(2 * PRINCIPAL, DENOM));
}

#[tokio::test]
async fn failed_read_keeps_view() {
    let deployment = Deployment::new();
    let provider = ScriptedProvider::new(&deployment.net);
    let mut session = Session::new(Some(&provider), deployment.config());

    provider.fail_queries(true);
    let error = session.start().await.unwrap_err();
    assert!(matches!(error, Error::Network(_)));
    assert_eq!(session.status(), &SyncStatus::Failed(error));
    assert!(session.view().is_none());

    provider.fail_queries(false);
    session.refresh().await.unwrap();
    assert_eq!(session.status(), &SyncStatus::Fresh);

    provider.fail_queries(true);
    let error = session.refresh().await.unwrap_err();
    assert_eq!(session.status(), &SyncStatus::Stale(error));
    assert_eq!(session.view().unwrap().terms().principal, principal());
}

#[tokio::test]
async fn wallet_unavailable() {
    let deployment = Deployment::new();
    let mut session = Session::<&LocalNet>::new(None, deployment.config());

    assert_eq!(session.start().await, Err(Error::WalletUnavailable));
    assert_eq!(
        session.status(),
        &SyncStatus::Failed(Error::WalletUnavailable)
    );
    assert_eq!(session.connect().await, Err(Error::WalletUnavailable));
    assert_eq!(session.pay().await, Err(Error::WalletUnavailable));
    assert_eq!(session.role(), Role::Observer);
    assert_eq!(session.next_event().await, None);
}

#[tokio::test]
async fn stalled_broadcast_times_out() {
    let deployment = Deployment::new();
    deployment.net.select_account("borrower").unwrap();
    let provider = ScriptedProvider::new(&deployment.net);
    let mut session = Session::new(
        Some(&provider),
        ClientConfig {
            settle_timeout_ms: 10,
            ..deployment.config()
        },
    );
    session.connect().await.unwrap();
    provider.stall_broadcast(true);

    let Ok(Err(Error::Network(_))) =
        time::timeout(Duration::from_millis(500), session.pay()).await
    else {
        panic!("the broadcast should time out");
    };
    assert!(matches!(
        session.payment(),
        PaymentPhase::Failed(PaymentFailure::Network(_))
    ));
    assert!(session.payment_eligible());

    provider.stall_broadcast(false);
    session.pay().await.unwrap();
    assert!(deployment.paid_on_chain());
}

#[tokio::test]
async fn refresh_fails_interrupted_payment() {
    let deployment = Deployment::new();
    deployment.net.select_account("borrower").unwrap();
    let provider = ScriptedProvider::new(&deployment.net);
    let mut session = Session::new(Some(&provider), deployment.config());
    session.connect().await.unwrap();
    provider.stall_broadcast(true);

    assert!(
        time::timeout(Duration::from_millis(50), session.pay())
            .await
            .is_err()
    );
    assert_eq!(session.payment(), &PaymentPhase::Submitting);
    assert!(session.abandon_payment().is_err());
    assert_eq!(session.pay().await, Err(Error::PaymentInFlight));

    session.refresh().await.unwrap();
    assert!(!session.view().unwrap().state().paid);
    assert_eq!(
        session.payment(),
        &PaymentPhase::Failed(PaymentFailure::Network("interrupted".into()))
    );
    assert!(session.payment_eligible());

    provider.stall_broadcast(false);
    session.pay().await.unwrap();
    assert!(deployment.paid_on_chain());
}
