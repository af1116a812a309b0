use std::{fs, path::Path};

use anyhow::{Context as _, Result, bail};
use tracing::info;

use mortgage::api::{ExecuteMsg, QueryMsg};
use mortgage_client::{
    config::ClientConfig,
    display,
    localnet::{LocalNet, LocalNetConfig},
    session::Session,
};
use sdk::cosmwasm_std::{Addr, Coin, Uint128};

const DISPLAY_PRECISION: u32 = 4;

pub(crate) fn deploy(config: &Path) -> Result<(LocalNet, LocalNetConfig, Addr)> {
    let config = read_config(config)?;
    let net = LocalNet::from_config(&config).context("Starting the local network failed!")?;
    let lender = net.address_of(&config.loan.lender)?;
    let borrower = net.address_of(&config.loan.borrower)?;

    println!("Deploying Mortgage contract with the account: {lender}");
    println!("Borrower address: {borrower}");
    println!(
        "Loan amount: {}",
        format(&Coin::new(config.loan.amount, &config.denom))
    );

    let contract = net
        .deploy_from_config(&config)
        .context("Deploying the mortgage contract failed!")?;
    println!("Mortgage contract deployed to: {contract}");

    Ok((net, config, contract))
}

pub(crate) async fn interact(
    config: &Path,
    expected_contract: Option<&str>,
    amount: Option<u128>,
) -> Result<(LocalNet, Addr)> {
    let (net, config, contract) = deploy(config)?;
    if let Some(expected) = expected_contract.filter(|&expected| expected != contract.as_str()) {
        bail!("The ledger was deployed to {contract}, not to {expected}!");
    }

    let borrower = net.address_of(&config.loan.borrower)?;
    let lender: Addr = net.query_smart(&contract, &QueryMsg::Lender {})?;

    print_balances(&net, &contract, &borrower, &lender)?;

    match amount {
        Some(amount) => {
            let funds = [Coin::new(Uint128::new(amount), &config.denom)];
            println!("Paying {} directly...", format(&funds[0]));
            net.execute(&borrower, &contract, &ExecuteMsg::PayLoan {}, &funds)
                .context("Payment failed!")?;
        }
        None => {
            net.select_account(&config.loan.borrower)?;
            let mut session = Session::new(
                Some(&net),
                ClientConfig::default().with_deployment(net.active_chain(), contract.clone()),
            );
            session.connect().await.context("Connecting the borrower failed!")?;

            if let Some(view) = session.view() {
                println!("Next payment due: {}", view.next_payment());
                println!("Paying {}...", format(&view.terms().principal));
            }
            let receipt = session.pay().await.context("Payment failed!")?;
            info!(hash = %receipt.hash, height = receipt.height, "Payment confirmed");
            if let Some(view) = session.view() {
                println!("Next payment due: {}", view.next_payment());
            }
        }
    }

    let paid: bool = net.query_smart(&contract, &QueryMsg::LoanPaid {})?;
    println!("Loan paid: {paid}");
    print_balances(&net, &contract, &borrower, &lender)?;

    Ok((net, contract))
}

fn read_config(path: &Path) -> Result<LocalNetConfig> {
    fs::read_to_string(path)
        .with_context(|| format!("Reading \"{}\" failed!", path.display()))
        .and_then(|json| LocalNetConfig::from_json(&json))
}

fn print_balances(net: &LocalNet, contract: &Addr, borrower: &Addr, lender: &Addr) -> Result<()> {
    println!("Borrower balance: {}", format(&ledger_balance(net, contract, borrower)?));
    println!("Lender balance: {}", format(&ledger_balance(net, contract, lender)?));
    Ok(())
}

fn ledger_balance(net: &LocalNet, contract: &Addr, address: &Addr) -> Result<Coin> {
    net.query_smart(
        contract,
        &QueryMsg::Balance {
            address: address.clone(),
        },
    )
}

fn format(coin: &Coin) -> String {
    display::format_coin(coin, ClientConfig::default().display_decimals, DISPLAY_PRECISION)
}
