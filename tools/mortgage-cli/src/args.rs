use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(about = "Deploy and exercise a mortgage ledger on an in-process local network")]
pub(crate) struct Parser {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Command {
    /// Start the local network, deploy the ledger as the lender and print its address
    Deploy {
        #[arg(short, long, help = "Local network configuration in JSON.")]
        config: PathBuf,
    },
    /// Deploy the ledger, pay it as the borrower and print the balances around the payment
    Interact {
        #[arg(short, long, help = "Local network configuration in JSON.")]
        config: PathBuf,
        #[arg(long, help = "Expected ledger address, checked against the deployed one.")]
        contract: Option<String>,
        #[arg(
            long,
            help = "Attach this amount of the smallest unit instead of the loan amount, bypassing the client checks."
        )]
        amount: Option<u128>,
    },
}
