use serde::{Deserialize, Serialize};

use sdk::{
    cosmwasm_std::{Addr, Coin},
    schemars::{self, JsonSchema},
};

pub type InterestRate = u32;
pub type Periods = u32;

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct InstantiateMsg {
    pub borrower: Addr,
    pub loan: Coin,
    /// Annual interest in percents, displayed by the clients only
    #[serde(default = "InstantiateMsg::default_interest_rate")]
    pub interest_rate: InterestRate,
    /// Number of monthly periods, displayed by the clients only
    #[serde(default = "InstantiateMsg::default_duration")]
    pub duration: Periods,
}

impl InstantiateMsg {
    pub const DEFAULT_INTEREST_RATE: InterestRate = 5;
    pub const DEFAULT_DURATION: Periods = 360;

    pub fn new(borrower: Addr, loan: Coin) -> Self {
        Self {
            borrower,
            loan,
            interest_rate: Self::DEFAULT_INTEREST_RATE,
            duration: Self::DEFAULT_DURATION,
        }
    }

    const fn default_interest_rate() -> InterestRate {
        Self::DEFAULT_INTEREST_RATE
    }

    const fn default_duration() -> Periods {
        Self::DEFAULT_DURATION
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct MigrateMsg {}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Repay the full principal, attached as the only coin of the message
    ///
    /// Allowed to the borrower only, and only once.
    /// Returns [`PayLoanResponse`] as response data.
    PayLoan {},
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub enum QueryMsg {
    /// Return [`Addr`]
    Borrower {},
    /// Return [`Addr`]
    Lender {},
    /// Return [`Coin`]
    LoanAmount {},
    /// Return [`bool`]
    LoanPaid {},
    /// Return [`InterestRate`]
    InterestRate {},
    /// Return [`Periods`]
    Duration {},
    /// Return the balance of `address` in the loan currency as [`Coin`]
    Balance { address: Addr },
    /// Return [`TermsResponse`]
    Terms {},
    /// Return [`versioning::Package`]
    ContractVersion {},
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct PayLoanResponse {
    pub paid: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct TermsResponse {
    pub borrower: Addr,
    pub lender: Addr,
    pub loan: Coin,
    pub interest_rate: InterestRate,
    pub duration: Periods,
    pub paid: bool,
}
