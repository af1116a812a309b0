use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

use sdk::cosmwasm_std::Addr;

use crate::{
    error::Error,
    ledger::{Binding, ChainId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct ClientConfig {
    /// The ledger address on each known network
    #[serde(default)]
    pub deployments: BTreeMap<ChainId, Addr>,
    /// Blocks on top of the payment block before it counts as settled
    #[serde(default = "ClientConfig::default_confirmations")]
    pub confirmations: u32,
    #[serde(default = "ClientConfig::default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
    /// Decimal places of the loan denomination
    #[serde(default = "ClientConfig::default_display_decimals")]
    pub display_decimals: u32,
}

impl ClientConfig {
    const fn default_confirmations() -> u32 {
        1
    }

    const fn default_settle_timeout_ms() -> u64 {
        120_000
    }

    const fn default_display_decimals() -> u32 {
        6
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn with_deployment(mut self, chain_id: ChainId, contract: Addr) -> Self {
        self.deployments.insert(chain_id, contract);
        self
    }

    pub fn binding(&self, chain_id: &ChainId) -> Result<Binding, Error> {
        self.deployments
            .get(chain_id)
            .map(|contract| Binding {
                chain_id: chain_id.clone(),
                contract: contract.clone(),
            })
            .ok_or_else(|| Error::NoDeployment(chain_id.clone()))
    }

    pub const fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            deployments: BTreeMap::new(),
            confirmations: Self::default_confirmations(),
            settle_timeout_ms: Self::default_settle_timeout_ms(),
            display_decimals: Self::default_display_decimals(),
        }
    }
}
