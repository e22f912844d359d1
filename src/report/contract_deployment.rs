use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::forge_utils::ForgeOutput;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ContractDeployment {
    pub address: Address,
    #[serde(default)]
    pub transaction_hash: Option<H256>,
}

impl From<ForgeOutput> for ContractDeployment {
    fn from(value: ForgeOutput) -> Self {
        Self {
            address: value.deployed_to,
            transaction_hash: Some(value.transaction_hash),
        }
    }
}

/// A contract installed behind an upgradeable proxy.
///
/// The implementation is recorded as soon as it is deployed, `proxy` stays
/// empty until the proxy pointing at it exists.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ProxyDeployment {
    pub implementation: ContractDeployment,
    #[serde(default)]
    pub proxy: Option<ContractDeployment>,
}
