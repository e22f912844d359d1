use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use self::contract_deployment::{ContractDeployment, ProxyDeployment};
use crate::types::{ChainId, ContractName};

pub mod contract_deployment;

/// Record of a deployment, persisted between runs so finished contracts are
/// not deployed twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub network: String,
    pub chain_id: ChainId,
    pub deployer: Address,

    #[serde(default)]
    pub creath: Option<ContractDeployment>,

    #[serde(default)]
    pub token_registry: Option<ContractDeployment>,

    #[serde(default)]
    pub treasury: Option<ContractDeployment>,

    #[serde(default)]
    pub marketplace: Option<ProxyDeployment>,

    #[serde(default)]
    pub art_factory: Option<ContractDeployment>,

    #[serde(default)]
    pub address_registry: Option<ContractDeployment>,
}

impl Report {
    pub fn new(network: impl ToString, chain_id: ChainId, deployer: Address) -> Self {
        Self {
            network: network.to_string(),
            chain_id,
            deployer,
            creath: None,
            token_registry: None,
            treasury: None,
            marketplace: None,
            art_factory: None,
            address_registry: None,
        }
    }

    pub fn ensure_chain(&self, chain_id: ChainId) -> eyre::Result<()> {
        if self.chain_id != chain_id {
            eyre::bail!(
                "Existing report was made on chain {} ({}) but the RPC is on chain {chain_id}",
                self.chain_id,
                self.network,
            );
        }

        Ok(())
    }

    fn contract(&self, contract: ContractName) -> Option<&ContractDeployment> {
        match contract {
            ContractName::Creath => self.creath.as_ref(),
            ContractName::TokenRegistry => self.token_registry.as_ref(),
            ContractName::Treasury => self.treasury.as_ref(),
            ContractName::Marketplace => self
                .marketplace
                .as_ref()
                .and_then(|marketplace| marketplace.proxy.as_ref()),
            ContractName::ArtFactory => self.art_factory.as_ref(),
            ContractName::AddressRegistry => self.address_registry.as_ref(),
        }
    }

    /// Switches the report to the current deployer, returning the previous
    /// one when it changed.
    pub fn update_deployer(&mut self, deployer: Address) -> Option<Address> {
        if self.deployer == deployer {
            return None;
        }

        Some(std::mem::replace(&mut self.deployer, deployer))
    }

    /// Address users interact with, the proxy for upgradeable contracts.
    pub fn address_of(&self, contract: ContractName) -> Option<Address> {
        self.contract(contract).map(|deployment| deployment.address)
    }

    /// Sets a plain (non proxied) contract deployment.
    pub fn record(
        &mut self,
        contract: ContractName,
        deployment: ContractDeployment,
    ) -> eyre::Result<()> {
        let slot = match contract {
            ContractName::Creath => &mut self.creath,
            ContractName::TokenRegistry => &mut self.token_registry,
            ContractName::Treasury => &mut self.treasury,
            ContractName::ArtFactory => &mut self.art_factory,
            ContractName::AddressRegistry => &mut self.address_registry,
            ContractName::Marketplace => {
                eyre::bail!("{contract} is deployed behind a proxy")
            }
        };

        *slot = Some(deployment);

        Ok(())
    }

    pub fn entries(&self) -> Vec<(ContractName, Address)> {
        ContractName::iter()
            .filter_map(|contract| {
                self.address_of(contract).map(|address| (contract, address))
            })
            .collect()
    }

    pub fn print_addresses(&self) {
        for (contract, address) in self.entries() {
            println!("{contract} {}", to_checksum(&address, None));
        }
    }
}
