use std::collections::BTreeSet;

use clap::ValueEnum;
use strum::IntoEnumIterator;

use crate::types::ContractName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum DeploymentTarget {
    Full,
    Creath,
    TokenRegistry,
    Treasury,
    Marketplace,
    ArtFactory,
    AddressRegistry,
}

impl DeploymentTarget {
    fn contracts(&self) -> Vec<ContractName> {
        let contract = match self {
            Self::Full => return ContractName::iter().collect(),
            Self::Creath => ContractName::Creath,
            Self::TokenRegistry => ContractName::TokenRegistry,
            Self::Treasury => ContractName::Treasury,
            Self::Marketplace => ContractName::Marketplace,
            Self::ArtFactory => ContractName::ArtFactory,
            Self::AddressRegistry => ContractName::AddressRegistry,
        };

        vec![contract]
    }
}

/// Expands the targets with their transitive dependencies and returns them in
/// canonical deployment order.
pub fn resolve(targets: &[DeploymentTarget]) -> Vec<ContractName> {
    let mut pending: Vec<ContractName> =
        targets.iter().flat_map(|t| t.contracts()).collect();
    let mut planned = BTreeSet::new();

    while let Some(contract) = pending.pop() {
        if planned.insert(contract) {
            pending.extend_from_slice(contract.dependencies());
        }
    }

    planned.into_iter().collect()
}
