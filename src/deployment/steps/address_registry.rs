use eyre::ContextCompat;
use tracing::instrument;

use crate::deployment::DeploymentContext;
use crate::forge_utils::ContractSpec;
use crate::report::contract_deployment::ContractDeployment;
use crate::report::Report;
use crate::types::ContractName;

/// Constructor order of the address registry.
const REGISTERED: [ContractName; 4] = [
    ContractName::Creath,
    ContractName::Marketplace,
    ContractName::ArtFactory,
    ContractName::TokenRegistry,
];

#[instrument(name = "address_registry", skip_all)]
pub async fn deploy(
    context: &DeploymentContext,
    report: &Report,
) -> eyre::Result<ContractDeployment> {
    let mut forge_create = context.forge_create(ContractSpec::name(
        ContractName::AddressRegistry.artifact(),
    ));

    for contract in REGISTERED {
        let address = report
            .address_of(contract)
            .with_context(|| format!("Missing {contract} deployment"))?;

        forge_create = forge_create.with_constructor_arg(format!("{address:?}"));
    }

    let output = forge_create.run().await?;

    Ok(output.into())
}
