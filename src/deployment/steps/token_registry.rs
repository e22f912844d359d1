use tracing::instrument;

use crate::deployment::DeploymentContext;
use crate::forge_utils::ContractSpec;
use crate::report::contract_deployment::ContractDeployment;
use crate::types::ContractName;

#[instrument(name = "token_registry", skip_all)]
pub async fn deploy(
    context: &DeploymentContext,
) -> eyre::Result<ContractDeployment> {
    let contract_spec =
        ContractSpec::name(ContractName::TokenRegistry.artifact());

    let output = context.forge_create(contract_spec).run().await?;

    Ok(output.into())
}
