use tracing::instrument;

use crate::config::Config;
use crate::deployment::DeploymentContext;
use crate::forge_utils::ContractSpec;
use crate::report::contract_deployment::ContractDeployment;
use crate::types::ContractName;

#[instrument(name = "art_factory", skip_all)]
pub async fn deploy(
    context: &DeploymentContext,
    config: &Config,
) -> eyre::Result<ContractDeployment> {
    let contract_spec = ContractSpec::name(ContractName::ArtFactory.artifact());

    let output = context
        .forge_create(contract_spec)
        .with_constructor_arg(format!(
            "{:?}",
            config.contracts.art_factory_admin
        ))
        .run()
        .await?;

    Ok(output.into())
}
