use tracing::{info, instrument};

use crate::deployment::DeploymentContext;
use crate::forge_utils::ContractSpec;
use crate::report::contract_deployment::ContractDeployment;
use crate::types::ContractName;

#[instrument(name = "treasury", skip_all)]
pub async fn deploy(
    context: &DeploymentContext,
) -> eyre::Result<ContractDeployment> {
    let beneficiary = context.treasury_beneficiary;

    info!("Treasury beneficiary is {beneficiary:?}");

    let output = context
        .forge_create(ContractSpec::name(ContractName::Treasury.artifact()))
        .with_constructor_arg(format!("{beneficiary:?}"))
        .run()
        .await?;

    Ok(output.into())
}
