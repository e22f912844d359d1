use ethers::abi::AbiEncode;
use ethers::types::{Address, Bytes, U256};
use eyre::ContextCompat;
use tracing::{info, instrument};

use super::assemble_report::assemble_report;
use crate::abis::InitializeCall;
use crate::config::Config;
use crate::deployment::DeploymentContext;
use crate::forge_utils::ContractSpec;
use crate::report::contract_deployment::{ContractDeployment, ProxyDeployment};
use crate::report::Report;
use crate::types::{ContractName, PlatformFee};

pub(crate) fn initialize_call_data(
    treasury: Address,
    platform_fee: PlatformFee,
) -> Bytes {
    InitializeCall {
        treasury,
        platform_fee: U256::from(*platform_fee),
    }
    .encode()
    .into()
}

/// Deploys the marketplace implementation and installs it behind a UUPS
/// proxy, initialized with the treasury and platform fee.
///
/// The implementation is persisted before the proxy is created. A recorded
/// implementation without a proxy is reused instead of being deployed again.
#[instrument(name = "marketplace", skip_all)]
pub async fn deploy(
    context: &DeploymentContext,
    config: &Config,
    report: &mut Report,
) -> eyre::Result<()> {
    let treasury = report
        .address_of(ContractName::Treasury)
        .context("Missing treasury deployment")?;

    let implementation = match report.marketplace.clone() {
        Some(recorded) => {
            info!(
                "Reusing marketplace implementation at {:?}",
                recorded.implementation.address
            );
            recorded.implementation
        }
        None => {
            let implementation = deploy_implementation(context).await?;

            report.marketplace = Some(ProxyDeployment {
                implementation: implementation.clone(),
                proxy: None,
            });
            assemble_report(context, report).await?;

            implementation
        }
    };

    let proxy =
        deploy_proxy(context, config, treasury, implementation.address).await?;

    report.marketplace = Some(ProxyDeployment {
        implementation,
        proxy: Some(proxy),
    });

    Ok(())
}

async fn deploy_implementation(
    context: &DeploymentContext,
) -> eyre::Result<ContractDeployment> {
    let implementation = context
        .forge_create(ContractSpec::name(ContractName::Marketplace.artifact()))
        .run()
        .await?;

    info!(
        "Marketplace implementation deployed to {:?}",
        implementation.deployed_to
    );

    Ok(implementation.into())
}

async fn deploy_proxy(
    context: &DeploymentContext,
    config: &Config,
    treasury: Address,
    implementation: Address,
) -> eyre::Result<ContractDeployment> {
    let call_data =
        initialize_call_data(treasury, config.contracts.platform_fee);

    let proxy = context
        .forge_create(ContractSpec::name(&config.contracts.proxy_contract))
        .with_constructor_arg(format!("{implementation:?}"))
        .with_constructor_arg(call_data)
        .run()
        .await?;

    Ok(proxy.into())
}
