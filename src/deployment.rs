use std::path::PathBuf;
use std::sync::atomic::AtomicU64;

use ethers::providers::Middleware;
use ethers::signers::Signer;
use ethers::utils::format_ether;
use tracing::{info, instrument, warn};

use self::steps::assemble_report::{self, REPORT_PATH};
use self::steps::{
    address_registry, art_factory, creath, marketplace, token_registry,
    treasury,
};
use crate::cli::{DeployArgs, PrivateKey};
use crate::config::Config;
use crate::ethers_utils::{http_provider, remote_chain_id};
use crate::report::Report;
use crate::types::ContractName;
use crate::{interactive, plan, serde_utils};

pub mod deployment_context;
pub mod steps;

pub use self::deployment_context::DeploymentContext;

pub async fn run_deployment(cmd: DeployArgs) -> eyre::Result<()> {
    if std::env::var_os("REPORT_GAS").is_some() {
        warn!("REPORT_GAS is set but gas reporting is not supported");
    }

    let config = Config::load(cmd.network.config.as_deref()).await?;
    let network_name = cmd.network.network.as_str();
    let profile = config.network(network_name)?;

    let rpc_url = profile.rpc_url(cmd.network.rpc_url.as_ref())?;
    let provider = http_provider(&rpc_url, profile.timeout())?;
    let chain_id = remote_chain_id(&provider, profile.chain_id).await?;

    let signers =
        interactive::resolve_signers(&cmd.network, profile, !cmd.yes)?;

    // Forge signs every transaction, the provider only reads account state
    let wallet_address = signers.deployer().address();

    let balance = provider.get_balance(wallet_address, None).await?;
    info!(
        "Deployer {wallet_address:?} has a balance of {} ETH",
        format_ether(balance)
    );
    if balance.is_zero() {
        warn!("Deployer has no funds, deployments will likely fail");
    }

    let nonce = provider
        .get_transaction_count(wallet_address, None)
        .await?;

    let deployment_dir = PathBuf::from(cmd.deployment_name());
    tokio::fs::create_dir_all(&deployment_dir).await?;

    let report_path = deployment_dir.join(REPORT_PATH);
    let report = if report_path.exists() {
        let mut report: Report =
            serde_utils::read_deserialize(&report_path).await?;
        report.ensure_chain(chain_id)?;

        if let Some(previous) = report.update_deployer(wallet_address) {
            warn!(
                "Report was started by {previous:?}, resuming as {wallet_address:?}"
            );
        }

        report
    } else {
        Report::new(network_name, chain_id, wallet_address)
    };

    let plan = plan::resolve(&cmd.target);

    if !cmd.yes && !interactive::confirm_deployment(network_name, &plan, &report)? {
        info!("Deployment cancelled");
        return Ok(());
    }

    let context = DeploymentContext {
        deployment_dir,
        contracts_root: config.contracts.root.clone(),
        forge_bin: config.forge.binary.clone(),
        nonce: AtomicU64::new(nonce.as_u64()),
        private_key: PrivateKey::from(signers.deployer()),
        rpc_url,
        etherscan_api_key: cmd.etherscan_api_key,
        broadcast: config.forge.broadcast,
        treasury_beneficiary: config
            .contracts
            .treasury_beneficiary
            .unwrap_or_else(|| signers.secondary().address()),
    };

    let report = run_plan(&context, &config, &plan, report).await?;

    report.print_addresses();

    Ok(())
}

/// Deploys every planned contract missing from the report, one after the
/// other, persisting the report after each deployment.
#[instrument(skip_all)]
pub async fn run_plan(
    context: &DeploymentContext,
    config: &Config,
    plan: &[ContractName],
    mut report: Report,
) -> eyre::Result<Report> {
    for contract in plan.iter().copied() {
        if let Some(address) = report.address_of(contract) {
            info!("Existing {contract} deployment found at {address:?}. Skipping.");
            continue;
        }

        info!("Deploying {contract}");

        match contract {
            ContractName::Creath => {
                report.record(contract, creath::deploy(context).await?)?
            }
            ContractName::TokenRegistry => report
                .record(contract, token_registry::deploy(context).await?)?,
            ContractName::Treasury => {
                report.record(contract, treasury::deploy(context).await?)?
            }
            ContractName::Marketplace => {
                marketplace::deploy(context, config, &mut report).await?
            }
            ContractName::ArtFactory => report.record(
                contract,
                art_factory::deploy(context, config).await?,
            )?,
            ContractName::AddressRegistry => report.record(
                contract,
                address_registry::deploy(context, &report).await?,
            )?,
        }

        assemble_report::assemble_report(context, &report).await?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ethers::types::{Address, H256};
    use eyre::ContextCompat;

    use super::deployment_context::tests::context;
    use super::*;
    use crate::config::DEFAULT_ART_FACTORY_ADMIN;
    use crate::plan::DeploymentTarget;
    use crate::report::contract_deployment::{
        ContractDeployment, ProxyDeployment,
    };
    use crate::types::{ChainId, PlatformFee};

    fn deployment(byte: u8) -> ContractDeployment {
        ContractDeployment {
            address: Address::repeat_byte(byte),
            transaction_hash: None,
        }
    }

    /// Address the fake forge hands out for its `n`th successful deployment.
    fn deployed(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn arg(address: Address) -> String {
        format!("{address:?}")
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ForgeCall {
        contract: String,
        nonce: u64,
        args: Vec<String>,
    }

    fn call(contract: &str, nonce: u64, args: &[String]) -> ForgeCall {
        ForgeCall {
            contract: contract.to_string(),
            nonce,
            args: args.to_vec(),
        }
    }

    /// Writes a fake `forge` into `dir`. Every invocation is appended to
    /// `dir/calls` and the current `dir/report.yml` is copied to
    /// `dir/report-<n>.yml`, `n` being the number of earlier successful
    /// deployments. Creating `fail_on` exits with an error.
    #[cfg(unix)]
    fn forge_stub(dir: &Path, fail_on: Option<&str>) -> eyre::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let fail_on = fail_on.unwrap_or_default();
        let script = indoc::formatdoc! {r#"
            #!/bin/sh
            dir=$(dirname "$0")
            count=$(cat "$dir/count" 2>/dev/null || echo 0)
            [ -f "$dir/report.yml" ] && cp "$dir/report.yml" "$dir/report-$count.yml"
            echo "$*" >> "$dir/calls"
            if [ "$2" = "{fail_on}" ]; then
                echo "Error: deployment reverted" >&2
                exit 1
            fi
            count=$((count + 1))
            echo "$count" > "$dir/count"
            echo "Compiler run successful!"
            printf '{{"deployer":"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266","deployedTo":"0x%040x","transactionHash":"0x%064x"}}\n' "$count" "$count"
        "#};

        let path = dir.join("forge");
        std::fs::write(&path, script)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

        Ok(path)
    }

    fn recorded_calls(dir: &Path) -> eyre::Result<Vec<ForgeCall>> {
        let calls = std::fs::read_to_string(dir.join("calls"))?;

        calls
            .lines()
            .map(|line| -> eyre::Result<ForgeCall> {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                let flag_value = |flag: &str| {
                    tokens
                        .iter()
                        .position(|token| *token == flag)
                        .map(|idx| idx + 1)
                };

                let contract = tokens.get(1).context("Missing contract")?;
                let nonce = flag_value("--nonce")
                    .and_then(|idx| tokens.get(idx))
                    .context("Missing nonce")?
                    .parse::<u64>()?;
                let args: Vec<String> = flag_value("--constructor-args")
                    .map(|idx| {
                        tokens[idx..].iter().map(ToString::to_string).collect()
                    })
                    .unwrap_or_default();

                Ok(call(contract, nonce, &args))
            })
            .collect()
    }

    async fn snapshot(dir: &Path, deployments: u64) -> eyre::Result<Report> {
        serde_utils::read_deserialize(dir.join(format!("report-{deployments}.yml")))
            .await
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn full_plan_wires_addresses_between_contracts() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut context = context(dir.path().to_owned(), 0);
        context.forge_bin = forge_stub(dir.path(), None)?;

        let plan = plan::resolve(&[DeploymentTarget::Full]);
        let report = Report::new("localhost", ChainId(31337), Address::zero());

        let report =
            run_plan(&context, &Config::default(), &plan, report).await?;

        let call_data =
            marketplace::initialize_call_data(deployed(3), PlatformFee(20))
                .to_string();

        assert_eq!(
            recorded_calls(dir.path())?,
            vec![
                call("Creath", 0, &[]),
                call("CreathTokenRegistry", 1, &[]),
                call("CreathTreasury", 2, &[arg(Address::repeat_byte(0xbe))]),
                call("CreathMarketplace", 3, &[]),
                call("ERC1967Proxy", 4, &[arg(deployed(4)), call_data]),
                call("CreathArtFactory", 5, &[arg(DEFAULT_ART_FACTORY_ADMIN)]),
                call(
                    "CreathAddressRegistry",
                    6,
                    &[
                        arg(deployed(1)),
                        arg(deployed(5)),
                        arg(deployed(6)),
                        arg(deployed(2)),
                    ]
                ),
            ]
        );

        assert_eq!(
            report.entries(),
            vec![
                (ContractName::Creath, deployed(1)),
                (ContractName::TokenRegistry, deployed(2)),
                (ContractName::Treasury, deployed(3)),
                (ContractName::Marketplace, deployed(5)),
                (ContractName::ArtFactory, deployed(6)),
                (ContractName::AddressRegistry, deployed(7)),
            ]
        );
        assert_eq!(
            report.marketplace.as_ref().map(|m| m.implementation.address),
            Some(deployed(4))
        );
        assert_eq!(
            report.creath.as_ref().and_then(|c| c.transaction_hash),
            Some(H256::from_low_u64_be(1))
        );

        let persisted: Report =
            serde_utils::read_deserialize(dir.path().join(REPORT_PATH)).await?;
        assert_eq!(persisted, report);

        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn report_is_written_after_each_deployment() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut context = context(dir.path().to_owned(), 0);
        context.forge_bin = forge_stub(dir.path(), None)?;

        let plan = plan::resolve(&[DeploymentTarget::Full]);
        let report = Report::new("localhost", ChainId(31337), Address::zero());

        run_plan(&context, &Config::default(), &plan, report).await?;

        assert!(!dir.path().join("report-0.yml").exists());

        for (deployments, contract) in [
            (1, ContractName::Creath),
            (2, ContractName::TokenRegistry),
            (3, ContractName::Treasury),
            (5, ContractName::Marketplace),
            (6, ContractName::ArtFactory),
        ] {
            let persisted = snapshot(dir.path(), deployments).await?;

            assert_eq!(
                persisted.entries().last(),
                Some(&(contract, deployed(deployments)))
            );
        }

        let before_proxy = snapshot(dir.path(), 4).await?;
        assert_eq!(
            before_proxy.marketplace,
            Some(ProxyDeployment {
                implementation: ContractDeployment {
                    address: deployed(4),
                    transaction_hash: Some(H256::from_low_u64_be(4)),
                },
                proxy: None,
            })
        );
        assert_eq!(before_proxy.address_of(ContractName::Marketplace), None);

        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn only_missing_contracts_are_deployed() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut context = context(dir.path().to_owned(), 7);
        context.forge_bin = forge_stub(dir.path(), None)?;

        let mut report =
            Report::new("localhost", ChainId(31337), Address::zero());
        report.record(ContractName::Creath, deployment(0xc1))?;
        report.record(ContractName::TokenRegistry, deployment(0xc2))?;
        report.record(ContractName::Treasury, deployment(0xc3))?;

        let plan = plan::resolve(&[DeploymentTarget::Marketplace]);
        let report =
            run_plan(&context, &Config::default(), &plan, report).await?;

        let call_data = marketplace::initialize_call_data(
            Address::repeat_byte(0xc3),
            PlatformFee(20),
        )
        .to_string();

        assert_eq!(
            recorded_calls(dir.path())?,
            vec![
                call("CreathMarketplace", 7, &[]),
                call("ERC1967Proxy", 8, &[arg(deployed(1)), call_data]),
            ]
        );
        assert_eq!(
            report.address_of(ContractName::Marketplace),
            Some(deployed(2))
        );
        assert_eq!(
            report.address_of(ContractName::Creath),
            Some(Address::repeat_byte(0xc1))
        );
        assert_eq!(report.art_factory, None);

        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_proxy_reuses_recorded_implementation() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut context = context(dir.path().to_owned(), 0);
        context.forge_bin = forge_stub(dir.path(), Some("ERC1967Proxy"))?;

        let plan = plan::resolve(&[DeploymentTarget::Full]);
        let report = Report::new("localhost", ChainId(31337), Address::zero());

        let err = run_plan(&context, &Config::default(), &plan, report)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("forge create failed"));

        let persisted: Report =
            serde_utils::read_deserialize(dir.path().join(REPORT_PATH)).await?;
        assert_eq!(
            persisted.marketplace.as_ref().map(|m| m.implementation.address),
            Some(deployed(4))
        );
        assert_eq!(persisted.address_of(ContractName::Marketplace), None);
        assert_eq!(persisted.art_factory, None);

        std::fs::remove_file(dir.path().join("calls"))?;
        let mut context = super::deployment_context::tests::context(
            dir.path().to_owned(),
            5,
        );
        context.forge_bin = forge_stub(dir.path(), None)?;

        let report =
            run_plan(&context, &Config::default(), &plan, persisted).await?;

        let call_data =
            marketplace::initialize_call_data(deployed(3), PlatformFee(20))
                .to_string();

        assert_eq!(
            recorded_calls(dir.path())?,
            vec![
                call("ERC1967Proxy", 5, &[arg(deployed(4)), call_data]),
                call("CreathArtFactory", 6, &[arg(DEFAULT_ART_FACTORY_ADMIN)]),
                call(
                    "CreathAddressRegistry",
                    7,
                    &[
                        arg(deployed(1)),
                        arg(deployed(5)),
                        arg(deployed(6)),
                        arg(deployed(2)),
                    ]
                ),
            ]
        );
        assert_eq!(
            report.marketplace.as_ref().map(|m| m.implementation.address),
            Some(deployed(4))
        );
        assert_eq!(
            report.address_of(ContractName::Marketplace),
            Some(deployed(5))
        );

        Ok(())
    }

    #[tokio::test]
    async fn completed_report_is_left_untouched() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let context = context(dir.path().to_owned(), 3);

        let mut report = Report::new("localhost", ChainId(31337), Address::zero());
        report.record(ContractName::Creath, deployment(1))?;
        report.record(ContractName::TokenRegistry, deployment(2))?;
        report.record(ContractName::Treasury, deployment(3))?;
        report.marketplace = Some(ProxyDeployment {
            implementation: deployment(4),
            proxy: Some(deployment(5)),
        });
        report.record(ContractName::ArtFactory, deployment(6))?;
        report.record(ContractName::AddressRegistry, deployment(7))?;

        let plan = plan::resolve(&[DeploymentTarget::Full]);
        let result =
            run_plan(&context, &Config::default(), &plan, report.clone())
                .await?;

        assert_eq!(result, report);
        assert_eq!(context.next_nonce(), 3);
        assert!(!dir.path().join(REPORT_PATH).exists());

        Ok(())
    }

    #[tokio::test]
    async fn empty_plan_deploys_nothing() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let context = context(dir.path().to_owned(), 0);
        let report = Report::new("localhost", ChainId(31337), Address::zero());

        let result =
            run_plan(&context, &Config::default(), &[], report.clone()).await?;

        assert_eq!(result, report);

        Ok(())
    }
}
