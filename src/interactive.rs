use ethers::utils::to_checksum;

use self::utils::prompt_secret_handle_errors;
use crate::accounts::Signers;
use crate::cli::{NetworkArgs, PrivateKey};
use crate::config::NetworkProfile;
use crate::report::Report;
use crate::types::ContractName;

mod utils;

#[derive(Clone, Debug, derive_more::Display)]
enum CredentialSource {
    #[display(fmt = "Mnemonic")]
    Mnemonic,
    #[display(fmt = "Private key")]
    PrivateKey,
}

/// Resolves the signing accounts, prompting for a mnemonic or private key
/// when none was configured and prompting is allowed.
pub fn resolve_signers(
    args: &NetworkArgs,
    profile: &NetworkProfile,
    allow_prompt: bool,
) -> eyre::Result<Signers> {
    let has_credentials = args.private_key.is_some()
        || args.mnemonic.is_some()
        || profile.accounts.mnemonic.is_some();

    if has_credentials || !allow_prompt {
        return Signers::resolve(
            &profile.accounts,
            args.mnemonic.as_deref(),
            args.private_key.as_ref(),
        );
    }

    match inquire::Select::new(
        "No credentials configured, sign with:",
        vec![CredentialSource::Mnemonic, CredentialSource::PrivateKey],
    )
    .prompt_skippable()?
    {
        Some(CredentialSource::Mnemonic) => {
            let mnemonic: String = prompt_secret_handle_errors("Mnemonic:")?;
            Signers::resolve(&profile.accounts, Some(&mnemonic), None)
        }
        Some(CredentialSource::PrivateKey) => {
            let private_key: PrivateKey =
                prompt_secret_handle_errors("Private key:")?;
            Signers::resolve(&profile.accounts, None, Some(&private_key))
        }
        None => eyre::bail!("No credentials provided"),
    }
}

pub fn confirm_deployment(
    network: &str,
    plan: &[ContractName],
    report: &Report,
) -> eyre::Result<bool> {
    for line in deployment_plan(network, plan, report) {
        println!("{line}");
    }

    let proceed = inquire::Confirm::new("Proceed with this deployment?")
        .with_default(false)
        .prompt()?;

    Ok(proceed)
}

fn deployment_plan(
    network: &str,
    plan: &[ContractName],
    report: &Report,
) -> Vec<String> {
    let mut lines = vec![
        format!("Network: {network} (chain {})", report.chain_id),
        format!("Deployer: {}", to_checksum(&report.deployer, None)),
        "Contracts:".to_string(),
    ];

    for contract in plan {
        let status = match report.address_of(*contract) {
            Some(address) => format!("deployed at {}", to_checksum(&address, None)),
            None => "(undeployed)".to_string(),
        };

        lines.push(format!("  {contract}: {status}"));
    }

    lines
}
