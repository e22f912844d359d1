use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

pub mod private_key;

pub use private_key::PrivateKey;
use reqwest::Url;

use crate::plan::DeploymentTarget;

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case", about = "Deploys the Creath marketplace contracts")]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Clone, Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Cmd {
    /// Deploy the selected contracts to a network
    Deploy(DeployArgs),
    /// Print the addresses of the accounts configured for a network
    Accounts(NetworkArgs),
}

#[derive(Debug, Clone, ClapArgs)]
#[clap(rename_all = "kebab-case")]
pub struct NetworkArgs {
    /// Path to the configuration file, built-in network profiles are used if omitted
    #[clap(short, long, env)]
    pub config: Option<PathBuf>,

    /// Name of the network profile to use
    #[clap(short, long, env, default_value = "localhost")]
    pub network: String,

    /// Overrides the RPC url of the selected network profile
    #[clap(short, long, env)]
    pub rpc_url: Option<Url>,

    /// Mnemonic to derive the accounts from
    #[clap(short, long, env, hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Private key to use instead of a mnemonic
    #[clap(short, long, env, hide_env_values = true)]
    pub private_key: Option<PrivateKey>,
}

#[derive(Debug, Clone, ClapArgs)]
#[clap(rename_all = "kebab-case")]
pub struct DeployArgs {
    #[clap(flatten)]
    pub network: NetworkArgs,

    /// Contracts to deploy, their dependencies are deployed as well
    #[clap(short, long, env, value_delimiter = ',', default_value = "full")]
    pub target: Vec<DeploymentTarget>,

    /// The name of the deployment, defaults to the network name
    ///
    /// Should be something meaningful like 'polygon-2023-04-18'
    #[clap(short, long, env)]
    pub deployment_name: Option<String>,

    /// The etherscan API key to use
    #[clap(short, long, env, hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub yes: bool,
}

impl DeployArgs {
    pub fn deployment_name(&self) -> &str {
        self.deployment_name
            .as_deref()
            .unwrap_or(&self.network.network)
    }
}
