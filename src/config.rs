use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ethers::types::{Address, H160};
use eyre::{ContextCompat, WrapErr};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::serde_utils;
use crate::types::{AccountIndex, ChainId, PlatformFee};

pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0";
pub const DEFAULT_ACCOUNT_COUNT: u32 = 10;
/// 0xe2f965D2D4F89Bcaa2F8Edf9f4Eaf2Ce0A0AF328
pub const DEFAULT_ART_FACTORY_ADMIN: Address = H160([
    0xe2, 0xf9, 0x65, 0xd2, 0xd4, 0xf8, 0x9b, 0xca, 0xa2, 0xf8, 0xed, 0xf9,
    0xf4, 0xea, 0xf2, 0xce, 0x0a, 0x0a, 0xf3, 0x28,
]);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_networks")]
    pub networks: BTreeMap<String, NetworkProfile>,
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub forge: ForgeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub chain_id: Option<ChainId>,
    #[serde(default)]
    pub accounts: AccountsConfig,
    /// Request timeout in milliseconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsConfig {
    #[serde(default, skip_serializing)]
    pub mnemonic: Option<String>,
    #[serde(default = "default_derivation_path")]
    pub path: String,
    #[serde(default, alias = "inittialIndex")]
    pub initial_index: AccountIndex,
    #[serde(default = "default_account_count")]
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Root of the forge project holding the Creath contracts
    #[serde(default = "default_contracts_root")]
    pub root: PathBuf,
    #[serde(default = "default_art_factory_admin")]
    pub art_factory_admin: Address,
    #[serde(default = "default_platform_fee")]
    pub platform_fee: PlatformFee,
    #[serde(default = "default_proxy_contract")]
    pub proxy_contract: String,
    /// Receiver of the treasury funds
    #[serde(default)]
    pub treasury_beneficiary: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Newer forge releases only send the transaction with `--broadcast`
    #[serde(default = "default_true")]
    pub broadcast: bool,
    #[serde(default = "default_forge_binary")]
    pub binary: PathBuf,
}

impl Config {
    /// Reads the configuration file, or falls back to the built-in network
    /// profiles when no file is given.
    pub async fn load(path: Option<&Path>) -> eyre::Result<Self> {
        match path {
            Some(path) => serde_utils::read_deserialize(path).await,
            None => Ok(Self::default()),
        }
    }

    pub fn network(&self, name: &str) -> eyre::Result<&NetworkProfile> {
        self.networks.get(name).with_context(|| {
            let known: Vec<_> = self.networks.keys().cloned().collect();
            format!(
                "Unknown network '{name}', known networks: {}",
                known.join(", ")
            )
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            networks: default_networks(),
            contracts: ContractsConfig::default(),
            forge: ForgeConfig::default(),
        }
    }
}

impl NetworkProfile {
    fn new(url: Option<&str>, chain_id: Option<u64>) -> Self {
        Self {
            url: url.map(ToString::to_string),
            chain_id: chain_id.map(ChainId),
            accounts: AccountsConfig::default(),
            timeout: None,
        }
    }

    pub fn rpc_url(&self, rpc_url_override: Option<&Url>) -> eyre::Result<Url> {
        if let Some(rpc_url) = rpc_url_override {
            return Ok(rpc_url.clone());
        }

        let url = self
            .url
            .as_deref()
            .context("Network has no RPC url, pass one with --rpc-url")?;

        url.parse()
            .wrap_err_with(|| format!("Invalid RPC url {url}"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_millis)
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            mnemonic: None,
            path: default_derivation_path(),
            initial_index: AccountIndex::default(),
            count: DEFAULT_ACCOUNT_COUNT,
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            root: default_contracts_root(),
            art_factory_admin: default_art_factory_admin(),
            platform_fee: default_platform_fee(),
            proxy_contract: default_proxy_contract(),
            treasury_beneficiary: None,
        }
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            broadcast: true,
            binary: default_forge_binary(),
        }
    }
}

fn default_networks() -> BTreeMap<String, NetworkProfile> {
    let mut localhost =
        NetworkProfile::new(Some("http://localhost:8545"), None);
    localhost.timeout = Some(150_000);

    let mut mainnet =
        NetworkProfile::new(Some("https://eth.llamarpc.com"), Some(1));
    mainnet.accounts.initial_index = AccountIndex(1);

    maplit::btreemap! {
        "goerli".to_string() => NetworkProfile::new(Some("https://rpc.sepolia.org"), Some(11155111)),
        "polygon".to_string() => NetworkProfile::new(Some("https://polygon-rpc.com"), Some(137)),
        "localhost".to_string() => localhost,
        "mainnet".to_string() => mainnet,
        "hardhat".to_string() => NetworkProfile::new(None, None),
    }
}

fn default_derivation_path() -> String {
    DEFAULT_DERIVATION_PATH.to_string()
}

fn default_account_count() -> u32 {
    DEFAULT_ACCOUNT_COUNT
}

fn default_contracts_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_art_factory_admin() -> Address {
    DEFAULT_ART_FACTORY_ADMIN
}

fn default_platform_fee() -> PlatformFee {
    PlatformFee(20)
}

fn default_proxy_contract() -> String {
    "ERC1967Proxy".to_string()
}

fn default_forge_binary() -> PathBuf {
    PathBuf::from("forge")
}

fn default_true() -> bool {
    true
}
