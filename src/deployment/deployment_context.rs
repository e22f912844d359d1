use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use ethers::types::Address;
use reqwest::Url;

use crate::cli::PrivateKey;
use crate::forge_utils::{ContractSpec, ForgeCreate};

#[derive(Debug)]
pub struct DeploymentContext {
    pub deployment_dir: PathBuf,
    /// Root of the forge project, every forge command runs from here
    pub contracts_root: PathBuf,
    pub forge_bin: PathBuf,
    pub nonce: AtomicU64,
    pub private_key: PrivateKey,
    pub rpc_url: Url,
    pub etherscan_api_key: Option<String>,
    pub broadcast: bool,
    pub treasury_beneficiary: Address,
}

impl DeploymentContext {
    pub fn next_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::SeqCst)
    }

    pub fn forge_create(&self, contract_spec: ContractSpec) -> ForgeCreate {
        let mut forge_create = ForgeCreate::new(contract_spec)
            .with_forge_bin(&self.forge_bin)
            .with_cwd(&self.contracts_root)
            .with_private_key(self.private_key.clone())
            .with_rpc_url(self.rpc_url.to_string())
            .with_override_nonce(self.next_nonce())
            .with_broadcast(self.broadcast);

        if let Some(etherscan_api_key) = self.etherscan_api_key.as_ref() {
            forge_create = forge_create
                .with_verification_api_key(etherscan_api_key.clone());
        }

        forge_create
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn context(deployment_dir: PathBuf, nonce: u64) -> DeploymentContext {
        DeploymentContext {
            deployment_dir,
            contracts_root: PathBuf::from("."),
            forge_bin: PathBuf::from("forge"),
            nonce: AtomicU64::new(nonce),
            private_key:
                "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                    .parse()
                    .unwrap(),
            rpc_url: "http://localhost:8545".parse().unwrap(),
            etherscan_api_key: None,
            broadcast: true,
            treasury_beneficiary: Address::repeat_byte(0xbe),
        }
    }

    #[test]
    fn nonces_are_handed_out_in_sequence() {
        let context = context(PathBuf::from("localhost"), 4);

        assert_eq!(context.next_nonce(), 4);
        assert_eq!(context.next_nonce(), 5);

        let _ = context.forge_create(ContractSpec::name("Creath"));
        assert_eq!(context.next_nonce(), 7);
    }
}
