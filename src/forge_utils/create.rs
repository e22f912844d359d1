use std::path::{Path, PathBuf};

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::ContractSpec;
use crate::cli::PrivateKey;

#[derive(Debug)]
pub struct ForgeCreate {
    forge_bin: PathBuf,
    cwd: Option<PathBuf>,
    contract_spec: ContractSpec,
    private_key: Option<PrivateKey>,
    rpc_url: Option<String>,
    override_nonce: Option<u64>,
    constructor_args: Vec<String>,
    verification_api_key: Option<String>,
    broadcast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeOutput {
    pub deployer: Address,
    pub deployed_to: Address,
    pub transaction_hash: H256,
}

impl ForgeCreate {
    pub fn new(contract_spec: ContractSpec) -> Self {
        Self {
            forge_bin: PathBuf::from("forge"),
            cwd: None,
            contract_spec,
            private_key: None,
            rpc_url: None,
            override_nonce: None,
            constructor_args: vec![],
            verification_api_key: None,
            broadcast: false,
        }
    }

    pub fn with_forge_bin(mut self, forge_bin: impl AsRef<Path>) -> Self {
        self.forge_bin = forge_bin.as_ref().to_owned();
        self
    }

    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_owned());
        self
    }

    pub fn with_private_key(mut self, private_key: PrivateKey) -> Self {
        self.private_key = Some(private_key);
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: String) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub fn with_override_nonce(mut self, override_nonce: u64) -> Self {
        self.override_nonce = Some(override_nonce);
        self
    }

    pub fn with_verification_api_key(
        mut self,
        verification_api_key: impl ToString,
    ) -> Self {
        self.verification_api_key = Some(verification_api_key.to_string());
        self
    }

    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }

    pub fn with_constructor_arg(mut self, arg: impl ToString) -> Self {
        self.constructor_args.push(arg.to_string());
        self
    }

    fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.forge_bin);
        cmd.arg("create");

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.arg(self.contract_spec.to_string());

        if let Some(private_key) = &self.private_key {
            cmd.arg("--private-key");
            cmd.arg(format!("{private_key:#}"));
        }

        if let Some(rpc_url) = &self.rpc_url {
            cmd.arg("--rpc-url");
            cmd.arg(rpc_url);
        }

        if let Some(nonce) = self.override_nonce {
            cmd.arg("--nonce");
            cmd.arg(nonce.to_string());
        }

        if let Some(verification_api_key) = &self.verification_api_key {
            cmd.arg("--etherscan-api-key");
            cmd.arg(verification_api_key);
            cmd.arg("--verify");
        }

        if self.broadcast {
            cmd.arg("--broadcast");
        }

        cmd.arg("--json");

        // Variadic, must stay last
        if !self.constructor_args.is_empty() {
            cmd.arg("--constructor-args");
            cmd.args(&self.constructor_args);
        }

        cmd
    }

    #[instrument(name = "forge_create", skip_all, fields(contract = %self.contract_spec))]
    pub async fn run(&self) -> eyre::Result<ForgeOutput> {
        let mut cmd = self.command();

        info!(
            "Creating contract with args {:?}",
            self.constructor_args
        );

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eyre::bail!("forge create failed: {}", stderr);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let output = parse_output(&stdout)?;

        info!("Created: {output:?}");

        Ok(output)
    }
}

fn parse_output(stdout: &str) -> eyre::Result<ForgeOutput> {
    let s = strip_non_json(stdout)?;

    Ok(serde_json::from_str(s)?)
}

/// Forge may print compiler chatter around the JSON object.
fn strip_non_json(s: &str) -> eyre::Result<&str> {
    match (s.find('{'), s.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&s[start..=end]),
        _ => eyre::bail!("No JSON object in forge output: {s}"),
    }
}
