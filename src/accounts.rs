use ethers::signers::coins_bip39::English;
use ethers::signers::{LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use ethers::utils::to_checksum;
use eyre::{ContextCompat, WrapErr};

use crate::cli::{NetworkArgs, PrivateKey};
use crate::config::{AccountsConfig, Config};
use crate::interactive;

/// First index of the hardened range, non-hardened children stay below it.
const HARDENED_OFFSET: u32 = 1 << 31;

/// Derives `count` wallets starting at `path/initial_index`.
pub fn derive_wallets(
    accounts: &AccountsConfig,
    mnemonic: &str,
) -> eyre::Result<Vec<LocalWallet>> {
    let path = accounts.path.trim_end_matches('/');

    (0..accounts.count)
        .map(|offset| {
            let index = accounts
                .initial_index
                .checked_add(offset)
                .filter(|index| *index < HARDENED_OFFSET)
                .with_context(|| {
                    format!(
                        "Account index {} + {offset} is out of range (must be below {HARDENED_OFFSET})",
                        accounts.initial_index
                    )
                })?;
            let derivation_path = format!("{path}/{index}");

            MnemonicBuilder::<English>::default()
                .phrase(mnemonic)
                .derivation_path(&derivation_path)?
                .build()
                .wrap_err_with(|| {
                    format!("Deriving account at {derivation_path}")
                })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Signers {
    wallets: Vec<LocalWallet>,
}

impl Signers {
    /// An explicit private key wins over an explicit mnemonic, which wins over
    /// the mnemonic of the network profile.
    pub fn resolve(
        accounts: &AccountsConfig,
        mnemonic: Option<&str>,
        private_key: Option<&PrivateKey>,
    ) -> eyre::Result<Self> {
        if let Some(private_key) = private_key {
            return Ok(Self {
                wallets: vec![private_key.wallet()],
            });
        }

        let mnemonic = mnemonic
            .or(accounts.mnemonic.as_deref())
            .context("No private key or mnemonic provided")?;

        let wallets = derive_wallets(accounts, mnemonic)?;

        if wallets.is_empty() {
            eyre::bail!("Network profile derives no accounts (count is 0)");
        }

        Ok(Self { wallets })
    }

    pub fn deployer(&self) -> &LocalWallet {
        &self.wallets[0]
    }

    /// The account after the deployer, or the deployer itself when it is the
    /// only one.
    pub fn secondary(&self) -> &LocalWallet {
        self.wallets.get(1).unwrap_or(&self.wallets[0])
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.wallets.iter().map(|wallet| wallet.address())
    }
}

/// Prints the address of every account configured for the network.
pub async fn print_accounts(args: NetworkArgs) -> eyre::Result<()> {
    let config = Config::load(args.config.as_deref()).await?;
    let profile = config.network(&args.network)?;

    let signers = interactive::resolve_signers(&args, profile, true)?;

    for address in signers.addresses() {
        println!("{}", to_checksum(&address, None));
    }

    Ok(())
}
