use std::time::Duration;

use ethers::providers::{Http, Middleware, Provider};
use eyre::WrapErr;
use reqwest::Url;
use tracing::info;

use crate::types::ChainId;

pub fn http_provider(
    rpc_url: &Url,
    timeout: Option<Duration>,
) -> eyre::Result<Provider<Http>> {
    let mut client = reqwest::Client::builder();

    if let Some(timeout) = timeout {
        client = client.timeout(timeout);
    }

    let client = client.build().wrap_err("Building RPC client")?;

    Ok(Provider::new(Http::new_with_client(rpc_url.clone(), client)))
}

/// Fetches the chain id and checks it against the one the network profile
/// pins, if any.
pub async fn remote_chain_id(
    provider: &Provider<Http>,
    expected: Option<ChainId>,
) -> eyre::Result<ChainId> {
    let chain_id = provider
        .get_chainid()
        .await
        .wrap_err("Fetching chain id")?;

    let chain_id = ChainId(chain_id.as_u64());

    ensure_chain_id(chain_id, expected)?;

    info!(%chain_id, "Connected");

    Ok(chain_id)
}

fn ensure_chain_id(actual: ChainId, expected: Option<ChainId>) -> eyre::Result<()> {
    match expected {
        Some(expected) if expected != actual => eyre::bail!(
            "Network profile expects chain {expected} but the RPC serves chain {actual}"
        ),
        _ => Ok(()),
    }
}
