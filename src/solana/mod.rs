pub mod custody;
pub mod jupiter;
pub mod ledger;

use anyhow::{anyhow, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use std::str::FromStr;
use std::sync::Arc;

pub use custody::{PgWalletStore, WalletStore};
pub use ledger::{Ledger, RpcLedger, TxStatus};

/// Create a Solana RPC client with confirmed commitment
pub fn create_solana_client(rpc_url: &str) -> Result<Arc<RpcClient>> {
    let client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

    Ok(Arc::new(client))
}

/// Restore a Keypair from a base58 string (64 bytes).
pub fn keypair_from_base58(keypair_base58: &str) -> Result<Keypair> {
    let keypair_bytes = bs58::decode(keypair_base58)
        .into_vec()
        .map_err(|e| anyhow!("Failed to decode base58 keypair: {}", e))?;

    if keypair_bytes.len() != 64 {
        return Err(anyhow!("Invalid keypair length: {}", keypair_bytes.len()));
    }

    let keypair = Keypair::from_bytes(&keypair_bytes)
        .map_err(|e| anyhow!("Failed to create keypair from bytes: {}", e))?;

    Ok(keypair)
}

/// Convert a base58 string to a Solana `Pubkey`.
pub fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address).map_err(|e| anyhow!("Invalid Solana address: {}", e))
}
