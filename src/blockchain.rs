use crate::error::{FaucetError, FaucetResult};
use crate::node::{NodeRpc, TransactionSigner};
use crate::transaction_monitor::TransactionMonitor;
use crate::types::{FaucetTxRequest, FeeData, TransactionOutcome};
use alloy::network::Ethereum;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Read-only connection to the node, shared by every run.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider<Ethereum>>,
    rpc_url: Url,
}

impl BlockchainClient {
    pub fn connect(rpc_url: &str) -> FaucetResult<Self> {
        let url = parse_rpc_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url.clone());

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url: url,
        })
    }

}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .finish()
    }
}

#[async_trait]
impl NodeRpc for BlockchainClient {
    async fn chain_id(&self) -> FaucetResult<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| FaucetError::transport("failed to fetch chain id", e))
    }

    async fn balance(&self, address: Address) -> FaucetResult<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| FaucetError::transport("failed to fetch balance", e))
    }

    async fn estimate_gas(&self, request: &FaucetTxRequest) -> FaucetResult<u64> {
        self.provider
            .estimate_gas(request.to_alloy())
            .await
            .map_err(|e| FaucetError::transport("eth_estimateGas failed", e))
    }

    async fn fee_data(&self) -> FaucetResult<FeeData> {
        let estimate = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(|e| FaucetError::transport("EIP-1559 fee estimation failed", e))?;
        Ok(FeeData {
            max_fee_per_gas: Some(estimate.max_fee_per_gas),
            max_priority_fee_per_gas: Some(estimate.max_priority_fee_per_gas),
        })
    }
}

/// Local private-key wallet bound to the expected chain.
pub struct WalletSigner {
    address: Address,
    provider: Arc<dyn Provider<Ethereum>>,
    monitor: TransactionMonitor,
}

impl WalletSigner {
    pub fn new(
        rpc_url: &str,
        private_key: &str,
        chain_id: u64,
        poll_interval: Duration,
    ) -> FaucetResult<Self> {
        validate_private_key(private_key)?;
        let url = parse_rpc_url(rpc_url)?;

        let signer = PrivateKeySigner::from_str(private_key.trim())
            .map_err(|e| FaucetError::Validation(format!("invalid private key: {e}")))?
            .with_chain_id(Some(chain_id));
        let address = signer.address();

        let provider: Arc<dyn Provider<Ethereum>> =
            Arc::new(ProviderBuilder::new().wallet(signer).connect_http(url));

        Ok(Self {
            address,
            monitor: TransactionMonitor::new(provider.clone(), poll_interval),
            provider,
        })
    }
}

impl std::fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TransactionSigner for WalletSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit(&self, request: FaucetTxRequest) -> FaucetResult<B256> {
        let pending = self
            .provider
            .send_transaction(request.to_alloy())
            .await
            .map_err(|e| FaucetError::transport("failed to submit transaction", e))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: B256) -> FaucetResult<TransactionOutcome> {
        self.monitor
            .monitor_transaction(hash)
            .await
            .map_err(|e| FaucetError::Transport(e.to_string()))
    }
}

/// Accepts 32 bytes of hex with an optional `0x` prefix. Nothing else is inspected.
pub fn validate_private_key(private_key: &str) -> FaucetResult<()> {
    let key = private_key.trim();
    let digits = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);

    if digits.len() != 64 {
        return Err(FaucetError::Validation(format!(
            "private key must be 64 hex characters, got {}",
            digits.len()
        )));
    }

    hex::decode(digits)
        .map(|_| ())
        .map_err(|e| FaucetError::Validation(format!("private key is not valid hex: {e}")))
}

pub fn parse_address(addr: &str) -> FaucetResult<Address> {
    Address::from_str(addr.trim())
        .map_err(|e| FaucetError::Validation(format!("invalid address {addr}: {e}")))
}

fn parse_rpc_url(rpc_url: &str) -> FaucetResult<Url> {
    Url::parse(rpc_url)
        .map_err(|e| FaucetError::Validation(format!("invalid RPC URL '{rpc_url}': {e}")))
}
