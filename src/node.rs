use crate::error::FaucetResult;
use crate::types::{FaucetTxRequest, FeeData, TransactionOutcome};
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

/// Read side of the remote node.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn chain_id(&self) -> FaucetResult<u64>;

    async fn balance(&self, address: Address) -> FaucetResult<U256>;

    async fn estimate_gas(&self, request: &FaucetTxRequest) -> FaucetResult<u64>;

    async fn fee_data(&self) -> FaucetResult<FeeData>;
}

/// Holds the key material and pushes transactions through the node.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Signs and broadcasts `request`, returning the transaction hash.
    async fn submit(&self, request: FaucetTxRequest) -> FaucetResult<B256>;

    /// Waits until `hash` is included. No timeout.
    async fn wait_for_receipt(&self, hash: B256) -> FaucetResult<TransactionOutcome>;
}
