//! Scripted stand-ins for the node and the signer.

#![allow(dead_code)]

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use megaeth_faucet_keeper::logging::{LogLevel, MemoryLogger};
use megaeth_faucet_keeper::{
    ChainProvider, FaucetError, FaucetOrchestrator, FaucetResult, FaucetTxRequest, FeeData,
    NodeRpc, RetryPolicy, TransactionExecutor, TransactionOutcome, TransactionSigner,
    TransactionStatus, EXPECTED_CHAIN_ID,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const EXPLORER: &str = "https://explorer.test/tx/";

pub struct MockNode {
    pub chain_id: u64,
    pub fee_data: Option<FeeData>,
    /// Remaining estimate failures per contract.
    estimate_failures: Mutex<HashMap<Address, u32>>,
    pub estimate_calls: Mutex<Vec<Address>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            chain_id: EXPECTED_CHAIN_ID,
            fee_data: Some(FeeData {
                max_fee_per_gas: Some(2_000_000_000),
                max_priority_fee_per_gas: Some(1_000_000),
            }),
            estimate_failures: Mutex::new(HashMap::new()),
            estimate_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn failing_estimates(self, contract: Address, times: u32) -> Self {
        self.estimate_failures.lock().unwrap().insert(contract, times);
        self
    }
}

#[async_trait]
impl NodeRpc for MockNode {
    async fn chain_id(&self) -> FaucetResult<u64> {
        Ok(self.chain_id)
    }

    async fn balance(&self, _address: Address) -> FaucetResult<U256> {
        Ok(U256::from(10u64).pow(U256::from(18u64)))
    }

    async fn estimate_gas(&self, request: &FaucetTxRequest) -> FaucetResult<u64> {
        self.estimate_calls.lock().unwrap().push(request.to);
        let mut failures = self.estimate_failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(&request.to) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(FaucetError::Transport("execution reverted".to_string()));
            }
        }
        Ok(65_000)
    }

    async fn fee_data(&self) -> FaucetResult<FeeData> {
        self.fee_data
            .ok_or_else(|| FaucetError::Transport("eth_feeHistory unsupported".to_string()))
    }
}

pub struct MockSigner {
    address: Address,
    reverting: HashSet<Address>,
    submit_failures: Mutex<HashMap<Address, u32>>,
    pub submitted: Mutex<Vec<FaucetTxRequest>>,
    hashes: Mutex<HashMap<B256, Address>>,
    next_hash: AtomicU64,
}

impl MockSigner {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            reverting: HashSet::new(),
            submit_failures: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            hashes: Mutex::new(HashMap::new()),
            next_hash: AtomicU64::new(1),
        }
    }

    /// Every mint against `contract` is mined but reverts.
    pub fn reverting(mut self, contract: Address) -> Self {
        self.reverting.insert(contract);
        self
    }

    pub fn failing_submits(self, contract: Address, times: u32) -> Self {
        self.submit_failures.lock().unwrap().insert(contract, times);
        self
    }

    pub fn submitted_contracts(&self) -> Vec<Address> {
        self.submitted.lock().unwrap().iter().map(|tx| tx.to).collect()
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit(&self, request: FaucetTxRequest) -> FaucetResult<B256> {
        {
            let mut failures = self.submit_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&request.to) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FaucetError::Transport("nonce too low".to_string()));
                }
            }
        }

        let hash = B256::from(U256::from(self.next_hash.fetch_add(1, Ordering::SeqCst)));
        self.hashes.lock().unwrap().insert(hash, request.to);
        self.submitted.lock().unwrap().push(request);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> FaucetResult<TransactionOutcome> {
        let contract = self
            .hashes
            .lock()
            .unwrap()
            .get(&hash)
            .copied()
            .ok_or_else(|| FaucetError::Transport(format!("unknown transaction {hash}")))?;

        let status = if self.reverting.contains(&contract) {
            TransactionStatus::Reverted
        } else {
            TransactionStatus::Success
        };

        Ok(TransactionOutcome {
            hash,
            block_number: 1_000 + hash.as_slice()[31] as u64,
            gas_used: 48_000,
            status,
        })
    }
}

pub fn orchestrator(node: MockNode, logger: Arc<MemoryLogger>, seed: u64) -> FaucetOrchestrator {
    let provider = ChainProvider::new(Arc::new(node), logger.clone());
    let executor = TransactionExecutor::new(provider, logger.clone());
    FaucetOrchestrator::new(executor, logger, RetryPolicy::new(3, 5..=10), EXPLORER)
        .with_rng_seed(seed)
}

/// Explorer links reported for confirmed transactions.
pub fn explorer_links(logger: &MemoryLogger) -> Vec<String> {
    logger
        .at_level(LogLevel::Success)
        .into_iter()
        .filter_map(|entry| {
            entry
                .message
                .find(EXPLORER)
                .map(|start| entry.message[start..].to_string())
        })
        .collect()
}
