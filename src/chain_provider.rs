use crate::error::{FaucetError, FaucetResult};
use crate::logging::Logger;
use crate::node::NodeRpc;
use crate::retry::{execute_with_retry, RetryPolicy};
use crate::types::{FaucetTxRequest, GasParams};
use alloy::primitives::utils::format_ether;
use alloy::primitives::Address;
use anyhow::Result;
use std::sync::Arc;

/// MegaETH testnet.
pub const EXPECTED_CHAIN_ID: u64 = 6342;
/// 20 gwei, used whenever the node gives no usable EIP-1559 data.
pub const FALLBACK_GAS_PRICE_WEI: u128 = 20_000_000_000;
pub const INIT_MAX_RETRIES: u32 = 3;
pub const INIT_RETRY_DELAY_SECS: u64 = 5;

const CONTEXT: &str = "provider";

/// Single point of contact with the remote node.
#[derive(Clone)]
pub struct ChainProvider {
    node: Arc<dyn NodeRpc>,
    logger: Arc<dyn Logger>,
    expected_chain_id: u64,
}

impl ChainProvider {
    pub fn new(node: Arc<dyn NodeRpc>, logger: Arc<dyn Logger>) -> Self {
        Self::with_chain_id(node, logger, EXPECTED_CHAIN_ID)
    }

    pub fn with_chain_id(
        node: Arc<dyn NodeRpc>,
        logger: Arc<dyn Logger>,
        expected_chain_id: u64,
    ) -> Self {
        Self {
            node,
            logger,
            expected_chain_id,
        }
    }

    pub fn expected_chain_id(&self) -> u64 {
        self.expected_chain_id
    }

    /// Polls the node's network id with a fixed delay until it answers.
    /// Returns the id the node reported; does not compare it.
    pub async fn initialize(&self, max_retries: u32, retry_delay_secs: u64) -> Result<u64> {
        let policy = RetryPolicy::fixed(max_retries, retry_delay_secs);
        let chain_id = execute_with_retry(
            || self.node.chain_id(),
            &policy,
            "Provider initialization",
            self.logger.as_ref(),
        )
        .await?;

        self.logger.success(
            CONTEXT,
            &format!("Connected to node (chain id {})", chain_id),
        );
        Ok(chain_id)
    }

    pub async fn check_network(&self) -> FaucetResult<()> {
        let actual = self.node.chain_id().await?;
        if actual != self.expected_chain_id {
            let err = FaucetError::NetworkMismatch {
                expected: self.expected_chain_id,
                actual,
            };
            self.logger.error(CONTEXT, &err.to_string());
            return Err(err);
        }

        self.logger
            .info(CONTEXT, &format!("Network verified: chain id {}", actual));
        Ok(())
    }

    /// Native balance of `address` in ether, as a decimal string.
    pub async fn get_balance(&self, address: Address) -> FaucetResult<String> {
        let raw = self.node.balance(address).await.map_err(|e| {
            FaucetError::transport(&format!("failed to get balance of {}", address), e)
        })?;
        Ok(format_ether(raw))
    }

    pub async fn estimate_gas(&self, request: &FaucetTxRequest) -> FaucetResult<u64> {
        self.node
            .estimate_gas(request)
            .await
            .map_err(|e| FaucetError::transport("gas estimation failed", e))
    }

    /// Never fails: anything short of a complete EIP-1559 pair yields the legacy fallback.
    pub async fn resolve_gas_params(&self) -> GasParams {
        match self.node.fee_data().await {
            Ok(fee_data) => match (
                fee_data.max_fee_per_gas,
                fee_data.max_priority_fee_per_gas,
            ) {
                (Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) => GasParams::Eip1559 {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                },
                _ => {
                    self.logger.warn(
                        CONTEXT,
                        "Node returned no EIP-1559 fee data, using legacy gas price of 20 gwei",
                    );
                    Self::fallback_gas_params()
                }
            },
            Err(e) => {
                self.logger.warn(
                    CONTEXT,
                    &format!("Fee data unavailable ({}), using legacy gas price of 20 gwei", e),
                );
                Self::fallback_gas_params()
            }
        }
    }

    fn fallback_gas_params() -> GasParams {
        GasParams::Legacy {
            gas_price: FALLBACK_GAS_PRICE_WEI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger};
    use crate::types::FeeData;
    use alloy::primitives::{Bytes, U256};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct StubNode {
        chain_id: u64,
        chain_id_failures: AtomicU32,
        balance: FaucetResult<U256>,
        gas: Mutex<Option<FaucetResult<u64>>>,
        fee_data: Mutex<Option<FaucetResult<FeeData>>>,
    }

    impl StubNode {
        fn new(chain_id: u64) -> Self {
            Self {
                chain_id,
                chain_id_failures: AtomicU32::new(0),
                balance: Ok(U256::ZERO),
                gas: Mutex::new(None),
                fee_data: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl NodeRpc for StubNode {
        async fn chain_id(&self) -> FaucetResult<u64> {
            let remaining = self.chain_id_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.chain_id_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(FaucetError::Transport("connection refused".into()));
            }
            Ok(self.chain_id)
        }

        async fn balance(&self, _address: Address) -> FaucetResult<U256> {
            match &self.balance {
                Ok(v) => Ok(*v),
                Err(e) => Err(FaucetError::Transport(e.to_string())),
            }
        }

        async fn estimate_gas(&self, _request: &FaucetTxRequest) -> FaucetResult<u64> {
            self.gas.lock().unwrap().take().unwrap_or(Ok(21_000))
        }

        async fn fee_data(&self) -> FaucetResult<FeeData> {
            self.fee_data
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(FeeData::default()))
        }
    }

    fn build_provider(node: StubNode) -> (ChainProvider, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        (ChainProvider::new(Arc::new(node), logger.clone()), logger)
    }

    #[tokio::test]
    async fn test_check_network_accepts_expected_id() {
        let (provider, logger) = build_provider(StubNode::new(EXPECTED_CHAIN_ID));
        provider.check_network().await.unwrap();
        assert_eq!(logger.at_level(LogLevel::Info).len(), 1);
    }

    #[tokio::test]
    async fn test_check_network_rejects_other_ids() {
        for actual in [1u64, 6341, 6343, 31337] {
            let (provider, _) = build_provider(StubNode::new(actual));
            match provider.check_network().await {
                Err(FaucetError::NetworkMismatch { expected, actual: got }) => {
                    assert_eq!(expected, 6342);
                    assert_eq!(got, actual);
                }
                other => panic!("expected mismatch, got {:?}", other),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_retries_with_fixed_delay() {
        let node = StubNode::new(EXPECTED_CHAIN_ID);
        node.chain_id_failures.store(2, Ordering::SeqCst);
        let (provider, logger) = build_provider(node);

        let started = tokio::time::Instant::now();
        let chain_id = provider.initialize(3, 5).await.unwrap();

        assert_eq!(chain_id, EXPECTED_CHAIN_ID);
        assert_eq!(started.elapsed().as_secs(), 10);
        assert_eq!(logger.at_level(LogLevel::Warn).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_fails_when_node_unreachable() {
        let node = StubNode::new(EXPECTED_CHAIN_ID);
        node.chain_id_failures.store(10, Ordering::SeqCst);
        let (provider, logger) = build_provider(node);

        let err = provider
            .initialize(INIT_MAX_RETRIES, INIT_RETRY_DELAY_SECS)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(logger.at_level(LogLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_get_balance_formats_ether() {
        let mut node = StubNode::new(EXPECTED_CHAIN_ID);
        node.balance = Ok(U256::from(1_500_000_000_000_000_000u128));
        let (provider, _) = build_provider(node);

        let balance = provider.get_balance(Address::ZERO).await.unwrap();
        assert!(balance.starts_with("1.5"), "{balance}");
        assert!(balance.trim_end_matches('0').ends_with("1.5"));
    }

    #[tokio::test]
    async fn test_get_balance_wraps_transport_error() {
        let mut node = StubNode::new(EXPECTED_CHAIN_ID);
        node.balance = Err(FaucetError::Transport("timeout".into()));
        let (provider, _) = build_provider(node);

        let err = provider.get_balance(Address::ZERO).await.unwrap_err();
        assert!(matches!(err, FaucetError::Transport(ref m) if m.contains("timeout")));
    }

    #[tokio::test]
    async fn test_estimate_gas_wraps_revert() {
        let node = StubNode::new(EXPECTED_CHAIN_ID);
        *node.gas.lock().unwrap() = Some(Err(FaucetError::Transport("execution reverted".into())));
        let (provider, _) = build_provider(node);

        let request = FaucetTxRequest::new(Address::ZERO, Address::ZERO, Bytes::new());
        let err = provider.estimate_gas(&request).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("gas estimation failed"));
        assert!(message.contains("execution reverted"));
    }

    #[tokio::test]
    async fn test_resolve_gas_params_prefers_eip1559() {
        let node = StubNode::new(EXPECTED_CHAIN_ID);
        *node.fee_data.lock().unwrap() = Some(Ok(FeeData {
            max_fee_per_gas: Some(2_500_000_000),
            max_priority_fee_per_gas: Some(1_000_000),
        }));
        let (provider, logger) = build_provider(node);

        assert_eq!(
            provider.resolve_gas_params().await,
            GasParams::Eip1559 {
                max_fee_per_gas: 2_500_000_000,
                max_priority_fee_per_gas: 1_000_000,
            }
        );
        assert!(logger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_gas_params_falls_back_on_partial_data() {
        let node = StubNode::new(EXPECTED_CHAIN_ID);
        *node.fee_data.lock().unwrap() = Some(Ok(FeeData {
            max_fee_per_gas: Some(2_500_000_000),
            max_priority_fee_per_gas: None,
        }));
        let (provider, logger) = build_provider(node);

        assert_eq!(
            provider.resolve_gas_params().await,
            GasParams::Legacy {
                gas_price: FALLBACK_GAS_PRICE_WEI
            }
        );
        assert_eq!(logger.at_level(LogLevel::Warn).len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_gas_params_falls_back_on_query_failure() {
        let node = StubNode::new(EXPECTED_CHAIN_ID);
        *node.fee_data.lock().unwrap() = Some(Err(FaucetError::Transport("503".into())));
        let (provider, logger) = build_provider(node);

        assert_eq!(
            provider.resolve_gas_params().await,
            GasParams::Legacy {
                gas_price: 20_000_000_000
            }
        );
        let warnings = logger.at_level(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("503"));
    }
}
