use crate::chain_provider::ChainProvider;
use crate::error::{FaucetError, FaucetResult};
use crate::logging::Logger;
use crate::node::TransactionSigner;
use crate::types::{FaucetTxRequest, TransactionOutcome};
use std::sync::Arc;

/// Builds, submits and confirms one transaction.
pub struct TransactionExecutor {
    provider: ChainProvider,
    logger: Arc<dyn Logger>,
}

impl TransactionExecutor {
    pub fn new(provider: ChainProvider, logger: Arc<dyn Logger>) -> Self {
        Self { provider, logger }
    }

    pub fn provider(&self) -> &ChainProvider {
        &self.provider
    }

    /// Runs a single attempt.
    ///
    /// `Ok(None)` means the transaction was mined but reverted; transport
    /// problems come back as `Err`. Exactly one submission happens per call.
    pub async fn execute(
        &self,
        request: FaucetTxRequest,
        signer: &dyn TransactionSigner,
        expected_chain_id: u64,
        explorer_url_prefix: &str,
        context: &str,
    ) -> FaucetResult<Option<TransactionOutcome>> {
        if expected_chain_id != self.provider.expected_chain_id() {
            return Err(FaucetError::NetworkMismatch {
                expected: self.provider.expected_chain_id(),
                actual: expected_chain_id,
            });
        }

        let gas_limit = self.provider.estimate_gas(&request).await?;
        let gas_params = self.provider.resolve_gas_params().await;

        let request = request
            .with_gas_limit(gas_limit)
            .with_gas_params(gas_params)
            .with_chain_id(expected_chain_id);

        let hash = signer.submit(request).await?;
        self.logger
            .info(context, &format!("Transaction sent: {}", hash));

        let outcome = signer.wait_for_receipt(hash).await?;
        if outcome.is_success() {
            self.logger.success(
                context,
                &format!(
                    "Confirmed in block {}: {}{}",
                    outcome.block_number, explorer_url_prefix, outcome.hash
                ),
            );
            Ok(Some(outcome))
        } else {
            self.logger.error(
                context,
                &format!(
                    "Transaction reverted in block {}: {}{}",
                    outcome.block_number, explorer_url_prefix, outcome.hash
                ),
            );
            Ok(None)
        }
    }
}
