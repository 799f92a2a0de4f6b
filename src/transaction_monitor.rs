use crate::types::{TransactionOutcome, TransactionStatus};
use alloy::network::Ethereum;
use alloy::primitives::B256;
use alloy::providers::Provider;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Polls the node for a receipt until the transaction is included.
///
/// No deadline. Gives up only after `max_consecutive_errors` failed polls in a row.
pub struct TransactionMonitor {
    provider: Arc<dyn Provider<Ethereum>>,
    poll_interval: Duration,
    max_consecutive_errors: u32,
}

impl TransactionMonitor {
    pub fn new(provider: Arc<dyn Provider<Ethereum>>, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
            max_consecutive_errors: 5,
        }
    }

    pub async fn monitor_transaction(&self, tx_hash: B256) -> Result<TransactionOutcome> {
        tracing::debug!(%tx_hash, "Monitoring transaction");

        let mut consecutive_errors = 0;

        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    let status = if receipt.status() {
                        TransactionStatus::Success
                    } else {
                        TransactionStatus::Reverted
                    };

                    tracing::debug!(%tx_hash, ?status, "Transaction confirmed");

                    return Ok(TransactionOutcome {
                        hash: tx_hash,
                        block_number: receipt.block_number.unwrap_or(0),
                        gas_used: receipt.gas_used,
                        status,
                    });
                }
                Ok(None) => {
                    consecutive_errors = 0;
                    tracing::trace!(%tx_hash, "Transaction pending, waiting...");
                }
                Err(e) => {
                    consecutive_errors += 1;
                    tracing::warn!(%tx_hash, error = %e, "Error checking transaction status");
                    if consecutive_errors >= self.max_consecutive_errors {
                        return Err(anyhow::anyhow!(
                            "receipt polling for {} failed {} times in a row: {}",
                            tx_hash,
                            consecutive_errors,
                            e
                        ));
                    }
                }
            }

            sleep(self.poll_interval).await;
        }
    }
}
