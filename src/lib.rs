pub mod blockchain;
pub mod chain_provider;
pub mod config;
pub mod contracts;
pub mod error;
pub mod executor;
pub mod jobs;
pub mod logging;
pub mod node;
pub mod retry;
pub mod transaction_monitor;
pub mod types;

pub use blockchain::{BlockchainClient, WalletSigner};
pub use chain_provider::{ChainProvider, EXPECTED_CHAIN_ID};
pub use config::FaucetConfig;
pub use contracts::{AmountPayload, FaucetToken};
pub use error::{FaucetError, FaucetResult};
pub use executor::TransactionExecutor;
pub use jobs::{FaucetOrchestrator, FaucetRun, Wallet};
pub use logging::{Logger, MemoryLogger, TracingLogger};
pub use node::{NodeRpc, TransactionSigner};
pub use retry::{execute_with_retry, RetryPolicy};
pub use transaction_monitor::TransactionMonitor;
pub use types::{FaucetTxRequest, FeeData, GasParams, TransactionOutcome, TransactionStatus};
