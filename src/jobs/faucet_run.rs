use crate::contracts::faucet_token::{token_addresses, AmountPayload, FaucetToken};
use crate::error::FaucetError;
use crate::executor::TransactionExecutor;
use crate::logging::Logger;
use crate::node::TransactionSigner;
use crate::retry::{execute_with_retry, RetryPolicy};
use crate::types::FaucetTxRequest;
use alloy::primitives::Address;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// A funded account and the signer that speaks for it.
#[derive(Clone)]
pub struct Wallet {
    pub index: usize,
    pub signer: Arc<dyn TransactionSigner>,
}

impl Wallet {
    pub fn new(index: usize, signer: Arc<dyn TransactionSigner>) -> Self {
        Self { index, signer }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn label(&self) -> String {
        format!("Account {}", self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetOperation {
    pub token: FaucetToken,
    pub payload: AmountPayload,
    pub contract: Address,
}

impl FaucetOperation {
    pub fn new(token: FaucetToken, recipient: Address) -> Self {
        Self {
            token,
            payload: token.payload_for(recipient),
            contract: token.contract_address(),
        }
    }
}

/// The ordered mints for one run. Built fresh and consumed once.
#[derive(Debug, Clone)]
pub struct FaucetRun {
    operations: Vec<FaucetOperation>,
}

impl FaucetRun {
    pub fn new(recipient: Address) -> Self {
        Self {
            operations: FaucetToken::ALL
                .iter()
                .map(|token| FaucetOperation::new(*token, recipient))
                .collect(),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(recipient: Address, rng: &mut R) -> Self {
        let mut run = Self::new(recipient);
        shuffle(&mut run.operations, rng);
        run
    }

    pub fn operations(&self) -> &[FaucetOperation] {
        &self.operations
    }

    pub fn order(&self) -> Vec<FaucetToken> {
        self.operations.iter().map(|op| op.token).collect()
    }

    pub fn into_operations(self) -> Vec<FaucetOperation> {
        self.operations
    }
}

/// In-place Fisher–Yates.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub struct FaucetOrchestrator {
    executor: TransactionExecutor,
    logger: Arc<dyn Logger>,
    policy: RetryPolicy,
    explorer_url_prefix: String,
    rng: Mutex<StdRng>,
}

impl FaucetOrchestrator {
    pub fn new(
        executor: TransactionExecutor,
        logger: Arc<dyn Logger>,
        policy: RetryPolicy,
        explorer_url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            logger,
            policy,
            explorer_url_prefix: explorer_url_prefix.into(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Makes the run ordering reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn tokens(&self) -> Vec<(&'static str, String)> {
        token_addresses()
    }

    fn next_run(&self, recipient: Address) -> FaucetRun {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        FaucetRun::shuffled(recipient, &mut *rng)
    }

    /// Mints every faucet token to `wallet`, one after another.
    ///
    /// Returns `false` as soon as one token exhausts its retries; the tokens
    /// after it in this run's order are not attempted.
    pub async fn run(&self, wallet: &Wallet) -> bool {
        let account = wallet.label();
        let recipient = wallet.address();
        let run = self.next_run(recipient);

        let order: Vec<&str> = run.order().iter().map(|token| token.label()).collect();
        self.logger.info(
            &account,
            &format!("Starting faucet run for {} ({})", recipient, order.join(" → ")),
        );

        let chain_id = self.executor.provider().expected_chain_id();
        let executor = &self.executor;
        let signer = wallet.signer.as_ref();
        let explorer = self.explorer_url_prefix.as_str();

        for operation in run.into_operations() {
            let label = format!("{} {}", account, operation.token);
            let operation = &operation;
            let context = label.as_str();

            self.logger
                .info(&account, &format!("Minting {}...", operation.token));

            let result = execute_with_retry(
                move || async move {
                    let request = FaucetTxRequest::new(
                        recipient,
                        operation.contract,
                        operation.payload.bytes().clone(),
                    );
                    match executor
                        .execute(request, signer, chain_id, explorer, context)
                        .await?
                    {
                        Some(outcome) => Ok::<_, FaucetError>(outcome),
                        None => Err(FaucetError::TransactionFailed {
                            label: operation.token.label().to_string(),
                        }),
                    }
                },
                &self.policy,
                context,
                self.logger.as_ref(),
            )
            .await;

            match result {
                Ok(outcome) => self.logger.success(
                    &account,
                    &format!("{} minted ({})", operation.token, outcome.hash),
                ),
                Err(e) => {
                    self.logger.error(
                        &account,
                        &format!("Faucet run aborted at {}: {}", operation.token, e),
                    );
                    return false;
                }
            }
        }

        self.logger
            .success(&account, "All faucet mints confirmed");
        true
    }
}
