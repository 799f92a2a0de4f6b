pub mod faucet_run;

pub use faucet_run::{shuffle, FaucetOperation, FaucetOrchestrator, FaucetRun, Wallet};
