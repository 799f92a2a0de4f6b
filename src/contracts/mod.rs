pub mod faucet_token;

pub use faucet_token::{AmountPayload, FaucetToken};
