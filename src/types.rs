use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::rpc::types::{TransactionInput, TransactionRequest};

/// Fee fields attached to an outgoing transaction, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasParams {
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
    Legacy {
        gas_price: u128,
    },
}

/// Raw fee data as reported by the node. Any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// A zero-value contract call. Rebuilt for every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetTxRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub gas_limit: Option<u64>,
    pub gas_params: Option<GasParams>,
    pub chain_id: Option<u64>,
}

impl FaucetTxRequest {
    pub fn new(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from,
            to,
            data,
            gas_limit: None,
            gas_params: None,
            chain_id: None,
        }
    }

    pub fn value(&self) -> U256 {
        U256::ZERO
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_gas_params(mut self, gas_params: GasParams) -> Self {
        self.gas_params = Some(gas_params);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn to_alloy(&self) -> TransactionRequest {
        let mut tx = TransactionRequest {
            from: Some(self.from),
            to: Some(TxKind::Call(self.to)),
            input: TransactionInput::new(self.data.clone()),
            value: Some(self.value()),
            gas: self.gas_limit,
            chain_id: self.chain_id,
            ..Default::default()
        };

        match self.gas_params {
            Some(GasParams::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            }) => {
                tx.max_fee_per_gas = Some(max_fee_per_gas);
                tx.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
            }
            Some(GasParams::Legacy { gas_price }) => {
                tx.gas_price = Some(gas_price);
            }
            None => {}
        }

        tx
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub hash: B256,
    pub block_number: u64,
    pub gas_used: u64,
    pub status: TransactionStatus,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }
}
