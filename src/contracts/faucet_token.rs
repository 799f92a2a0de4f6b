use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    interface IFaucetToken {
        function mint(address to, uint256 amount) external;
    }
}

/// The four test tokens minted in every faucet run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaucetToken {
    TkEth,
    TkUsdc,
    TkWbtc,
    CUsd,
}

impl FaucetToken {
    pub const ALL: [FaucetToken; 4] = [
        FaucetToken::TkEth,
        FaucetToken::TkUsdc,
        FaucetToken::TkWbtc,
        FaucetToken::CUsd,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FaucetToken::TkEth => "tkETH",
            FaucetToken::TkUsdc => "tkUSDC",
            FaucetToken::TkWbtc => "tkWBTC",
            FaucetToken::CUsd => "cUSD",
        }
    }

    pub fn contract_address(self) -> Address {
        match self {
            FaucetToken::TkEth => address!("0x176735870dc6C22B4EBFBf519DE2ce758de78d94"),
            FaucetToken::TkUsdc => address!("0xFaf334e157175Ff676911AdcF0964D7f54F2C424"),
            FaucetToken::TkWbtc => address!("0xF82ff0799448630eB56Ce747Db840a2E02Cde4D8"),
            FaucetToken::CUsd => address!("0xE9b6e75C243B6100ffcb1c66e8f78F96FeeA727F"),
        }
    }

    /// Raw units minted per call. Protocol constants, never user input.
    pub fn mint_amount(self) -> U256 {
        match self {
            // 1 tkETH, 18 decimals
            FaucetToken::TkEth => U256::from(1_000_000_000_000_000_000u128),
            // 2000 tkUSDC, 6 decimals
            FaucetToken::TkUsdc => U256::from(2_000_000_000u64),
            // 0.02 tkWBTC, 8 decimals
            FaucetToken::TkWbtc => U256::from(2_000_000u64),
            // 1000 cUSD, 18 decimals
            FaucetToken::CUsd => U256::from(1_000_000_000_000_000_000_000u128),
        }
    }

    pub fn payload_for(self, recipient: Address) -> AmountPayload {
        AmountPayload::mint(recipient, self.mint_amount())
    }
}

impl std::fmt::Display for FaucetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label → checksummed contract address, for display.
pub fn token_addresses() -> Vec<(&'static str, String)> {
    FaucetToken::ALL
        .iter()
        .map(|token| (token.label(), token.contract_address().to_checksum(None)))
        .collect()
}

/// ABI-encoded `mint(address,uint256)` call data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountPayload(Bytes);

impl AmountPayload {
    pub fn mint(recipient: Address, amount: U256) -> Self {
        let call = IFaucetToken::mintCall {
            to: recipient,
            amount,
        };
        Self(call.abi_encode().into())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.0
    }
}
