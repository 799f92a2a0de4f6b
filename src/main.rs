use anyhow::Result;
use clap::{Parser, Subcommand};
use megaeth_faucet_keeper::blockchain::{parse_address, BlockchainClient, WalletSigner};
use megaeth_faucet_keeper::config::{load_private_keys, FaucetConfig};
use megaeth_faucet_keeper::contracts::faucet_token::token_addresses;
use megaeth_faucet_keeper::logging::{init_tracing, Logger, TracingLogger};
use megaeth_faucet_keeper::{ChainProvider, FaucetOrchestrator, TransactionExecutor, Wallet};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "megaeth-faucet")]
#[command(about = "Mints MegaETH testnet faucet tokens with retries and confirmation tracking")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "configs/megaeth.toml")]
    config: String,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the node and verify the chain id
    CheckNetwork,
    /// Show the native balance of an address, or of every configured wallet
    Balance {
        address: Option<String>,
    },
    /// List the faucet token contracts
    Tokens,
    /// Mint every faucet token to each configured wallet
    Faucet {
        /// Runs per wallet
        #[arg(long, default_value_t = 1)]
        runs: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Tokens => {
            for (label, address) in token_addresses() {
                println!("{:<8} {}", label, address);
            }
            Ok(())
        }
        Commands::CheckNetwork => {
            let config = FaucetConfig::load(&cli.config)?;
            let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
            connect(&config, logger).await?;
            println!("✅ Connected to chain {}", config.chain.chain_id);
            Ok(())
        }
        Commands::Balance { address } => {
            let config = FaucetConfig::load(&cli.config)?;
            let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

            let addresses = match address {
                Some(address) => vec![parse_address(&address)?],
                None => load_wallets(&config)?
                    .iter()
                    .map(|wallet| wallet.address())
                    .collect(),
            };

            let provider = connect(&config, logger).await?;
            for address in addresses {
                let balance = provider.get_balance(address).await?;
                println!("💰 {}: {} ETH", address, balance);
            }
            Ok(())
        }
        Commands::Faucet { runs } => {
            let config = FaucetConfig::load(&cli.config)?;
            let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

            // Keys are validated before anything touches the network.
            let wallets = load_wallets(&config)?;
            let provider = connect(&config, logger.clone()).await?;

            let executor = TransactionExecutor::new(provider, logger.clone());
            let orchestrator = FaucetOrchestrator::new(
                executor,
                logger,
                config.retry_policy(),
                config.chain.explorer_tx_url.clone(),
            );

            let mut succeeded = 0u32;
            let mut attempted = 0u32;
            for wallet in &wallets {
                for _ in 0..runs {
                    attempted += 1;
                    if orchestrator.run(wallet).await {
                        succeeded += 1;
                    }
                }
            }

            println!("🎉 Faucet runs succeeded: {}/{}", succeeded, attempted);
            if succeeded < attempted {
                return Err(anyhow::anyhow!(
                    "{} of {} faucet runs failed",
                    attempted - succeeded,
                    attempted
                ));
            }
            Ok(())
        }
    }
}

async fn connect(config: &FaucetConfig, logger: Arc<dyn Logger>) -> Result<ChainProvider> {
    let client = BlockchainClient::connect(&config.chain.rpc_url)?;
    let provider = ChainProvider::new(Arc::new(client), logger);

    provider
        .initialize(
            config.provider.init_max_retries,
            config.provider.init_retry_delay_seconds,
        )
        .await?;
    provider.check_network().await?;
    Ok(provider)
}

fn load_wallets(config: &FaucetConfig) -> Result<Vec<Wallet>> {
    load_private_keys()?
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let signer = WalletSigner::new(
                &config.chain.rpc_url,
                key,
                config.chain.chain_id,
                config.poll_interval(),
            )
            .map_err(|e| anyhow::anyhow!("wallet #{}: {}", i + 1, e))?;
            Ok(Wallet::new(i + 1, Arc::new(signer)))
        })
        .collect()
}
