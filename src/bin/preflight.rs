use anyhow::Context;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use loyalty_token_service::infra::config;
use loyalty_token_service::solana::RpcLedger;
use loyalty_token_service::CustodialWallet;

/// Below this the deploy transaction (mint rent + fees) is likely to fail.
const LOW_BALANCE_LAMPORTS: u64 = 10_000_000;
const AIRDROP_POLLS: usize = 60;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--airdrop <lamports>]\n\
         \n\
         Reads env vars (all optional):\n\
           SOLANA_RPC_URL, SOLANA_COMMITMENT, WALLET_PATH, BIND_ADDR\n\
         Creates the custodial wallet file if it does not exist yet.\n"
    );
    std::process::exit(2);
}

fn parse_airdrop(args: &[String]) -> anyhow::Result<Option<u64>> {
    match args.iter().position(|a| a == "--airdrop") {
        None => Ok(None),
        Some(i) => {
            let raw = args.get(i + 1).context("--airdrop needs a lamport amount")?;
            let lamports = raw
                .parse::<u64>()
                .with_context(|| format!("--airdrop amount '{}' is not a valid u64", raw))?;
            Ok(Some(lamports))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let airdrop = parse_airdrop(&args)?;

    let rpc_url = config::solana_rpc_url();
    let wallet_path = config::wallet_path();
    println!("> Preflight:");
    println!("  SOLANA_RPC_URL={}", rpc_url);
    println!("  SOLANA_COMMITMENT={:?}", config::commitment().commitment);
    println!("  WALLET_PATH={}", wallet_path);
    println!("  BIND_ADDR={}", config::bind_addr());

    let wallet = CustodialWallet::load_or_create(&wallet_path)?;
    println!(
        "  Custodial wallet: {} ({})",
        wallet.pubkey(),
        if wallet.created() { "generated" } else { "loaded" }
    );

    let ledger = RpcLedger::new(rpc_url, config::commitment());
    let client = ledger.client();

    // Basic RPC connectivity
    let version = client.get_version().await.context("RPC unreachable")?;
    println!("  RPC version: {}", version.solana_core);

    if let Some(lamports) = airdrop {
        println!("  Requesting airdrop of {} lamports...", lamports);
        let signature = client
            .request_airdrop(&wallet.pubkey(), lamports)
            .await
            .context("airdrop request failed")?;
        let mut confirmed = false;
        for _ in 0..AIRDROP_POLLS {
            if client.confirm_transaction(&signature).await? {
                confirmed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        if !confirmed {
            anyhow::bail!("airdrop {} was not confirmed in time", signature);
        }
        println!("  Airdrop confirmed: {}", signature);
    }

    let balance_lamports = client.get_balance(&wallet.pubkey()).await?;
    let sol = balance_lamports as f64 / LAMPORTS_PER_SOL as f64;
    println!("  Wallet balance: {} lamports (~{:.6} SOL)", balance_lamports, sol);
    if balance_lamports < LOW_BALANCE_LAMPORTS {
        eprintln!("  Warning: wallet balance looks low; deploy and mint transactions may fail.");
    }

    // Token-2022 program must exist on the cluster.
    let program_id = spl_token_2022::id();
    let program = client
        .get_account(&program_id)
        .await
        .with_context(|| format!("Token-2022 program {} not found on cluster", program_id))?;
    if !program.executable {
        eprintln!("  Warning: Token-2022 account exists but is not marked executable.");
    } else {
        println!("  Token-2022 program is deployed + executable.");
    }

    println!("> Preflight OK.");
    Ok(())
}
