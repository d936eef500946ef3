use clap::{Parser, Subcommand};
use serde::Serialize;

use zombie_runner::config::{apply_env_overrides, RunnerConfig};
use zombie_runner::{NodeRpc, RpcClient};

#[derive(Parser)]
#[command(name = "zombie-cli")]
#[command(about = "Inspect a running ZOMBIE test node", long_about = None)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// RPC port. Falls back to COIN_RPC_PORT, then 7000.
    #[arg(short, long)]
    port: Option<u16>,

    #[arg(short, long, default_value = "test")]
    user: String,

    #[arg(long, default_value = "test")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Block height, peers and version (getinfo)
    Status,
    /// Transparent wallet balance
    Balance,
    /// Validate a shielded address
    Validate { address: String },
    /// Shield all transparent coinbase funds into ADDRESS
    Shield { address: String },
    /// Stop the node
    Stop,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = RunnerConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.rpc.host = cli.host;
    config.rpc.user = cli.user;
    config.rpc.password = cli.password;
    if let Some(port) = cli.port {
        config.rpc.port = port;
    }

    let client = RpcClient::new(&config.rpc)?;

    match cli.command {
        Commands::Status => print_json(&client.get_info().await?)?,
        Commands::Balance => print_json(&client.get_balance().await?)?,
        Commands::Validate { address } => print_json(&client.z_validate_address(&address).await?)?,
        Commands::Shield { address } => {
            print_json(&client.z_shield_coinbase("*", &address).await?)?
        }
        Commands::Stop => print_json(&client.stop().await?)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
