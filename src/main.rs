use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chat_relay::connector::api::{http, Container, ContainerConfig, Router};
use chat_relay::connector::{BedrockConfig, DEFAULT_REGION, DEFAULT_TIMEOUT_SECS};
use chat_relay::domain::DEFAULT_PROFILE;
use chat_relay::Commands;

#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model profile used for every invocation
    #[arg(long, global = true, env = "CHAT_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// JSON file with extra or overriding model profiles
    #[arg(long, global = true, env = "CHAT_PROFILES_FILE")]
    profiles_file: Option<PathBuf>,

    #[arg(long, global = true, env = "BEDROCK_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Override the Bedrock runtime endpoint
    #[arg(long, global = true, env = "BEDROCK_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Answer from a canned in-process completion instead of calling Bedrock
    #[arg(long, global = true)]
    mock_inference: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ContainerConfig {
        profile: cli.profile,
        profiles_file: cli.profiles_file,
        bedrock: BedrockConfig {
            region: cli.region,
            endpoint: cli.endpoint,
            timeout: Duration::from_secs(cli.timeout_secs),
            ..BedrockConfig::from_env()
        },
        mock_inference: cli.mock_inference,
    };
    let container = Arc::new(Container::new(config)?);

    if let Commands::Serve { port, public } = cli.command {
        let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
        let addr = SocketAddr::from((host, port));
        return http::serve(container, addr).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
