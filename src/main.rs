//! primevue-mcp - serve PrimeVue component metadata and design tokens over HTTP

use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;

use primevue_mcp::config::{ServerConfig, DEFAULT_DATA_PATH, DEFAULT_HOST};
use primevue_mcp::server::start_server;

/// PrimeVue MCP - read-only query API over a component and token dataset
#[derive(FromArgs)]
struct Args {
    /// path to the combined JSON dataset (default: data/combined.json)
    #[argh(option, short = 'd', default = "PathBuf::from(DEFAULT_DATA_PATH)")]
    data: PathBuf,

    /// port to listen on (default: $PORT, then 3000)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// address to bind (default: 0.0.0.0)
    #[argh(option, default = "DEFAULT_HOST.to_string()")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Args = argh::from_env();
    let port = ServerConfig::resolve_port(args.port, std::env::var("PORT").ok().as_deref())?;

    let config = ServerConfig {
        host: args.host,
        port,
        data_path: args.data,
    };

    start_server(config).await
}
