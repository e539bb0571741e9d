//! Ground truth server binary
//!
//! Run with: cargo run -p ground-truth --bin ground-truth-server

use clap::Parser;
use ground_truth::{config::AppConfig, server::GroundTruthServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ground-truth-server", version, about = "Ground truth Q&A curation backend")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "GROUND_TRUTH_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides configuration and HOST
    #[arg(long)]
    host: Option<String>,

    /// Port, overrides configuration and PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ground_truth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Ground Truth Curator                   ║
║         Question/Answer Collection and Review API         ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Database provider: {}", config.providers.database);
    tracing::info!("  - Auth provider: {}", config.providers.auth);
    tracing::info!("  - Generation provider: {}", config.providers.generation);
    tracing::info!("  - Data sources: {}", config.providers.data_sources.join(", "));
    tracing::info!("  - CORS origins: {}", config.server.cors_origins.len());

    // Create and start server
    let server = GroundTruthServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/auth/login          - Get an access token");
    println!("  GET  /api/collections         - List collections");
    println!("  POST /api/retrieval/search    - Search documents");
    println!("  POST /api/generation/generate - Generate an answer");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
