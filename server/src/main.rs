//! TURN Credentials Server CLI

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turn_credentials_server::{
    build_router, config::Config, credentials::CredentialIssuer, validation, AppState,
};

#[derive(Parser)]
#[command(name = "turn-credentials-server")]
#[command(about = "Issues time-limited TURN credentials for WebRTC clients")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue one set of credentials and print it as JSON
    Issue {
        /// Identity embedded in the TURN username
        #[arg(long)]
        username: String,

        /// Lifetime in seconds (defaults to the configured default_ttl)
        #[arg(long, allow_negative_numbers = true)]
        ttl: Option<i64>,
    },

    /// Run the server
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "turn_credentials_server=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config).await?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Issue { username, ttl } => {
            issue(&config, &username, ttl)?;
        }
        Commands::Run => {
            run_server(config).await?;
        }
    }

    Ok(())
}

fn issue(config: &Config, username: &str, ttl: Option<i64>) -> anyhow::Result<()> {
    let req = validation::validate_request(username, ttl, config.turn.ttl_bounds())?;
    let credentials = CredentialIssuer::new(&config.turn).issue(&req.identity, req.ttl)?;
    println!("{}", serde_json::to_string_pretty(&credentials)?);
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting TURN Credentials API v{}", env!("CARGO_PKG_VERSION"));
    config.log_diagnostics();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(config));

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("TURN Credentials API shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
