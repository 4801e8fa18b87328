use clap::Parser;
use proteus::adapters::submission_store::InMemorySubmissionStore;
use proteus::cli::Cli;
use proteus::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!(
        "Starting Proteus form server on {}:{} with {} form(s)",
        host,
        port,
        settings.forms.len()
    );

    let settings = Arc::new(RwLock::new(settings));
    let store = InMemorySubmissionStore::new();
    let app = proteus::create_app(settings, store);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
