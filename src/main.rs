//! doclist-rs: the "My Documents" listing service
//!
//! This is the main entry point for the application.

use anyhow::Result;
use doclist::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "-V" | "--version" => {
                println!("doclist-rs {}", doclist::VERSION);
                return Ok(());
            }
            _ => {
                print_usage();
                return Ok(());
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting doclist-rs v{}", doclist::VERSION);
    let settings = config::load()?;
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let state = AppState::new(settings.clone(), client);
    let app = create_router(state);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
doclist-rs v{}
Combined published and draft document listing service

USAGE:
    doclist-rs [OPTIONS]

OPTIONS:
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    DOCLIST_SETTINGS_PATH  Path to settings.yml
    DOCLIST_DEBUG          Include upstream error details in responses
    DOCLIST_PORT           Server port
    DOCLIST_BIND_ADDRESS   Bind address
    DOCLIST_SEARCH_APP_ID  Search application ID
    DOCLIST_SEARCH_API_KEY Search API key
    DOCLIST_DOCS_INDEX     Base name of the documents index
    DOCLIST_DRAFTS_URL     Base URL of the drafts API
    RUST_LOG               Log filter (default: info)
"#,
        doclist::VERSION
    );
}
