//! zana-api - book data aggregation service
//!
//! Serves `GET /books?type=<provider>&isbn=<isbn>` for the Zana content script.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use zana::{googlebooks, openlibrary};
use zana_api::config::{CliOverrides, ServiceConfig, TomlConfig};
use zana_api::{build_router, AppState, BookService};
use zana_common::config::{default_config_path, load_toml_config};
use zana_common::logging::init_tracing;

/// Command-line arguments for zana-api
#[derive(Parser, Debug)]
#[command(name = "zana-api")]
#[command(about = "Book data aggregation service for Zana")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/zana/zana-api.toml)
    #[arg(short, long, env = "ZANA_API_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Google Books API key
    #[arg(long)]
    googlebooks_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("zana-api"));
    let toml_config: TomlConfig =
        load_toml_config(config_path.as_deref()).context("Failed to load config file")?;

    init_tracing(&toml_config.logging);
    info!("Starting zana-api v{}", env!("CARGO_PKG_VERSION"));

    let overrides = CliOverrides {
        host: args.host,
        port: args.port,
        googlebooks_api_key: args.googlebooks_api_key,
    };
    let config = ServiceConfig::resolve(&overrides, &toml_config)?;

    let googlebooks_client =
        googlebooks::Client::new(&config.googlebooks_api_key, &config.googlebooks_api_url)
            .context("Failed to create Google Books client")?;
    let openlibrary_client = openlibrary::Client::new(&config.openlibrary_api_url)
        .context("Failed to create OpenLibrary client")?;

    let books = BookService::new(Arc::new(googlebooks_client), Arc::new(openlibrary_client));
    let app = build_router(AppState::new(books));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Listening on http://{}", config.bind_address());
    info!("Health check: http://{}/health", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
