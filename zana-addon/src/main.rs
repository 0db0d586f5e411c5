//! zana-addon - run the content script against a product page
//!
//! `render` loads a retailer page (from the network or a saved file), runs the
//! content script once and prints the fragments it injected.
//! `intercept` reports which request URLs would refresh a content script.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use zana_addon::config::{AddonConfig, CliOverrides, TomlConfig};
use zana_addon::{Assets, ContentScript, HostRegistry, HttpBooksApi, Page, RequestInterceptor};
use zana_common::config::{default_config_path, load_toml_config};
use zana_common::logging::init_tracing;

/// How long `render` waits for the host module to draw
const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "zana-addon")]
#[command(about = "Zana content script runner")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/zana/zana-addon.toml)
    #[arg(short, long, env = "ZANA_ADDON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Augment a product page and print the injected HTML
    Render {
        /// Page URL; selects the host module
        #[arg(long)]
        url: String,

        /// Saved page HTML; the page is downloaded when omitted
        #[arg(long)]
        file: Option<PathBuf>,

        /// Aggregation API endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// Prefix for extension assets
        #[arg(long)]
        asset_base_url: Option<String>,
    },

    /// Check request URLs against the background listener's filters
    Intercept {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("zana-addon"));
    let toml_config: TomlConfig =
        load_toml_config(config_path.as_deref()).context("Failed to load config file")?;

    init_tracing(&toml_config.logging);

    match args.command {
        Command::Render {
            url,
            file,
            api_url,
            asset_base_url,
        } => {
            let overrides = CliOverrides {
                api_url,
                asset_base_url,
            };
            let config = AddonConfig::resolve(&overrides, &toml_config);
            render(&url, file, &config).await
        }
        Command::Intercept { urls } => {
            let interceptor = RequestInterceptor::with_defaults()?;
            for url in urls {
                let verdict = if interceptor.should_notify(&url) {
                    "notify"
                } else {
                    "ignore"
                };
                println!("{}\t{}", verdict, url);
            }
            Ok(())
        }
    }
}

async fn render(url: &str, file: Option<PathBuf>, config: &AddonConfig) -> Result<()> {
    let html = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            info!(url = %url, "Downloading page");
            reqwest::get(url)
                .await
                .and_then(|response| response.error_for_status())
                .with_context(|| format!("Failed to download {}", url))?
                .text()
                .await?
        }
    };

    let registry = HostRegistry::with_defaults(Assets::new(&config.asset_base_url));
    let api = Arc::new(HttpBooksApi::new(&config.api_url)?);
    let script = ContentScript::for_page(&registry, api, Page::new(url, html)?)?;

    let listener = script.listen();
    let mut handled = script.handled_events();

    if script.update().await?.is_none() {
        bail!("No ISBN found on {}", url);
    }

    tokio::time::timeout(RENDER_TIMEOUT, handled.changed())
        .await
        .context("Timed out waiting for book data to render")??;
    listener.abort();

    let page = script.page();
    let page = page.lock().await;
    println!("{}", page.render_mounts());

    Ok(())
}
