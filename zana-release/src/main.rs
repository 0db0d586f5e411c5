//! zana-release - bump the Zana version everywhere

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use zana_common::config::default_config_path;
use zana_common::logging::init_tracing;
use zana_release::{release, ReleaseConfig, ReleaseOptions, ReleaseType};

#[derive(Parser, Debug)]
#[command(name = "zana-release")]
#[command(about = "Bump the release version across all Zana projects")]
#[command(version)]
struct Args {
    /// Which part of the version to increment
    #[arg(value_enum, default_value_t = ReleaseType::Patch)]
    release_type: ReleaseType,

    /// Repository root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Release config (default: ~/.config/zana/zana-release.toml)
    #[arg(short, long, env = "ZANA_RELEASE_CONFIG")]
    config: Option<PathBuf>,

    /// Show what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Refresh Cargo.lock of bumped crates
    #[arg(long)]
    refresh_lockfiles: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("zana-release"));
    let config = ReleaseConfig::load(config_path.as_deref()).context("Failed to load config file")?;
    init_tracing(&config.logging);

    let options = ReleaseOptions {
        dry_run: args.dry_run,
        refresh_lockfiles: args.refresh_lockfiles,
    };
    let report = release(&args.root, &config, args.release_type, options)
        .with_context(|| format!("Release from {} failed", args.root.display()))?;

    if args.dry_run {
        for path in report.paths() {
            println!("would update {}", path.display());
        }
        println!("Version would change {} -> {}", report.previous, report.version);
    } else {
        println!("All projects updated");
        println!("New version: {}", report.version);
    }

    Ok(())
}
