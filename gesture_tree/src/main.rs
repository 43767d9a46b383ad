//! gesture_tree — interactive entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gesture_tree::app::{run, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "gesture_tree", about = "Gesture-driven wish tree and photo gallery")]
struct Cli {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Photo to load at startup; repeatable.
    #[arg(long = "photo", value_name = "PATH")]
    photos: Vec<PathBuf>,

    /// Name shown in the heart overlay.
    #[arg(long)]
    recipient: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Skip stdin prompts; wishes use the default text.
    #[arg(long)]
    quick: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Gesture Tree — Wishes & Photos Hand Controller        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Input: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Input: Keyboard/mouse simulation  (use --features leap for hardware)");
    println!();

    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None       => AppConfig::default(),
    };
    cfg.photos.extend(cli.photos);
    if let Some(name) = cli.recipient {
        cfg.recipient = name;
    }

    if cli.quick {
        println!("  Quick-start: prompts disabled, wishes say \"{}\"\n", cfg.default_wish);
    }
    println!("  Opening visualizer window…");
    println!();

    run(cfg, cli.quick)
}
