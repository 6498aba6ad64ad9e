// ABOUTME: Demo driver for the toast queue that plays the renderer role from the command line
// Prints the visible stack as JSON lines on every change until the queue drains

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use toast_queue::{Feedback, PromiseConfig, ToastOptions, Toaster, ToasterConfig, Variant};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "toast-queue", version, about = "Drive the toast queue manager from the terminal")]
struct Cli {
    /// TOML config file; defaults to the platform config dir
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    max_visible: Option<usize>,

    #[arg(long)]
    duration_ms: Option<u64>,

    #[arg(long)]
    animation_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fire a burst of toasts and watch eviction trim the stack
    Burst {
        #[arg(long, default_value_t = 7)]
        count: usize,
    },
    /// Track a simulated async operation with a promise toast
    Promise {
        #[arg(long)]
        fail: bool,
        #[arg(long, default_value_t = 1500)]
        work_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    info!("Starting toast queue with {:?}", config);
    let toaster = Toaster::new(config)?;
    let printer = tokio::spawn(print_changes(toaster.clone()));

    match cli.command {
        Command::Burst { count } => run_burst(&toaster, count),
        Command::Promise { fail, work_ms } => run_promise(&toaster, fail, work_ms).await,
    }

    wait_until_drained(&toaster).await;
    printer.abort();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ToasterConfig> {
    let mut config = match &cli.config {
        Some(path) => ToasterConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ToasterConfig::load_or_default()?,
    };
    if let Some(max_visible) = cli.max_visible {
        config.max_visible = max_visible;
    }
    if let Some(ms) = cli.duration_ms {
        config.default_duration_ms = ms;
    }
    if let Some(ms) = cli.animation_ms {
        config.animation_duration_ms = ms;
    }
    Ok(config)
}

fn run_burst(toaster: &Toaster, count: usize) {
    const CYCLE: [Variant; 4] = [Variant::Info, Variant::Success, Variant::Warning, Variant::Error];
    for i in 0..count {
        let options = ToastOptions::default().title(format!("Burst {}", i + 1));
        let message = format!("Notification #{}", i + 1);
        match CYCLE[i % CYCLE.len()] {
            Variant::Success => toaster.success_with(message, options),
            Variant::Warning => toaster.warning_with(message, options),
            Variant::Error => toaster.error_with(message, options),
            _ => toaster.info_with(message, options),
        };
    }
}

async fn run_promise(toaster: &Toaster, fail: bool, work_ms: u64) {
    let operation = async move {
        tokio::time::sleep(Duration::from_millis(work_ms)).await;
        if fail {
            Err(anyhow::anyhow!("disk full"))
        } else {
            Ok(42_u32)
        }
    };
    let config = PromiseConfig::new(
        "Saving…",
        Feedback::from_fn(|items: &u32| format!("Saved {items} items")),
        Feedback::from_fn(|e: &anyhow::Error| format!("Failed: {e}")),
    );

    match toaster.promise(operation, config).await {
        Ok(items) => info!("Operation finished with {} items", items),
        Err(e) => warn!("Operation failed: {}", e),
    }
}

async fn print_changes(toaster: Toaster) {
    let mut changes = toaster.subscribe();
    loop {
        match serde_json::to_string(&toaster.snapshots()) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Failed to serialize toast snapshot: {}", e),
        }
        if changes.changed().await.is_err() {
            break;
        }
    }
}

async fn wait_until_drained(toaster: &Toaster) {
    let config = toaster.config();
    let limit = config.default_duration() * 4 + config.animation_duration() * 2 + Duration::from_secs(1);
    let mut changes = toaster.subscribe();

    let drained = tokio::time::timeout(limit, async {
        while !toaster.store().is_empty() {
            if changes.changed().await.is_err() {
                break;
            }
        }
    })
    .await;

    if drained.is_err() {
        warn!("Gave up waiting for {} toast(s) to clear", toaster.store().len());
    }
}

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toast_queue=info".into()),
        )
        .init();
}
