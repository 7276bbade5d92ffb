// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relayr - a Telegram message-relay bot.
//!
//! Binary entry point: parses the CLI, loads and validates configuration,
//! connects the Telegram client, and runs the ingestion loop until ctrl-c.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use relayr_core::ChatClient;
use relayr_pipeline::{CounterStats, ForwardOptions, IngestLoop, RateLimiter};
use relayr_telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Relayr - a Telegram message-relay bot.
#[derive(Parser, Debug)]
#[command(name = "relayr", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (default: standard lookup hierarchy).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start forwarding messages (default).
    Serve,
    /// Load and validate the configuration, then exit.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            relayr_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    match cli.command {
        Some(Commands::Check) => {
            info!(
                sources = %config.forwarding.source_chat,
                targets = %config.forwarding.target_chat,
                mode = %config.forwarding.forward_mode,
                "configuration is valid"
            );
        }
        Some(Commands::Serve) | None => {
            if let Err(e) = serve(config, cli.config).await {
                error!(error = %e, "fatal error");
                std::process::exit(1);
            }
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<relayr_config::RelayrConfig, Vec<relayr_config::ConfigError>> {
    match path {
        Some(path) => relayr_config::load_and_validate_path(path),
        None => relayr_config::load_and_validate(),
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(
    config: relayr_config::RelayrConfig,
    config_path: Option<PathBuf>,
) -> Result<(), relayr_core::RelayrError> {
    let client = Arc::new(TelegramClient::connect(&config.telegram).await?);
    let options = ForwardOptions::from_config(&config);

    validate_chats(client.as_ref(), &options).await;

    let stats = Arc::new(CounterStats::new());
    let limiter = RateLimiter::new(
        config.app.rate_limit_burst,
        config.app.rate_limit_min_interval,
    );

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let mut ingest = IngestLoop::new(
        client,
        stats.clone(),
        limiter,
        options,
        cancel,
        config.app.dedup_capacity,
    );
    if let Some(path) = config_path {
        ingest = ingest.with_config_path(path);
    }

    let result = ingest.run().await;

    let snapshot = stats.snapshot();
    info!(
        messages_total = snapshot.messages_total,
        messages_failed = snapshot.messages_failed,
        replacements = snapshot.replacements_made,
        links_cleaned = snapshot.links_cleaned,
        success_rate = %format!("{:.1}%", snapshot.success_rate * 100.0),
        "final statistics"
    );
    result
}

/// Resolves every configured chat at startup. Failures are warnings, not
/// errors: a chat the bot cannot see yet may become reachable later.
async fn validate_chats(client: &dyn ChatClient, options: &ForwardOptions) {
    for chat in options.sources.iter().chain(options.targets.iter()) {
        match client.resolve_chat(chat).await {
            Ok(title) => info!(chat = %chat, title = %title, "chat resolved"),
            Err(e) => warn!(chat = %chat, error = %e, "cannot resolve chat"),
        }
    }
}

fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        info!("ctrl-c received, shutting down");
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_config_flag() {
        let cli = Cli::parse_from(["relayr", "--config", "/tmp/relayr.toml", "serve"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/relayr.toml")));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::parse_from(["relayr"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }
}
