mod config;
mod fetcher;
mod notifier;
mod poller;
mod slot;
mod sound;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::fetcher::SlotFetcher;
use crate::notifier::AlertNotifier;
use crate::poller::PollLoop;
use crate::sound::SoundPlayer;

#[derive(Parser)]
#[command(name = "slot-watcher")]
#[command(about = "Watches an appointment-availability API and alerts when slots open up")]
struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Print a starter settings file to stdout and exit
    #[arg(long)]
    example_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.example_config {
        let example = toml::to_string_pretty(&Settings::example())
            .context("failed to render example settings")?;
        print!("{example}");
        return Ok(());
    }

    let settings = Settings::load(&cli.config)?;

    let _log_guard = init_tracing(&settings.log_file_path)?;
    tracing::info!("Starting appointment slot watcher");

    let notifier = AlertNotifier::new(
        SoundPlayer::new(&settings.sound_command),
        settings.sound_file_path.clone(),
    );
    let poller = PollLoop::new(
        SlotFetcher::new(),
        settings.query_parameters(),
        Duration::from_secs(settings.sleep_time_sec),
        notifier,
    );

    let runner = tokio::spawn(async move { poller.run().await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping");
    runner.abort();

    Ok(())
}

/// Console plus log-file sinks. The file is truncated on every start.
///
/// The returned guard keeps the background log writer alive; it must be
/// held for the lifetime of the process.
fn init_tracing(log_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file = std::fs::File::create(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["slot-watcher"]);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(!cli.example_config);
    }

    #[test]
    fn test_config_path_named_like_the_flag_still_loads() {
        let cli = Cli::parse_from(["slot-watcher", "--config", "example-config"]);
        assert_eq!(cli.config, PathBuf::from("example-config"));
        assert!(!cli.example_config);
    }

    #[test]
    fn test_example_config_flag() {
        let cli = Cli::parse_from(["slot-watcher", "--example-config"]);
        assert!(cli.example_config);
    }
}
