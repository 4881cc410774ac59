use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use vigia::config::MonitorConfig;
use vigia::evaluator::TargetEvaluator;
use vigia::fetcher::PageFetcher;
use vigia::notify::{TelegramConfig, TelegramNotifier};
use vigia::runner::Runner;

/// Web page change, price, and keyword monitor with Telegram alerts.
#[derive(Debug, Parser)]
#[command(name = "vigia", version, about)]
struct Cli {
    /// Path to the monitor config document.
    #[arg(long, env = "MONITOR_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Path to the persisted state file.
    #[arg(long, env = "MONITOR_STATE", default_value = "state.json")]
    state: PathBuf,

    /// Compose and log the alert message without sending it.
    #[arg(long)]
    dry_run: bool,

    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Telegram destination chat id.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,

    /// Send a connectivity test message and exit.
    #[arg(long)]
    test_telegram: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env next to the binary feeds the env-backed flags below; load it
    // before clap resolves them.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vigia=debug".parse()?),
        )
        .init();

    let telegram = TelegramConfig::new(
        cli.telegram_token.filter(|t| !t.is_empty()),
        cli.telegram_chat_id.filter(|c| !c.is_empty()),
    );
    let notifier = TelegramNotifier::new(telegram.clone());

    if cli.test_telegram {
        notifier.send_test().await?;
        info!("telegram connectivity test passed");
        return Ok(());
    }

    let config = MonitorConfig::load(&cli.config)?;
    if !cli.dry_run && !telegram.is_configured() {
        warn!("telegram credentials missing; alerts will be skipped this run");
    }

    let fetcher = PageFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let runner = Runner::new(
        TargetEvaluator::new(fetcher),
        notifier,
        cli.state,
        cli.dry_run,
    );

    let report = runner.run(&config.targets).await?;
    info!(
        checked = report.checked,
        skipped = report.skipped,
        alerts = report.alerts,
        notified = report.notified,
        "run complete"
    );

    Ok(())
}
