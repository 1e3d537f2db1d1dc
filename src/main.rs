use anyhow::Context;
use clap::{Parser, Subcommand};
use newsrelay::{config, service};
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};
use tracing_appender::rolling;
use tracing_subscriber::{
    filter::filter_fn, fmt::layer as fmt_layer, prelude::*, EnvFilter, Registry,
};

#[derive(Parser, Debug)]
#[command(name = "newsrelay")]
#[command(about = "Collect feed items, extract article text and relay them to Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every configured feed and save item metadata (default)
    Collect {
        /// Metadata file to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Fetch the full text of each item in a curated selection file
    Extract {
        /// JSON array of selected items
        input: PathBuf,
        /// Full-article file to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Post each extracted item to the configured Telegram chat
    Send {
        /// File written by `extract`
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::AppConfig::from_env().context("failed to load configuration")?;
    setup_tracing(&config)?;

    if !config.telegram.is_complete() {
        tracing::warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set; `send` will fail");
    }

    match cli.command.unwrap_or(Command::Collect { output: None }) {
        Command::Collect { output } => {
            let output = output.unwrap_or_else(|| config.output.metadata_file.clone());
            let metadata = service::collect_metadata(&config, &output).await?;
            tracing::info!(
                total_items = metadata.total_items,
                path = %output.display(),
                "next step: review the items and write a selection file for `extract`"
            );
        }
        Command::Extract { input, output } => {
            let output = output.unwrap_or_else(|| config.output.full_file.clone());
            let result = service::extract_full_articles(&config, &input, &output).await?;
            tracing::info!(
                total = result.total_articles,
                extracted = result.articles_extracted,
                path = %output.display(),
                "next step: newsrelay send {}",
                output.display()
            );
        }
        Command::Send { input } => {
            let summary = service::send_all(&config, &input).await?;
            tracing::info!(sent = summary.sent, failed = summary.failed, "done");
        }
    }

    Ok(())
}

fn setup_tracing(config: &config::AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config
            .logging
            .level
            .clone()
            .unwrap_or_else(|| "info".to_string());
        EnvFilter::new(level)
    });

    let log_path = Path::new(&config.logging.file);
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = log_path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid log file path"))?;
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| Path::new(".").to_path_buf());

    let file_appender = rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
    let _ = FILE_GUARD.set(guard);

    let own_filter = filter_fn(|meta| meta.target().starts_with("newsrelay"));
    let other_filter = filter_fn(|meta| !meta.target().starts_with("newsrelay"));

    let stdout_own = fmt_layer()
        .with_writer(std::io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_filter(own_filter.clone());

    let stdout_general = fmt_layer()
        .with_writer(std::io::stdout)
        .with_filter(other_filter);

    let file_layer = fmt_layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(own_filter);

    Registry::default()
        .with(env_filter)
        .with(stdout_own)
        .with(stdout_general)
        .with(file_layer)
        .try_init()
        .context("failed to init tracing subscriber")?;

    Ok(())
}
