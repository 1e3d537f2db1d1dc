use std::{path::Path, time::Duration};

use anyhow::Context;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    model::FinalOutput,
    repo,
    util::{telegram::TelegramClient, text::preview},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Post every record of `input` to the configured chat, one at a time.
///
/// Delivery failures are logged and counted; they are not retried.
pub async fn send_all(config: &AppConfig, input: &Path) -> anyhow::Result<SendSummary> {
    let client = TelegramClient::new(&config.telegram).context("cannot send to telegram")?;
    let output: FinalOutput = repo::load_json(input)?;
    let total = output.articles.len();
    info!(total, input = %input.display(), "sending articles to telegram");

    let mut summary = SendSummary::default();
    for (index, news) in output.articles.iter().enumerate() {
        info!(item = index + 1, total, title = %preview(&news.title, 60), "sending");

        match client.send(news).await {
            Ok(()) => {
                summary.sent += 1;
                info!(item = index + 1, "sent");
            }
            Err(err) => {
                summary.failed += 1;
                warn!(item = index + 1, error = %err, "send failed");
            }
        }

        if index + 1 < total {
            tokio::time::sleep(Duration::from_millis(config.telegram.send_delay_ms)).await;
        }
    }

    info!(sent = summary.sent, failed = summary.failed, "telegram run finished");
    Ok(summary)
}
