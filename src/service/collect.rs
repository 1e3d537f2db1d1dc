use std::{path::Path, time::Duration};

use chrono::Local;
use tracing::info;

use crate::{
    config::AppConfig,
    fetcher::FeedFetcher,
    model::MetadataOutput,
    repo,
};

/// Poll every configured feed in order and save the combined item metadata.
pub async fn collect_metadata(config: &AppConfig, output: &Path) -> anyhow::Result<MetadataOutput> {
    let fetcher = FeedFetcher::new(&config.fetcher)?;
    let urls = &config.feeds.urls;
    let total = urls.len();
    info!(feeds = total, "collecting feed metadata");

    let mut items = Vec::new();
    for (index, url) in urls.iter().enumerate() {
        info!(feed = index + 1, total, url = %url, "fetching feed");
        items.extend(fetcher.fetch(url).await);

        if index + 1 < total {
            tokio::time::sleep(Duration::from_millis(config.feeds.delay_ms)).await;
        }
    }

    let metadata = MetadataOutput {
        fetched_at: Local::now().to_rfc3339(),
        total_items: items.len(),
        items,
    };
    repo::save_json(&metadata, output)?;

    info!(
        path = %output.display(),
        total_items = metadata.total_items,
        "metadata saved"
    );
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedsConfig;
    use httpmock::prelude::*;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Tech</title>
  <id>urn:tech</id>
  <updated>2025-02-11T10:00:00Z</updated>
  <entry>
    <title>Entry one</title>
    <id>urn:tech:1</id>
    <link rel="alternate" href="https://tech.test/1"/>
    <updated>2025-02-11T10:00:00Z</updated>
    <summary>Short summary</summary>
  </entry>
</feed>"#;

    #[tokio::test]
    async fn failing_feeds_do_not_stop_the_run() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/atom");
            then.status(200).body(ATOM);
        });
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503);
        });

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("meta.json");
        let config = AppConfig {
            feeds: FeedsConfig {
                urls: vec![server.url("/down"), server.url("/atom")],
                delay_ms: 0,
            },
            ..AppConfig::default()
        };

        let metadata = collect_metadata(&config, &output).await.unwrap();
        assert_eq!(metadata.total_items, 1);
        assert_eq!(metadata.items[0].source, "Tech");
        assert_eq!(metadata.items[0].link, "https://tech.test/1");

        let saved: MetadataOutput = repo::load_json(&output).unwrap();
        assert_eq!(saved.items, metadata.items);
    }
}
