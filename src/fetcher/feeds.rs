use feed_rs::{
    model::{Entry, Feed},
    parser,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{config::FetcherConfig, error::FetchError, model::MetadataItem, util::html};

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(config: &FetcherConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_client(config)?,
        })
    }

    /// Fetch one feed; failures are logged and yield no items.
    pub async fn fetch(&self, url: &str) -> Vec<MetadataItem> {
        match self.try_fetch(url).await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, url, "feed fetch failed");
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, url: &str) -> Result<Vec<MetadataItem>, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::EmptyUrl);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;
        let items = convert_feed(feed);

        info!(
            url,
            source = items.first().map(|item| item.source.as_str()).unwrap_or(""),
            count = items.len(),
            "feed fetched"
        );
        Ok(items)
    }
}

pub fn convert_feed(feed: Feed) -> Vec<MetadataItem> {
    let source = feed
        .title
        .map(|title| title.content.trim().to_string())
        .unwrap_or_default();

    feed.entries
        .iter()
        .filter_map(|entry| convert_entry(&source, entry))
        .collect()
}

fn convert_entry(source: &str, entry: &Entry) -> Option<MetadataItem> {
    let title = entry
        .title
        .as_ref()
        .map(|title| html::clean_title(&title.content))
        .unwrap_or_default();

    let link = entry
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|link| link.href.trim().to_string())
        .unwrap_or_default();

    if title.is_empty() && link.is_empty() {
        debug!(entry_id = %entry.id, "skip entry without title or link");
        return None;
    }

    let description = entry
        .summary
        .as_ref()
        .map(|summary| html::clean_summary(&summary.content))
        .unwrap_or_default();

    let pub_date = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    let category = entry
        .categories
        .iter()
        .map(|category| category.term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect();

    Some(MetadataItem {
        title,
        link,
        description,
        pub_date,
        source: source.to_string(),
        category,
    })
}
