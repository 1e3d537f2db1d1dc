//! HTTP collaborators around the extraction core.

pub mod article;
pub mod feeds;

use std::time::Duration;

use anyhow::Context;
use reqwest::Client;

use crate::config::FetcherConfig;

pub use article::ArticleFetcher;
pub use feeds::FeedFetcher;

fn build_client(config: &FetcherConfig) -> anyhow::Result<Client> {
    let timeout = if config.request_timeout_secs == 0 {
        10
    } else {
        config.request_timeout_secs
    };

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(timeout))
        .build()
        .context("failed to build http client")
}
