use std::{path::Path, time::Duration};

use chrono::Local;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    fetcher::ArticleFetcher,
    model::{FinalNews, FinalOutput, SelectedNews},
    repo,
    util::text::preview,
};

/// Fetch and extract the full text of each curated item, then save the result.
///
/// A failed item keeps its failure reason in `full_article` and the run
/// continues with the next one.
pub async fn extract_full_articles(
    config: &AppConfig,
    input: &Path,
    output: &Path,
) -> anyhow::Result<FinalOutput> {
    let selected: Vec<SelectedNews> = repo::load_json(input)?;
    let fetcher = ArticleFetcher::new(&config.fetcher)?;
    let total = selected.len();
    info!(total, input = %input.display(), "extracting selected articles");

    let mut articles = Vec::with_capacity(total);
    let mut extracted = 0usize;

    for (index, news) in selected.into_iter().enumerate() {
        info!(item = index + 1, total, title = %preview(&news.title, 60), "fetching article");

        let result = fetcher.fetch_and_extract(&news.link).await;
        if result.success {
            extracted += 1;
            info!(chars = result.text.chars().count(), truncated = result.truncated, "extracted");
        } else {
            warn!(
                reason = result.failure_reason.as_deref().unwrap_or(""),
                link = %news.link,
                "extraction failed"
            );
        }

        let full_article = if result.success {
            result.text
        } else {
            result.failure_reason.unwrap_or_default()
        };

        articles.push(FinalNews {
            title: news.title,
            source: news.source,
            link: news.link,
            pub_date: news.pub_date,
            summary: news.summary,
            category: news.category,
            full_article,
            article_extracted: result.success,
            article_truncated: result.truncated,
        });

        if index + 1 < total {
            tokio::time::sleep(Duration::from_millis(config.fetcher.article_delay_ms)).await;
        }
    }

    let final_output = FinalOutput {
        generated_at: Local::now().to_rfc3339(),
        total_articles: articles.len(),
        articles_extracted: extracted,
        articles,
    };
    repo::save_json(&final_output, output)?;

    info!(
        path = %output.display(),
        total = final_output.total_articles,
        extracted = final_output.articles_extracted,
        "full articles saved"
    );
    Ok(final_output)
}
