use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::{config::TelegramConfig, error::NotifyError, model::FinalNews, util::text};

const DESCRIPTION_MAX_CHARS: usize = 500;
/// A cut description is shortened back to its last full stop only past this point.
const SENTENCE_CUT_MIN_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

pub struct TelegramClient {
    http: Client,
    endpoint: Url,
    chat_id: String,
    display_offset: FixedOffset,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let (Some(token), Some(chat_id)) = (config.bot_token.as_deref(), config.chat_id.as_deref())
        else {
            return Err(NotifyError::MissingCredentials);
        };
        if !config.is_complete() {
            return Err(NotifyError::MissingCredentials);
        }

        let base = config.api_base.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/bot{}/sendMessage", token.trim()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            chat_id: chat_id.trim().to_string(),
            display_offset: config.display_offset(),
        })
    }

    /// Post one record; any non-2xx response is a delivery failure.
    pub async fn send(&self, news: &FinalNews) -> Result<(), NotifyError> {
        let text = format_message(news, self.display_offset);
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &text,
            parse_mode: "Markdown",
            disable_web_page_preview: false,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Render a record as a Telegram Markdown message.
pub fn format_message(news: &FinalNews, offset: FixedOffset) -> String {
    format!(
        "{}\n\n{}\n\n📅 Data: {}\n📂 Categoria: {}\n🔗 {}",
        bold(&news.title),
        escape_markdown(&message_description(news)),
        format_pub_date(&news.pub_date, offset),
        escape_markdown(&news.category),
        news.link,
    )
}

/// The curated summary, else the opening of the extracted article.
pub fn message_description(news: &FinalNews) -> String {
    if !news.summary.trim().is_empty() {
        return news.summary.clone();
    }
    if !news.article_extracted {
        return String::new();
    }

    let cut = text::truncate_chars(&news.full_article, DESCRIPTION_MAX_CHARS);
    if cut.len() == news.full_article.len() {
        return cut.to_string();
    }
    if let Some(pos) = cut.rfind('.') {
        if cut[..pos].chars().count() > SENTENCE_CUT_MIN_CHARS {
            return cut[..=pos].to_string();
        }
    }
    cut.to_string()
}

/// `HH:MM, DD/MM/YYYY` in `offset`; unparsable dates are returned as given.
pub fn format_pub_date(raw: &str, offset: FixedOffset) -> String {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .map(|dt| dt.with_timezone(&offset).format("%H:%M, %d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Wrap `input` in a legacy Markdown bold entity.
///
/// Escapes are not honored inside an entity, so a `*` is emitted escaped
/// between two spans: `2*2` → `*2*\**2*`.
fn bold(input: &str) -> String {
    input
        .split('*')
        .map(|part| {
            if part.is_empty() {
                String::new()
            } else {
                format!("*{part}*")
            }
        })
        .collect::<Vec<_>>()
        .join("\\*")
}

/// Escape the characters legacy Markdown treats as entity delimiters.
fn escape_markdown(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn brasilia() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn news() -> FinalNews {
        FinalNews {
            title: "Chuva forte em SP".to_string(),
            source: "g1".to_string(),
            link: "https://g1.test/a_b".to_string(),
            pub_date: "Tue, 11 Feb 2025 18:30:00 GMT".to_string(),
            summary: "Resumo curto.".to_string(),
            category: "Brasil".to_string(),
            full_article: String::new(),
            article_extracted: false,
            article_truncated: false,
        }
    }

    #[test]
    fn formats_message_layout() {
        let message = format_message(&news(), brasilia());
        assert_eq!(
            message,
            "*Chuva forte em SP*\n\nResumo curto.\n\n📅 Data: 15:30, 11/02/2025\n📂 Categoria: Brasil\n🔗 https://g1.test/a_b"
        );
    }

    #[test]
    fn title_is_bold_without_inner_escapes() {
        let mut item = news();
        item.title = "snake_case [x]".to_string();
        let message = format_message(&item, brasilia());
        assert!(message.starts_with("*snake_case [x]*\n\n"));
    }

    #[test]
    fn asterisk_in_title_splits_the_bold_entity() {
        assert_eq!(bold("2*2=4"), "*2*\\**2=4*");
        assert_eq!(bold("*destaque* do dia"), "\\**destaque*\\** do dia*");
        assert_eq!(bold(""), "");
    }

    #[test]
    fn escapes_markdown_outside_the_title() {
        let mut item = news();
        item.summary = "taxa_selic *alta*".to_string();
        item.category = "Eco_nomia".to_string();
        let message = format_message(&item, brasilia());
        assert!(message.contains("\n\ntaxa\\_selic \\*alta\\*\n\n"));
        assert!(message.contains("Categoria: Eco\\_nomia\n"));
    }

    #[test]
    fn pub_date_formats() {
        assert_eq!(
            format_pub_date("Tue, 11 Feb 2025 18:30:00 +0000", brasilia()),
            "15:30, 11/02/2025"
        );
        assert_eq!(
            format_pub_date("Tue, 11 Feb 2025 01:05:00 -0200", brasilia()),
            "00:05, 11/02/2025"
        );
        assert_eq!(
            format_pub_date("2025-02-11T02:00:00Z", brasilia()),
            "23:00, 10/02/2025"
        );
        assert_eq!(format_pub_date("ontem", brasilia()), "ontem");
        assert_eq!(format_pub_date("", brasilia()), "");
    }

    #[test]
    fn description_falls_back_to_article_opening() {
        let mut item = news();
        item.summary = String::new();
        item.article_extracted = true;

        let sentence = format!("{}.", "a".repeat(349));
        item.full_article = format!("{sentence} {}", "b".repeat(400));
        assert_eq!(message_description(&item), sentence);

        // a full stop too early is ignored
        item.full_article = format!("Short. {}", "c".repeat(600));
        let description = message_description(&item);
        assert_eq!(description.chars().count(), DESCRIPTION_MAX_CHARS);

        item.full_article = "Tiny article text".to_string();
        assert_eq!(message_description(&item), "Tiny article text");
    }

    #[test]
    fn short_article_is_not_cut_at_its_last_full_stop() {
        let mut item = news();
        item.summary = String::new();
        item.article_extracted = true;
        item.full_article = format!("{}. tail words of a short article", "a".repeat(350));
        assert_eq!(item.full_article.chars().count(), 381);
        assert_eq!(message_description(&item), item.full_article);
    }

    #[test]
    fn failed_extraction_is_not_sent_as_description() {
        let mut item = news();
        item.summary = String::new();
        item.full_article = "status: 404".to_string();
        assert_eq!(message_description(&item), "");
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let config = TelegramConfig::default();
        assert!(matches!(
            TelegramClient::new(&config),
            Err(NotifyError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn posts_markdown_message() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/botTOKEN/sendMessage")
                .json_body_partial(r#"{"chat_id":"-100","parse_mode":"Markdown","disable_web_page_preview":false}"#);
            then.status(200).body(r#"{"ok":true}"#);
        });

        let config = TelegramConfig {
            bot_token: Some("TOKEN".to_string()),
            chat_id: Some("-100".to_string()),
            api_base: server.base_url(),
            ..TelegramConfig::default()
        };
        let client = TelegramClient::new(&config).unwrap();
        client.send(&news()).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(400).body("Bad Request: can't parse entities");
        });

        let config = TelegramConfig {
            bot_token: Some("TOKEN".to_string()),
            chat_id: Some("-100".to_string()),
            api_base: server.base_url(),
            ..TelegramConfig::default()
        };
        let client = TelegramClient::new(&config).unwrap();
        let err = client.send(&news()).await.unwrap_err();
        match err {
            NotifyError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("can't parse entities"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
