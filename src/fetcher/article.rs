use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::{header, Client};

use crate::{
    config::FetcherConfig,
    error::FetchError,
    extract::{self, ExtractionResult},
};

pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    pub fn new(config: &FetcherConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_client(config)?,
        })
    }

    /// Download `url` and extract its main text.
    ///
    /// Transport failures, timeouts and non-2xx responses produce a failed
    /// result carrying the reason; the extractor only ever sees complete bodies.
    pub async fn fetch_and_extract(&self, url: &str) -> ExtractionResult {
        match self.fetch_document(url).await {
            Ok(document) => extract::extract(&document),
            Err(err) => ExtractionResult::failure(err.to_string()),
        }
    }

    pub async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::EmptyUrl);
        }

        let response = self.client.get(url.trim()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let charset = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type)
            .map(str::to_string);

        let bytes = response.bytes().await?;
        Ok(decode_body(&bytes, charset.as_deref()))
    }
}

/// Decode with the declared charset, or a detected one when none is declared
/// or the label is unknown. A byte order mark overrides both.
pub fn decode_body(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
    })
}
