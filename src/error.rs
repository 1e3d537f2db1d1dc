use thiserror::Error;

/// Failure to retrieve a feed or article over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty url")]
    EmptyUrl,
    #[error("status: {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("feed parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err)
        }
    }
}

/// Failure to deliver a message to the chat endpoint.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram configuration incomplete; set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID")]
    MissingCredentials,
    #[error("invalid telegram api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_short_status_lines() {
        assert_eq!(FetchError::Status(404).to_string(), "status: 404");
        assert_eq!(FetchError::EmptyUrl.to_string(), "empty url");
        let err = NotifyError::Status {
            status: 400,
            body: "{\"ok\":false}".to_string(),
        };
        assert_eq!(err.to_string(), "status 400: {\"ok\":false}");
    }
}
