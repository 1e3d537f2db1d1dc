use anyhow::{anyhow, Context};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub urls: Vec<String>,
    pub delay_ms: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            urls: vec!["https://g1.globo.com/rss/g1/".to_string()],
            delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub request_timeout_secs: u64,
    pub article_delay_ms: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            article_delay_ms: 500,
            user_agent: "newsrelay/0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub send_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Offset applied when rendering publication dates; Brasília time by default.
    pub utc_offset_minutes: i32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
            send_delay_ms: 1000,
            request_timeout_secs: 15,
            utc_offset_minutes: -180,
        }
    }
}

impl TelegramConfig {
    pub fn is_complete(&self) -> bool {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        };
        present(&self.bot_token) && present(&self.chat_id)
    }

    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub metadata_file: PathBuf,
    pub full_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metadata_file: PathBuf::from("rss_feeds_metadata.json"),
            full_file: PathBuf::from("news_today_full.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "logs/newsrelay.log".to_string(),
            level: Some("info".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feeds: FeedsConfig,
    pub fetcher: FetcherConfig,
    pub telegram: TelegramConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let env = EnvSource::load(Path::new(".env"))?;
        Self::from_source(&env)
    }

    pub fn from_source(env: &EnvSource) -> anyhow::Result<Self> {
        let config = if let Some(path) = env.get("CONFIG_FILE") {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(anyhow!("config file {:?} not found", path));
            }
            Self::load_from_file(&path)?
        } else {
            let path = locate_default_config();
            if let Some(path) = path {
                Self::load_from_file(&path)?
            } else {
                AppConfig::default()
            }
        };

        Self::apply_env_overrides(config, env)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config)
    }

    fn apply_env_overrides(mut config: AppConfig, env: &EnvSource) -> anyhow::Result<AppConfig> {
        if let Some(urls) = env.get("FEED_URLS") {
            config.feeds.urls = urls
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(delay) = env.parse_optional("FEED_DELAY_MS")? {
            config.feeds.delay_ms = delay;
        }

        if let Some(delay) = env.parse_optional("ARTICLE_DELAY_MS")? {
            config.fetcher.article_delay_ms = delay;
        }

        if let Some(timeout) = env.parse_optional("FETCH_TIMEOUT_SECS")? {
            config.fetcher.request_timeout_secs = timeout;
        }

        if let Some(token) = env.get("TELEGRAM_BOT_TOKEN") {
            config.telegram.bot_token = Some(token.to_string());
        }

        if let Some(chat_id) = env.get("TELEGRAM_CHAT_ID") {
            config.telegram.chat_id = Some(chat_id.to_string());
        }

        if let Some(api_base) = env.get("TELEGRAM_API_BASE") {
            config.telegram.api_base = api_base.to_string();
        }

        if let Some(delay) = env.parse_optional("SEND_DELAY_MS")? {
            config.telegram.send_delay_ms = delay;
        }

        if let Some(log_file) = env.get("LOG_FILE_PATH") {
            config.logging.file = log_file.to_string();
        }

        if let Some(log_level) = env.get("LOG_LEVEL") {
            config.logging.level = Some(log_level.to_string());
        }

        if config.feeds.urls.is_empty() {
            return Err(anyhow!(
                "no feeds configured; set FEED_URLS env var or feeds.urls in config file"
            ));
        }

        Ok(config)
    }
}

/// Process environment layered over the entries of a `.env` file.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// Read `dotenv_path` if it exists; variables already set in the process win.
    pub fn load(dotenv_path: &Path) -> anyhow::Result<Self> {
        let mut vars = if dotenv_path.exists() {
            let contents = fs::read_to_string(dotenv_path)
                .with_context(|| format!("failed to read {:?}", dotenv_path))?;
            parse_dotenv(&contents)
        } else {
            HashMap::new()
        };
        vars.extend(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        );
        Ok(Self { vars })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    fn parse_optional<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            Some(v) => Ok(Some(
                v.trim()
                    .parse::<T>()
                    .with_context(|| format!("{key} must be a valid value"))?,
            )),
            None => Ok(None),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// `KEY=VALUE` lines; blank lines and `#` comments are skipped and
/// surrounding quotes are removed from values.
fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (key.trim().to_string(), value.to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn locate_default_config() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("config/config.yaml"),
        PathBuf::from("../config/config.yaml"),
    ];

    candidates.into_iter().find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dotenv_lines_are_parsed() {
        let vars = parse_dotenv(
            "# telegram\nTELEGRAM_BOT_TOKEN=\"123:abc\"\n\n  TELEGRAM_CHAT_ID = '-100' \nBROKEN\n=novalue\n",
        );
        assert_eq!(vars.get("TELEGRAM_BOT_TOKEN").map(String::as_str), Some("123:abc"));
        assert_eq!(vars.get("TELEGRAM_CHAT_ID").map(String::as_str), Some("-100"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn env_overrides_apply_on_top_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "feeds:\n  urls: [\"https://a.test/rss\"]\n  delay_ms: 10\ntelegram:\n  chat_id: \"42\"\n"
        )
        .unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let env: EnvSource = [
            ("CONFIG_FILE", path.as_str()),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("TELEGRAM_BOT_TOKEN", "tok"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_source(&env).unwrap();

        assert_eq!(config.feeds.urls, vec!["https://a.test/rss".to_string()]);
        assert_eq!(config.feeds.delay_ms, 10);
        assert_eq!(config.fetcher.request_timeout_secs, 3);
        assert_eq!(config.fetcher.article_delay_ms, 500);
        assert!(config.telegram.is_complete());
    }

    #[test]
    fn feed_urls_env_is_comma_separated() {
        let config = AppConfig::apply_env_overrides(
            AppConfig::default(),
            &[("FEED_URLS", " https://a.test/rss , ,https://b.test/feed")]
                .into_iter()
                .collect(),
        )
        .unwrap();
        assert_eq!(
            config.feeds.urls,
            vec!["https://a.test/rss".to_string(), "https://b.test/feed".to_string()]
        );
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let env: EnvSource = [("CONFIG_FILE", "/nonexistent/newsrelay.yaml")]
            .into_iter()
            .collect();
        assert!(AppConfig::from_source(&env).is_err());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let env: EnvSource = [("SEND_DELAY_MS", "soon")].into_iter().collect();
        let err = AppConfig::apply_env_overrides(AppConfig::default(), &env).unwrap_err();
        assert!(err.to_string().contains("SEND_DELAY_MS"));
    }

    #[test]
    fn incomplete_telegram_config() {
        let mut telegram = TelegramConfig::default();
        assert!(!telegram.is_complete());
        telegram.bot_token = Some("tok".to_string());
        telegram.chat_id = Some("  ".to_string());
        assert!(!telegram.is_complete());
        assert_eq!(telegram.display_offset().local_minus_utc(), -3 * 3600);
    }
}
