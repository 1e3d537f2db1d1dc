use std::sync::LazyLock;

use regex::Regex;

/// A candidate must capture more than this many characters to be accepted.
pub const MIN_REGION_CHARS: usize = 200;

/// Attribute tokens that mark a container as likely article content.
pub const CONTAINER_TOKENS: &[&str] = &["article", "content", "story", "post", "entry"];

static BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").expect("BODY regex should compile")
});

static DEFAULT_SELECTOR: LazyLock<RegionSelector> = LazyLock::new(|| {
    RegionSelector::new(RegionMatcher::default_priority(), MIN_REGION_CHARS)
        .expect("default region matchers should compile")
});

/// One structural heuristic for locating the main content of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionMatcher {
    /// First `<article>` element.
    ArticleTag,
    /// First `<main>` element.
    MainTag,
    /// First `<div>`/`<section>` whose `class` contains one of the tokens.
    ClassMatch { tokens: Vec<String> },
    /// First `<div>`/`<section>` whose `id` contains one of the tokens.
    IdMatch { tokens: Vec<String> },
}

impl RegionMatcher {
    pub fn default_priority() -> Vec<RegionMatcher> {
        let tokens: Vec<String> = CONTAINER_TOKENS.iter().map(|t| t.to_string()).collect();
        vec![
            RegionMatcher::ArticleTag,
            RegionMatcher::MainTag,
            RegionMatcher::ClassMatch {
                tokens: tokens.clone(),
            },
            RegionMatcher::IdMatch { tokens },
        ]
    }

    pub fn source(&self) -> RegionSource {
        match self {
            RegionMatcher::ArticleTag => RegionSource::Article,
            RegionMatcher::MainTag => RegionSource::Main,
            RegionMatcher::ClassMatch { .. } => RegionSource::Class,
            RegionMatcher::IdMatch { .. } => RegionSource::Id,
        }
    }

    /// Returns `None` for attribute matchers without tokens; such a matcher never matches.
    fn pattern(&self) -> Option<String> {
        match self {
            RegionMatcher::ArticleTag => Some(element_pattern("article")),
            RegionMatcher::MainTag => Some(element_pattern("main")),
            RegionMatcher::ClassMatch { tokens } => container_pattern("class", tokens),
            RegionMatcher::IdMatch { tokens } => container_pattern("id", tokens),
        }
    }
}

fn element_pattern(tag: &str) -> String {
    format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}\s*>")
}

fn container_pattern(attr: &str, tokens: &[String]) -> Option<String> {
    let alternation = tokens
        .iter()
        .filter(|token| !token.is_empty())
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    if alternation.is_empty() {
        return None;
    }

    Some(format!(
        r#"(?is)<(?:div|section)\b[^>]*\s{attr}\s*=\s*["'][^"'>]*(?:{alternation})[^"'>]*["'][^>]*>(.*?)</(?:div|section)\s*>"#
    ))
}

/// Where the selected region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    Article,
    Main,
    Class,
    Id,
    Body,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub text: &'a str,
    pub source: RegionSource,
}

/// Ordered list of matchers evaluated with early exit.
#[derive(Debug, Clone)]
pub struct RegionSelector {
    matchers: Vec<(RegionMatcher, Regex)>,
    min_chars: usize,
}

impl RegionSelector {
    pub fn new(matchers: Vec<RegionMatcher>, min_chars: usize) -> Result<Self, regex::Error> {
        let mut compiled = Vec::with_capacity(matchers.len());
        for matcher in matchers {
            if let Some(pattern) = matcher.pattern() {
                let regex = Regex::new(&pattern)?;
                compiled.push((matcher, regex));
            }
        }

        Ok(Self {
            matchers: compiled,
            min_chars,
        })
    }

    pub fn matchers(&self) -> impl Iterator<Item = &RegionMatcher> {
        self.matchers.iter().map(|(matcher, _)| matcher)
    }

    /// Pick the first matcher whose first match captures more than `min_chars`
    /// characters, else the `<body>` content, else the whole document.
    pub fn select<'a>(&self, doc: &'a str) -> Region<'a> {
        for (matcher, regex) in &self.matchers {
            let Some(span) = regex.captures(doc).and_then(|caps| caps.get(1)) else {
                continue;
            };
            if exceeds_chars(span.as_str(), self.min_chars) {
                return Region {
                    text: span.as_str(),
                    source: matcher.source(),
                };
            }
        }

        if let Some(body) = BODY.captures(doc).and_then(|caps| caps.get(1)) {
            return Region {
                text: body.as_str(),
                source: RegionSource::Body,
            };
        }

        Region {
            text: doc,
            source: RegionSource::Document,
        }
    }
}

impl Default for RegionSelector {
    fn default() -> Self {
        DEFAULT_SELECTOR.clone()
    }
}

/// Select the content region using the default matcher priority.
pub fn select_region(doc: &str) -> Region<'_> {
    DEFAULT_SELECTOR.select(doc)
}

fn exceeds_chars(text: &str, limit: usize) -> bool {
    text.len() > limit && text.chars().nth(limit).is_some()
}
