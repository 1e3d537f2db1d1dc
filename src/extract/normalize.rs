use std::sync::LazyLock;

use regex::Regex;

use super::entities;

/// Lines shorter than this (after trimming and collapsing) are dropped.
pub const MIN_LINE_CHARS: usize = 10;
/// Hard upper bound on the output, in characters.
pub const MAX_OUTPUT_CHARS: usize = 50_000;

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\b[^>]*>|<p\b[^>]*>|</p\s*>").expect("BLOCK_BREAK regex should compile")
});
pub(crate) static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG regex should compile"));
pub(crate) static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE regex should compile"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// The text was cut at the character limit and may end mid-sentence.
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    pub min_line_chars: usize,
    pub max_output_chars: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            min_line_chars: MIN_LINE_CHARS,
            max_output_chars: MAX_OUTPUT_CHARS,
        }
    }
}

impl Normalizer {
    pub fn normalize(&self, region: &str) -> Normalized {
        let broken = BLOCK_BREAK.replace_all(region, "\n");
        // a space, not nothing, so `a</span><span>b` stays two words
        let untagged = TAG.replace_all(&broken, " ");
        let decoded = entities::decode(&untagged);

        let lines: Vec<String> = decoded
            .split('\n')
            .filter_map(|line| {
                let collapsed = WHITESPACE.replace_all(line.trim(), " ");
                let keep =
                    !collapsed.is_empty() && collapsed.chars().count() >= self.min_line_chars;
                keep.then(|| collapsed.into_owned())
            })
            .collect();

        let mut text = lines.join(PARAGRAPH_SEPARATOR);
        let truncated = truncate_chars(&mut text, self.max_output_chars);
        Normalized { text, truncated }
    }
}

/// Normalize with the default thresholds.
pub fn normalize(region: &str) -> Normalized {
    Normalizer::default().normalize(region)
}

fn truncate_chars(text: &mut String, max_chars: usize) -> bool {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            text.truncate(cut);
            true
        }
        None => false,
    }
}
