use crate::extract::{
    entities, noise,
    normalize::{TAG, WHITESPACE},
};

/// Reduce a feed item's HTML description to a single line of text.
/// - Drops <script>/<style> blocks and comments
/// - Replaces every other tag with a space; a `<` that never closes stays text
/// - Decodes character references, collapses whitespace and trims ends
pub fn clean_summary(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let stripped = noise::strip(input);
    let untagged = TAG.replace_all(&stripped, " ");
    let decoded = entities::decode(&untagged);
    collapse_whitespace(&decoded)
}

/// Feed titles arrive as plain text; only their whitespace is tidied.
pub fn clean_title(input: &str) -> String {
    collapse_whitespace(input)
}

fn collapse_whitespace(input: &str) -> String {
    WHITESPACE.replace_all(input.trim(), " ").into_owned()
}
