use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("SCRIPT_BLOCK regex should compile")
});
static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("STYLE_BLOCK regex should compile")
});
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT regex should compile"));

/// Remove `<script>` and `<style>` blocks and HTML comments.
///
/// Matching is case-insensitive, spans lines and stops at the nearest
/// closing delimiter. A block without its closing delimiter is kept as is.
pub fn strip(doc: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(doc, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    COMMENT.replace_all(&without_styles, "").into_owned()
}
