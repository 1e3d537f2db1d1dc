use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Highest code point a numeric reference may name.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Named entities decoded by [`decode`], without the surrounding `&` and `;`.
///
/// Curly quotes fold to their straight ASCII forms and `&nbsp;` folds to a
/// plain space so that whitespace collapsing treats it like any other gap.
pub static ENTITY_TABLE: &[(&str, &str)] = &[
    ("nbsp", " "),
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("ndash", "–"),
    ("mdash", "—"),
    ("lsquo", "'"),
    ("rsquo", "'"),
    ("ldquo", "\""),
    ("rdquo", "\""),
    ("hellip", "…"),
    ("bull", "•"),
    ("middot", "·"),
    ("copy", "©"),
    ("reg", "®"),
    ("trade", "™"),
    ("euro", "€"),
    ("pound", "£"),
    ("yen", "¥"),
    ("cent", "¢"),
    ("deg", "°"),
    ("plusmn", "±"),
    ("times", "×"),
    ("divide", "÷"),
    ("ne", "≠"),
    ("le", "≤"),
    ("ge", "≥"),
    ("para", "¶"),
    ("sect", "§"),
];

// One alternation per reference syntax: decimal, hexadecimal, named.
static ENTITY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9A-Fa-f]+)|([A-Za-z]+));")
        .expect("ENTITY_REF regex should compile")
});

pub fn lookup_named(name: &str) -> Option<&'static str> {
    ENTITY_TABLE
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, replacement)| *replacement)
}

/// Decode named, decimal and hexadecimal character references.
///
/// A single left-to-right scan, so a replacement is never rescanned:
/// `&amp;lt;` decodes to `&lt;`, not `<`. References that are unknown,
/// unparsable or outside `1..=MAX_CODE_POINT` are copied through verbatim.
pub fn decode(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REF
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = if let Some(decimal) = caps.get(1) {
                code_point(decimal.as_str(), 10)
            } else if let Some(hex) = caps.get(2) {
                code_point(hex.as_str(), 16)
            } else {
                caps.get(3)
                    .and_then(|name| lookup_named(name.as_str()))
                    .map(str::to_string)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn code_point(digits: &str, radix: u32) -> Option<String> {
    let value = u32::from_str_radix(digits, radix).ok()?;
    if !(1..=MAX_CODE_POINT).contains(&value) {
        return None;
    }
    // surrogate halves are in range but are not scalar values
    let ch = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
    Some(ch.to_string())
}
