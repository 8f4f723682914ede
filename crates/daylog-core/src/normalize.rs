//! Display text normalization: priority signal and tag extraction.

use regex::Regex;
use std::sync::LazyLock;

// Prefix followed by Unicode letters, Unicode digits, `_` or `-`.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#@][\p{L}\p{N}_-]+").expect("valid tag regex"));

/// Normalized form of a line's text after its marker is removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    /// Text with the priority bang removed and outer whitespace trimmed.
    pub text: String,
    /// Whether a priority signal was found.
    pub priority: bool,
    /// Tags in order of appearance, prefix included.
    pub tags: Vec<String>,
}

/// Normalize marker-stripped text.
///
/// At most one `!` is consumed as the priority signal: a leading one (with
/// the whitespace after it) takes precedence, otherwise the first `!` that
/// stands alone between whitespace and whitespace-or-end collapses to a
/// single space. Any further `!` stays in the text. Tags are extracted from
/// the input before the bang is removed and are left in the text.
#[must_use]
pub fn normalize(stripped: &str) -> Normalized {
    let stripped = stripped.trim_start();
    let tags = extract_tags(stripped);

    let (text, priority) = if let Some(rest) = stripped.strip_prefix('!') {
        (rest.trim().to_string(), true)
    } else if let Some((start, end)) = find_standalone_bang(stripped) {
        let collapsed = format!("{} {}", &stripped[..start], &stripped[end..]);
        (collapsed.trim().to_string(), true)
    } else {
        (stripped.trim().to_string(), false)
    };

    Normalized {
        text,
        priority,
        tags,
    }
}

/// Byte range of the first `<ws>!<ws|end>` run, including the surrounding
/// whitespace characters.
fn find_standalone_bang(text: &str) -> Option<(usize, usize)> {
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !c.is_whitespace() {
            continue;
        }
        let Some(&(bang, '!')) = chars.peek() else {
            continue;
        };
        let after = bang + 1;
        match text[after..].chars().next() {
            None => return Some((start, after)),
            Some(ws) if ws.is_whitespace() => return Some((start, after + ws.len_utf8())),
            Some(_) => {}
        }
    }

    None
}

/// Collect every `#`/`@` token in left-to-right order.
///
/// A token is the prefix followed by the longest run of Unicode letters,
/// Unicode digits, `_` or `-`; a bare prefix is not a tag. Duplicates are
/// kept.
#[must_use]
pub fn extract_tags(text: &str) -> Vec<String> {
    TAG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
