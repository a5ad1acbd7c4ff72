//! Text hygiene helpers shared by the renderer and the bundled rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::NodeRef;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu",
    "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Characters escaped by [`escape_text`]
pub const MARKDOWN_SPECIAL: &[char] = &[
    '*', '(', ')', '[', ']', '{', '}', '_', '#', '`', '+', '-', '.', '!',
];

// U+00A0 is content and never trimmed.
const TRIMMABLE: &[char] = &[' ', '\t', '\r', '\n'];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\n]+").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Text nodes and non-block elements
pub fn is_inline(node: NodeRef<'_>) -> bool {
    node.is_text() || (node.is_element() && !is_block(&node.tag_name()))
}

/// Repeat a string n times
pub fn repeat(s: &str, n: usize) -> String {
    s.repeat(n)
}

/// Clean an attribute value (trim and handle empty)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Strip leading and trailing spaces, tabs, CR and LF.
///
/// Non-breaking spaces survive, as does everything between the ends.
pub fn trim(text: &str) -> &str {
    text.trim_matches(TRIMMABLE)
}

/// Replace every run of ordinary whitespace with a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Keep at most one blank line in a row
pub fn collapse_newlines(text: &str) -> String {
    EXCESS_NEWLINES.replace_all(text, "\n\n").into_owned()
}

/// Backslash-escape every Markdown special character, one by one.
///
/// Only meant for literal text node content, never for rule output.
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

fn is_trimmable(c: Option<char>) -> bool {
    c.is_some_and(|c| TRIMMABLE.contains(&c))
}

/// Restore the single space that trimming removed at an inline boundary.
///
/// `text` is the trimmed rendering of `node`. A space is put in front when
/// the previous inline sibling ends with whitespace or the raw text of
/// `node` starts with it, and after it under the mirrored condition on the
/// next sibling. Non-breaking spaces never trigger an insertion, and at most
/// one space is added per side without doubling one already present.
pub fn get_space_controlled(text: &str, node: NodeRef<'_>) -> String {
    let lead = node
        .previous_sibling()
        .filter(|prev| is_inline(*prev))
        .is_some_and(|prev| is_trimmable(prev.last_text_char()) || is_trimmable(node.first_text_char()));

    let trail = node
        .next_sibling()
        .filter(|next| is_inline(*next))
        .is_some_and(|next| is_trimmable(next.first_text_char()) || is_trimmable(node.last_text_char()));

    let mut result = String::with_capacity(text.len() + 2);
    if lead && !text.starts_with(' ') {
        result.push(' ');
    }
    result.push_str(text);
    if trail && !result.ends_with(' ') {
        result.push(' ');
    }
    result
}
