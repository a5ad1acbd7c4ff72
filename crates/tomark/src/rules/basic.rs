//! CommonMark rules for DOM to Markdown conversion.

use std::num::IntErrorKind;

use super::{converter, Converter};
use crate::node::NodeRef;
use crate::renderer::Renderer;
use crate::service::{CodeBlockStyle, HeadingStyle, MarkdownOptions};
use crate::utilities::{
    clean_attribute, collapse_newlines, collapse_whitespace, escape_text, get_space_controlled, repeat, trim,
};

type Entry = (&'static str, Converter);

/// Largest ordinal a CommonMark ordered list item may carry (nine digits)
const MAX_ORDINAL: i64 = 999_999_999;

/// Create a renderer holding every CommonMark rule
pub fn basic_renderer(options: &MarkdownOptions) -> Renderer {
    Renderer::factory(basic_rules(options))
}

fn basic_rules(options: &MarkdownOptions) -> Vec<Entry> {
    vec![
        text_rule(),
        raw_text_rule(),
        paragraph_rule(),
        line_break_rule(),
        heading_rule(options),
        blockquote_rule(),
        list_rule(),
        nested_list_rule(),
        list_item_rule(options),
        code_block_rule(options),
        preformatted_rule(),
        horizontal_rule(options),
        link_rule(),
        emphasis_rule(options),
        strong_rule(options),
        code_rule(),
        image_rule(),
    ]
}

fn text_rule() -> Entry {
    (
        "TEXT_NODE",
        converter(|node, _| {
            let collapsed = collapse_whitespace(node.value().unwrap_or_default());
            let escaped = escape_text(trim(&collapsed));
            Some(get_space_controlled(&escaped, node))
        }),
    )
}

fn raw_text_rule() -> Entry {
    (
        "PRE TEXT_NODE, CODE TEXT_NODE",
        converter(|node, _| node.value().map(str::to_string)),
    )
}

fn paragraph_rule() -> Entry {
    ("P", converter(|_, content| block(trim(content))))
}

fn line_break_rule() -> Entry {
    ("BR", converter(|_, _| Some("  \n".to_string())))
}

fn heading_rule(options: &MarkdownOptions) -> Entry {
    let style = options.heading_style;
    (
        "H1, H2, H3, H4, H5, H6",
        converter(move |node, content| {
            let tag = node.tag_name();
            let level: usize = tag[1..].parse().unwrap_or(1);

            let content = trim(content);
            if content.is_empty() {
                return None;
            }

            match style {
                HeadingStyle::Setext if level <= 2 => {
                    let underline = if level == 1 { "=" } else { "-" };
                    block(&format!(
                        "{}\n{}",
                        content,
                        repeat(underline, content.chars().count())
                    ))
                }
                _ => block(&format!("{} {}", repeat("#", level), content)),
            }
        }),
    )
}

fn blockquote_rule() -> Entry {
    (
        "BLOCKQUOTE",
        converter(|_, content| {
            let content = collapse_newlines(trim(content));
            if content.is_empty() {
                return None;
            }
            let quoted: Vec<String> = content
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", line)
                    }
                })
                .collect();
            block(&quoted.join("\n"))
        }),
    )
}

fn list_rule() -> Entry {
    (
        "UL, OL",
        converter(|_, content| block(content.trim_matches('\n'))),
    )
}

fn nested_list_rule() -> Entry {
    (
        "LI UL, LI OL",
        converter(|_, content| {
            let content = content.trim_matches('\n');
            (!trim(content).is_empty()).then(|| format!("\n{}\n", content))
        }),
    )
}

fn list_item_rule(options: &MarkdownOptions) -> Entry {
    let bullet = options.bullet_list_marker;
    (
        "UL LI, OL LI",
        converter(move |node, content| Some(list_item(&list_marker(node, bullet), content))),
    )
}

fn code_block_rule(options: &MarkdownOptions) -> Entry {
    let style = options.code_block_style;
    let fence = options.fence.clone();
    (
        "PRE CODE",
        converter(move |node, content| match style {
            CodeBlockStyle::Indented => indented_code(content),
            CodeBlockStyle::Fenced => fenced_code(&fence, code_language(node), content),
        }),
    )
}

fn preformatted_rule() -> Entry {
    (
        "PRE",
        converter(|node, content| {
            // PRE CODE already rendered the block
            if node.element_children().any(|c| c.tag_name() == "code") {
                return None;
            }
            indented_code(content)
        }),
    )
}

fn horizontal_rule(options: &MarkdownOptions) -> Entry {
    let hr = options.hr.clone();
    ("HR", converter(move |_, _| block(&hr)))
}

fn link_rule() -> Entry {
    (
        "A",
        converter(|node, content| {
            let href = clean_attribute(node.attr("href"));
            if href.is_empty() {
                return None;
            }

            let title_part = node
                .attr("title")
                .map(|t| format!(" \"{}\"", t))
                .unwrap_or_default();

            Some(format!("[{}]({}{})", content, href, title_part))
        }),
    )
}

fn emphasis_rule(options: &MarkdownOptions) -> Entry {
    let delimiter = options.em_delimiter;
    (
        "EM, I",
        converter(move |_, content| {
            if trim(content).is_empty() {
                return None;
            }
            Some(format!("{}{}{}", delimiter, content, delimiter))
        }),
    )
}

fn strong_rule(options: &MarkdownOptions) -> Entry {
    let delimiter = options.strong_delimiter.clone();
    (
        "STRONG, B",
        converter(move |_, content| {
            if trim(content).is_empty() {
                return None;
            }
            Some(format!("{}{}{}", delimiter, content, delimiter))
        }),
    )
}

fn code_rule() -> Entry {
    (
        "CODE",
        converter(|node, _| {
            let content = node.text_content();
            if content.is_empty() {
                return None;
            }

            // Count backticks needed
            let max_consecutive_backticks = content
                .chars()
                .fold((0usize, 0usize), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_consecutive_backticks + 1);

            if max_consecutive_backticks > 0 {
                Some(format!("{} {} {}", backticks, content, backticks))
            } else {
                Some(format!("{}{}{}", backticks, content, backticks))
            }
        }),
    )
}

fn image_rule() -> Entry {
    (
        "IMG",
        converter(|node, _| {
            let alt = clean_attribute(node.attr("alt"));
            let src = clean_attribute(node.attr("src"));
            if src.is_empty() {
                return None;
            }

            let title_part = node
                .attr("title")
                .map(|t| format!(" \"{}\"", t))
                .unwrap_or_default();

            Some(format!("![{}]({}{})", alt, src, title_part))
        }),
    )
}

/// Surround a block with blank lines, `None` when there is nothing to show
fn block(content: &str) -> Option<String> {
    (!content.is_empty()).then(|| format!("\n\n{}\n\n", content))
}

/// Bullet for items of unordered lists, ordinal for items of an `<ol>`
pub(super) fn list_marker(node: NodeRef<'_>, bullet: char) -> String {
    match node.parent() {
        Some(list) if list.tag_name() == "ol" => {
            let start = list.attr("start").and_then(parse_start).unwrap_or(1);
            let index = list
                .element_children()
                .take_while(|c| *c != node)
                .filter(|c| c.tag_name() == "li")
                .count();
            let ordinal = start
                .saturating_add(i64::try_from(index).unwrap_or(i64::MAX))
                .min(MAX_ORDINAL);
            let marker = format!("{}.", ordinal);
            format!("{:<width$}", marker, width = (marker.len() + 1).max(4))
        }
        _ => format!("{}   ", bullet),
    }
}

/// Parse an `<ol start>` value, clamped to the ordinals Markdown can express
fn parse_start(value: &str) -> Option<i64> {
    let start = match value.trim().parse::<i64>() {
        Ok(start) => start,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => MAX_ORDINAL,
            IntErrorKind::NegOverflow => 0,
            _ => return None,
        },
    };
    Some(start.clamp(0, MAX_ORDINAL))
}

/// Prefix the item and indent its continuation lines under the marker
pub(super) fn list_item(prefix: &str, content: &str) -> String {
    let content = collapse_newlines(trim(content));
    let indented: Vec<String> = content
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("    {}", line)
            }
        })
        .collect();
    format!("{}{}\n", prefix, indented.join("\n"))
}

/// Language hint from `data-language` or a `language-*` / `lang-*` class
pub(super) fn code_language(node: NodeRef<'_>) -> String {
    if let Some(language) = node.attr("data-language") {
        return language.trim().to_string();
    }

    node.attr("class")
        .unwrap_or_default()
        .split_whitespace()
        .find_map(|c| c.strip_prefix("language-").or_else(|| c.strip_prefix("lang-")))
        .unwrap_or_default()
        .to_string()
}

fn indented_code(content: &str) -> Option<String> {
    let code = content.trim_end_matches('\n');
    if code.trim().is_empty() {
        return None;
    }
    let indented: Vec<String> = code.lines().map(|line| format!("    {}", line)).collect();
    block(&indented.join("\n"))
}

pub(super) fn fenced_code(fence: &str, language: String, content: &str) -> Option<String> {
    let code = content.trim_end_matches('\n');
    if code.trim().is_empty() {
        return None;
    }
    block(&format!("{}{}\n{}\n{}", fence, language, code, fence))
}
