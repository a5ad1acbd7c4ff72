//! GitHub-flavoured rules, mixed over the CommonMark set.

use super::basic::{basic_renderer, code_language, fenced_code, list_item, list_marker};
use super::{converter, Converter};
use crate::node::NodeRef;
use crate::renderer::Renderer;
use crate::service::MarkdownOptions;
use crate::utilities::trim;

type Entry = (&'static str, Converter);

/// Create a renderer with the CommonMark rules plus strike-through, task
/// lists, fenced code and tables
pub fn gfm_renderer(options: &MarkdownOptions) -> Renderer {
    let mut renderer = basic_renderer(options);
    renderer.mix(&Renderer::factory(gfm_rules(options)));
    renderer
}

fn gfm_rules(options: &MarkdownOptions) -> Vec<Entry> {
    vec![
        strikethrough_rule(),
        fenced_code_block_rule(options),
        task_list_item_rule(options),
        table_rule(),
        table_row_rule(),
        table_cell_rule(),
    ]
}

fn strikethrough_rule() -> Entry {
    (
        "DEL, S, STRIKE",
        converter(|_, content| {
            if trim(content).is_empty() {
                return None;
            }
            Some(format!("~~{}~~", content))
        }),
    )
}

fn fenced_code_block_rule(options: &MarkdownOptions) -> Entry {
    let fence = options.fence.clone();
    (
        "PRE CODE",
        converter(move |node, content| {
            let language = match code_language(node) {
                language if language.is_empty() => node
                    .parent()
                    .map(code_language)
                    .unwrap_or_default(),
                language => language,
            };
            fenced_code(&fence, language, content)
        }),
    )
}

fn task_list_item_rule(options: &MarkdownOptions) -> Entry {
    let bullet = options.bullet_list_marker;
    (
        "UL LI, OL LI",
        converter(move |node, content| {
            let mut prefix = list_marker(node, bullet);
            if let Some(checked) = task_state(node) {
                prefix.push_str(if checked { "[x] " } else { "[ ] " });
            }
            Some(list_item(&prefix, content))
        }),
    )
}

/// `Some(checked)` when the item opens with a checkbox
fn task_state(item: NodeRef<'_>) -> Option<bool> {
    let first = item
        .children()
        .find(|c| !(c.is_text() && trim(c.value().unwrap_or_default()).is_empty()))?;

    let is_checkbox = first.tag_name() == "input"
        && first
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"));

    is_checkbox.then(|| first.has_attr("checked"))
}

fn table_rule() -> Entry {
    (
        "TABLE",
        converter(|_, content| {
            let content = content.trim_matches('\n');
            (!content.is_empty()).then(|| format!("\n\n{}\n\n", content))
        }),
    )
}

fn table_row_rule() -> Entry {
    (
        "TR",
        converter(|node, content| {
            let mut row = format!("|{}\n", content);
            if is_header_row(node) {
                row.push_str(&separator_row(node));
            }
            Some(row)
        }),
    )
}

fn table_cell_rule() -> Entry {
    (
        "TH, TD",
        converter(|_, content| {
            let cell = trim(content).replace('\n', " ").replace('|', "\\|");
            Some(format!(" {} |", cell))
        }),
    )
}

/// Rows of `table` in document order, looking through row groups
fn table_rows(table: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        match child.tag_name().as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child.element_children().filter(|c| c.tag_name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

/// The last row of a `<thead>`, or the first row of a table without one
fn is_header_row(row: NodeRef<'_>) -> bool {
    let Some(parent) = row.parent() else {
        return false;
    };

    if parent.tag_name() == "thead" {
        return parent
            .element_children()
            .filter(|c| c.tag_name() == "tr")
            .last()
            == Some(row);
    }

    let Some(table) = row.ancestors().find(|a| a.tag_name() == "table") else {
        return false;
    };
    let has_head = table.element_children().any(|c| c.tag_name() == "thead");
    !has_head && table_rows(table).first() == Some(&row)
}

fn separator_row(row: NodeRef<'_>) -> String {
    let cells: String = row
        .element_children()
        .filter(|c| matches!(c.tag_name().as_str(), "th" | "td"))
        .map(|cell| {
            let align = cell.attr("align").unwrap_or_default().to_lowercase();
            let marker = match align.as_str() {
                "left" => ":---",
                "right" => "---:",
                "center" => ":---:",
                _ => "---",
            };
            format!(" {} |", marker)
        })
        .collect();
    format!("|{}\n", cells)
}
