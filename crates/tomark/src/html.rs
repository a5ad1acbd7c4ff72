//! HTML parsing support.
//!
//! This module parses HTML strings into the [`Dom`] used by tomark.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::{Dom, Node, NodeId};
use crate::Result;

/// Parse an HTML fragment into a [`Dom`].
///
/// The parsed content hangs directly off the document root, so the wrapper
/// element the parser adds around a fragment never takes part in matching.
/// Comments and processing instructions are dropped.
///
/// # Example
///
/// ```rust
/// use tomark::{parse_html, DomRunner};
///
/// let dom = parse_html("<h1>Hello <em>World</em></h1>").unwrap();
/// let h1 = DomRunner::new(&dom).next().unwrap();
/// assert_eq!(h1.tag_name(), "h1");
/// ```
pub fn parse_html(html: &str) -> Result<Dom> {
    let document = Html::parse_fragment(html);
    let mut dom = Dom::new();
    let root = dom.root_id();
    append_children(&mut dom, root, document.root_element())?;
    Ok(dom)
}

/// Copy the children of a scraper element below `parent`
fn append_children(dom: &mut Dom, parent: NodeId, element: ElementRef) -> Result<()> {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                dom.append(parent, Node::text(&text.text))?;
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    let value = child_element.value();
                    let attrs: Vec<(&str, &str)> = value.attrs().collect();
                    let id = dom.append(parent, Node::element_with_attrs(value.name(), attrs))?;
                    append_children(dom, id, child_element)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    #[test]
    fn test_parse_simple_html() {
        let dom = parse_html("<p>Hello World</p>").unwrap();
        let root = dom.root();
        assert_eq!(root.children().count(), 1);

        let p = root.first_child().unwrap();
        assert_eq!(p.tag_name(), "p");
        assert_eq!(p.parent(), Some(root));
        assert_eq!(p.text_content(), "Hello World");
    }

    #[test]
    fn test_parse_keeps_attributes_and_text() {
        let dom = parse_html(r#"<a href="https://example.com" title="Ex">Link</a> tail"#).unwrap();
        let root = dom.root();

        let a = root.first_child().unwrap();
        assert_eq!(a.attr("href"), Some("https://example.com"));
        assert_eq!(a.attr("title"), Some("Ex"));

        let tail = a.next_sibling().unwrap();
        assert_eq!(tail.node_type(), NodeType::Text);
        assert_eq!(tail.value(), Some(" tail"));
    }

    #[test]
    fn test_parse_drops_comments() {
        let dom = parse_html("<p>a<!-- note -->b</p>").unwrap();
        let p = dom.root().first_child().unwrap();
        assert_eq!(p.children().count(), 2);
        assert_eq!(p.text_content(), "ab");
    }
}
