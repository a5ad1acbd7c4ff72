//! Descendant selectors and their specificity.

use std::fmt;

use crate::node::NodeRef;

/// An ancestor chain such as `P DIV H3`, outermost token first.
///
/// The last token must name the node itself; every earlier token must name
/// some strict ancestor, in order, with any number of unrelated ancestors in
/// between. Tokens are compared case-insensitively and stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    tokens: Vec<String>,
}

impl Selector {
    /// Parse a single chain. Returns `None` for a blank key.
    pub fn parse(key: &str) -> Option<Self> {
        let tokens: Vec<String> = key.split_whitespace().map(str::to_uppercase).collect();
        (!tokens.is_empty()).then_some(Self { tokens })
    }

    /// Expand a comma-separated key into its chains, skipping empty pieces
    pub fn parse_list(keys: &str) -> impl Iterator<Item = Selector> + '_ {
        keys.split(',').filter_map(Selector::parse)
    }

    /// Normalized key: tokens joined by a single space
    pub fn key(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens in the chain
    pub fn specificity(&self) -> usize {
        self.tokens.len()
    }

    /// Match `node` and return the specificity on success.
    ///
    /// Ancestors are consumed innermost first. One that doesn't name the
    /// token currently sought is skipped. The document root never counts as
    /// an ancestor.
    pub fn matches(&self, node: NodeRef<'_>) -> Option<usize> {
        let (target, required) = self.tokens.split_last()?;
        if !node.has_rule_name(target) {
            return None;
        }

        let mut pending = required.iter().rev().peekable();
        for ancestor in node.ancestors().take_while(|a| !a.is_root()) {
            match pending.peek() {
                None => break,
                Some(token) if ancestor.has_rule_name(token) => {
                    pending.next();
                }
                Some(_) => {}
            }
        }

        pending.peek().is_none().then_some(self.specificity())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
