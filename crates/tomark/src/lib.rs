//! # tomark
//!
//! Convert DOM trees to Markdown with CSS-style descendant rules.
//!
//! A [`Renderer`] holds a table of conversion rules keyed by descendant
//! selectors such as `"UL LI"` or `"PRE CODE TEXT_NODE"`. While the tree is
//! walked bottom-up, every node is handed to [`Renderer::convert`] together
//! with the already converted text of its children; the most specific
//! matching rule decides what the node contributes to the output.
//!
//! ## Design
//!
//! - **Specificity, not order**: a rule with a longer ancestor chain always
//!   beats a shorter one, whatever the registration order.
//! - **Composable**: independently authored renderers can be merged with
//!   [`Renderer::mix`], which overwrites rules key by key.
//! - **Parser agnostic**: any parser can fill a [`Dom`]; HTML strings are
//!   supported through the default `html` feature.
//!
//! ## Example (rules)
//!
//! ```rust
//! use tomark::{Dom, Renderer};
//!
//! let mut renderer = Renderer::new();
//! renderer.add_rule("UL LI", |_, content| Some(format!("* {}\n", content)));
//!
//! let mut dom = Dom::new();
//! let ul = dom.append_element(dom.root_id(), "ul").unwrap();
//! let li = dom.append_element(ul, "li").unwrap();
//!
//! let node = dom.get(li).unwrap();
//! assert_eq!(renderer.convert(node, "item"), "* item\n");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! let markdown = tomark::to_mark("<h1>Hello <em>World</em></h1>").unwrap();
//! assert_eq!(markdown, "# Hello _World_");
//! ```

#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod renderer;
mod rules;
mod runner;
mod selector;
mod service;
mod utilities;

#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Dom, Node, NodeId, NodeRef, NodeType, TEXT_NODE};
pub use renderer::Renderer;
pub use rules::{basic_renderer, converter, gfm_renderer, Converter, Rule, RuleTable};
pub use runner::DomRunner;
pub use selector::Selector;
#[cfg(feature = "html")]
pub use service::to_mark;
pub use service::{CodeBlockStyle, HeadingStyle, MarkdownOptions, TomarkService};
pub use utilities::*;

/// Error type for tomark operations
#[derive(Debug, thiserror::Error)]
pub enum TomarkError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown node: {0}")]
    UnknownNode(usize),
}

pub type Result<T> = std::result::Result<T, TomarkError>;
