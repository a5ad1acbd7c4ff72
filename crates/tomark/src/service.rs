//! TomarkService - the main entry point for DOM to Markdown conversion.

use crate::node::{Dom, NodeRef};
use crate::renderer::Renderer;
use crate::rules::{basic_renderer, gfm_renderer};
use crate::runner::DomRunner;
use crate::utilities::collapse_newlines;

#[cfg(feature = "html")]
use crate::Result;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
    /// Use setext-style headings (underlined with = or -) for levels 1 and 2
    Setext,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    #[default]
    Indented,
    /// Use fenced code blocks (```)
    Fenced,
}

/// Options read by the bundled rule sets
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Heading style (atx or setext)
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "- - -".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
        }
    }
}

/// Converts whole trees by driving a [`Renderer`] bottom-up
pub struct TomarkService {
    options: MarkdownOptions,
    renderer: Renderer,
}

impl TomarkService {
    /// Create a service with the basic (CommonMark) rules and default options
    pub fn new() -> Self {
        Self::with_options(MarkdownOptions::default())
    }

    /// Create a service with the basic rules and custom options
    pub fn with_options(options: MarkdownOptions) -> Self {
        Self {
            renderer: basic_renderer(&options),
            options,
        }
    }

    /// Create a service with the GitHub-flavoured rules
    pub fn gfm() -> Self {
        Self::gfm_with_options(MarkdownOptions::default())
    }

    pub fn gfm_with_options(options: MarkdownOptions) -> Self {
        Self {
            renderer: gfm_renderer(&options),
            options,
        }
    }

    /// Add a custom rule
    pub fn add_rule<F>(&mut self, selector: &str, f: F) -> &mut Self
    where
        F: Fn(NodeRef<'_>, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.renderer.add_rule(selector, f);
        self
    }

    /// Mix another renderer's rules over the current ones
    pub fn mix(&mut self, other: &Renderer) -> &mut Self {
        self.renderer.mix(other);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Get the options the rule set was built with
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        self.renderer.escape_text(text)
    }

    /// Convert a whole tree to Markdown.
    ///
    /// Rules run bottom-up through one recursive call per level of nesting,
    /// so the stack depth grows with the depth of the tree. Pathologically
    /// deep input (tens of thousands of nested elements) can overflow the
    /// thread's stack.
    pub fn convert(&self, dom: &Dom) -> String {
        let mut runner = DomRunner::new(dom);
        let mut output = String::new();

        while runner.next().is_some() {
            output.push_str(&self.track(&mut runner));
        }

        post_process(&output)
    }

    /// Parse HTML and convert it to Markdown
    #[cfg(feature = "html")]
    pub fn convert_html(&self, html: &str) -> Result<String> {
        let dom = crate::html::parse_html(html)?;
        Ok(self.convert(&dom))
    }

    /// Convert the node under the cursor, consuming its whole subtree.
    ///
    /// Children are converted first by stepping the runner once per child,
    /// so the parent's rule sees their joined output. Text nodes have no
    /// children and get an empty fallback.
    fn track(&self, runner: &mut DomRunner<'_>) -> String {
        let Some(node) = runner.current() else {
            return String::new();
        };

        let mut content = String::new();
        for _ in 0..node.children().count() {
            if runner.next().is_none() {
                break;
            }
            content.push_str(&self.track(runner));
        }

        self.renderer.convert(node, &content)
    }
}

impl Default for TomarkService {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an HTML string with the basic rules and default options
#[cfg(feature = "html")]
pub fn to_mark(html: &str) -> Result<String> {
    TomarkService::new().convert_html(html)
}

/// Trim surrounding newlines and keep at most one blank line in a row
fn post_process(output: &str) -> String {
    collapse_newlines(output.trim_matches('\n'))
}
