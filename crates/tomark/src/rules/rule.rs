//! Rule and Converter types.

use std::fmt;
use std::sync::Arc;

use crate::node::NodeRef;
use crate::selector::Selector;

/// Conversion callback: receives the node and the converted text of its
/// children. `None` or an empty string defers to the fallback text.
pub type Converter = Arc<dyn Fn(NodeRef<'_>, &str) -> Option<String> + Send + Sync>;

/// Wrap a closure as a shareable [`Converter`]
pub fn converter<F>(f: F) -> Converter
where
    F: Fn(NodeRef<'_>, &str) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A single selector chain bound to its converter
#[derive(Clone)]
pub struct Rule {
    pub selector: Selector,
    pub converter: Converter,
}

impl Rule {
    pub fn new(selector: Selector, converter: Converter) -> Self {
        Self {
            selector,
            converter,
        }
    }

    /// Specificity of the match, if the selector matches `node`
    pub fn matches(&self, node: NodeRef<'_>) -> Option<usize> {
        self.selector.matches(node)
    }

    /// Run the converter, folding an empty result into `None`
    pub fn convert(&self, node: NodeRef<'_>, content: &str) -> Option<String> {
        (self.converter)(node, content).filter(|text| !text.is_empty())
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("selector", &self.selector.key())
            .finish_non_exhaustive()
    }
}
