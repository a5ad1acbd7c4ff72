//! Pre-order cursor over a [`Dom`].

use crate::node::{Dom, NodeId, NodeRef};

/// Walks a tree in document order, one node per [`Iterator::next`] call.
///
/// The cursor starts on the document root, which is never yielded: the
/// first call moves to the root's first child. Converting bottom-up is a
/// matter of advancing once per child before converting the parent, see
/// [`crate::TomarkService::convert`].
#[derive(Debug, Clone)]
pub struct DomRunner<'a> {
    dom: &'a Dom,
    current: Option<NodeId>,
    started: bool,
}

impl<'a> DomRunner<'a> {
    pub fn new(dom: &'a Dom) -> Self {
        Self {
            dom,
            current: None,
            started: false,
        }
    }

    /// The node under the cursor, `None` before the first step and after the last
    pub fn current(&self) -> Option<NodeRef<'a>> {
        self.current.and_then(|id| self.dom.get(id))
    }

    fn following(node: NodeRef<'a>) -> Option<NodeRef<'a>> {
        if let Some(child) = node.first_child() {
            return Some(child);
        }

        let mut cursor = Some(node);
        while let Some(node) = cursor {
            if let Some(sibling) = node.next_sibling() {
                return Some(sibling);
            }
            cursor = node.parent();
        }
        None
    }
}

impl<'a> Iterator for DomRunner<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match self.current() {
            Some(node) => Self::following(node),
            None if !self.started => self.dom.root().first_child(),
            None => None,
        };

        self.started = true;
        self.current = next.map(|node| node.id());
        next
    }
}
