//! Arena-backed DOM tree for rule-driven Markdown conversion.
//!
//! Nodes live in a [`Dom`] and refer to each other through [`NodeId`]s. The
//! parent link is a plain index, so walking up the tree never involves
//! ownership. Any parser (scraper, CDP, hand-built trees) can fill a `Dom`.

use crate::{Result, TomarkError};

/// Rule name under which text nodes are matched
pub const TEXT_NODE: &str = "TEXT_NODE";

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Document node (nodeType = 9)
    Document = 9,
}

/// The payload of a DOM node, detached from any tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, 9 = Document)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Raw text content for text nodes
    pub node_value: Option<String>,

    /// Attributes as (name, value) pairs, in source order
    pub attributes: Vec<(String, String)>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        Self {
            attributes: attrs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::element(tag_name)
        }
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: Vec::new(),
        }
    }

    fn document() -> Self {
        Self {
            node_type: NodeType::Document,
            node_name: "#document".to_string(),
            node_value: None,
            attributes: Vec::new(),
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name (case-insensitive)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Index of a node inside its [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    /// Position in the parent's child list
    index: usize,
    children: Vec<NodeId>,
}

/// A document tree. Slot 0 is always the document root, which has no parent.
#[derive(Debug, Clone)]
pub struct Dom {
    slots: Vec<Slot>,
}

impl Dom {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: Node::document(),
                parent: None,
                index: 0,
                children: Vec::new(),
            }],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            dom: self,
            id: self.root_id(),
        }
    }

    /// Look up a node by id
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.slots.len()).then_some(NodeRef { dom: self, id })
    }

    /// Number of nodes, the root included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the tree holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.slots.len() == 1
    }

    /// Append `node` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        let slot = self
            .slots
            .get(parent.0)
            .ok_or(TomarkError::UnknownNode(parent.0))?;

        if slot.node.is_text() {
            return Err(TomarkError::InvalidInput(format!(
                "text node {} cannot have children",
                parent.0
            )));
        }
        if node.node_type == NodeType::Document {
            return Err(TomarkError::InvalidInput(
                "a document node can only be the root".to_string(),
            ));
        }

        let id = NodeId(self.slots.len());
        let index = slot.children.len();
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            index,
            children: Vec::new(),
        });
        self.slots[parent.0].children.push(id);
        Ok(id)
    }

    /// Append a new element with the given tag
    pub fn append_element(&mut self, parent: NodeId, tag_name: &str) -> Result<NodeId> {
        self.append(parent, Node::element(tag_name))
    }

    /// Append a new text node
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> Result<NodeId> {
        self.append(parent, Node::text(content))
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed handle on a node that can navigate the surrounding tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn slot(&self) -> &'a Slot {
        &self.dom.slots[self.id.0]
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { dom: self.dom, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying node payload
    pub fn node(&self) -> &'a Node {
        &self.slot().node
    }

    pub fn node_type(&self) -> NodeType {
        self.node().node_type
    }

    pub fn is_element(&self) -> bool {
        self.node().is_element()
    }

    pub fn is_text(&self) -> bool {
        self.node().is_text()
    }

    /// Check if this is the document root
    pub fn is_root(&self) -> bool {
        self.node_type() == NodeType::Document
    }

    pub fn tag_name(&self) -> String {
        self.node().tag_name()
    }

    /// Name used to match this node against selector tokens:
    /// the uppercase tag for elements, [`TEXT_NODE`] for text.
    pub fn rule_name(&self) -> String {
        if self.is_text() {
            TEXT_NODE.to_string()
        } else {
            self.node().node_name.to_uppercase()
        }
    }

    /// Case-insensitive comparison against a selector token
    pub fn has_rule_name(&self, name: &str) -> bool {
        match self.node_type() {
            NodeType::Text => name.eq_ignore_ascii_case(TEXT_NODE),
            NodeType::Element => self.node().node_name.eq_ignore_ascii_case(name),
            NodeType::Document => false,
        }
    }

    /// Raw text payload of a text node
    pub fn value(&self) -> Option<&'a str> {
        self.node().node_value.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node().attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.slot().parent.map(|id| self.at(id))
    }

    /// Parent, grandparent, ... up to and including the document root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let dom = self.dom;
        self.slot()
            .children
            .iter()
            .map(move |&id| NodeRef { dom, id })
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.children().filter(|n| n.is_element())
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.slot().children.first().map(|&id| self.at(id))
    }

    /// Position among the parent's children
    pub fn index_in_parent(&self) -> Option<usize> {
        self.slot().parent.map(|_| self.slot().index)
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        let index = self.index_in_parent()?;
        let siblings = &self.parent()?.slot().children;
        index.checked_sub(1).map(|i| self.at(siblings[i]))
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        let index = self.index_in_parent()?;
        let siblings = &self.parent()?.slot().children;
        siblings.get(index + 1).map(|&id| self.at(id))
    }

    /// Get all raw text from this node and its descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let slot = &self.dom.slots[id.0];
            if let Some(value) = slot.node.node_value.as_deref() {
                text.push_str(value);
            }
            stack.extend(slot.children.iter().rev());
        }
        text
    }

    /// First character of [`NodeRef::text_content`], without building it
    pub fn first_text_char(&self) -> Option<char> {
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let slot = &self.dom.slots[id.0];
            if let Some(c) = slot.node.node_value.as_deref().and_then(|v| v.chars().next()) {
                return Some(c);
            }
            stack.extend(slot.children.iter().rev());
        }
        None
    }

    /// Last character of [`NodeRef::text_content`], without building it
    pub fn last_text_char(&self) -> Option<char> {
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let slot = &self.dom.slots[id.0];
            if let Some(c) = slot.node.node_value.as_deref().and_then(|v| v.chars().next_back()) {
                return Some(c);
            }
            stack.extend(slot.children.iter());
        }
        None
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dom, other.dom) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}
