// SPDX-License-Identifier: MIT
//! In-memory XML element tree
//!
//! The tree follows the classic "text and tail" model: an element's `text` is
//! the character data before its first child, and each child's `tail` is the
//! character data that follows it inside the parent. Comments are kept as
//! nodes so that documents loaded from disk survive a merge untouched.

/// Kind of node stored in an [`Element`] slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A regular element with a tag name
    Element,

    /// A comment; its body lives in `text`
    Comment,
}

/// An XML element (or comment node)
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: NodeKind,
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
    tail: Option<String>,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            tail: None,
        }
    }

    /// Create a comment node
    pub fn comment(body: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment,
            tag: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: Some(body.into()),
            tail: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind == NodeKind::Comment
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get an attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any previous value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(idx).1)
    }

    /// Attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub(crate) fn text_slot(&mut self) -> &mut Option<String> {
        &mut self.text
    }

    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    pub fn set_tail(&mut self, tail: impl Into<String>) {
        self.tail = Some(tail.into());
    }

    pub(crate) fn tail_slot(&mut self) -> &mut Option<String> {
        &mut self.tail
    }

    /// All child nodes, comments included
    pub fn nodes(&self) -> &[Element] {
        &self.children
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// Child elements, skipping comments
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(|c| !c.is_comment())
    }

    /// Mutable child elements, skipping comments
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter(|c| !c.is_comment())
    }

    /// Number of child elements (comments excluded)
    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    /// First child element
    pub fn first_child(&self) -> Option<&Element> {
        self.children().next()
    }

    pub fn first_child_mut(&mut self) -> Option<&mut Element> {
        self.children_mut().next()
    }

    /// First child element with the given tag
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children().find(|c| c.tag == tag)
    }

    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children_mut().find(|c| c.tag == tag)
    }

    /// All child elements with the given tag
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().filter(move |c| c.tag == tag)
    }

    /// First child with the given tag, appending an empty one if none exists
    pub fn find_or_insert(&mut self, tag: &str) -> &mut Element {
        let idx = match self
            .children
            .iter()
            .position(|c| !c.is_comment() && c.tag == tag)
        {
            Some(idx) => idx,
            None => {
                self.children.push(Element::new(tag));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Append a child node
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Builder-style attribute set
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}
