//! In-memory node tree.
//!
//! [`VNode`] behaves like a small DOM: elements carry ordered attributes and a
//! hidden flag, text nodes carry their content, and inserting an attached node
//! moves it. It backs headless live roots and lets tests check the physical tree
//! against the logical one.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use crate::html;
use crate::node::{Document, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
enum VNodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        hidden: bool,
    },
    Text(String),
}

#[derive(Debug)]
struct VNodeData {
    kind: VNodeKind,
    parent: Weak<RefCell<VNodeData>>,
    children: Vec<VNode>,
}

/// Handle to an in-memory node.
#[derive(Clone)]
pub struct VNode(Rc<RefCell<VNodeData>>);

impl VNode {
    /// Creates a detached element.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::from_kind(VNodeKind::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            hidden: false,
        })
    }

    /// Creates a detached text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(VNodeKind::Text(text.into()))
    }

    fn from_kind(kind: VNodeKind) -> Self {
        Self(Rc::new(RefCell::new(VNodeData {
            kind,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    /// Returns the tag name, or `None` for text nodes.
    #[must_use]
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            VNodeKind::Element { tag, .. } => Some(tag.clone()),
            VNodeKind::Text(_) => None,
        }
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            VNodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
            VNodeKind::Text(_) => None,
        }
    }

    /// Returns whether the element is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self.0.borrow().kind, VNodeKind::Element { hidden: true, .. })
    }

    /// Returns the concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        match &data.kind {
            VNodeKind::Text(text) => text.clone(),
            VNodeKind::Element { .. } => data.children.iter().map(Self::text_content).collect(),
        }
    }

    /// Returns a snapshot of the physical children.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.borrow().children.clone()
    }

    /// Returns the parent node, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.upgrade().map(Self)
    }

    /// Serializes this node including its own tag.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            VNodeKind::Text(text) => html::escape_text(out, text),
            VNodeKind::Element {
                tag,
                attributes,
                hidden,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    html::write_attribute(out, name, value);
                }
                if *hidden {
                    html::write_flag(out, "hidden");
                }
                out.push('>');
                if html::is_void_element(tag) {
                    return;
                }
                for child in &data.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn detach_from_parent(&self) {
        let parent = self.0.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|sibling| !Rc::ptr_eq(&sibling.0, &self.0));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn find_descendant(&self, predicate: &dyn Fn(&Self) -> bool) -> Option<Self> {
        for child in self.children() {
            if predicate(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate) {
                return Some(found);
            }
        }
        None
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.borrow().kind {
            VNodeKind::Element { tag, .. } => write!(f, "VNode(<{tag}>)"),
            VNodeKind::Text(text) => write!(f, "VNode({text:?})"),
        }
    }
}

impl Node for VNode {
    fn insert_before(&self, child: &Self, reference: Option<&Self>) {
        assert!(!self.same_node(child), "cannot insert a node into itself");
        child.detach_from_parent();

        let mut data = self.0.borrow_mut();
        let position = match reference {
            Some(reference) => data
                .children
                .iter()
                .position(|sibling| sibling.same_node(reference))
                .expect("reference node must be a child of the target node"),
            None => data.children.len(),
        };
        data.children.insert(position, child.clone());
        drop(data);

        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
    }

    fn remove_child(&self, child: &Self) {
        let mut data = self.0.borrow_mut();
        let position = data
            .children
            .iter()
            .position(|sibling| sibling.same_node(child))
            .expect("removed node must be a child of the target node");
        data.children.remove(position);
        drop(data);

        child.0.borrow_mut().parent = Weak::new();
    }

    fn child_at(&self, index: usize) -> Option<Self> {
        self.0.borrow().children.get(index).cloned()
    }

    fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    fn clear_children(&self) {
        let children = core::mem::take(&mut self.0.borrow_mut().children);
        for child in children {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn set_attribute(&self, name: &str, value: Option<&str>) {
        if let VNodeKind::Element { attributes, .. } = &mut self.0.borrow_mut().kind {
            let existing = attributes.iter().position(|(key, _)| key == name);
            match (existing, value) {
                (Some(index), Some(value)) => attributes[index].1 = value.to_owned(),
                (None, Some(value)) => attributes.push((name.to_owned(), value.to_owned())),
                (Some(index), None) => {
                    attributes.remove(index);
                }
                (None, None) => {}
            }
        }
    }

    fn set_text(&self, text: &str) {
        let is_text = matches!(self.0.borrow().kind, VNodeKind::Text(_));
        if is_text {
            self.0.borrow_mut().kind = VNodeKind::Text(text.to_owned());
        } else {
            self.clear_children();
            if !text.is_empty() {
                self.insert_before(&Self::text(text), None);
            }
        }
    }

    fn set_hidden(&self, hidden: bool) {
        if let VNodeKind::Element { hidden: flag, .. } = &mut self.0.borrow_mut().kind {
            *flag = hidden;
        }
    }

    fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            child.write_html(&mut out);
        }
        out
    }
}

/// In-memory document with a `<body>` element.
#[derive(Debug, Clone)]
pub struct VDocument {
    body: VNode,
}

impl Default for VDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: VNode::element("body"),
        }
    }
}

impl Document for VDocument {
    type Node = VNode;

    fn create_element(&self, tag: &str) -> VNode {
        VNode::element(tag)
    }

    fn create_text(&self, text: &str) -> VNode {
        VNode::text(text)
    }

    fn element_by_id(&self, id: &str) -> Option<VNode> {
        self.body
            .find_descendant(&|node| node.attribute("id").as_deref() == Some(id))
    }

    fn body(&self) -> Option<VNode> {
        Some(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(node: &VNode) -> Vec<String> {
        node.children()
            .iter()
            .map(|child| child.tag().unwrap_or_else(|| child.text_content()))
            .collect()
    }

    #[test]
    fn insert_before_moves_attached_nodes() {
        let parent = VNode::element("ul");
        let a = VNode::element("a");
        let b = VNode::element("b");
        let c = VNode::element("c");
        parent.insert_before(&a, None);
        parent.insert_before(&b, None);
        parent.insert_before(&c, None);

        parent.insert_before(&c, Some(&a));
        assert_eq!(tags(&parent), ["c", "a", "b"]);
        assert!(c.parent().is_some_and(|p| p.same_node(&parent)));
    }

    #[test]
    fn insert_moves_between_parents() {
        let left = VNode::element("div");
        let right = VNode::element("div");
        let item = VNode::text("x");
        left.insert_before(&item, None);
        right.insert_before(&item, None);
        assert_eq!(left.child_count(), 0);
        assert_eq!(right.child_count(), 1);
    }

    #[test]
    #[should_panic(expected = "must be a child")]
    fn removing_a_stranger_panics() {
        let parent = VNode::element("div");
        parent.remove_child(&VNode::element("span"));
    }

    #[test]
    fn serializes_attributes_in_insertion_order() {
        let node = VNode::element("input");
        node.set_attribute("type", Some("text"));
        node.set_attribute("name", Some("q"));
        node.set_attribute("type", Some("search"));
        node.set_hidden(true);
        assert_eq!(
            node.outer_html(),
            "<input type=\"search\" name=\"q\" hidden>"
        );

        node.set_attribute("type", None);
        assert_eq!(node.attribute("type"), None);
    }

    #[test]
    fn set_text_mutates_text_nodes_in_place() {
        let parent = VNode::element("p");
        let text = VNode::text("1");
        parent.insert_before(&text, None);
        text.set_text("2");
        assert!(parent.child_at(0).is_some_and(|node| node.same_node(&text)));
        assert_eq!(parent.inner_html(), "2");
    }

    #[test]
    fn clear_children_detaches_everything() {
        let parent = VNode::element("div");
        let child = VNode::element("span");
        parent.insert_before(&child, None);
        parent.clear_children();
        assert_eq!(parent.child_count(), 0);
        assert!(child.parent().is_none());
    }

    #[test]
    fn document_finds_elements_by_id() {
        let document = VDocument::new();
        let body = document.body().expect("virtual documents have a body");
        let host = document.create_element("div");
        host.set_attribute("id", Some("app"));
        body.insert_before(&host, None);

        assert!(
            document
                .element_by_id("app")
                .is_some_and(|found| found.same_node(&host))
        );
        assert!(document.element_by_id("missing").is_none());
    }
}
