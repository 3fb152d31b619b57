//! Abstraction over the physical tree a component tree renders into.
//!
//! A [`Node`] is a cheap, clonable handle: cloning it never copies the
//! underlying node, it only hands out another reference to it. This mirrors the
//! DOM, where `web_sys::Node` values are handles to objects owned by the
//! browser, and keeps structural edits allocation-free.

use core::fmt::Debug;

/// Handle to a node of the backing tree.
pub trait Node: Clone + Debug + 'static {
    /// Inserts `child` before `reference`, or appends it when `reference` is `None`.
    ///
    /// A `child` that is already attached somewhere is moved, matching the DOM.
    fn insert_before(&self, child: &Self, reference: Option<&Self>);

    /// Removes `child` from this node.
    ///
    /// # Panics
    ///
    /// Implementations panic when `child` is not a physical child of this node.
    fn remove_child(&self, child: &Self);

    /// Returns the physical child at `index`.
    fn child_at(&self, index: usize) -> Option<Self>;

    /// Returns the number of physical children.
    fn child_count(&self) -> usize;

    /// Detaches every physical child in one operation.
    fn clear_children(&self);

    /// Returns `true` when both handles refer to the same node.
    fn same_node(&self, other: &Self) -> bool;

    /// Sets (`Some`) or removes (`None`) an attribute. Ignored by text nodes.
    fn set_attribute(&self, name: &str, value: Option<&str>);

    /// Replaces the text content of the node.
    fn set_text(&self, text: &str);

    /// Toggles the `hidden` state of the node. Ignored by text nodes.
    fn set_hidden(&self, hidden: bool);

    /// Serializes the children of this node.
    fn inner_html(&self) -> String;
}

/// Factory and lookup surface of a backing tree.
pub trait Document: Clone + Debug + 'static {
    /// Node handle type produced by this document.
    type Node: Node;

    /// Creates a detached element node.
    fn create_element(&self, tag: &str) -> Self::Node;

    /// Creates a detached text node.
    fn create_text(&self, text: &str) -> Self::Node;

    /// Looks up an attached element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Returns the body element, if the document has one.
    fn body(&self) -> Option<Self::Node>;
}
