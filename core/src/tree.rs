//! Component arena and the structural operations behind every edit.
//!
//! Each component keeps an ordered logical child list. Every structural
//! operation updates that list and the backing node tree together, so that
//! after any operation the node-bearing children of a component appear in its
//! backing node in exactly the logical order.

use core::any::Any;
use core::fmt;
use std::collections::HashMap;

use crate::id::ComponentId;
use crate::node::{Document, Node};
use crate::widget::{RenderComponent, RenderCtx, Widget};

/// Attachment state of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, never inserted.
    Unattached,
    /// Linked under a parent.
    Attached,
    /// Removed from its parent. Re-inserting returns it to [`Lifecycle::Attached`].
    Detached,
}

struct Entry<N: Node> {
    widget: Box<dyn Widget<N>>,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    visible: bool,
    lifecycle: Lifecycle,
    subscriptions: Vec<Box<dyn Any>>,
}

/// Arena owning every component rendered by one root.
///
/// The parent link of a component is a plain identifier, not an owning
/// reference: membership is owned by the parent's child list, and the arena
/// owns the component itself until it is [released](Self::release).
pub struct ComponentTree<D: Document> {
    document: Option<D>,
    entries: HashMap<ComponentId, Entry<D::Node>>,
}

impl<D: Document> fmt::Debug for ComponentTree<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTree")
            .field("document", &self.document)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<D: Document> ComponentTree<D> {
    /// Creates an empty tree. Without a document, components have no
    /// backing nodes and only string rendering is available.
    #[must_use]
    pub fn new(document: Option<D>) -> Self {
        Self {
            document,
            entries: HashMap::new(),
        }
    }

    /// Returns the document new components create their nodes from.
    #[must_use]
    pub const fn document(&self) -> Option<&D> {
        self.document.as_ref()
    }

    /// Creates an unattached component from the widget returned by `build`.
    pub fn create<W: Widget<D::Node>>(&mut self, build: impl FnOnce(Option<&D>) -> W) -> ComponentId {
        let widget = build(self.document.as_ref());
        self.insert_widget(Box::new(widget))
    }

    /// Stores an already boxed widget as an unattached component.
    pub fn insert_widget(&mut self, widget: Box<dyn Widget<D::Node>>) -> ComponentId {
        let id = ComponentId::next();
        tracing::trace!(component = %id, widget = ?widget, "create component");
        self.entries.insert(
            id,
            Entry {
                widget,
                parent: None,
                children: Vec::new(),
                visible: true,
                lifecycle: Lifecycle::Unattached,
                subscriptions: Vec::new(),
            },
        );
        id
    }

    fn entry(&self, id: ComponentId) -> &Entry<D::Node> {
        self.entries
            .get(&id)
            .unwrap_or_else(|| panic!("component {id} does not belong to this tree"))
    }

    fn entry_mut(&mut self, id: ComponentId) -> &mut Entry<D::Node> {
        self.entries
            .get_mut(&id)
            .unwrap_or_else(|| panic!("component {id} does not belong to this tree"))
    }

    /// Returns a handle to the backing node of a component.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: ComponentId) -> Option<D::Node> {
        self.entry(id).widget.node().cloned()
    }

    /// Counts the node-bearing children that precede `logical` in `parent`.
    fn physical_index(&self, parent: ComponentId, logical: usize) -> usize {
        self.entry(parent).children[..logical]
            .iter()
            .filter(|child| self.entry(**child).widget.node().is_some())
            .count()
    }

    fn is_ancestor(&self, candidate: ComponentId, of: ComponentId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.entry(id).parent;
        }
        false
    }

    /// Inserts `child` at `index` among the children of `parent`.
    ///
    /// The backing node of `child` is placed before the node currently at the
    /// matching physical position, or appended when there is none.
    ///
    /// # Panics
    ///
    /// Panics if `index > children.len()`, if `child` is already attached, if
    /// `parent` does not accept children, or if the insertion would create a
    /// cycle.
    pub fn insert_child(&mut self, parent: ComponentId, index: usize, child: ComponentId) {
        let len = self.entry(parent).children.len();
        assert!(
            index <= len,
            "insert index {index} out of range for {len} children of {parent}"
        );
        assert!(
            self.entry(parent).widget.accepts_children(),
            "component {parent} does not accept children"
        );
        assert!(
            self.entry(child).parent.is_none(),
            "component {child} is already attached"
        );
        assert!(
            !self.is_ancestor(child, parent),
            "inserting {child} under {parent} would create a cycle"
        );

        if let (Some(parent_node), Some(child_node)) = (self.node(parent), self.node(child)) {
            let reference = parent_node.child_at(self.physical_index(parent, index));
            parent_node.insert_before(&child_node, reference.as_ref());
        }

        self.entry_mut(parent).children.insert(index, child);
        let entry = self.entry_mut(child);
        entry.parent = Some(parent);
        entry.lifecycle = Lifecycle::Attached;
        tracing::trace!(parent = %parent, index, child = %child, "insert child");
    }

    /// Removes `count` children of `parent` starting at `index`.
    ///
    /// Returns the removed components in their former order. Each one is
    /// detached: its parent is cleared and its node unlinked.
    ///
    /// # Panics
    ///
    /// Panics if `index + count > children.len()`.
    pub fn remove_children(
        &mut self,
        parent: ComponentId,
        index: usize,
        count: usize,
    ) -> Vec<ComponentId> {
        let len = self.entry(parent).children.len();
        let end = index
            .checked_add(count)
            .filter(|end| *end <= len)
            .unwrap_or_else(|| {
                panic!("cannot remove {count} children at {index} from {len} children of {parent}")
            });

        let removed: Vec<ComponentId> = self.entry_mut(parent).children.drain(index..end).collect();

        if let Some(parent_node) = self.node(parent) {
            for child in &removed {
                if let Some(child_node) = self.node(*child) {
                    parent_node.remove_child(&child_node);
                }
            }
        }

        for child in &removed {
            self.detach(*child);
        }
        tracing::trace!(parent = %parent, index, count, "remove children");
        removed
    }

    /// Moves `count` children of `parent` from `from` to `to`.
    ///
    /// Both positions refer to the list before the move. The run keeps its
    /// internal order and ends up at `to` when moving towards the front, or at
    /// `to - count` when moving towards the back: the result equals extracting
    /// the slice and reinserting it where the element at `to` sits once the
    /// slice is gone.
    ///
    /// # Panics
    ///
    /// Panics if the run exceeds the child list, if `to > children.len()`, or
    /// if `to` falls strictly inside the moved run.
    pub fn move_children(&mut self, parent: ComponentId, from: usize, to: usize, count: usize) {
        if from == to || count == 0 {
            return;
        }
        let len = self.entry(parent).children.len();
        assert!(
            from.checked_add(count).is_some_and(|end| end <= len),
            "cannot move {count} children from {from} out of {len} children of {parent}"
        );
        assert!(
            to <= len,
            "move destination {to} out of range for {len} children of {parent}"
        );
        assert!(
            !(from < to && to < from + count),
            "move destination {to} lies inside the moved run {from}..{}",
            from + count
        );

        let dest = if count == 1 && from == to + 1 {
            self.entry_mut(parent).children.swap(to, from);
            to
        } else {
            let dest = if from > to { to } else { to - count };
            if dest == from {
                return;
            }
            let children = &mut self.entry_mut(parent).children;
            let run: Vec<ComponentId> = children.drain(from..from + count).collect();
            children.splice(dest..dest, run);
            dest
        };

        self.place_run(parent, dest, count);
        tracing::trace!(parent = %parent, from, to, count, "move children");
    }

    /// Re-links the nodes of `children[dest..dest + count]` so the physical
    /// order matches the logical one.
    fn place_run(&self, parent: ComponentId, dest: usize, count: usize) {
        let Some(parent_node) = self.node(parent) else {
            return;
        };
        let run: Vec<D::Node> = self.entry(parent).children[dest..dest + count]
            .iter()
            .filter_map(|child| self.node(*child))
            .collect();
        for node in &run {
            parent_node.remove_child(node);
        }
        let reference = parent_node.child_at(self.physical_index(parent, dest));
        for node in &run {
            parent_node.insert_before(node, reference.as_ref());
        }
    }

    /// Detaches every child of `parent` and clears its node in one operation.
    ///
    /// Returns the removed components in their former order.
    pub fn remove_all(&mut self, parent: ComponentId) -> Vec<ComponentId> {
        let removed = core::mem::take(&mut self.entry_mut(parent).children);
        if let Some(parent_node) = self.node(parent) {
            parent_node.clear_children();
        }
        for child in &removed {
            self.detach(*child);
        }
        tracing::trace!(parent = %parent, count = removed.len(), "remove all children");
        removed
    }

    fn detach(&mut self, id: ComponentId) {
        let entry = self.entry_mut(id);
        entry.parent = None;
        entry.lifecycle = Lifecycle::Detached;
    }

    /// Ties `subscription` to a component: it is dropped when the component
    /// is released. Returns `false`, dropping it right away, when `id` does
    /// not belong to this tree.
    pub fn retain_for(&mut self, id: ComponentId, subscription: Box<dyn Any>) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        entry.subscriptions.push(subscription);
        true
    }

    /// Returns how many subscriptions are tied to a component.
    #[must_use]
    pub fn subscription_count(&self, id: ComponentId) -> usize {
        self.entries.get(&id).map_or(0, |entry| entry.subscriptions.len())
    }

    pub(crate) fn take_subscriptions(&mut self) -> Vec<Box<dyn Any>> {
        self.entries
            .values_mut()
            .flat_map(|entry| entry.subscriptions.drain(..))
            .collect()
    }

    /// Drops a component that is not attached, together with its subtree and
    /// every subscription tied to it.
    ///
    /// Returns the number of components released.
    ///
    /// # Panics
    ///
    /// Panics if the component is still attached to a parent.
    pub fn release(&mut self, id: ComponentId) -> usize {
        assert!(
            self.entry(id).parent.is_none(),
            "component {id} must be detached before it is released"
        );
        let mut pending = vec![id];
        let mut released = 0;
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.entries.remove(&next) {
                pending.extend(entry.children);
                released += 1;
            }
        }
        tracing::trace!(component = %id, released, "release subtree");
        released
    }

    /// Sets the visibility of a component. The state survives structural moves.
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) {
        let entry = self.entry_mut(id);
        if entry.visible == visible {
            return;
        }
        entry.visible = visible;
        entry.widget.visibility_changed(visible);
    }

    /// Makes a component visible.
    pub fn show(&mut self, id: ComponentId) {
        self.set_visible(id, true);
    }

    /// Hides a component.
    pub fn hide(&mut self, id: ComponentId) {
        self.set_visible(id, false);
    }

    /// Flips the visibility of a component.
    pub fn toggle(&mut self, id: ComponentId) {
        let visible = self.is_visible(id);
        self.set_visible(id, !visible);
    }

    /// Returns whether a component is visible.
    #[must_use]
    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.entry(id).visible
    }

    /// Returns the parent of a component.
    #[must_use]
    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.entry(id).parent
    }

    /// Returns the ordered children of a component.
    #[must_use]
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        &self.entry(id).children
    }

    /// Returns the attachment state of a component.
    #[must_use]
    pub fn lifecycle(&self, id: ComponentId) -> Lifecycle {
        self.entry(id).lifecycle
    }

    /// Returns `true` if the component is stored in this tree.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the number of components stored in this tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the tree stores no component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the widget of a component, downcast to `W`.
    #[must_use]
    pub fn widget<W: Widget<D::Node>>(&self, id: ComponentId) -> Option<&W> {
        let widget: &dyn Any = &*self.entries.get(&id)?.widget;
        widget.downcast_ref()
    }

    /// Returns the widget of a component mutably, downcast to `W`.
    pub fn widget_mut<W: Widget<D::Node>>(&mut self, id: ComponentId) -> Option<&mut W> {
        let widget: &mut dyn Any = &mut *self.entries.get_mut(&id)?.widget;
        widget.downcast_mut()
    }

    /// Serializes a component and its subtree.
    #[must_use]
    pub fn render_to_string(&self, id: ComponentId) -> String {
        let mut out = String::new();
        self.render_component(id, &mut out);
        out
    }

    /// Returns `true` when the physical children of `parent`'s node are
    /// exactly the nodes of its node-bearing logical children, in order.
    #[must_use]
    pub fn is_in_sync(&self, parent: ComponentId) -> bool {
        let Some(parent_node) = self.node(parent) else {
            return true;
        };
        let expected: Vec<D::Node> = self
            .children(parent)
            .iter()
            .filter_map(|child| self.node(*child))
            .collect();
        parent_node.child_count() == expected.len()
            && expected.iter().enumerate().all(|(index, node)| {
                parent_node
                    .child_at(index)
                    .is_some_and(|physical| physical.same_node(node))
            })
    }
}

impl<D: Document> RenderComponent for ComponentTree<D> {
    fn render_component(&self, id: ComponentId, out: &mut String) {
        let entry = self.entry(id);
        let ctx = RenderCtx::new(self, id, &entry.children, entry.visible);
        entry.widget.render_to_string_builder(&ctx, out);
    }
}
