//! Bridge between a composition engine and a component tree.
//!
//! A composition engine walks its own description of the UI depth first and
//! emits positional edits against whichever container it is currently
//! visiting. [`Applier`] is the interface it drives; [`TreeApplier`] routes
//! every edit to the component at the top of its cursor stack.

use core::cell::RefMut;
use core::fmt;
use std::rc::Rc;

use crate::id::ComponentId;
use crate::node::Document;
use crate::root::RootState;
use crate::tree::ComponentTree;

/// Positional edit interface consumed by a composition engine.
///
/// Edits always apply to the [current](Applier::current) container. The
/// engine guarantees structurally valid edit sequences; implementations are
/// free to panic on invalid indices.
pub trait Applier {
    /// Handle identifying a node of the tree being edited.
    type Node: Clone;

    /// Returns the container edits currently apply to.
    fn current(&self) -> Self::Node;

    /// Makes `node` the current container.
    fn down(&mut self, node: Self::Node);

    /// Returns to the container that was current before the last [`down`](Applier::down).
    fn up(&mut self);

    /// Inserts `node` at `index` in the current container.
    fn insert(&mut self, index: usize, node: Self::Node);

    /// Removes `count` nodes starting at `index` from the current container.
    fn remove(&mut self, index: usize, count: usize);

    /// Moves `count` nodes from `from` to `to` in the current container.
    fn move_nodes(&mut self, from: usize, to: usize, count: usize);

    /// Returns to the root and removes all of its children.
    fn clear(&mut self);

    /// Called before the engine applies a batch of edits.
    fn on_begin_changes(&mut self) {}

    /// Called after the engine applied a batch of edits.
    fn on_end_changes(&mut self) {}
}

/// [`Applier`] over the component tree of a [`Root`](crate::Root).
///
/// Nodes removed through the applier are released from the tree together with
/// their subtree and the subscriptions tied to it: a composition engine never
/// re-inserts what it removed. Once
/// the owning root is disposed every edit is ignored.
pub struct TreeApplier<D: Document> {
    state: Rc<RootState<D>>,
    root: ComponentId,
    stack: Vec<ComponentId>,
}

impl<D: Document> fmt::Debug for TreeApplier<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeApplier")
            .field("root", &self.root)
            .field("stack", &self.stack)
            .field("disposed", &self.state.is_disposed())
            .finish()
    }
}

impl<D: Document> TreeApplier<D> {
    pub(crate) const fn new(state: Rc<RootState<D>>, root: ComponentId) -> Self {
        Self {
            state,
            root,
            stack: Vec::new(),
        }
    }

    /// Returns the root container edits start from.
    #[must_use]
    pub const fn root(&self) -> ComponentId {
        self.root
    }

    /// Returns how many containers the cursor descended into.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Runs `f` on the component tree, for example to create the nodes the
    /// engine is about to insert. Returns `None` once the root is disposed.
    pub fn with_tree<R>(&self, f: impl FnOnce(&mut ComponentTree<D>) -> R) -> Option<R> {
        let result = live_tree(&self.state, "with_tree").map(|mut tree| f(&mut tree));
        self.state.flush_pending();
        result
    }

    fn release_all(tree: &mut ComponentTree<D>, removed: Vec<ComponentId>) {
        for id in removed {
            tree.release(id);
        }
    }
}

fn is_disposed<D: Document>(state: &RootState<D>, edit: &'static str) -> bool {
    let disposed = state.is_disposed();
    if disposed {
        tracing::warn!(edit, "ignoring edit delivered to a disposed root");
    }
    disposed
}

fn live_tree<'a, D: Document>(
    state: &'a RootState<D>,
    edit: &'static str,
) -> Option<RefMut<'a, ComponentTree<D>>> {
    if is_disposed(state, edit) {
        return None;
    }
    Some(state.tree.borrow_mut())
}

impl<D: Document> Applier for TreeApplier<D> {
    type Node = ComponentId;

    fn current(&self) -> ComponentId {
        self.stack.last().copied().unwrap_or(self.root)
    }

    fn down(&mut self, node: ComponentId) {
        if is_disposed(&self.state, "down") {
            return;
        }
        self.stack.push(node);
    }

    /// # Panics
    ///
    /// Panics when the cursor is already at the root container.
    fn up(&mut self) {
        if is_disposed(&self.state, "up") {
            return;
        }
        assert!(
            self.stack.pop().is_some(),
            "applier cursor is already at the root container"
        );
    }

    fn insert(&mut self, index: usize, node: ComponentId) {
        let current = self.current();
        if let Some(mut tree) = live_tree(&self.state, "insert") {
            tree.insert_child(current, index, node);
        }
    }

    fn remove(&mut self, index: usize, count: usize) {
        let current = self.current();
        if let Some(mut tree) = live_tree(&self.state, "remove") {
            let removed = tree.remove_children(current, index, count);
            Self::release_all(&mut tree, removed);
        }
    }

    fn move_nodes(&mut self, from: usize, to: usize, count: usize) {
        let current = self.current();
        if let Some(mut tree) = live_tree(&self.state, "move") {
            tree.move_children(current, from, to, count);
        }
    }

    fn clear(&mut self) {
        let root = self.root;
        if let Some(mut tree) = live_tree(&self.state, "clear") {
            self.stack.clear();
            let removed = tree.remove_all(root);
            Self::release_all(&mut tree, removed);
        }
    }

    fn on_begin_changes(&mut self) {
        tracing::trace!(root = %self.root, "begin changes");
    }

    fn on_end_changes(&mut self) {
        tracing::trace!(root = %self.root, depth = self.stack.len(), "end changes");
    }
}
