//! Roots: the entry point owning a component tree and its mount node.

use core::any::Any;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::applier::TreeApplier;
use crate::error::Error;
use crate::id::ComponentId;
use crate::node::{Document, Node};
use crate::options::{RenderMode, RootOptions};
use crate::tree::ComponentTree;
use crate::widget::Container;

static NEXT_ROOT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`Root`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RootId(u64);

impl RootId {
    fn next() -> Self {
        Self(NEXT_ROOT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root-{}", self.0)
    }
}

type DeferredEdit<D> = Box<dyn FnOnce(&mut ComponentTree<D>)>;

pub(crate) struct RootState<D: Document> {
    pub(crate) tree: RefCell<ComponentTree<D>>,
    disposed: Cell<bool>,
    subscriptions: RefCell<Vec<Box<dyn Any>>>,
    pending: RefCell<VecDeque<DeferredEdit<D>>>,
}

impl<D: Document> RootState<D> {
    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Runs `edit` now, or queues it when the tree is already borrowed.
    fn run_or_defer(&self, edit: DeferredEdit<D>) {
        let Ok(mut tree) = self.tree.try_borrow_mut() else {
            tracing::trace!("tree is busy, deferring edit");
            self.pending.borrow_mut().push_back(edit);
            return;
        };
        edit(&mut tree);
        drop(tree);
        self.flush_pending();
    }

    /// Runs queued edits in order until the queue is empty or the tree is
    /// borrowed again. Edits queued while one of them runs are picked up too.
    pub(crate) fn flush_pending(&self) {
        loop {
            if self.is_disposed() {
                let dropped = core::mem::take(&mut *self.pending.borrow_mut());
                drop(dropped);
                return;
            }
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                return;
            };
            let Ok(mut tree) = self.tree.try_borrow_mut() else {
                self.pending.borrow_mut().push_front(next);
                return;
            };
            next(&mut tree);
        }
    }
}

/// Owns a component tree, the node it renders into and the subscriptions
/// feeding it.
///
/// Dropping a root disposes it.
pub struct Root<D: Document> {
    id: RootId,
    state: Rc<RootState<D>>,
    container: ComponentId,
    mount: Option<D::Node>,
}

impl<D: Document> fmt::Debug for Root<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("id", &self.id)
            .field("container", &self.container)
            .field("mount", &self.mount)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl<D: Document> Root<D> {
    /// Creates a root without backing nodes, for string rendering.
    #[must_use]
    pub fn string_only() -> Self {
        Self::from_parts(None, None)
    }

    /// Attaches a root to `document` as described by `options`.
    ///
    /// In live mode the mount element (the element with the configured id, or
    /// the body) is emptied and becomes the parent of every top-level
    /// component.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotFound`] when no element has the configured id
    /// and [`Error::DocumentUnavailable`] when the document has no body.
    pub fn attach(document: D, options: &RootOptions) -> Result<Self, Error> {
        let mount = resolve_mount(&document, options)?;
        Ok(match mount {
            Some(mount) => Self::from_parts(Some(document), Some(mount)),
            None => Self::from_parts(None, None),
        })
    }

    fn from_parts(document: Option<D>, mount: Option<D::Node>) -> Self {
        if let Some(mount) = &mount {
            mount.clear_children();
        }
        let mut tree = ComponentTree::new(document);
        let container = tree.insert_widget(Box::new(Container::new(mount.clone())));
        let id = RootId::next();
        tracing::debug!(root = %id, live = mount.is_some(), "root attached");
        Self {
            id,
            state: Rc::new(RootState {
                tree: RefCell::new(tree),
                disposed: Cell::new(false),
                subscriptions: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
            }),
            container,
            mount,
        }
    }

    /// Returns the identifier of this root.
    #[must_use]
    pub const fn id(&self) -> RootId {
        self.id
    }

    /// Returns the container component every top-level component is inserted into.
    #[must_use]
    pub const fn container(&self) -> ComponentId {
        self.container
    }

    /// Returns the mount node, or `None` for string-only roots.
    #[must_use]
    pub const fn mount_node(&self) -> Option<&D::Node> {
        self.mount.as_ref()
    }

    /// Creates an applier whose cursor starts at the container.
    #[must_use]
    pub fn applier(&self) -> TreeApplier<D> {
        TreeApplier::new(Rc::clone(&self.state), self.container)
    }

    /// Returns a `'static` handle for use inside subscriptions.
    #[must_use]
    pub fn handle(&self) -> RootHandle<D> {
        RootHandle {
            id: self.id,
            state: Rc::downgrade(&self.state),
            container: self.container,
        }
    }

    /// Keeps `subscription` alive until the root is disposed.
    ///
    /// Watcher guards and similar values unsubscribe when dropped. A
    /// subscription retained by a disposed root is dropped immediately.
    pub fn retain(&self, subscription: impl Any) {
        if self.is_disposed() {
            drop(subscription);
            return;
        }
        self.state
            .subscriptions
            .borrow_mut()
            .push(Box::new(subscription));
    }

    /// Keeps `subscription` alive until the component `id` is released or
    /// the root is disposed, whichever comes first.
    pub fn retain_for(&self, id: ComponentId, subscription: impl Any) {
        self.update(move |tree| {
            if !tree.retain_for(id, Box::new(subscription)) {
                tracing::trace!(component = %id, "dropping subscription of a missing component");
            }
        });
    }

    /// Runs `edit` on the tree as soon as no other borrow of it is active.
    ///
    /// An edit requested while the tree is borrowed, for instance by a signal
    /// watcher firing from inside another edit, is queued and runs right
    /// after the outer borrow ends. Edits requested after disposal are
    /// dropped.
    pub fn update(&self, edit: impl FnOnce(&mut ComponentTree<D>) + 'static) {
        if self.is_disposed() {
            return;
        }
        self.state.run_or_defer(Box::new(edit));
    }

    /// Runs `f` with shared access to the tree, then runs the edits queued
    /// while it was borrowed.
    ///
    /// # Panics
    ///
    /// Panics when called while the tree is mutably borrowed.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ComponentTree<D>) -> R) -> R {
        let result = f(&self.state.tree.borrow());
        self.state.flush_pending();
        result
    }

    /// Runs `f` with exclusive access to the tree, then runs the edits queued
    /// while it was borrowed.
    ///
    /// # Panics
    ///
    /// Panics when called while the tree is borrowed, for instance from
    /// inside another `with_tree_mut` closure. Use [`update`](Self::update)
    /// from code that may run re-entrantly.
    pub fn with_tree_mut<R>(&self, f: impl FnOnce(&mut ComponentTree<D>) -> R) -> R {
        let result = f(&mut self.state.tree.borrow_mut());
        self.state.flush_pending();
        result
    }

    /// Serializes every component below the container.
    #[must_use]
    pub fn render_to_string(&self) -> String {
        self.with_tree(|tree| tree.render_to_string(self.container))
    }

    /// Returns `true` once [`dispose`](Self::dispose) ran.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    /// Drops every subscription, unlinks the tree from the mount node and
    /// turns later edits into no-ops. Calling it again does nothing.
    ///
    /// The component tree itself stays readable, so
    /// [`render_to_string`](Self::render_to_string) keeps working.
    pub fn dispose(&self) {
        if self.state.disposed.replace(true) {
            return;
        }
        let pending = core::mem::take(&mut *self.state.pending.borrow_mut());
        drop(pending);
        let mut subscriptions = core::mem::take(&mut *self.state.subscriptions.borrow_mut());
        if let Ok(mut tree) = self.state.tree.try_borrow_mut() {
            subscriptions.extend(tree.take_subscriptions());
        }
        let dropped = subscriptions.len();
        drop(subscriptions);
        if let Some(mount) = &self.mount {
            mount.clear_children();
        }
        tracing::debug!(root = %self.id, subscriptions = dropped, "root disposed");
    }
}

impl<D: Document> Drop for Root<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn resolve_mount<D: Document>(document: &D, options: &RootOptions) -> Result<Option<D::Node>, Error> {
    if options.mode() == RenderMode::StringOnly {
        return Ok(None);
    }
    let mount = match options.mount_id() {
        Some(id) => document
            .element_by_id(id)
            .ok_or_else(|| Error::RootNotFound(id.to_owned()))?,
        None => document.body().ok_or(Error::DocumentUnavailable)?,
    };
    Ok(Some(mount))
}

/// Weak, clonable access to a [`Root`] from code that outlives a borrow of it,
/// such as signal watchers.
///
/// Every accessor returns `None` once the root is disposed or dropped.
pub struct RootHandle<D: Document> {
    id: RootId,
    state: Weak<RootState<D>>,
    container: ComponentId,
}

impl<D: Document> Clone for RootHandle<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            state: Weak::clone(&self.state),
            container: self.container,
        }
    }
}

impl<D: Document> fmt::Debug for RootHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<D: Document> RootHandle<D> {
    /// Returns the identifier of the root.
    #[must_use]
    pub const fn id(&self) -> RootId {
        self.id
    }

    /// Returns the container of the root.
    #[must_use]
    pub const fn container(&self) -> ComponentId {
        self.container
    }

    /// Returns `true` while the root exists and is not disposed.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state.upgrade().is_some_and(|state| !state.is_disposed())
    }

    fn live_state(&self) -> Option<Rc<RootState<D>>> {
        let state = self.state.upgrade().filter(|state| !state.is_disposed());
        if state.is_none() {
            tracing::warn!(root = %self.id, "ignoring update delivered to a disposed root");
        }
        state
    }

    /// Runs `f` with shared access to the tree of a live root.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ComponentTree<D>) -> R) -> Option<R> {
        let state = self.live_state()?;
        let result = f(&state.tree.borrow());
        state.flush_pending();
        Some(result)
    }

    /// Runs `f` with exclusive access to the tree of a live root.
    ///
    /// # Panics
    ///
    /// Panics when the tree is already borrowed. Signal watchers should use
    /// [`update`](Self::update) instead.
    pub fn with_tree_mut<R>(&self, f: impl FnOnce(&mut ComponentTree<D>) -> R) -> Option<R> {
        let state = self.live_state()?;
        let result = f(&mut state.tree.borrow_mut());
        state.flush_pending();
        Some(result)
    }

    /// Runs `edit` on the tree of a live root once no other borrow of it is
    /// active. See [`Root::update`].
    ///
    /// Returns `false`, dropping `edit`, when the root is gone.
    pub fn update(&self, edit: impl FnOnce(&mut ComponentTree<D>) + 'static) -> bool {
        let Some(state) = self.live_state() else {
            return false;
        };
        state.run_or_defer(Box::new(edit));
        true
    }
}

/// Explicit registry of the roots alive in one scope (a process, a request).
///
/// A mount node hosts at most one live root: attaching a second root to it
/// fails until the first one is disposed.
#[derive(Debug)]
pub struct RootRegistry<D: Document> {
    roots: Vec<Root<D>>,
}

impl<D: Document> Default for RootRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> RootRegistry<D> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Attaches a new root and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MountPointBusy`] when a registered root already
    /// renders into the resolved mount node, or any error of [`Root::attach`].
    pub fn attach(&mut self, document: D, options: &RootOptions) -> Result<RootId, Error> {
        let mount = resolve_mount(&document, options)?;
        let owner = mount.as_ref().and_then(|mount| {
            self.roots.iter().find(|root| {
                root.mount_node()
                    .is_some_and(|existing| existing.same_node(mount))
            })
        });
        if let Some(owner) = owner {
            return Err(Error::MountPointBusy(owner.id().get()));
        }

        let root = match mount {
            Some(mount) => Root::from_parts(Some(document), Some(mount)),
            None => Root::from_parts(None, None),
        };
        let id = root.id();
        self.roots.push(root);
        Ok(id)
    }

    /// Returns a registered root.
    #[must_use]
    pub fn get(&self, id: RootId) -> Option<&Root<D>> {
        self.roots.iter().find(|root| root.id() == id)
    }

    /// Disposes and unregisters a root. Returns `false` when `id` is unknown.
    pub fn dispose(&mut self, id: RootId) -> bool {
        let Some(position) = self.roots.iter().position(|root| root.id() == id) else {
            return false;
        };
        self.roots.remove(position).dispose();
        true
    }

    /// Disposes every registered root and returns how many there were.
    pub fn dispose_all(&mut self) -> usize {
        let roots = core::mem::take(&mut self.roots);
        let count = roots.len();
        for root in roots {
            root.dispose();
        }
        tracing::debug!(count, "disposed all roots");
        count
    }

    /// Returns the number of registered roots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.roots.len()
    }

    /// Iterates over the registered roots in attach order.
    pub fn iter(&self) -> impl Iterator<Item = &Root<D>> {
        self.roots.iter()
    }
}
