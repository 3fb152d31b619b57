//! Behaviour attached to each component of a tree.

use core::any::Any;
use core::fmt;

use crate::id::ComponentId;
use crate::node::Node;

/// Trait implemented by every component stored in a [`ComponentTree`](crate::ComponentTree).
///
/// A widget owns its backing node handle (if any). The tree only uses that
/// handle for structural edits; presentation changes are made by the widget's
/// own property callbacks.
pub trait Widget<N: Node>: Any + fmt::Debug {
    /// Returns the backing node, or `None` in string-only mode.
    fn node(&self) -> Option<&N>;

    /// Returns whether components may be inserted below this one.
    fn accepts_children(&self) -> bool {
        true
    }

    /// Appends the serialization of this component, recursing into its
    /// children in order through `ctx`.
    fn render_to_string_builder(&self, ctx: &RenderCtx<'_>, out: &mut String);

    /// Reflects a visibility change on the backing node.
    ///
    /// The default toggles the node's `hidden` state. Widgets backed by nodes
    /// that have no such state, like text nodes, override it.
    fn visibility_changed(&mut self, visible: bool) {
        if let Some(node) = self.node() {
            node.set_hidden(!visible);
        }
    }
}

pub(crate) trait RenderComponent {
    fn render_component(&self, id: ComponentId, out: &mut String);
}

/// Context handed to [`Widget::render_to_string_builder`].
pub struct RenderCtx<'a> {
    tree: &'a dyn RenderComponent,
    id: ComponentId,
    children: &'a [ComponentId],
    visible: bool,
}

impl<'a> RenderCtx<'a> {
    pub(crate) const fn new(
        tree: &'a dyn RenderComponent,
        id: ComponentId,
        children: &'a [ComponentId],
        visible: bool,
    ) -> Self {
        Self {
            tree,
            id,
            children,
            visible,
        }
    }

    /// Returns the component being rendered.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Returns whether the component is visible.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the children of the component being rendered.
    #[must_use]
    pub const fn children(&self) -> &'a [ComponentId] {
        self.children
    }

    /// Renders every child in order.
    pub fn render_children(&self, out: &mut String) {
        for child in self.children {
            self.tree.render_component(*child, out);
        }
    }
}

impl fmt::Debug for RenderCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCtx")
            .field("id", &self.id)
            .field("children", &self.children)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// Transparent container around an existing node.
///
/// Roots use it for their mount point: it renders only its children, since
/// the mount element itself belongs to the host page.
#[derive(Debug)]
pub struct Container<N> {
    node: Option<N>,
}

impl<N: Node> Container<N> {
    /// Wraps `node`, or creates a node-less container when `None`.
    #[must_use]
    pub const fn new(node: Option<N>) -> Self {
        Self { node }
    }
}

impl<N: Node> Widget<N> for Container<N> {
    fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    fn render_to_string_builder(&self, ctx: &RenderCtx<'_>, out: &mut String) {
        ctx.render_children(out);
    }
}
