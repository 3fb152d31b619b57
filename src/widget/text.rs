//! Text widget.

use std::cell::Cell;
use std::rc::Rc;

use riverbed_core::html;
use riverbed_core::{Document, Node, Property, RenderCtx, Widget};

/// A run of text backed by a text node.
///
/// Content changes mutate the existing text node instead of replacing it.
/// Text nodes carry no `hidden` state, so a hidden text empties its node and
/// renders nothing until it is shown again.
#[derive(Debug)]
pub struct Text<N: Node> {
    node: Option<N>,
    content: Property<String>,
    hidden: Rc<Cell<bool>>,
}

impl<N: Node> Text<N> {
    /// Creates a text component.
    pub fn new<D: Document<Node = N>>(document: Option<&D>, content: impl Into<String>) -> Self {
        let content = content.into();
        let node = document.map(|document| document.create_text(&content));
        let hidden = Rc::new(Cell::new(false));
        let target = node.clone();
        let muted = Rc::clone(&hidden);
        let content = Property::managed(Some(content), false, move |value: Option<&String>| {
            if muted.get() {
                return;
            }
            if let Some(target) = &target {
                target.set_text(value.map_or("", String::as_str));
            }
        });
        Self {
            node,
            content,
            hidden,
        }
    }

    /// Returns the current content.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.get().map_or("", String::as_str)
    }

    /// Replaces the content from application code.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        self.content.set(Some(content.into()))
    }

    /// Replaces the content from the composition engine.
    pub fn update_content(&mut self, content: impl Into<String>) -> bool {
        self.content.update_managed(Some(content.into()))
    }
}

impl<N: Node> Widget<N> for Text<N> {
    fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    fn accepts_children(&self) -> bool {
        false
    }

    fn render_to_string_builder(&self, ctx: &RenderCtx<'_>, out: &mut String) {
        if ctx.is_visible() {
            html::escape_text(out, self.content());
        }
    }

    fn visibility_changed(&mut self, visible: bool) {
        self.hidden.set(!visible);
        if let Some(node) = &self.node {
            node.set_text(if visible { self.content() } else { "" });
        }
    }
}
