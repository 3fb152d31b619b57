//! Declarative markup and a retained-mode driver for it.
//!
//! [`Markup`] describes a tree of built-in widgets. [`compose`] walks that
//! description depth first and emits the matching edits through an
//! [`Applier`], exactly like a composition engine does on its first pass.
//! There is no diffing: later changes are expressed as direct edits or as
//! managed property updates (see [`crate::reactive`]).
//!
//! ```
//! use riverbed::markup::{button, div, text};
//!
//! let page = div()
//!     .attr("class", "card")
//!     .child(text("Hello"))
//!     .child(button("Ok"));
//! assert_eq!(
//!     riverbed::render_to_string(&page),
//!     "<div class=\"card\">Hello<button type=\"button\">Ok</button></div>"
//! );
//! ```

use riverbed_core::{Applier, ComponentId, Document, PropValue, TreeApplier};

use crate::widget::{Button, Tag, Text};

/// Description of a widget subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    /// A [`Tag`] with attributes in declaration order and children.
    Element {
        /// Tag name.
        tag: String,
        /// Attributes, applied through the composition path.
        attributes: Vec<(String, PropValue)>,
        /// Child markup in order.
        children: Vec<Markup>,
    },
    /// A [`Text`] run.
    Text(String),
    /// A [`Button`].
    Button {
        /// Label text.
        label: String,
        /// Initial disabled state.
        disabled: bool,
    },
}

/// Creates an element with the given tag.
pub fn element(tag: impl Into<String>) -> Markup {
    Markup::Element {
        tag: tag.into(),
        attributes: Vec::new(),
        children: Vec::new(),
    }
}

/// Creates a `<div>`.
#[must_use]
pub fn div() -> Markup {
    element("div")
}

/// Creates a `<span>`.
#[must_use]
pub fn span() -> Markup {
    element("span")
}

/// Creates a text run.
pub fn text(content: impl Into<String>) -> Markup {
    Markup::Text(content.into())
}

/// Creates a button.
pub fn button(label: impl Into<String>) -> Markup {
    Markup::Button {
        label: label.into(),
        disabled: false,
    }
}

impl Markup {
    /// Adds an attribute to an element.
    ///
    /// # Panics
    ///
    /// Panics when called on text or a button.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        match &mut self {
            Self::Element { attributes, .. } => attributes.push((name.into(), value.into())),
            other => panic!("attributes can only be added to elements, not {other:?}"),
        }
        self
    }

    /// Appends a child to an element.
    ///
    /// # Panics
    ///
    /// Panics when called on text or a button.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        match &mut self {
            Self::Element { children, .. } => children.push(child),
            other => panic!("children can only be added to elements, not {other:?}"),
        }
        self
    }

    /// Appends several children to an element.
    #[must_use]
    pub fn children(self, children: impl IntoIterator<Item = Self>) -> Self {
        children.into_iter().fold(self, Self::child)
    }

    /// Sets the initial disabled state of a button. Ignored by other markup.
    #[must_use]
    pub fn disabled(mut self, value: bool) -> Self {
        if let Self::Button { disabled, .. } = &mut self {
            *disabled = value;
        }
        self
    }
}

/// Instantiates `markup` and inserts it at `index` in the applier's current
/// container.
///
/// Returns the id of the top-level component, or `None` when the root is
/// disposed.
pub fn compose<D: Document>(
    applier: &mut TreeApplier<D>,
    index: usize,
    markup: &Markup,
) -> Option<ComponentId> {
    let id = applier.with_tree(|tree| match markup {
        Markup::Element {
            tag, attributes, ..
        } => {
            let id = tree.create(|document| Tag::new(document, tag.as_str()));
            if let Some(widget) = tree.widget_mut::<Tag<D::Node>>(id) {
                for (name, value) in attributes {
                    widget.update_attribute(name, Some(value.clone()));
                }
            }
            id
        }
        Markup::Text(content) => tree.create(|document| Text::new(document, content.as_str())),
        Markup::Button { label, disabled } => {
            let id = tree.create(|document| Button::new(document, label.as_str()));
            if let Some(widget) = tree.widget_mut::<Button<D::Node>>(id) {
                widget.update_disabled(*disabled);
            }
            id
        }
    })?;

    applier.insert(index, id);
    match markup {
        Markup::Element { children, .. } if !children.is_empty() => {
            applier.down(id);
            for (position, child) in children.iter().enumerate() {
                compose(applier, position, child);
            }
            applier.up();
        }
        _ => {}
    }
    tracing::trace!(component = %id, "composed markup");
    Some(id)
}
