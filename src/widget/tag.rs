//! Generic element widget.

use riverbed_core::html;
use riverbed_core::{Document, Node, PropValue, PropertyDelegate, RenderCtx, Widget};

/// An element with an arbitrary tag and dynamic attributes.
///
/// Attributes live in a [`PropertyDelegate`]: [`set_attribute`](Self::set_attribute)
/// is the direct path, [`update_attribute`](Self::update_attribute) the
/// composition path. Every effective change is written to the backing node
/// immediately; the string rendering reads the delegate, so both outputs list
/// attributes in declaration order.
#[derive(Debug)]
pub struct Tag<N: Node> {
    tag: String,
    node: Option<N>,
    attributes: PropertyDelegate,
}

impl<N: Node> Tag<N> {
    /// Creates an element, with a backing node when `document` is available.
    pub fn new<D: Document<Node = N>>(document: Option<&D>, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let node = document.map(|document| document.create_element(&tag));
        let target = node.clone();
        let attributes = PropertyDelegate::with_default_update(move |name, value| {
            if let Some(target) = &target {
                let value = value.and_then(PropValue::to_attribute);
                target.set_attribute(name, value.as_deref());
            }
        });
        Self {
            tag,
            node,
            attributes,
        }
    }

    /// Returns the tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the current value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&PropValue> {
        self.attributes.get(name)
    }

    /// Returns the attribute bag.
    #[must_use]
    pub const fn attributes(&self) -> &PropertyDelegate {
        &self.attributes
    }

    /// Sets an attribute from application code. Later composition updates of
    /// the same attribute are ignored.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<PropValue>) -> bool {
        self.attributes.set(name, Some(value.into()))
    }

    /// Removes an attribute from application code.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        self.attributes.set(name, None)
    }

    /// Updates an attribute from the composition engine.
    pub fn update_attribute(&mut self, name: &str, value: Option<PropValue>) -> bool {
        self.attributes.update_managed_property(name, value)
    }
}

impl<N: Node> Widget<N> for Tag<N> {
    fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    fn accepts_children(&self) -> bool {
        !html::is_void_element(&self.tag)
    }

    fn render_to_string_builder(&self, ctx: &RenderCtx<'_>, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in self.attributes.iter() {
            if let Some(value) = value.to_attribute() {
                html::write_attribute(out, name, &value);
            }
        }
        if !ctx.is_visible() {
            html::write_flag(out, "hidden");
        }
        out.push('>');
        if html::is_void_element(&self.tag) {
            return;
        }
        ctx.render_children(out);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}
