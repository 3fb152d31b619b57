//! Push button widget.

use riverbed_core::html;
use riverbed_core::{Document, Node, Property, RenderCtx, Widget};

/// A `<button type="button">` with a text label.
#[derive(Debug)]
pub struct Button<N: Node> {
    node: Option<N>,
    label: Property<String>,
    disabled: Property<bool>,
}

impl<N: Node> Button<N> {
    /// Creates a button labelled `label`.
    pub fn new<D: Document<Node = N>>(document: Option<&D>, label: impl Into<String>) -> Self {
        let label = label.into();
        let (node, label_node) = match document {
            Some(document) => {
                let button = document.create_element("button");
                button.set_attribute("type", Some("button"));
                let text = document.create_text(&label);
                button.insert_before(&text, None);
                (Some(button), Some(text))
            }
            None => (None, None),
        };

        let label = Property::managed(Some(label), false, move |value: Option<&String>| {
            if let Some(label_node) = &label_node {
                label_node.set_text(value.map_or("", String::as_str));
            }
        });
        let target = node.clone();
        let disabled = Property::managed(Some(false), false, move |value: Option<&bool>| {
            if let Some(target) = &target {
                let disabled = value.copied().unwrap_or(false);
                target.set_attribute("disabled", disabled.then_some(""));
            }
        });

        Self {
            node,
            label,
            disabled,
        }
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.get().map_or("", String::as_str)
    }

    /// Returns whether the button is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get().copied().unwrap_or(false)
    }

    /// Sets the label from application code.
    pub fn set_label(&mut self, label: impl Into<String>) -> bool {
        self.label.set(Some(label.into()))
    }

    /// Updates the label from the composition engine.
    pub fn update_label(&mut self, label: impl Into<String>) -> bool {
        self.label.update_managed(Some(label.into()))
    }

    /// Enables or disables the button from application code.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        self.disabled.set(Some(disabled))
    }

    /// Enables or disables the button from the composition engine.
    pub fn update_disabled(&mut self, disabled: bool) -> bool {
        self.disabled.update_managed(Some(disabled))
    }
}

impl<N: Node> Widget<N> for Button<N> {
    fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    fn accepts_children(&self) -> bool {
        false
    }

    fn render_to_string_builder(&self, ctx: &RenderCtx<'_>, out: &mut String) {
        out.push_str("<button");
        html::write_attribute(out, "type", "button");
        if self.is_disabled() {
            html::write_flag(out, "disabled");
        }
        if !ctx.is_visible() {
            html::write_flag(out, "hidden");
        }
        out.push('>');
        html::escape_text(out, self.label());
        out.push_str("</button>");
    }
}
