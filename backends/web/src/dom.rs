//! `web-sys` realization of the node abstraction.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::error::WebError;

/// Handle to a live DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomNode(web_sys::Node);

impl DomNode {
    /// Returns the underlying `web-sys` node.
    #[must_use]
    pub const fn as_node(&self) -> &web_sys::Node {
        &self.0
    }

    fn as_element(&self) -> Option<&Element> {
        self.0.dyn_ref::<Element>()
    }
}

impl From<web_sys::Node> for DomNode {
    fn from(node: web_sys::Node) -> Self {
        Self(node)
    }
}

impl riverbed_core::Node for DomNode {
    fn insert_before(&self, child: &Self, reference: Option<&Self>) {
        if let Err(error) = self.0.insert_before(&child.0, reference.map(|node| &node.0)) {
            panic!("failed to insert DOM node: {}", WebError::from(error));
        }
    }

    fn remove_child(&self, child: &Self) {
        if let Err(error) = self.0.remove_child(&child.0) {
            panic!("removed node must be a child of the target node: {}", WebError::from(error));
        }
    }

    fn child_at(&self, index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok()?;
        self.0.child_nodes().item(index).map(Self)
    }

    fn child_count(&self) -> usize {
        self.0.child_nodes().length() as usize
    }

    fn clear_children(&self) {
        self.0.set_text_content(None);
    }

    fn same_node(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(&other.0))
    }

    fn set_attribute(&self, name: &str, value: Option<&str>) {
        let Some(element) = self.as_element() else {
            return;
        };
        let result = match value {
            Some(value) => element.set_attribute(name, value),
            None => element.remove_attribute(name),
        };
        if let Err(error) = result {
            tracing::error!(attribute = name, error = %WebError::from(error), "failed to update attribute");
        }
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_hidden(&self, hidden: bool) {
        if let Some(element) = self.0.dyn_ref::<HtmlElement>() {
            element.set_hidden(hidden);
        } else {
            self.set_attribute("hidden", hidden.then_some(""));
        }
    }

    fn inner_html(&self) -> String {
        self.as_element().map(Element::inner_html).unwrap_or_default()
    }
}

/// Handle to the page's `document`.
#[derive(Debug, Clone)]
pub struct DomDocument(web_sys::Document);

impl DomDocument {
    /// Returns the document of the current window.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Unsupported`] outside of wasm32 and
    /// [`WebError::DomUnavailable`] when there is no window or document.
    pub fn current() -> Result<Self, WebError> {
        if !cfg!(target_arch = "wasm32") {
            return Err(WebError::Unsupported);
        }
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document = window.document().ok_or(WebError::DomUnavailable)?;
        Ok(Self(document))
    }

    /// Returns the underlying `web-sys` document.
    #[must_use]
    pub const fn as_document(&self) -> &web_sys::Document {
        &self.0
    }
}

impl From<web_sys::Document> for DomDocument {
    fn from(document: web_sys::Document) -> Self {
        Self(document)
    }
}

impl riverbed_core::Document for DomDocument {
    type Node = DomNode;

    fn create_element(&self, tag: &str) -> DomNode {
        match self.0.create_element(tag) {
            Ok(element) => DomNode(element.into()),
            Err(error) => panic!("invalid element name `{tag}`: {}", WebError::from(error)),
        }
    }

    fn create_text(&self, text: &str) -> DomNode {
        DomNode(self.0.create_text_node(text).into())
    }

    fn element_by_id(&self, id: &str) -> Option<DomNode> {
        self.0.get_element_by_id(id).map(|element| DomNode(element.into()))
    }

    fn body(&self) -> Option<DomNode> {
        self.0.body().map(|body| DomNode(body.into()))
    }
}
