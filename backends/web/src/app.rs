use riverbed::markup::{Markup, compose};
use riverbed_core::{ComponentId, Document, Node, Root, RootOptions, TreeApplier};
use wasm_bindgen::prelude::*;

use crate::dom::DomDocument;
use crate::error::WebError;

/// Id given to the host element created when no root id is configured.
pub const DEFAULT_HOST_ID: &str = "riverbed-root";

/// Builder for [`WebApp`].
#[derive(Debug, Default, Clone)]
pub struct WebAppBuilder {
    root_id: Option<String>,
}

impl WebAppBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { root_id: None }
    }

    /// Sets the DOM element identifier that should host the application.
    ///
    /// Without one, a `<div id="riverbed-root">` is appended to the body.
    #[must_use]
    pub fn with_root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = Some(id.into());
        self
    }

    /// Finalises the builder and creates a [`WebApp`].
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM root element cannot be found or initialized.
    pub fn build(self) -> Result<WebApp, WebError> {
        WebApp::new_with_options(self)
    }
}

/// A live root mounted into the current page.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebApp {
    root: Root<DomDocument>,
    applier: TreeApplier<DomDocument>,
}

impl WebApp {
    fn new_with_options(builder: WebAppBuilder) -> Result<Self, WebError> {
        let document = DomDocument::current()?;
        console_error_panic_hook::set_once();

        let root_id = match builder.root_id {
            Some(id) => id,
            None => {
                create_host(&document)?;
                DEFAULT_HOST_ID.to_owned()
            }
        };

        let root = Root::attach(document, &RootOptions::new().with_mount_id(root_id))?;
        let applier = root.applier();
        tracing::debug!(root = %root.id(), "web app mounted");
        Ok(Self { root, applier })
    }

    /// Returns the root rendering into the page.
    #[must_use]
    pub const fn root(&self) -> &Root<DomDocument> {
        &self.root
    }

    /// Returns the applier for a composition engine driving this app.
    #[must_use]
    pub const fn applier_mut(&mut self) -> &mut TreeApplier<DomDocument> {
        &mut self.applier
    }

    /// Appends `markup` after the current top-level components.
    pub fn render(&mut self, markup: &Markup) -> Option<ComponentId> {
        let index = self.root.with_tree(|tree| tree.children(self.root.container()).len());
        compose(&mut self.applier, index, markup)
    }
}

fn create_host(document: &DomDocument) -> Result<(), WebError> {
    if document.element_by_id(DEFAULT_HOST_ID).is_some() {
        return Ok(());
    }
    let body = document.body().ok_or(WebError::DomUnavailable)?;
    let host = document.create_element("div");
    host.set_attribute("id", Some(DEFAULT_HOST_ID));
    body.insert_before(&host, None);
    Ok(())
}

#[wasm_bindgen]
impl WebApp {
    /// Creates a new [`WebApp`] using the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM root element cannot be found or initialized.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, WebError> {
        Self::new_with_options(WebAppBuilder::new())
    }

    /// Serializes the mounted components.
    #[wasm_bindgen(js_name = renderToString)]
    #[must_use]
    pub fn render_to_string(&self) -> String {
        self.root.render_to_string()
    }

    /// Unmounts the app. Later edits are ignored.
    pub fn dispose(&self) {
        self.root.dispose();
    }
}
