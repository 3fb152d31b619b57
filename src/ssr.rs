//! One-shot server-side rendering.

use riverbed_core::{Root, VDocument};

use crate::markup::{Markup, compose};

/// Renders `markup` to an HTML string.
///
/// Every call builds its own string-only root, so calls on different threads
/// never share components or nodes. The root is disposed before returning.
#[must_use]
pub fn render_to_string(markup: &Markup) -> String {
    let root: Root<VDocument> = Root::string_only();
    let mut applier = root.applier();
    compose(&mut applier, 0, markup);
    let html = root.render_to_string();
    root.dispose();
    html
}
