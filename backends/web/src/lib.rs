#![allow(clippy::module_name_repetitions)]

//! Browser backend for the Riverbed framework.
//!
//! [`DomDocument`] and [`DomNode`] implement the node abstraction of
//! `riverbed-core` over `web-sys`, so every structural edit applied to a live
//! root turns into a single DOM call: `insertBefore`, `removeChild`, or a
//! `textContent` reset when a container is cleared. [`WebApp`] mounts such a
//! root into an element of the current page.
//!
//! The DOM is only reachable on `wasm32-unknown-unknown`; elsewhere
//! [`WebAppBuilder::build`] returns [`WebError::Unsupported`].

mod app;
mod dom;
mod error;

pub use app::{DEFAULT_HOST_ID, WebApp, WebAppBuilder};
pub use dom::{DomDocument, DomNode};
pub use error::WebError;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::{WebAppBuilder, WebError};

    #[test]
    fn native_targets_report_unsupported() {
        let error = WebAppBuilder::new()
            .with_root_id("app")
            .build()
            .expect_err("no DOM on native targets");
        assert_eq!(error, WebError::Unsupported);
    }
}
