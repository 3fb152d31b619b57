#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod debug;
pub mod markup;
pub mod reactive;
pub mod ssr;
pub mod widget;

pub use riverbed_core::{
    Applier, ComponentId, ComponentTree, Document, Error, Node, PropValue, Property,
    PropertyDelegate, RenderMode, Root, RootHandle, RootId, RootOptions, RootRegistry,
    TreeApplier, VDocument, VNode, Widget,
};
pub use ssr::render_to_string;

pub mod prelude {
    //! Commonly used types, traits and markup constructors.
    //!
    //! ```rust
    //! use riverbed::prelude::*;
    //!
    //! let html = render_to_string(&div().child(text("hi")));
    //! assert_eq!(html, "<div>hi</div>");
    //! ```
    pub use crate::markup::{Markup, button, compose, div, element, span, text};
    pub use crate::reactive::bind;
    pub use crate::widget::{Button, Tag, Text};
    pub use crate::{
        Applier, Document, Node, Root, RootOptions, VDocument, VNode, Widget, render_to_string,
    };
}
