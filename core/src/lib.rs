//! Core runtime of the Riverbed framework.
//!
//! This crate hosts the part of the framework that every backend shares: a
//! component tree whose logical child lists are kept in lock-step with a
//! backing node tree, the [`Applier`] bridge that an external composition engine
//! drives with positional edits, managed properties that decide when a write
//! should reach the backing node, and the [`Root`] that ties them together.
//!
//! Backing nodes are abstracted by the [`Node`] and [`Document`] traits. The
//! in-memory [`VNode`] realization lives here; the live DOM realization lives in
//! the `riverbed-web` backend. A component may also have no backing node at all,
//! which is how pure string rendering works.

#![allow(clippy::module_name_repetitions)]

pub mod applier;
pub mod error;
pub mod html;
pub mod id;
pub mod node;
pub mod options;
pub mod property;
pub mod root;
pub mod tree;
pub mod vnode;
pub mod widget;

pub use applier::{Applier, TreeApplier};
pub use error::Error;
pub use id::ComponentId;
pub use node::{Document, Node};
pub use options::{RenderMode, RootOptions};
pub use property::{PropValue, Property, PropertyDelegate, PropertyKind};
pub use root::{Root, RootHandle, RootId, RootRegistry};
pub use tree::{ComponentTree, Lifecycle};
pub use vnode::{VDocument, VNode};
pub use widget::{Container, RenderCtx, Widget};
