//! Recoverable errors raised while setting up a root.
//!
//! Structural edits never return errors: an invalid index or a mismatched
//! parent is a broken contract with the composition engine and panics instead.

/// Errors produced while attaching a [`Root`](crate::Root).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The document has no element with the requested id.
    #[error("failed to find mount element with id `{0}`")]
    RootNotFound(String),
    /// Another live root already renders into the mount node.
    #[error("mount node is already owned by root {0}")]
    MountPointBusy(u64),
    /// Live rendering was requested but no document (or body) is available.
    #[error("document is not available for live rendering")]
    DocumentUnavailable,
}
