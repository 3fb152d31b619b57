//! Root configuration.

/// How a root materializes its components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RenderMode {
    /// Components create backing nodes and edits mutate the document.
    #[default]
    Live,
    /// No backing nodes exist; only string rendering is available.
    StringOnly,
}

/// Options used when attaching a root.
///
/// ```
/// use riverbed_core::{RenderMode, RootOptions};
///
/// let options = RootOptions::new().with_mount_id("app");
/// assert_eq!(options.mount_id(), Some("app"));
/// assert_eq!(options.mode(), RenderMode::Live);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RootOptions {
    mount_id: Option<String>,
    mode: RenderMode,
}

impl RootOptions {
    /// Creates options mounting into the document body in live mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mount_id: None,
            mode: RenderMode::Live,
        }
    }

    /// Creates options for a root without backing nodes.
    #[must_use]
    pub const fn string_only() -> Self {
        Self {
            mount_id: None,
            mode: RenderMode::StringOnly,
        }
    }

    /// Mounts into the element with the given `id`.
    #[must_use]
    pub fn with_mount_id(mut self, id: impl Into<String>) -> Self {
        self.mount_id = Some(id.into());
        self
    }

    /// Selects the render mode.
    #[must_use]
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the id of the mount element, if any.
    #[must_use]
    pub fn mount_id(&self) -> Option<&str> {
        self.mount_id.as_deref()
    }

    /// Returns the render mode.
    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }
}
