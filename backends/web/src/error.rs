use core::fmt;

/// Error type produced by the web backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    DomUnavailable,
    /// The requested mounting node cannot be located.
    RootNotFound(String),
    /// Another root already renders into the mounting node.
    MountPointBusy(u64),
    /// The backend requires the wasm32 target.
    Unsupported,
    /// Wrapper around JavaScript exceptions.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => write!(f, "DOM is not available"),
            Self::RootNotFound(id) => write!(f, "Failed to find DOM element with id `{id}`"),
            Self::MountPointBusy(root) => {
                write!(f, "DOM element is already owned by root {root}")
            }
            Self::Unsupported => write!(f, "Riverbed web backend requires the wasm32 target"),
            Self::Js(msg) => write!(f, "JavaScript error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<riverbed_core::Error> for WebError {
    fn from(value: riverbed_core::Error) -> Self {
        match value {
            riverbed_core::Error::RootNotFound(id) => Self::RootNotFound(id),
            riverbed_core::Error::MountPointBusy(root) => Self::MountPointBusy(root),
            riverbed_core::Error::DocumentUnavailable => Self::DomUnavailable,
        }
    }
}

impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        match value {
            WebError::Js(msg) => Self::from(msg),
            other => Self::from(other.to_string()),
        }
    }
}
