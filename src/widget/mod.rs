//! Built-in widgets.
//!
//! Each widget owns its backing node (if any) and exposes two write paths per
//! property: `set_*` for application code and `update_*` for the composition
//! engine. See [`Property`](riverbed_core::Property) for the precedence rules.

pub mod button;
pub mod tag;
pub mod text;

pub use button::Button;
pub use tag::Tag;
pub use text::Text;
