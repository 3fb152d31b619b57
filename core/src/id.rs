//! Process-unique component identifiers.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a component stored inside a [`ComponentTree`](crate::ComponentTree).
///
/// Identifiers are allocated from a process-wide counter, so they are unique
/// across every tree and grow monotonically in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocates the next identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentId;

    #[test]
    fn ids_are_monotonic() {
        let a = ComponentId::next();
        let b = ComponentId::next();
        assert!(b > a);
        assert_ne!(a, b);
    }
}
