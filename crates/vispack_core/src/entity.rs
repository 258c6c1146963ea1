//! # Entity Identifiers
//!
//! Entities are issued by an external registry. The store only ever sees
//! their identifier: an opaque 64-bit token with no ordering meaning.

use std::fmt;

/// Opaque identifier of an entity, issued by the owning registry.
///
/// The registry guarantees an id is never reused while the store still
/// references it. Comparing two ids for anything other than equality is
/// meaningless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Null/invalid entity ID. Never accepted by the store.
    pub const NULL: Self = Self(u64::MAX);

    /// Wraps a raw registry token.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw registry token.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<u64> for EntityId {
    #[inline]
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("#null")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}
