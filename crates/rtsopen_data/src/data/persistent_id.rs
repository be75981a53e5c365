use serde::{Deserialize, Serialize};
use std::fmt;

/// Process-unique 32-bit handle. `0` is reserved as the invalid id.
///
/// Constructing one from a raw value does not register it anywhere; only the
/// allocator in `rtsopen_core::persistent_id` guarantees uniqueness.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersistentId(u32);

impl PersistentId {
    pub const INVALID: PersistentId = PersistentId(0);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Only checks against the sentinel, not against any tracked set.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl From<u32> for PersistentId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PersistentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{:#010x}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}
