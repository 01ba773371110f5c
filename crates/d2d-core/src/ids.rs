//! Strongly typed, zero-cost graph index wrappers.
//!
//! A `NodeIdx`/`ArcIdx` is a position in the assembled graph's arenas, valid
//! only for the lifetime of the graph snapshot that produced it.  Persisted
//! row ids stay `i64` on the records themselves.  All indexes are
//! `Copy + Ord + Hash` so they can be used as map keys and sorted collection
//! elements without ceremony.

use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_idx {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid index" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized indexes are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(idx: $name) -> usize {
                idx.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_idx! {
    /// Position of a location node in the assembled graph's node arena.
    pub struct NodeIdx(u32);
}

typed_idx! {
    /// Position of a timed arc (edge + offer) in the graph's arc arena.
    pub struct ArcIdx(u32);
}

// ── Synthetic ids ────────────────────────────────────────────────────────────

/// Per-search allocator of negative ids for unpersisted records (synthetic
/// address nodes, synthesized transfer edges and offers).
///
/// Ids run `-1, -2, …` deterministically, are scoped to one search, and are
/// discarded with it — they can never collide with persisted (positive)
/// row ids, and two concurrent searches each have their own counter.
#[derive(Debug, Default)]
pub struct SyntheticIds {
    issued: i64,
}

impl SyntheticIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next negative id.
    #[inline]
    pub fn next_id(&mut self) -> i64 {
        self.issued += 1;
        -self.issued
    }
}
