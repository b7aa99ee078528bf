//! Dirty-category bitmask.
//!
//! A dirty category is a tagged reason an update is owed. The scheduler ORs
//! categories into a single mask as signals arrive and clears the mask after
//! each dispatch, so an arbitrary burst of signals costs one recomputation
//! per rendering frame.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Categories of state that can be marked dirty between frames.
    ///
    /// `NONE` and `ALL` are absorbing sentinels: the scheduler treats them
    /// with exact-match semantics (the whole mask must equal the sentinel),
    /// while every other value tests membership with a bitwise AND.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u32 {
        /// Positions changed (scroll offsets, displacements).
        const POSITION = 1 << 0;
        /// Sizes changed (viewport or content extents).
        const SIZE = 1 << 1;
        /// Layout changed.
        const LAYOUT = 1 << 2;
        /// Logical state changed.
        const STATE = 1 << 3;
        /// Backing data changed.
        const DATA = 1 << 4;
        /// Locale changed.
        const LOCALE = 1 << 5;
        /// Configuration changed.
        const CONFIG = 1 << 6;
        /// Styling changed.
        const STYLE = 1 << 7;
        /// Input devices changed (pointer, wheel, keys).
        const INPUT = 1 << 8;
        /// Device orientation changed.
        const ORIENTATION = 1 << 9;
        /// A frame tick elapsed.
        const FRAME = 1 << 10;
    }
}

impl DirtyFlags {
    /// Nothing is dirty.
    pub const NONE: Self = Self::empty();

    /// Everything is dirty.
    pub const ALL: Self = Self::all();
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        if *self == Self::ALL {
            return write!(f, "ALL");
        }

        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{name}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        assert_eq!(DirtyFlags::NONE, DirtyFlags::empty());
        assert_eq!(DirtyFlags::default(), DirtyFlags::NONE);
    }

    #[test]
    fn all_contains_every_category() {
        for flag in [
            DirtyFlags::POSITION,
            DirtyFlags::SIZE,
            DirtyFlags::LAYOUT,
            DirtyFlags::STATE,
            DirtyFlags::DATA,
            DirtyFlags::LOCALE,
            DirtyFlags::CONFIG,
            DirtyFlags::STYLE,
            DirtyFlags::INPUT,
            DirtyFlags::ORIENTATION,
            DirtyFlags::FRAME,
        ] {
            assert!(DirtyFlags::ALL.contains(flag));
        }
    }

    #[test]
    fn categories_are_disjoint_bits() {
        assert!((DirtyFlags::POSITION & DirtyFlags::SIZE).is_empty());
        assert!((DirtyFlags::INPUT & DirtyFlags::ORIENTATION).is_empty());
    }

    #[test]
    fn display_sentinels() {
        assert_eq!(DirtyFlags::NONE.to_string(), "NONE");
        assert_eq!(DirtyFlags::ALL.to_string(), "ALL");
    }

    #[test]
    fn display_joins_names() {
        let flags = DirtyFlags::POSITION | DirtyFlags::SIZE;
        assert_eq!(flags.to_string(), "POSITION|SIZE");
    }

    #[test]
    fn display_single_name() {
        assert_eq!(DirtyFlags::FRAME.to_string(), "FRAME");
    }
}
