//! Per-frame change snapshots.

use dkit_core::DirtyFlags;

use crate::record::{FrameRecord, InputRecord, OrientationRecord, PositionRecord, SizeRecord};

/// What changed since the last dispatch.
///
/// Only categories that were dirty when the frame fired carry a payload;
/// payload-less categories (LAYOUT, STATE, DATA, LOCALE, CONFIG, STYLE)
/// appear in [`flags`](Self::flags) only.
#[derive(Debug, Clone, Default)]
pub struct ChangeSnapshot {
    /// Union of every category dirtied since the last dispatch.
    pub flags: DirtyFlags,
    /// POSITION payload, when dirty.
    pub position: Option<PositionRecord>,
    /// SIZE payload, when dirty.
    pub size: Option<SizeRecord>,
    /// INPUT payload, when dirty.
    pub input: Option<InputRecord>,
    /// ORIENTATION payload, when dirty.
    pub orientation: Option<OrientationRecord>,
    /// FRAME payload, when dirty.
    pub frame: Option<FrameRecord>,
}

impl ChangeSnapshot {
    /// Whether `flags` were dirty in this snapshot.
    ///
    /// Same semantics as the scheduler: exact match for the NONE/ALL
    /// sentinels, bitwise AND for everything else.
    #[must_use]
    pub fn is_dirty(&self, flags: DirtyFlags) -> bool {
        if flags == DirtyFlags::NONE || flags == DirtyFlags::ALL {
            self.flags == flags
        } else {
            self.flags.intersects(flags)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_is_none_dirty() {
        let snap = ChangeSnapshot::default();
        assert!(snap.is_dirty(DirtyFlags::NONE));
        assert!(!snap.is_dirty(DirtyFlags::POSITION));
        assert!(!snap.is_dirty(DirtyFlags::ALL));
    }

    #[test]
    fn partial_mask_uses_intersection() {
        let snap = ChangeSnapshot {
            flags: DirtyFlags::POSITION | DirtyFlags::SIZE,
            ..Default::default()
        };
        assert!(snap.is_dirty(DirtyFlags::POSITION));
        assert!(snap.is_dirty(DirtyFlags::POSITION | DirtyFlags::INPUT));
        assert!(!snap.is_dirty(DirtyFlags::INPUT));
        // Sentinels require exact equality.
        assert!(!snap.is_dirty(DirtyFlags::ALL));
        assert!(!snap.is_dirty(DirtyFlags::NONE));
    }

    #[test]
    fn all_snapshot_matches_all_exactly() {
        let snap = ChangeSnapshot {
            flags: DirtyFlags::ALL,
            ..Default::default()
        };
        assert!(snap.is_dirty(DirtyFlags::ALL));
        assert!(snap.is_dirty(DirtyFlags::POSITION));
        assert!(!snap.is_dirty(DirtyFlags::NONE));
    }
}
