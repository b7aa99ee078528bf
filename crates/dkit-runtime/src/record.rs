//! Typed per-category payload records.
//!
//! Each payload-bearing dirty category accumulates its raw data in one of
//! these records between dispatches. Writes within a frame shallow-merge:
//! the last write to a field wins, other fields keep their previous value.
//! Key codes are the exception — they accumulate so no press is lost inside
//! a coalescing window. All records reseed to their defaults after each
//! dispatch.

use dkit_core::{Point, Size};

/// Payload for the POSITION category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionRecord {
    /// Raw scroll offset of the conductor, as last reported.
    pub offset: Option<Point>,
    /// Minimum scroll position of the conductor.
    pub min: Option<Point>,
    /// Maximum scroll position of the conductor.
    pub max: Option<Point>,
    /// Normalized scroll step, 0..1 per axis.
    pub step: Option<Point>,
    /// Natural position the displaced target should move to.
    pub target_pos: Option<Point>,
    /// Minimum natural target position.
    pub target_min: Option<Point>,
    /// Maximum natural target position.
    pub target_max: Option<Point>,
}

/// Payload for the SIZE category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeRecord {
    /// Size of the conductor's visible box.
    pub viewport: Option<Size>,
    /// Target size excluding overflowed content.
    pub target_min: Option<Size>,
    /// Target size including overflowed content.
    pub target_max: Option<Size>,
    /// Target max size plus all configured break lengths.
    pub target_aggregated_max: Option<Size>,
}

/// Payload for the INPUT category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputRecord {
    /// Last pointer position.
    pub pointer: Option<Point>,
    /// Last wheel delta.
    pub wheel: Option<Point>,
    /// Key codes released since the last dispatch.
    pub keys_up: Vec<u32>,
    /// Key codes pressed down since the last dispatch.
    pub keys_down: Vec<u32>,
    /// Key codes character-pressed since the last dispatch.
    pub keys_pressed: Vec<u32>,
}

/// Payload for the ORIENTATION category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationRecord {
    /// Rotation around the x axis.
    pub x: Option<f64>,
    /// Rotation around the y axis.
    pub y: Option<f64>,
    /// Rotation around the z axis.
    pub z: Option<f64>,
}

/// Payload for the FRAME category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRecord {
    /// Frame ticks observed since the last dispatch.
    pub ticks: u64,
}

/// All payload records for one scheduler instance.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordStore {
    pub(crate) position: PositionRecord,
    pub(crate) size: SizeRecord,
    pub(crate) input: InputRecord,
    pub(crate) orientation: OrientationRecord,
    pub(crate) frame: FrameRecord,
}

impl RecordStore {
    /// Reseed every record. Runs after each dispatch.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_absent() {
        let store = RecordStore::default();
        assert_eq!(store.position.offset, None);
        assert_eq!(store.size.target_max, None);
        assert_eq!(store.input.pointer, None);
        assert!(store.input.keys_down.is_empty());
        assert_eq!(store.orientation.x, None);
        assert_eq!(store.frame.ticks, 0);
    }

    #[test]
    fn reset_discards_accumulated_state() {
        let mut store = RecordStore::default();
        store.position.offset = Some(Point::new(5.0, 10.0));
        store.input.keys_down.push(13);
        store.frame.ticks = 3;

        store.reset();
        assert_eq!(store.position.offset, None);
        assert!(store.input.keys_down.is_empty());
        assert_eq!(store.frame.ticks, 0);
    }
}
