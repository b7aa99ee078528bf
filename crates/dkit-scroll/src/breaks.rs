//! Scroll breaks.
//!
//! A scroll break declares that when normalized progress reaches `step`,
//! the natural position holds still while an extra `length` pixels of raw
//! scroll are consumed before progress resumes. Break aggregation walks the
//! breaks in ascending step order, so a [`BreakSet`] sorts on construction
//! and rejects inputs whose aggregation order would be ambiguous
//! (duplicate steps) or meaningless (non-finite or out-of-range values).

use dkit_core::{Axis, Point};

/// One hold region on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBreak {
    /// Normalized progress at which the hold begins, in `[0, 1]`.
    pub step: f64,
    /// Raw scroll distance consumed by the hold, in pixels, `>= 0`.
    pub length: f64,
}

impl ScrollBreak {
    /// Create a break. Validation happens in [`BreakSet::new`].
    #[must_use]
    pub const fn new(step: f64, length: f64) -> Self {
        Self { step, length }
    }
}

/// Errors constructing a [`BreakSet`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BreakSetError {
    /// Two breaks share a step; aggregation order would be ambiguous.
    #[error("duplicate break step {step}")]
    DuplicateStep {
        /// The offending step.
        step: f64,
    },
    /// A step lies outside `[0, 1]`.
    #[error("break step {step} outside [0, 1]")]
    StepOutOfRange {
        /// The offending step.
        step: f64,
    },
    /// A length is negative.
    #[error("negative break length {length}")]
    NegativeLength {
        /// The offending length.
        length: f64,
    },
    /// A step or length is NaN or infinite.
    #[error("non-finite break value")]
    NonFinite,
}

/// Validated breaks for one axis, sorted ascending by step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakSet {
    breaks: Vec<ScrollBreak>,
}

impl BreakSet {
    /// Validate, sort, and wrap `breaks`.
    pub fn new(mut breaks: Vec<ScrollBreak>) -> Result<Self, BreakSetError> {
        for b in &breaks {
            if !b.step.is_finite() || !b.length.is_finite() {
                return Err(BreakSetError::NonFinite);
            }
            if !(0.0..=1.0).contains(&b.step) {
                return Err(BreakSetError::StepOutOfRange { step: b.step });
            }
            if b.length < 0.0 {
                return Err(BreakSetError::NegativeLength { length: b.length });
            }
        }

        breaks.sort_by(|a, b| a.step.total_cmp(&b.step));

        if let Some(pair) = breaks.windows(2).find(|pair| pair[0].step == pair[1].step) {
            return Err(BreakSetError::DuplicateStep { step: pair[0].step });
        }

        Ok(Self { breaks })
    }

    /// A set with no breaks.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sum of every break length.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.breaks.iter().map(|b| b.length).sum()
    }

    /// Number of breaks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.breaks.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }

    /// The break at `index` in ascending step order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ScrollBreak> {
        self.breaks.get(index).copied()
    }

    /// Iterate in ascending step order.
    pub fn iter(&self) -> impl Iterator<Item = ScrollBreak> + '_ {
        self.breaks.iter().copied()
    }
}

/// Breaks per axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakDescriptor {
    /// Horizontal breaks.
    pub x: Option<BreakSet>,
    /// Vertical breaks.
    pub y: Option<BreakSet>,
}

impl BreakDescriptor {
    /// No breaks on either axis.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The break set for `axis`, if defined.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> Option<&BreakSet> {
        match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
        }
    }

    /// Total break length on `axis`.
    #[must_use]
    pub fn total_length(&self, axis: Axis) -> f64 {
        self.axis(axis).map(BreakSet::total_length).unwrap_or(0.0)
    }
}

/// Geometry handed to a break-source function.
///
/// Recomputed from live geometry before every derivation; the engine never
/// caches descriptors across frames. `pos` and `step` are present only on
/// position derivations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakContext {
    /// Minimum natural position of the displaced target.
    pub min_pos: Point,
    /// Maximum natural position of the displaced target.
    pub max_pos: Point,
    /// Current conductor scroll offset, when deriving position.
    pub pos: Option<Point>,
    /// Current normalized step, when deriving position.
    pub step: Option<Point>,
}

impl BreakContext {
    /// Context for a size derivation: geometry only.
    #[must_use]
    pub const fn sizing(min_pos: Point, max_pos: Point) -> Self {
        Self {
            min_pos,
            max_pos,
            pos: None,
            step: None,
        }
    }

    /// Context for a position derivation.
    #[must_use]
    pub const fn positioning(min_pos: Point, max_pos: Point, pos: Point, step: Point) -> Self {
        Self {
            min_pos,
            max_pos,
            pos: Some(pos),
            step: Some(step),
        }
    }
}
