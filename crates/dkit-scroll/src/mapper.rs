//! Pure coordinate conversions.
//!
//! Three coordinate spaces exist along each axis:
//!
//! - **step** — normalized scroll progress in `[0, 1]`.
//! - **virtual position** — pixels along an extended path that includes
//!   every break's hold length.
//! - **natural position** — pixels the displaced target actually moves,
//!   breaks removed.
//!
//! All functions here are pure: they take concrete extents and break sets
//! and never touch geometry. Absent-geometry handling happens in the
//! coordinator, which simply does not call in without numbers.

use dkit_core::{Axis, Point};

use crate::breaks::{BreakDescriptor, BreakSet};

/// Natural extent per axis: content size minus viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// Horizontal natural extent.
    pub x: f64,
    /// Vertical natural extent.
    pub y: f64,
}

impl Extent {
    /// Create an extent pair.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Extent along `axis`.
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

fn extended_extent(natural_extent: f64, breaks: Option<&BreakSet>) -> f64 {
    natural_extent.max(0.0) + breaks.map(BreakSet::total_length).unwrap_or(0.0)
}

/// step → virtual position.
///
/// Scales normalized progress across the extended path, hold lengths
/// included.
#[must_use]
pub fn step_to_virtual(step: f64, natural_extent: f64, breaks: Option<&BreakSet>) -> f64 {
    step * extended_extent(natural_extent, breaks)
}

/// virtual position → step. Inverse of [`step_to_virtual`].
///
/// A degenerate (zero or negative) extended extent maps everything to 0.
#[must_use]
pub fn virtual_to_step(virtual_pos: f64, natural_extent: f64, breaks: Option<&BreakSet>) -> f64 {
    let extended = extended_extent(natural_extent, breaks);
    if extended <= 0.0 {
        0.0
    } else {
        virtual_pos / extended
    }
}

/// virtual position → natural position.
///
/// Walks the breaks in ascending step order. A break holds the natural
/// position at its start (`step * extent + lengths-before`) until the
/// virtual position passes the hold's end; past it, the consumed hold
/// length is subtracted out. With no breaks this is the identity. The
/// result is clamped into `[0, natural_extent]` so no break configuration
/// can push the target outside its natural range.
#[must_use]
pub fn virtual_to_natural(virtual_pos: f64, natural_extent: f64, breaks: Option<&BreakSet>) -> f64 {
    let extent = natural_extent.max(0.0);
    let Some(breaks) = breaks.filter(|b| !b.is_empty()) else {
        return virtual_pos;
    };

    let mut aggregated = 0.0;
    let mut natural = virtual_pos;

    for b in breaks.iter() {
        let hold_start = b.step * extent + aggregated;
        let hold_end = hold_start + b.length;

        if virtual_pos <= hold_end {
            // Inside or before this hold: freeze at the hold's start.
            natural = virtual_pos.min(hold_start) - aggregated;
            break;
        }

        aggregated += b.length;
        natural = virtual_pos - aggregated;
    }

    natural.clamp(0.0, extent)
}

/// step → natural position. Composition of [`step_to_virtual`] and
/// [`virtual_to_natural`].
#[must_use]
pub fn step_to_natural(step: f64, natural_extent: f64, breaks: Option<&BreakSet>) -> f64 {
    virtual_to_natural(
        step_to_virtual(step, natural_extent, breaks),
        natural_extent,
        breaks,
    )
}

/// Fractional progress through the break at `index`.
///
/// 0 before the virtual position reaches the hold, 1 once it has passed,
/// linear in between. `None` for an out-of-range index.
#[must_use]
pub fn relative_break_progress(
    breaks: &BreakSet,
    index: usize,
    virtual_pos: f64,
    natural_extent: f64,
) -> Option<f64> {
    let target = breaks.get(index)?;
    let extent = natural_extent.max(0.0);

    let aggregated: f64 = breaks
        .iter()
        .filter(|b| b.step < target.step)
        .map(|b| b.length)
        .sum();

    let hold_start = target.step * extent + aggregated;
    let hold_end = hold_start + target.length;

    if virtual_pos <= hold_start {
        Some(0.0)
    } else if virtual_pos >= hold_end {
        Some(1.0)
    } else {
        Some((virtual_pos - hold_start) / (hold_end - hold_start))
    }
}

/// Fractional progress of a child's passage across the viewport edge.
///
/// 0 while the child's leading edge is still beyond the viewport's far
/// edge, 1 once the child has fully passed the near edge, linear between.
#[must_use]
pub fn child_progress(
    natural_pos: f64,
    viewport_extent: f64,
    child_lead: f64,
    child_extent: f64,
) -> f64 {
    let span = viewport_extent + child_extent;
    if span <= 0.0 {
        return if natural_pos + viewport_extent >= child_lead {
            1.0
        } else {
            0.0
        };
    }
    ((natural_pos + viewport_extent - child_lead) / span).clamp(0.0, 1.0)
}

/// Point-level step → virtual position.
#[must_use]
pub fn step_to_virtual_point(step: Point, extent: Extent, breaks: &BreakDescriptor) -> Point {
    Point::new(
        step_to_virtual(step.x, extent.x, breaks.axis(Axis::X)),
        step_to_virtual(step.y, extent.y, breaks.axis(Axis::Y)),
    )
}

/// Point-level virtual position → step.
#[must_use]
pub fn virtual_to_step_point(
    virtual_pos: Point,
    extent: Extent,
    breaks: &BreakDescriptor,
) -> Point {
    Point::new(
        virtual_to_step(virtual_pos.x, extent.x, breaks.axis(Axis::X)),
        virtual_to_step(virtual_pos.y, extent.y, breaks.axis(Axis::Y)),
    )
}

/// Point-level virtual position → natural position.
#[must_use]
pub fn virtual_to_natural_point(
    virtual_pos: Point,
    extent: Extent,
    breaks: &BreakDescriptor,
) -> Point {
    Point::new(
        virtual_to_natural(virtual_pos.x, extent.x, breaks.axis(Axis::X)),
        virtual_to_natural(virtual_pos.y, extent.y, breaks.axis(Axis::Y)),
    )
}

/// Point-level step → natural position.
#[must_use]
pub fn step_to_natural_point(step: Point, extent: Extent, breaks: &BreakDescriptor) -> Point {
    Point::new(
        step_to_natural(step.x, extent.x, breaks.axis(Axis::X)),
        step_to_natural(step.y, extent.y, breaks.axis(Axis::Y)),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::breaks::ScrollBreak;

    fn one_break(step: f64, length: f64) -> BreakSet {
        BreakSet::new(vec![ScrollBreak::new(step, length)]).unwrap()
    }

    #[test]
    fn no_breaks_round_trip_is_identity() {
        let extent = 1000.0;
        for i in 0..=20 {
            let step = f64::from(i) / 20.0;
            let virtual_pos = step_to_virtual(step, extent, None);
            assert!((virtual_to_step(virtual_pos, extent, None) - step).abs() < 1e-12);
            assert_eq!(step_to_natural(step, extent, None), virtual_pos);
        }
    }

    #[test]
    fn boundaries_hold_regardless_of_breaks() {
        let breaks = BreakSet::new(vec![
            ScrollBreak::new(0.0, 300.0),
            ScrollBreak::new(0.4, 100.0),
            ScrollBreak::new(1.0, 500.0),
        ])
        .unwrap();
        let extent = 2000.0;

        assert_eq!(step_to_natural(0.0, extent, Some(&breaks)), 0.0);
        assert!((step_to_natural(1.0, extent, Some(&breaks)) - extent).abs() < 1e-9);
    }

    #[test]
    fn hold_freezes_then_resumes() {
        // One 1000px hold at half progress of a 2000px extent.
        let breaks = one_break(0.5, 1000.0);
        let extent = 2000.0;

        let at_hold = step_to_natural(0.5, extent, Some(&breaks));
        // Extended extent is 3000, so step 0.5 lands at virtual 1500, inside
        // the hold [1000, 2000]: frozen at the hold start.
        assert_eq!(at_hold, 1000.0);

        // Still frozen while raw scroll is being consumed by the hold.
        let inside = step_to_natural(0.55, extent, Some(&breaks));
        assert_eq!(inside, at_hold);

        // Strictly increasing once the hold is consumed.
        let past = step_to_natural(0.7, extent, Some(&breaks));
        assert!(past > at_hold, "natural must grow past the hold: {past}");
    }

    #[test]
    fn hold_scenario_with_early_break() {
        // Extended path = 1000 + 500; the hold spans virtual [200, 700].
        let breaks = one_break(0.2, 500.0);
        let extent = 1000.0;

        // Before the hold: virtual and natural coincide.
        assert_eq!(virtual_to_natural(150.0, extent, Some(&breaks)), 150.0);

        // step 0.3 lands at virtual 450, inside the hold: clamped at its
        // start.
        assert_eq!(step_to_natural(0.3, extent, Some(&breaks)), 200.0);

        // Anywhere inside the hold stays clamped.
        assert_eq!(virtual_to_natural(699.0, extent, Some(&breaks)), 200.0);

        // Past the hold the consumed length is subtracted out.
        assert_eq!(virtual_to_natural(701.0, extent, Some(&breaks)), 201.0);
        assert_eq!(step_to_natural(1.0, extent, Some(&breaks)), 1000.0);
    }

    #[test]
    fn multiple_breaks_aggregate_in_order() {
        let breaks = BreakSet::new(vec![
            ScrollBreak::new(0.2, 100.0),
            ScrollBreak::new(0.5, 200.0),
        ])
        .unwrap();
        let extent = 1000.0;

        // First hold spans virtual [200, 300].
        assert_eq!(virtual_to_natural(250.0, extent, Some(&breaks)), 200.0);
        // Between holds: first length subtracted.
        assert_eq!(virtual_to_natural(400.0, extent, Some(&breaks)), 300.0);
        // Second hold spans virtual [600, 800].
        assert_eq!(virtual_to_natural(700.0, extent, Some(&breaks)), 500.0);
        // Past both: both lengths subtracted.
        assert_eq!(virtual_to_natural(900.0, extent, Some(&breaks)), 600.0);
        assert_eq!(virtual_to_natural(1300.0, extent, Some(&breaks)), 1000.0);
    }

    #[test]
    fn degenerate_extent_maps_to_zero_step() {
        assert_eq!(virtual_to_step(100.0, 0.0, None), 0.0);
        assert_eq!(virtual_to_step(100.0, -50.0, None), 0.0);
        assert_eq!(step_to_virtual(0.5, -50.0, None), 0.0);
    }

    #[test]
    fn zero_length_hold_is_transparent() {
        let breaks = one_break(0.5, 0.0);
        let extent = 1000.0;
        for i in 0..=10 {
            let step = f64::from(i) / 10.0;
            assert!(
                (step_to_natural(step, extent, Some(&breaks)) - step * extent).abs() < 1e-9,
                "zero-length hold must not distort step {step}"
            );
        }
    }

    #[test]
    fn relative_break_progress_phases() {
        let breaks = one_break(0.2, 500.0);
        let extent = 1000.0;

        // Hold spans virtual [200, 700].
        assert_eq!(relative_break_progress(&breaks, 0, 0.0, extent), Some(0.0));
        assert_eq!(
            relative_break_progress(&breaks, 0, 200.0, extent),
            Some(0.0)
        );
        assert_eq!(
            relative_break_progress(&breaks, 0, 450.0, extent),
            Some(0.5)
        );
        assert_eq!(
            relative_break_progress(&breaks, 0, 700.0, extent),
            Some(1.0)
        );
        assert_eq!(
            relative_break_progress(&breaks, 0, 2000.0, extent),
            Some(1.0)
        );

        assert_eq!(relative_break_progress(&breaks, 1, 0.0, extent), None);
    }

    #[test]
    fn relative_break_progress_counts_earlier_lengths() {
        let breaks = BreakSet::new(vec![
            ScrollBreak::new(0.2, 100.0),
            ScrollBreak::new(0.5, 200.0),
        ])
        .unwrap();
        // Second hold starts at 0.5 * 1000 + 100 = 600.
        assert_eq!(
            relative_break_progress(&breaks, 1, 600.0, 1000.0),
            Some(0.0)
        );
        assert_eq!(
            relative_break_progress(&breaks, 1, 700.0, 1000.0),
            Some(0.5)
        );
    }

    #[test]
    fn child_progress_phases() {
        // Viewport 600 tall, child 200 tall with its top at 1000.
        assert_eq!(child_progress(0.0, 600.0, 1000.0, 200.0), 0.0);
        // Child top reaches the viewport's far edge at natural 400.
        assert_eq!(child_progress(400.0, 600.0, 1000.0, 200.0), 0.0);
        // Child bottom passes the near edge at natural 1200.
        assert_eq!(child_progress(1200.0, 600.0, 1000.0, 200.0), 1.0);
        // Midway.
        assert_eq!(child_progress(800.0, 600.0, 1000.0, 200.0), 0.5);
    }

    #[test]
    fn child_progress_degenerate_span() {
        assert_eq!(child_progress(10.0, 0.0, 5.0, 0.0), 1.0);
        assert_eq!(child_progress(10.0, 0.0, 50.0, 0.0), 0.0);
    }

    #[test]
    fn point_wrappers_apply_per_axis() {
        let descriptor = BreakDescriptor {
            x: None,
            y: Some(one_break(0.5, 1000.0)),
        };
        let extent = Extent::new(500.0, 2000.0);
        let natural = step_to_natural_point(Point::new(0.5, 0.5), extent, &descriptor);

        // X has no breaks: plain scaling. Y is frozen at its hold start.
        assert_eq!(natural.x, 250.0);
        assert_eq!(natural.y, 1000.0);
    }

    proptest! {
        #[test]
        fn natural_is_monotonic_in_virtual(
            steps in proptest::collection::vec(0.0f64..=1.0, 0..4),
            lengths in proptest::collection::vec(0.0f64..500.0, 0..4),
            extent in 1.0f64..5000.0,
            a in 0.0f64..6000.0,
            b in 0.0f64..6000.0,
        ) {
            let n = steps.len().min(lengths.len());
            let mut raw: Vec<ScrollBreak> = steps
                .into_iter()
                .take(n)
                .zip(lengths.into_iter().take(n))
                .map(|(step, length)| ScrollBreak::new(step, length))
                .collect();
            raw.sort_by(|a, b| a.step.total_cmp(&b.step));
            raw.dedup_by(|a, b| a.step == b.step);
            let breaks = BreakSet::new(raw).unwrap();

            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let na = virtual_to_natural(lo, extent, Some(&breaks));
            let nb = virtual_to_natural(hi, extent, Some(&breaks));
            prop_assert!(na <= nb + 1e-9, "monotonicity violated: {na} > {nb}");
        }

        #[test]
        fn natural_stays_in_range(
            step in 0.0f64..=1.0,
            break_step in 0.0f64..=1.0,
            length in 0.0f64..2000.0,
            extent in 0.0f64..5000.0,
        ) {
            let breaks = BreakSet::new(vec![ScrollBreak::new(break_step, length)]).unwrap();
            let natural = step_to_natural(step, extent, Some(&breaks));
            prop_assert!(natural >= 0.0);
            prop_assert!(natural <= extent.max(0.0) + 1e-9);
        }

        #[test]
        fn no_break_round_trip(step in 0.0f64..=1.0, extent in 1.0f64..5000.0) {
            let virtual_pos = step_to_virtual(step, extent, None);
            let back = virtual_to_step(virtual_pos, extent, None);
            prop_assert!((back - step).abs() < 1e-9);
        }
    }
}
