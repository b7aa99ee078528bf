//! Programmatic scroll animation.
//!
//! The animator drives scroll offsets toward a destination over time. It
//! owns no clock: the host calls [`ScrollAnimator::tick`] with the current
//! instant (typically once per frame) and the animator writes the
//! interpolated offsets through [`VisualWriter::set_scroll_offset`]. The
//! host's scroll signals then flow back through the normal dirty path, so
//! animated scrolling is indistinguishable from user scrolling downstream.

use std::fmt;
use std::time::Duration;

use dkit_core::{GeometryProvider, Point, Target, VisualWriter};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use web_time::Instant;

/// Interpolation curve for an animated scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Cosine ease-in-out: slow start, slow stop.
    #[default]
    CosineInOut,
    /// Constant velocity.
    Linear,
}

impl Easing {
    /// Map raw progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::CosineInOut => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
            Self::Linear => t,
        }
    }
}

/// Per-animation tuning and lifecycle callbacks.
pub struct ScrollOptions {
    /// Total animation time. Zero completes on the first tick.
    pub duration: Duration,
    /// Interpolation curve.
    pub easing: Easing,
    /// Whether a new animation on the same target replaces a running one.
    /// When `false` the new request is dropped instead.
    pub overwrite: bool,
    on_progress: Option<Box<dyn FnMut(f64)>>,
    on_complete: Option<Box<dyn FnOnce()>>,
    on_cancel: Option<Box<dyn FnOnce()>>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(400),
            easing: Easing::default(),
            overwrite: true,
            on_progress: None,
            on_complete: None,
            on_cancel: None,
        }
    }
}

impl fmt::Debug for ScrollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("overwrite", &self.overwrite)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

impl ScrollOptions {
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn keep_running(mut self) -> Self {
        self.overwrite = false;
        self
    }

    /// Called every tick with eased progress in `[0, 1]`.
    #[must_use]
    pub fn on_progress(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Called once when the destination is reached.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Called once if the animation is cancelled or overwritten.
    #[must_use]
    pub fn on_cancel(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }
}

struct ActiveScroll {
    start: Point,
    dest: Point,
    started_at: Instant,
    opts: ScrollOptions,
}

impl ActiveScroll {
    fn raw_progress(&self, now: Instant) -> f64 {
        if self.opts.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.opts.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Animated scroll offsets, one animation per target.
#[derive(Default)]
pub struct ScrollAnimator {
    active: FxHashMap<Target, ActiveScroll>,
}

impl fmt::Debug for ScrollAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnimator")
            .field("active", &self.active.len())
            .finish()
    }
}

impl ScrollAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Animate `target`'s scroll offset to `dest` on both axes.
    pub fn scroll_to(
        &mut self,
        target: Target,
        dest: Point,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        if self.active.contains_key(&target) {
            if !opts.overwrite {
                trace!(?target, "scroll request dropped, animation running");
                return;
            }
            if let Some(cancelled) = self.active.remove(&target) {
                if let Some(cb) = cancelled.opts.on_cancel {
                    cb();
                }
            }
        }

        let start = world.scroll_offset_of(target);
        debug!(?target, ?start, ?dest, "scroll animation started");
        self.active.insert(
            target,
            ActiveScroll {
                start,
                dest,
                started_at: now,
                opts,
            },
        );
    }

    /// Animate only the horizontal offset; the vertical offset stays put.
    pub fn hscroll_to(
        &mut self,
        target: Target,
        x: f64,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        let current = world.scroll_offset_of(target);
        self.scroll_to(target, Point::new(x, current.y), opts, now, world);
    }

    /// Animate only the vertical offset; the horizontal offset stays put.
    pub fn vscroll_to(
        &mut self,
        target: Target,
        y: f64,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        let current = world.scroll_offset_of(target);
        self.scroll_to(target, Point::new(current.x, y), opts, now, world);
    }

    /// Animate to the top of `target`'s scrollable range.
    pub fn scroll_to_top(
        &mut self,
        target: Target,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.vscroll_to(target, 0.0, opts, now, world);
    }

    /// Animate to the bottom of `target`'s scrollable range.
    pub fn scroll_to_bottom(
        &mut self,
        target: Target,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        let max = scrollable_max(world, target);
        self.vscroll_to(target, max.y, opts, now, world);
    }

    /// Animate to the left edge of `target`'s scrollable range.
    pub fn scroll_to_left(
        &mut self,
        target: Target,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.hscroll_to(target, 0.0, opts, now, world);
    }

    /// Animate to the right edge of `target`'s scrollable range.
    pub fn scroll_to_right(
        &mut self,
        target: Target,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        let max = scrollable_max(world, target);
        self.hscroll_to(target, max.x, opts, now, world);
    }

    /// Whether an animation is running on `target`.
    #[must_use]
    pub fn is_active(&self, target: Target) -> bool {
        self.active.contains_key(&target)
    }

    /// Number of running animations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Cancel the animation on `target`, if any, firing its cancel callback.
    pub fn cancel(&mut self, target: Target) {
        if let Some(cancelled) = self.active.remove(&target) {
            debug!(?target, "scroll animation cancelled");
            if let Some(cb) = cancelled.opts.on_cancel {
                cb();
            }
        }
    }

    /// Cancel every running animation.
    pub fn cancel_all(&mut self) {
        let targets: Vec<Target> = self.active.keys().copied().collect();
        for target in targets {
            self.cancel(target);
        }
    }

    /// Advance all animations to `now`, writing interpolated offsets.
    ///
    /// Finished animations snap exactly to their destination, fire their
    /// completion callback and are removed. Returns the number of
    /// animations still running.
    pub fn tick(&mut self, now: Instant, world: &mut impl VisualWriter) -> usize {
        let mut finished = Vec::new();

        for (target, anim) in &mut self.active {
            let t = anim.raw_progress(now);
            let eased = anim.opts.easing.apply(t);
            let pos = if t >= 1.0 {
                anim.dest
            } else {
                Point::new(
                    anim.start.x + (anim.dest.x - anim.start.x) * eased,
                    anim.start.y + (anim.dest.y - anim.start.y) * eased,
                )
            };
            world.set_scroll_offset(*target, pos);
            if let Some(cb) = anim.opts.on_progress.as_mut() {
                cb(eased);
            }
            if t >= 1.0 {
                finished.push(*target);
            }
        }

        for target in finished {
            if let Some(done) = self.active.remove(&target) {
                debug!(?target, dest = ?done.dest, "scroll animation finished");
                if let Some(cb) = done.opts.on_complete {
                    cb();
                }
            }
        }

        self.active.len()
    }
}

/// Far scroll corner: content extent minus viewport extent, floored at zero.
fn scrollable_max(world: &impl GeometryProvider, target: Target) -> Point {
    let (Some(rect), Some(content)) = (world.rect_of(target), world.content_rect_of(target))
    else {
        return Point::ZERO;
    };
    Point::new(
        (content.width - rect.width).max(0.0),
        (content.height - rect.height).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use dkit_core::Size;
    use dkit_harness::FakeWorld;

    use super::*;

    fn world() -> FakeWorld {
        FakeWorld::new(Size::new(800.0, 600.0), Size::new(800.0, 3000.0))
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::CosineInOut, Easing::Linear] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
        assert!((Easing::CosineInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Easing::CosineInOut.apply(0.25) < 0.25, "slow start");
    }

    #[test]
    fn linear_tick_interpolates_and_completes() {
        let mut w = world();
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let opts = ScrollOptions::default()
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear);
        anim.scroll_to(Target::Viewport, Point::new(0.0, 1000.0), opts, t0, &w);
        assert!(anim.is_active(Target::Viewport));

        let still = anim.tick(t0 + Duration::from_millis(50), &mut w);
        assert_eq!(still, 1);
        let mid = w.scroll_offset_of(Target::Viewport);
        assert!((mid.y - 500.0).abs() < 1e-9, "midpoint, got {}", mid.y);

        let still = anim.tick(t0 + Duration::from_millis(200), &mut w);
        assert_eq!(still, 0);
        assert_eq!(w.scroll_offset_of(Target::Viewport).y, 1000.0);
        assert!(!anim.is_active(Target::Viewport));
    }

    #[test]
    fn zero_duration_snaps_on_first_tick() {
        let mut w = world();
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let opts = ScrollOptions::default().with_duration(Duration::ZERO);
        anim.scroll_to(Target::Viewport, Point::new(0.0, 250.0), opts, t0, &w);
        anim.tick(t0, &mut w);
        assert_eq!(w.scroll_offset_of(Target::Viewport).y, 250.0);
        assert_eq!(anim.active_count(), 0);
    }

    #[test]
    fn single_axis_requests_pin_the_other_axis() {
        let mut w = world();
        w.scroll(Target::Viewport, Point::new(40.0, 70.0));
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let opts = ScrollOptions::default().with_duration(Duration::ZERO);
        anim.vscroll_to(Target::Viewport, 500.0, opts, t0, &w);
        anim.tick(t0, &mut w);
        assert_eq!(w.scroll_offset_of(Target::Viewport), Point::new(40.0, 500.0));
    }

    #[test]
    fn scroll_to_bottom_uses_scrollable_range() {
        let mut w = world();
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let opts = ScrollOptions::default().with_duration(Duration::ZERO);
        anim.scroll_to_bottom(Target::Viewport, opts, t0, &w);
        anim.tick(t0, &mut w);
        // 3000 content - 600 viewport.
        assert_eq!(w.scroll_offset_of(Target::Viewport).y, 2400.0);
    }

    #[test]
    fn overwrite_cancels_previous_animation() {
        let mut w = world();
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let cancelled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&cancelled);

        let first = ScrollOptions::default().on_cancel(move || flag.set(true));
        anim.scroll_to(Target::Viewport, Point::new(0.0, 100.0), first, t0, &w);
        anim.scroll_to(
            Target::Viewport,
            Point::new(0.0, 900.0),
            ScrollOptions::default().with_duration(Duration::ZERO),
            t0,
            &w,
        );

        assert!(cancelled.get());
        anim.tick(t0, &mut w);
        assert_eq!(w.scroll_offset_of(Target::Viewport).y, 900.0);
    }

    #[test]
    fn keep_running_drops_competing_request() {
        let mut w = world();
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        anim.scroll_to(
            Target::Viewport,
            Point::new(0.0, 100.0),
            ScrollOptions::default()
                .with_duration(Duration::ZERO)
                .keep_running(),
            t0,
            &w,
        );
        anim.scroll_to(
            Target::Viewport,
            Point::new(0.0, 900.0),
            ScrollOptions::default().keep_running(),
            t0,
            &w,
        );
        anim.tick(t0, &mut w);
        assert_eq!(w.scroll_offset_of(Target::Viewport).y, 100.0);
    }

    #[test]
    fn completion_and_progress_callbacks_fire() {
        let mut w = world();
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let done = Rc::new(Cell::new(false));
        let done_flag = Rc::clone(&done);
        let last_progress = Rc::new(Cell::new(0.0));
        let progress_flag = Rc::clone(&last_progress);

        let opts = ScrollOptions::default()
            .with_duration(Duration::from_millis(100))
            .on_progress(move |p| progress_flag.set(p))
            .on_complete(move || done_flag.set(true));
        anim.scroll_to(Target::Viewport, Point::new(0.0, 100.0), opts, t0, &w);

        anim.tick(t0 + Duration::from_millis(50), &mut w);
        assert!(!done.get());
        assert!(last_progress.get() > 0.0 && last_progress.get() < 1.0);

        anim.tick(t0 + Duration::from_millis(150), &mut w);
        assert!(done.get());
        assert!((last_progress.get() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cancel_all_fires_each_cancel_once() {
        let mut w = world();
        let id = dkit_core::ElementId(7);
        w.insert_element(
            id,
            dkit_core::Rect::new(0.0, 0.0, 200.0, 200.0),
            dkit_core::Rect::new(0.0, 0.0, 200.0, 800.0),
        );
        let mut anim = ScrollAnimator::new();
        let t0 = Instant::now();
        let count = Rc::new(Cell::new(0u32));

        for target in [Target::Viewport, Target::Element(id)] {
            let counter = Rc::clone(&count);
            anim.scroll_to(
                target,
                Point::new(0.0, 50.0),
                ScrollOptions::default().on_cancel(move || counter.set(counter.get() + 1)),
                t0,
                &w,
            );
        }
        assert_eq!(anim.active_count(), 2);
        anim.cancel_all();
        assert_eq!(count.get(), 2);
        assert_eq!(anim.active_count(), 0);
    }
}
