//! The scroll coordinator.
//!
//! # Role in the engine
//!
//! Specializes the runtime's [`ChangeScheduler`] for the scroll/resize use
//! case. On each frame it re-derives the POSITION and SIZE payloads from
//! live geometry before dispatch:
//!
//! - **SIZE** — the displaced target's minimal and overflow-inclusive size
//!   plus an aggregated maximum (overflow size grown by every break's hold
//!   length), optionally mirrored onto a container element.
//! - **POSITION** — the conductor's scroll offset normalized to a step,
//!   mapped through the break algebra to the target's natural position,
//!   optionally written onto the target as a negative translation.
//!
//! The inherited variants of the original design are configuration here:
//! [`AxisMode::Inverted`] swaps axes before mapping (cross-axis effects)
//! and a sticky coordinator sets `auto_apply` off so the position is
//! reported but never written, leaving the target visually pinned through
//! its holds.

use dkit_core::{
    Axis, DirtyFlags, ElementId, EventSource, GeometryProvider, Point, Rect, Signal, Size,
    SubscribeError, Target, VisualWriter,
};
use dkit_runtime::{ChangeScheduler, ChangeSnapshot, FramePump, SchedulerOptions};
use tracing::trace;
use web_time::Instant;

use crate::animate::{ScrollAnimator, ScrollOptions};
use crate::breaks::{BreakContext, BreakDescriptor};
use crate::mapper::{self, Extent};

/// Caller-supplied break source, re-evaluated against live geometry on
/// every derivation.
type BreakSource = Box<dyn Fn(&BreakContext) -> BreakDescriptor>;

/// How conductor steps map onto target axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisMode {
    /// Vertical scroll displaces vertically, horizontal horizontally.
    #[default]
    Normal,
    /// Axes are swapped before mapping: vertical scroll drives horizontal
    /// displacement and vice versa. Container size mirroring swaps
    /// width and height to match.
    Inverted,
}

/// Coordinator behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Axis mapping mode.
    pub axis_mode: AxisMode,
    /// Write the computed natural position onto the target as a
    /// translation. Off for sticky effects: the position is still derived
    /// and reported, the target just never moves with it.
    pub auto_apply: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            axis_mode: AxisMode::Normal,
            auto_apply: true,
        }
    }
}

impl CoordinatorConfig {
    /// Cross-axis displacement.
    #[must_use]
    pub fn inverted() -> Self {
        Self {
            axis_mode: AxisMode::Inverted,
            ..Self::default()
        }
    }

    /// Derive and report, never translate the target.
    #[must_use]
    pub fn sticky() -> Self {
        Self {
            auto_apply: false,
            ..Self::default()
        }
    }
}

/// Scroll-specialized change coordinator.
///
/// Owns a [`ChangeScheduler`], a break source and a scroll animator. The
/// host feeds signals in through [`ScrollCoordinator::on_signal`] and
/// calls [`ScrollCoordinator::run_frame`] when the pump's frame fires.
pub struct ScrollCoordinator<P: FramePump> {
    sched: ChangeScheduler<P>,
    config: CoordinatorConfig,
    conductor: Target,
    target: Option<ElementId>,
    container: Option<ElementId>,
    break_source: Option<BreakSource>,
    animator: ScrollAnimator,
}

impl<P: FramePump> std::fmt::Debug for ScrollCoordinator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("sched", &self.sched)
            .field("config", &self.config)
            .field("conductor", &self.conductor)
            .field("target", &self.target)
            .field("container", &self.container)
            .field("break_source", &self.break_source.is_some())
            .field("animator", &self.animator)
            .finish()
    }
}

impl<P: FramePump> ScrollCoordinator<P> {
    /// Create a coordinator over the host's frame pump.
    pub fn new(pump: P, options: SchedulerOptions, config: CoordinatorConfig) -> Self {
        Self {
            sched: ChangeScheduler::new(pump, options),
            config,
            conductor: Target::Viewport,
            target: None,
            container: None,
            break_source: None,
            animator: ScrollAnimator::new(),
        }
    }

    /// The element being displaced.
    pub fn set_target(&mut self, target: Option<ElementId>) {
        self.target = target;
    }

    /// The element whose box mirrors the aggregated maximum size.
    pub fn set_container(&mut self, container: Option<ElementId>) {
        self.container = container;
    }

    /// The scrollable whose offset drives the effect. Defaults to the
    /// viewport.
    pub fn set_conductor(&mut self, conductor: Target) {
        self.conductor = conductor;
    }

    /// Install a break source, re-evaluated against live geometry on every
    /// derivation.
    pub fn set_break_source<F>(&mut self, source: F)
    where
        F: Fn(&BreakContext) -> BreakDescriptor + 'static,
    {
        self.break_source = Some(Box::new(source));
    }

    /// Use a fixed break descriptor regardless of geometry.
    pub fn set_breaks(&mut self, breaks: BreakDescriptor) {
        self.set_break_source(move |_| breaks.clone());
    }

    /// Remove the break source.
    pub fn clear_breaks(&mut self) {
        self.break_source = None;
    }

    /// Evaluate the break source for `context`. Empty without a source.
    #[must_use]
    pub fn breaks_for(&self, context: &BreakContext) -> BreakDescriptor {
        self.break_source
            .as_ref()
            .map(|source| source(context))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn config(&self) -> CoordinatorConfig {
        self.config
    }

    #[must_use]
    pub fn conductor(&self) -> Target {
        self.conductor
    }

    /// The underlying scheduler, for dirty checks and manual marks.
    #[must_use]
    pub fn scheduler(&self) -> &ChangeScheduler<P> {
        &self.sched
    }

    pub fn scheduler_mut(&mut self) -> &mut ChangeScheduler<P> {
        &mut self.sched
    }

    /// Register the update handler. See [`ChangeScheduler::set_handler`].
    pub fn set_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&ChangeSnapshot, &mut ChangeScheduler<P>) + 'static,
    {
        self.sched.set_handler(handler);
    }

    /// Forward a raw signal into the scheduler.
    pub fn on_signal(&mut self, signal: Signal) {
        self.sched.on_signal(signal);
    }

    /// Install subscriptions, seed derived state from live geometry and
    /// force one full synchronous pass.
    pub fn init(
        &mut self,
        source: &mut impl EventSource,
        world: &mut (impl GeometryProvider + VisualWriter),
    ) -> Result<(), SubscribeError> {
        self.sched.subscribe_all(source)?;
        self.refresh_size(world);
        self.refresh_position(world);
        self.sched.mark_dirty(DirtyFlags::ALL, true);
        Ok(())
    }

    /// Tear down: cancel animations and the pending frame, remove
    /// subscriptions, drop target wiring. Safe to call multiple times.
    pub fn deinit(&mut self, source: &mut impl EventSource) {
        self.animator.cancel_all();
        self.sched.deinit(source);
        self.target = None;
        self.container = None;
        self.break_source = None;
    }

    /// Re-derive dirty payloads from live geometry, then dispatch.
    ///
    /// The host calls this when the requested frame fires. Only the
    /// categories actually marked dirty are re-derived.
    pub fn run_frame(&mut self, world: &mut (impl GeometryProvider + VisualWriter)) {
        if self.sched.is_dirty(DirtyFlags::SIZE) {
            self.refresh_size(world);
        }
        if self.sched.is_dirty(DirtyFlags::POSITION) {
            self.refresh_position(world);
        }
        self.sched.run_frame();
    }

    /// Replay deferred marks. See [`ChangeScheduler::run_deferred`].
    pub fn run_deferred(&mut self) {
        self.sched.run_deferred();
    }

    /// Re-derive the SIZE payload and mirror the container, if any.
    ///
    /// Absent target geometry leaves the target fields unset; nothing is
    /// written and nothing fails.
    pub fn refresh_size(&mut self, world: &mut (impl GeometryProvider + VisualWriter)) {
        let viewport = world.rect_of(self.conductor).map(|r| r.size());
        let target_geometry = self.target.and_then(|id| {
            let t = Target::Element(id);
            Some((world.rect_of(t)?, world.content_rect_of(t)?))
        });

        let derived = target_geometry.map(|(rect, content)| {
            let full = content.size();
            let max_pos = Point::new(
                (content.width - rect.width).max(0.0),
                (content.height - rect.height).max(0.0),
            );
            let breaks = self.breaks_for(&BreakContext::sizing(Point::ZERO, max_pos));
            let aggregated = Size::new(
                full.width + breaks.total_length(Axis::X),
                full.height + breaks.total_length(Axis::Y),
            );
            (rect.size(), full, aggregated)
        });

        let record = self.sched.size_record_mut();
        record.viewport = viewport;
        match derived {
            Some((min, max, aggregated)) => {
                record.target_min = Some(min);
                record.target_max = Some(max);
                record.target_aggregated_max = Some(aggregated);
            }
            None => {
                record.target_min = None;
                record.target_max = None;
                record.target_aggregated_max = None;
            }
        }

        if let (Some(container), Some((_, _, aggregated))) = (self.container, derived) {
            let applied = match self.config.axis_mode {
                AxisMode::Normal => aggregated,
                AxisMode::Inverted => aggregated.invert(),
            };
            trace!(?container, ?applied, "container mirror");
            world.set_size(container, applied);
        }
    }

    /// Re-derive the POSITION payload and translate the target, if enabled.
    ///
    /// Absent target geometry leaves the target fields unset; the conductor
    /// fields (offset, range, step) are always derived.
    pub fn refresh_position(&mut self, world: &mut (impl GeometryProvider + VisualWriter)) {
        let offset = world.scroll_offset_of(self.conductor);
        let max = self.max_position(world);
        let step = Point::new(axis_step(offset.x, max.x), axis_step(offset.y, max.y));

        let derived = self.target_extent(world).map(|extent| {
            let max_pos = Point::new(extent.x, extent.y);
            let breaks =
                self.breaks_for(&BreakContext::positioning(Point::ZERO, max_pos, offset, step));
            let mapped_step = match self.config.axis_mode {
                AxisMode::Normal => step,
                AxisMode::Inverted => step.invert(),
            };
            let natural = mapper::step_to_natural_point(mapped_step, extent, &breaks).or_zero();
            (natural, max_pos)
        });

        let record = self.sched.position_record_mut();
        record.offset = Some(offset);
        record.min = Some(Point::ZERO);
        record.max = Some(max);
        record.step = Some(step);

        let translation = match derived {
            Some((natural, max_pos)) => {
                record.target_pos = Some(natural);
                record.target_min = Some(Point::ZERO);
                record.target_max = Some(max_pos);
                Some(Point::new(-natural.x, -natural.y))
            }
            None => {
                record.target_pos = None;
                record.target_min = None;
                record.target_max = None;
                None
            }
        };

        if self.config.auto_apply {
            if let (Some(target), Some(translation)) = (self.target, translation) {
                trace!(?target, ?translation, "apply translation");
                world.set_translation(target, translation);
            }
        }
    }

    /// The conductor's minimum scrollable position. Always the origin.
    #[must_use]
    pub const fn min_position(&self) -> Point {
        Point::ZERO
    }

    /// The conductor's maximum scrollable position per axis, zero when the
    /// conductor has no geometry or its content fits.
    #[must_use]
    pub fn max_position(&self, world: &impl GeometryProvider) -> Point {
        conductor_max(world, self.conductor)
    }

    /// The target's displacement range per axis, absent without geometry.
    #[must_use]
    pub fn target_extent(&self, world: &impl GeometryProvider) -> Option<Extent> {
        let target = Target::Element(self.target?);
        let rect = world.rect_of(target)?;
        let content = world.content_rect_of(target)?;
        Some(Extent::new(
            (content.width - rect.width).max(0.0),
            (content.height - rect.height).max(0.0),
        ))
    }

    /// Fractional progress through the break at `index` on `axis`, for a
    /// step along the target's displaced axis. Absent without target
    /// geometry, breaks on that axis, or a valid index.
    #[must_use]
    pub fn relative_break_step(
        &self,
        axis: Axis,
        index: usize,
        step: f64,
        world: &impl GeometryProvider,
    ) -> Option<f64> {
        let extent = self.target_extent(world)?;
        let descriptor =
            self.breaks_for(&BreakContext::sizing(Point::ZERO, Point::new(extent.x, extent.y)));
        let breaks = descriptor.axis(axis)?;
        let axis_extent = extent.axis(axis);
        let virtual_pos = mapper::step_to_virtual(step, axis_extent, Some(breaks));
        mapper::relative_break_progress(breaks, index, virtual_pos, axis_extent)
    }

    /// Fractional passage of `child` (a rectangle in the target's content
    /// space) across the conductor's edge on `axis`, for a step along the
    /// target's displaced axis. Absent without geometry.
    #[must_use]
    pub fn child_step(
        &self,
        axis: Axis,
        child: Rect,
        step: f64,
        world: &impl GeometryProvider,
    ) -> Option<f64> {
        let extent = self.target_extent(world)?;
        let descriptor =
            self.breaks_for(&BreakContext::sizing(Point::ZERO, Point::new(extent.x, extent.y)));
        let axis_extent = extent.axis(axis);
        let natural = mapper::step_to_natural(step, axis_extent, descriptor.axis(axis));
        let viewport_extent = world.rect_of(self.conductor)?.extent(axis);
        Some(mapper::child_progress(
            natural,
            viewport_extent,
            child.lead(axis),
            child.extent(axis),
        ))
    }

    /// Animate the conductor's scroll offset to `dest`.
    pub fn scroll_to(
        &mut self,
        dest: Point,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.scroll_to(self.conductor, dest, opts, now, world);
    }

    /// Animate only the conductor's horizontal offset.
    pub fn hscroll_to(
        &mut self,
        x: f64,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.hscroll_to(self.conductor, x, opts, now, world);
    }

    /// Animate only the conductor's vertical offset.
    pub fn vscroll_to(
        &mut self,
        y: f64,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.vscroll_to(self.conductor, y, opts, now, world);
    }

    /// Animate the conductor to the top of its range.
    pub fn scroll_to_top(
        &mut self,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.scroll_to_top(self.conductor, opts, now, world);
    }

    /// Animate the conductor to the bottom of its range.
    pub fn scroll_to_bottom(
        &mut self,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.scroll_to_bottom(self.conductor, opts, now, world);
    }

    /// Animate the conductor to the left edge of its range.
    pub fn scroll_to_left(
        &mut self,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.scroll_to_left(self.conductor, opts, now, world);
    }

    /// Animate the conductor to the right edge of its range.
    pub fn scroll_to_right(
        &mut self,
        opts: ScrollOptions,
        now: Instant,
        world: &impl GeometryProvider,
    ) {
        self.animator.scroll_to_right(self.conductor, opts, now, world);
    }

    /// Advance running scroll animations. See [`ScrollAnimator::tick`].
    pub fn tick_animations(&mut self, now: Instant, world: &mut impl VisualWriter) -> usize {
        self.animator.tick(now, world)
    }

    #[must_use]
    pub fn animator(&self) -> &ScrollAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ScrollAnimator {
        &mut self.animator
    }
}

/// Conductor scrollable range: content minus viewport, floored at zero.
fn conductor_max(world: &impl GeometryProvider, conductor: Target) -> Point {
    let (Some(rect), Some(content)) = (world.rect_of(conductor), world.content_rect_of(conductor))
    else {
        return Point::ZERO;
    };
    Point::new(
        (content.width - rect.width).max(0.0),
        (content.height - rect.height).max(0.0),
    )
}

fn axis_step(offset: f64, max: f64) -> f64 {
    if max <= 0.0 { 0.0 } else { offset / max }
}
