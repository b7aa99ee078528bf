//! The change scheduler.
//!
//! # How it works
//!
//! 1. Signals arrive via [`ChangeScheduler::on_signal`]: the payload is
//!    captured with cheap field writes and the matching category is marked
//!    dirty.
//! 2. The first mark requests one frame from the [`FramePump`]; further
//!    marks ride along with the outstanding request.
//! 3. When the host fires the frame it calls [`ChangeScheduler::run_frame`]:
//!    a [`ChangeSnapshot`] of exactly the dirty categories goes to the single
//!    registered handler, then dirty state clears to NONE and the payload
//!    records reseed.
//! 4. Marks that cannot be honored right now — `validate_now` while a frame
//!    is pending, or any mark made from inside the handler — are queued and
//!    replayed through [`ChangeScheduler::run_deferred`] after the host's
//!    zero-delay retry, so they survive the post-dispatch clear.
//!
//! The scheduler is single-threaded by construction: no locks, no interior
//! mutability. Re-entrancy is handled by the deferred queue, not by
//! synchronization.

use std::time::Duration;

use dkit_core::{
    DirtyFlags, EventSource, Point, Signal, SignalBinding, SignalKind, SubscribeError,
    SubscriptionId, Target,
};
use tracing::{debug, trace};

use crate::pump::{FramePump, FrameRequest};
use crate::record::RecordStore;
use crate::snapshot::ChangeSnapshot;
use crate::{InputRecord, PositionRecord, SizeRecord};

/// How one signal kind is configured on a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalConfig {
    /// Viewport conductor, native delivery rate.
    Default,
    /// Viewport conductor, debounced.
    Rate(Duration),
    /// Explicit conductor and rate.
    Bound(SignalBinding),
}

impl SignalConfig {
    fn binding(&self) -> SignalBinding {
        match self {
            Self::Default => SignalBinding::viewport(),
            Self::Rate(rate) => SignalBinding::viewport().debounced(*rate),
            Self::Bound(binding) => *binding,
        }
    }
}

/// Which signals a scheduler subscribes to, and how.
#[derive(Debug, Clone, Default)]
pub struct SchedulerOptions {
    entries: Vec<(SignalKind, SignalConfig)>,
}

impl SchedulerOptions {
    /// No subscriptions. Signals can still be fed in manually.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scroll and resize on the viewport — the scroll-effect baseline.
    #[must_use]
    pub fn scroll_and_resize() -> Self {
        Self::empty()
            .with(SignalKind::Scroll, SignalConfig::Default)
            .with(SignalKind::Resize, SignalConfig::Default)
    }

    /// Add or replace the configuration for `kind`.
    #[must_use]
    pub fn with(mut self, kind: SignalKind, config: SignalConfig) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = config;
        } else {
            self.entries.push((kind, config));
        }
        self
    }

    /// The configured binding for `kind`, if any.
    #[must_use]
    pub fn binding_for(&self, kind: SignalKind) -> Option<SignalBinding> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, config)| config.binding())
    }

    /// Iterate configured `(kind, binding)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, SignalBinding)> + '_ {
        self.entries
            .iter()
            .map(|(kind, config)| (*kind, config.binding()))
    }
}

type Handler<P> = Box<dyn FnMut(&ChangeSnapshot, &mut ChangeScheduler<P>)>;

/// Coalesces dirty marks into at most one handler invocation per frame.
pub struct ChangeScheduler<P: FramePump> {
    pump: P,
    options: SchedulerOptions,
    dirty: DirtyFlags,
    records: RecordStore,
    handler: Option<Handler<P>>,
    pending: Option<FrameRequest>,
    deferred: Vec<(DirtyFlags, bool)>,
    subscriptions: Vec<SubscriptionId>,
    dispatching: bool,
}

impl<P: FramePump> std::fmt::Debug for ChangeScheduler<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeScheduler")
            .field("dirty", &self.dirty)
            .field("pending", &self.pending)
            .field("deferred", &self.deferred.len())
            .field("subscriptions", &self.subscriptions.len())
            .field("dispatching", &self.dispatching)
            .finish_non_exhaustive()
    }
}

impl<P: FramePump> ChangeScheduler<P> {
    /// Create a scheduler over the host's frame pump.
    pub fn new(pump: P, options: SchedulerOptions) -> Self {
        Self {
            pump,
            options,
            dirty: DirtyFlags::NONE,
            records: RecordStore::default(),
            handler: None,
            pending: None,
            deferred: Vec::new(),
            subscriptions: Vec::new(),
            dispatching: false,
        }
    }

    /// Register the single update handler.
    ///
    /// Replaces any previous handler. The handler receives the snapshot and
    /// the scheduler itself, so it may mark further categories dirty; those
    /// marks are deferred past the current dispatch.
    pub fn set_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&ChangeSnapshot, &mut Self) + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Check dirty status.
    ///
    /// `NONE` and `ALL` use exact-match semantics (the whole mask must equal
    /// the sentinel); every other value tests with a bitwise AND.
    #[must_use]
    pub fn is_dirty(&self, flags: DirtyFlags) -> bool {
        if flags == DirtyFlags::NONE || flags == DirtyFlags::ALL {
            self.dirty == flags
        } else {
            self.dirty.intersects(flags)
        }
    }

    /// Mark categories dirty, scheduling a dispatch.
    ///
    /// Idempotent when the categories are already dirty and `validate_now`
    /// is not set. `NONE` and `ALL` replace the whole mask; marking `NONE`
    /// also reseeds every payload record. `validate_now` dispatches
    /// synchronously when possible; when a frame is already pending (or a
    /// dispatch is running) the mark is deferred through a zero-delay retry
    /// instead of double-scheduling.
    pub fn mark_dirty(&mut self, flags: DirtyFlags, validate_now: bool) {
        if self.is_dirty(flags) && !validate_now {
            return;
        }

        if flags == DirtyFlags::NONE || flags == DirtyFlags::ALL {
            self.dirty = flags;
        } else {
            self.dirty |= flags;
        }

        if self.dirty == DirtyFlags::NONE {
            self.records.reset();
            return;
        }

        trace!(dirty = %self.dirty, validate_now, "mark_dirty");

        if validate_now {
            if self.pending.is_some() || self.dispatching {
                self.defer(flags, true);
            } else {
                self.run_frame();
            }
        } else if self.dispatching {
            // Marks made from inside the handler would be wiped by the
            // post-dispatch clear; replay them on the retry instead.
            self.defer(flags, false);
        } else if self.pending.is_none() {
            self.pending = Some(self.pump.request_frame());
        }
        // Otherwise a frame is already pending and the mark rides with it.
    }

    fn defer(&mut self, flags: DirtyFlags, validate_now: bool) {
        self.deferred.push((flags, validate_now));
        self.pump.request_retry();
    }

    /// Capture a signal's payload and mark its category dirty.
    pub fn on_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Resize | Signal::FrameTick => {}
            Signal::Scroll { offset } => self.records.position.offset = Some(offset),
            Signal::PointerMove { x, y } => {
                self.records.input.pointer = Some(Point::new(x, y));
            }
            Signal::Wheel { delta_x, delta_y } => {
                self.records.input.wheel = Some(Point::new(delta_x, delta_y));
            }
            Signal::OrientationChange { x, y, z } => {
                self.records.orientation.x = Some(x);
                self.records.orientation.y = Some(y);
                self.records.orientation.z = Some(z);
            }
            Signal::KeyUp { code } => self.records.input.keys_up.push(code),
            Signal::KeyDown { code } => self.records.input.keys_down.push(code),
            Signal::KeyPress { code } => self.records.input.keys_pressed.push(code),
        }

        if let Signal::FrameTick = signal {
            self.records.frame.ticks += 1;
        }

        self.mark_dirty(signal.kind().dirty_flag(), false);
    }

    /// Dispatch the current dirty state to the handler, then clear it.
    ///
    /// The host calls this when the requested frame fires. Clearing happens
    /// after the handler returns; a panicking handler therefore leaves the
    /// next frame correctly seeded and nothing is caught here.
    pub fn run_frame(&mut self) {
        self.pending = None;

        let snapshot = self.take_snapshot();
        debug!(flags = %snapshot.flags, "dispatch");

        if let Some(mut handler) = self.handler.take() {
            self.dispatching = true;
            handler(&snapshot, self);
            self.dispatching = false;
            // A handler may have installed a replacement mid-dispatch.
            if self.handler.is_none() {
                self.handler = Some(handler);
            }
        }

        self.dirty = DirtyFlags::NONE;
        self.records.reset();
    }

    /// Replay deferred marks. The host calls this on the zero-delay retry.
    pub fn run_deferred(&mut self) {
        let deferred = std::mem::take(&mut self.deferred);
        for (flags, validate_now) in deferred {
            self.mark_dirty(flags, validate_now);
        }
    }

    /// Install every configured subscription.
    ///
    /// Callers that derive state pre-dispatch (the scroll coordinator) call
    /// this directly so they can seed their records before the forced first
    /// pass; everyone else uses [`ChangeScheduler::init`].
    pub fn subscribe_all(&mut self, source: &mut impl EventSource) -> Result<(), SubscribeError> {
        let bindings: Vec<_> = self.options.iter().collect();
        for (kind, mut binding) in bindings {
            if !kind.supports_custom_conductor() {
                // Resize, orientation, and keyboard signals are global.
                binding.conductor = Target::Viewport;
            }
            let id = source.subscribe(kind, &binding)?;
            trace!(?kind, ?id, "subscribed");
            self.subscriptions.push(id);
        }
        Ok(())
    }

    /// Install every configured subscription and force one full synchronous
    /// pass, so first-paint derived state exists before any real signal.
    pub fn init(&mut self, source: &mut impl EventSource) -> Result<(), SubscribeError> {
        self.subscribe_all(source)?;
        self.mark_dirty(DirtyFlags::ALL, true);
        Ok(())
    }

    /// Cancel any pending frame and remove every installed subscription.
    ///
    /// Safe to call multiple times.
    pub fn deinit(&mut self, source: &mut impl EventSource) {
        if let Some(request) = self.pending.take() {
            self.pump.cancel_frame(request);
        }
        self.deferred.clear();
        for id in self.subscriptions.drain(..) {
            trace!(?id, "unsubscribed");
            source.unsubscribe(id);
        }
    }

    /// Whether a frame request is outstanding.
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The number of marks awaiting a retry.
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// The configured subscriptions.
    #[must_use]
    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    /// Mutable POSITION payload, for derivation steps that run pre-dispatch.
    pub fn position_record_mut(&mut self) -> &mut PositionRecord {
        &mut self.records.position
    }

    /// Mutable SIZE payload, for derivation steps that run pre-dispatch.
    pub fn size_record_mut(&mut self) -> &mut SizeRecord {
        &mut self.records.size
    }

    /// The current POSITION payload.
    #[must_use]
    pub fn position_record(&self) -> &PositionRecord {
        &self.records.position
    }

    /// The current SIZE payload.
    #[must_use]
    pub fn size_record(&self) -> &SizeRecord {
        &self.records.size
    }

    /// The current INPUT payload.
    #[must_use]
    pub fn input_record(&self) -> &InputRecord {
        &self.records.input
    }

    fn take_snapshot(&self) -> ChangeSnapshot {
        let mut snapshot = ChangeSnapshot {
            flags: self.dirty,
            ..Default::default()
        };
        if self.is_dirty(DirtyFlags::POSITION) {
            snapshot.position = Some(self.records.position);
        }
        if self.is_dirty(DirtyFlags::SIZE) {
            snapshot.size = Some(self.records.size);
        }
        if self.is_dirty(DirtyFlags::INPUT) {
            snapshot.input = Some(self.records.input.clone());
        }
        if self.is_dirty(DirtyFlags::ORIENTATION) {
            snapshot.orientation = Some(self.records.orientation);
        }
        if self.is_dirty(DirtyFlags::FRAME) {
            snapshot.frame = Some(self.records.frame);
        }
        snapshot
    }
}
