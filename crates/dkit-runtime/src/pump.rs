//! Frame-callback plumbing.
//!
//! The scheduler never sleeps or spins; it asks the host for "call me on the
//! next rendering frame" and the host calls [`ChangeScheduler::run_frame`]
//! when that frame fires. [`FramePump`] is that request surface. A retry is
//! the zero-delay escape hatch for marks that arrive while a frame is
//! already pending or mid-dispatch: the host should call
//! [`ChangeScheduler::run_deferred`] as soon as the current task unwinds.
//!
//! [`ChangeScheduler::run_frame`]: crate::scheduler::ChangeScheduler::run_frame
//! [`ChangeScheduler::run_deferred`]: crate::scheduler::ChangeScheduler::run_deferred

/// Token identifying one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's frame-callback surface.
///
/// The scheduler guarantees it holds at most one outstanding request at a
/// time; it never double-schedules.
pub trait FramePump {
    /// Request a callback on the next rendering frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel an outstanding frame request.
    ///
    /// Cancelling a request that already fired is a no-op.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Request a zero-delay re-entry for deferred dirty marks.
    ///
    /// The host should invoke `run_deferred` after the current event-loop
    /// task completes, before the next frame.
    fn request_retry(&mut self);
}
