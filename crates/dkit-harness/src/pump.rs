//! Hand-cranked frame pump.

use std::cell::RefCell;
use std::rc::Rc;

use dkit_runtime::{FramePump, FrameRequest};

#[derive(Debug, Default)]
struct PumpState {
    next_id: u64,
    outstanding: Option<FrameRequest>,
    requests: u64,
    cancels: u64,
    retries: u64,
}

/// A [`FramePump`] that never fires on its own.
///
/// The pump is handed to the scheduler; the matching [`PumpProbe`] stays
/// with the test, which observes request/cancel/retry counts and decides
/// when a frame "fires" by calling the scheduler's `run_frame` itself.
#[derive(Debug)]
pub struct ManualPump {
    state: Rc<RefCell<PumpState>>,
}

impl ManualPump {
    /// Create a pump and its observation probe.
    #[must_use]
    pub fn new() -> (Self, PumpProbe) {
        let state = Rc::new(RefCell::new(PumpState::default()));
        (
            Self {
                state: state.clone(),
            },
            PumpProbe { state },
        )
    }
}

impl FramePump for ManualPump {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requests += 1;
        let request = FrameRequest(state.next_id);
        state.outstanding = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.state.borrow_mut();
        state.cancels += 1;
        if state.outstanding == Some(request) {
            state.outstanding = None;
        }
    }

    fn request_retry(&mut self) {
        self.state.borrow_mut().retries += 1;
    }
}

/// Test-side view of a [`ManualPump`].
#[derive(Debug)]
pub struct PumpProbe {
    state: Rc<RefCell<PumpState>>,
}

impl PumpProbe {
    /// Total frame requests made.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.state.borrow().requests
    }

    /// Total cancellations.
    #[must_use]
    pub fn cancels(&self) -> u64 {
        self.state.borrow().cancels
    }

    /// Total zero-delay retries requested.
    #[must_use]
    pub fn retries(&self) -> u64 {
        self.state.borrow().retries
    }

    /// Whether a frame request is outstanding.
    #[must_use]
    pub fn has_outstanding(&self) -> bool {
        self.state.borrow().outstanding.is_some()
    }

    /// Consume the outstanding request, simulating the frame firing.
    ///
    /// Returns `None` when nothing was requested (or it was cancelled).
    pub fn take_frame(&self) -> Option<FrameRequest> {
        self.state.borrow_mut().outstanding.take()
    }
}
