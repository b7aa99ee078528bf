#![forbid(unsafe_code)]

//! Runtime: the frame-coalescing change scheduler.
//!
//! # Role in driftkit
//! `dkit-runtime` turns an arbitrary burst of environmental signals into at
//! most one downstream notification per rendering frame. Signals do only
//! cheap payload capture on receipt; the expensive recomputation happens once
//! when the frame fires, no matter how many signals arrived in between.
//!
//! # Primary responsibilities
//! - **ChangeScheduler**: dirty bitmask, typed payload records, subscription
//!   lifecycle, and snapshot dispatch to a single registered handler.
//! - **FramePump**: the host's frame-callback plumbing behind a trait, so
//!   the scheduler can run against a real compositor clock or a hand-cranked
//!   test pump.
//! - **ChangeSnapshot**: the per-frame view of exactly which categories
//!   changed, with their accumulated payloads.
//!
//! # How it fits in the system
//! `dkit-scroll` wraps a `ChangeScheduler` in its `ScrollCoordinator`,
//! re-deriving scroll extents and displacements whenever the SIZE or
//! POSITION categories come up dirty. Hosts implement [`pump::FramePump`]
//! and `dkit_core::EventSource` and forward signals in.

pub mod pump;
pub mod record;
pub mod scheduler;
pub mod snapshot;

pub use pump::{FramePump, FrameRequest};
pub use record::{FrameRecord, InputRecord, OrientationRecord, PositionRecord, SizeRecord};
pub use scheduler::{ChangeScheduler, SchedulerOptions, SignalConfig};
pub use snapshot::ChangeSnapshot;
