#![forbid(unsafe_code)]

//! Test doubles for driftkit.
//!
//! Everything the engine consumes from a host has a hand-crankable fake
//! here: [`FakeWorld`] stands in for geometry queries and visual writes,
//! [`ManualPump`] for the frame-callback clock, and
//! [`RecordingEventSource`] for subscription plumbing. Tests drive frames
//! and signals explicitly, so scheduler and coordinator behavior is fully
//! deterministic.

pub mod pump;
pub mod source;
pub mod world;

pub use pump::{ManualPump, PumpProbe};
pub use source::RecordingEventSource;
pub use world::FakeWorld;
