#![forbid(unsafe_code)]

//! Core: geometry, dirty categories, signals, and host collaborator traits.
//!
//! # Role in driftkit
//! `dkit-core` is the leaf crate the rest of the workspace builds on. It owns
//! the value types that cross crate boundaries and the narrow traits a host
//! environment implements so the engine stays independent of any particular
//! windowing or document layer.
//!
//! # Primary responsibilities
//! - **Geometry**: f64 [`geometry::Point`], [`geometry::Size`],
//!   [`geometry::Rect`] and the [`geometry::Axis`] selector.
//! - **DirtyFlags**: the bitmask of change categories the scheduler tracks.
//! - **Signal**: the closed enumeration of environmental events, each with a
//!   strongly-typed payload.
//! - **World traits**: [`world::GeometryProvider`], [`world::VisualWriter`],
//!   and [`world::EventSource`] — everything the engine needs from a host,
//!   and nothing more.
//!
//! # How it fits in the system
//! `dkit-runtime` consumes signals and tracks dirty state; `dkit-scroll`
//! queries geometry and writes visual offsets. Both talk to the host only
//! through the traits defined here, which is what makes the engine testable
//! against the in-memory world in `dkit-harness`.

pub mod dirty;
pub mod geometry;
pub mod signal;
pub mod world;

pub use dirty::DirtyFlags;
pub use geometry::{Axis, Point, Rect, Size};
pub use signal::{Signal, SignalKind};
pub use world::{
    ElementId, EventSource, GeometryProvider, SignalBinding, SubscribeError, SubscriptionId,
    Target, VisualWriter,
};
