#![forbid(unsafe_code)]

//! Scroll: break algebra, coordinate mapping, and the scroll coordinator.
//!
//! # Role in driftkit
//! `dkit-scroll` turns normalized scroll progress into pixel displacements
//! that honor "scroll breaks" — configured regions where a target visually
//! freezes while raw scroll distance is consumed — and drives the whole
//! derivation off the change scheduler, once per frame.
//!
//! # Primary responsibilities
//! - **Breaks**: validated, ascending [`breaks::BreakSet`]s per axis.
//! - **Mapper**: pure conversions between steps, virtual positions
//!   (break lengths included), and natural positions (break lengths
//!   removed).
//! - **ScrollCoordinator**: wires SIZE/POSITION dirty categories to geometry
//!   re-derivation and optionally pushes results onto host elements. Axis
//!   inversion (cross-scroll) and sticky hold are configuration, not
//!   subclasses.
//! - **ScrollAnimator**: eased/linear programmatic scrolling with an
//!   explicit per-target registry.
//!
//! # How it fits in the system
//! A host forwards signals into the coordinator and fires frames from its
//! pump; handlers read the [`dkit_runtime::ChangeSnapshot`] and apply
//! whatever visual effects they like on top of the auto-applied
//! displacement.

pub mod animate;
pub mod breaks;
pub mod coordinator;
pub mod mapper;

pub use animate::{Easing, ScrollAnimator, ScrollOptions};
pub use breaks::{BreakContext, BreakDescriptor, BreakSet, BreakSetError, ScrollBreak};
pub use coordinator::{AxisMode, CoordinatorConfig, ScrollCoordinator};
pub use mapper::Extent;
