//! Host collaborator traits.
//!
//! The engine never touches a real document or window. Everything it needs
//! from the environment goes through three narrow traits:
//!
//! - [`GeometryProvider`] — pure, synchronous geometry queries. May be called
//!   arbitrarily often; no caching is assumed.
//! - [`VisualWriter`] — applies computed displacements, sizes, and scroll
//!   offsets back onto host elements.
//! - [`EventSource`] — installs and removes signal subscriptions.
//!
//! Geometry validity is inherently racy against the host's element
//! lifecycle, so every query returns `Option`: a detached target yields
//! `None` and dependent computation degrades to absent rather than erroring.

use std::time::Duration;

use crate::geometry::{Point, Rect, Size};
use crate::signal::SignalKind;

/// Opaque identity of a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// A geometry or subscription target.
///
/// The viewport is the default conductor; elements are scrollable containers
/// or displaced targets inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// The host viewport.
    Viewport,
    /// A specific element.
    Element(ElementId),
}

impl Default for Target {
    fn default() -> Self {
        Self::Viewport
    }
}

impl From<ElementId> for Target {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

/// Synchronous geometry queries against the host.
pub trait GeometryProvider {
    /// The target's rectangle, excluding overflowed content.
    ///
    /// `None` when the target is detached or unknown.
    fn rect_of(&self, target: Target) -> Option<Rect>;

    /// The target's content rectangle, including overflowed content.
    ///
    /// `None` when the target is detached or unknown.
    fn content_rect_of(&self, target: Target) -> Option<Rect>;

    /// The target's current raw scroll offset.
    fn scroll_offset_of(&self, target: Target) -> Point;
}

/// Applies computed visual state back onto host elements.
pub trait VisualWriter {
    /// Displace `el` by `offset` (a translate-style visual transform).
    fn set_translation(&mut self, el: ElementId, offset: Point);

    /// Set `el`'s box dimensions directly.
    fn set_size(&mut self, el: ElementId, size: Size);

    /// Set the raw scroll offset of `target`.
    fn set_scroll_offset(&mut self, target: Target, offset: Point);
}

/// How one signal subscription is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalBinding {
    /// The element (or viewport) whose signals are observed.
    pub conductor: Target,
    /// Optional debounce rate. `None` means deliver at the host's native
    /// rate; debounce is configuration, not correctness.
    pub refresh_rate: Option<Duration>,
}

impl SignalBinding {
    /// Binding against the viewport at the native rate.
    #[must_use]
    pub const fn viewport() -> Self {
        Self {
            conductor: Target::Viewport,
            refresh_rate: None,
        }
    }

    /// Binding against a specific conductor at the native rate.
    #[must_use]
    pub const fn to(conductor: Target) -> Self {
        Self {
            conductor,
            refresh_rate: None,
        }
    }

    /// Set a debounce rate.
    #[must_use]
    pub const fn debounced(mut self, rate: Duration) -> Self {
        self.refresh_rate = Some(rate);
        self
    }
}

/// Handle to an installed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Errors installing a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubscribeError {
    /// The host cannot deliver this signal kind.
    #[error("signal kind {0:?} is not supported by this host")]
    Unsupported(SignalKind),
}

/// Subscription management on the host's event plumbing.
pub trait EventSource {
    /// Install a subscription for `kind` at `binding`.
    fn subscribe(
        &mut self,
        kind: SignalKind,
        binding: &SignalBinding,
    ) -> Result<SubscriptionId, SubscribeError>;

    /// Remove a previously installed subscription.
    ///
    /// Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}
