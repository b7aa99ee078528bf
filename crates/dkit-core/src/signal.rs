//! Environmental signals.
//!
//! Hosts translate their native events (window resize, scroll, pointer move,
//! device orientation, keyboard, frame ticks) into [`Signal`] values, a
//! closed enumeration where every variant carries its own typed payload.
//! [`SignalKind`] is the payload-less discriminant used when configuring
//! subscriptions.

use crate::dirty::DirtyFlags;
use crate::geometry::Point;

/// An environmental event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// The conductor (viewport or element) was resized.
    Resize,
    /// The conductor scrolled to `offset`.
    Scroll {
        /// New raw scroll offset.
        offset: Point,
    },
    /// The pointer moved.
    PointerMove {
        /// Pointer x in viewport coordinates.
        x: f64,
        /// Pointer y in viewport coordinates.
        y: f64,
    },
    /// The wheel spun.
    Wheel {
        /// Horizontal wheel delta.
        delta_x: f64,
        /// Vertical wheel delta.
        delta_y: f64,
    },
    /// The device orientation changed.
    OrientationChange {
        /// Rotation around the x axis.
        x: f64,
        /// Rotation around the y axis.
        y: f64,
        /// Rotation around the z axis.
        z: f64,
    },
    /// A key was released.
    KeyUp {
        /// Host key code.
        code: u32,
    },
    /// A key was pressed down.
    KeyDown {
        /// Host key code.
        code: u32,
    },
    /// A key produced a character press.
    KeyPress {
        /// Host key code.
        code: u32,
    },
    /// A rendering frame elapsed on the conductor's clock.
    FrameTick,
}

impl Signal {
    /// The payload-less discriminant of this signal.
    #[must_use]
    pub const fn kind(&self) -> SignalKind {
        match self {
            Self::Resize => SignalKind::Resize,
            Self::Scroll { .. } => SignalKind::Scroll,
            Self::PointerMove { .. } => SignalKind::PointerMove,
            Self::Wheel { .. } => SignalKind::Wheel,
            Self::OrientationChange { .. } => SignalKind::OrientationChange,
            Self::KeyUp { .. } => SignalKind::KeyUp,
            Self::KeyDown { .. } => SignalKind::KeyDown,
            Self::KeyPress { .. } => SignalKind::KeyPress,
            Self::FrameTick => SignalKind::FrameTick,
        }
    }
}

/// The kinds of signal a scheduler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Conductor resize.
    Resize,
    /// Conductor scroll.
    Scroll,
    /// Pointer movement.
    PointerMove,
    /// Wheel rotation.
    Wheel,
    /// Device orientation change.
    OrientationChange,
    /// Key release.
    KeyUp,
    /// Key press (down).
    KeyDown,
    /// Key character press.
    KeyPress,
    /// Per-frame tick.
    FrameTick,
}

impl SignalKind {
    /// Every signal kind, in a stable order.
    pub const ALL: [Self; 9] = [
        Self::Resize,
        Self::Scroll,
        Self::PointerMove,
        Self::Wheel,
        Self::OrientationChange,
        Self::KeyUp,
        Self::KeyDown,
        Self::KeyPress,
        Self::FrameTick,
    ];

    /// The dirty category this signal kind marks when it fires.
    #[must_use]
    pub const fn dirty_flag(self) -> DirtyFlags {
        match self {
            Self::Resize => DirtyFlags::SIZE,
            Self::Scroll => DirtyFlags::POSITION,
            Self::PointerMove | Self::Wheel | Self::KeyUp | Self::KeyDown | Self::KeyPress => {
                DirtyFlags::INPUT
            }
            Self::OrientationChange => DirtyFlags::ORIENTATION,
            Self::FrameTick => DirtyFlags::FRAME,
        }
    }

    /// Whether this kind supports a custom conductor.
    ///
    /// Resize, orientation, and keyboard signals are global to the viewport;
    /// scroll, wheel, and pointer signals can be bound to a specific element.
    #[must_use]
    pub const fn supports_custom_conductor(self) -> bool {
        matches!(self, Self::Scroll | Self::Wheel | Self::PointerMove)
    }
}
