//! # Input
//!
//! Mouse, pen, and touch events arrive in viewport ("client") coordinates. Everything past this module works in
//! surface pixels, so this is the one place that knows about element offsets and pixel density.

use smallvec::SmallVec;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("event carries no pointer or touch coordinates")]
    MissingCoordinates,
    #[error("event coordinates are not finite")]
    NotFinite,
}

/// A position in surface pixel space.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Layout rectangle of the drawing element, in client coordinates.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}
impl Rect {
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Something that knows where the drawing element currently sits on screen.
///
/// Queried on every event, as layout may shift between events.
pub trait BoundingBox {
    fn bounding_rect(&self) -> Rect;
}
impl BoundingBox for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}
impl<T: BoundingBox + ?Sized> BoundingBox for &T {
    fn bounding_rect(&self) -> Rect {
        (**self).bounding_rect()
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// A raw interaction event. Either half may be missing, depending on the device that produced it.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PointerEvent {
    pub client_x: Option<f32>,
    pub client_y: Option<f32>,
    /// Active touches, in the order the platform reported them.
    pub touches: SmallVec<[TouchPoint; 2]>,
}
impl PointerEvent {
    /// A mouse or pen event.
    #[must_use]
    pub fn pointer(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x: Some(client_x),
            client_y: Some(client_y),
            touches: SmallVec::new(),
        }
    }
    /// A touch event with the given active touches.
    #[must_use]
    pub fn touch(touches: impl IntoIterator<Item = TouchPoint>) -> Self {
        Self {
            client_x: None,
            client_y: None,
            touches: touches.into_iter().collect(),
        }
    }
    /// The client position this event refers to. Pointer coordinates win, otherwise the first touch.
    pub fn client_position(&self) -> Result<(f32, f32), InputError> {
        let (x, y) = match (self.client_x.zip(self.client_y), self.touches.first()) {
            (Some(pos), _) => pos,
            (None, Some(touch)) => (touch.client_x, touch.client_y),
            (None, None) => return Err(InputError::MissingCoordinates),
        };
        if x.is_finite() && y.is_finite() {
            Ok((x, y))
        } else {
            Err(InputError::NotFinite)
        }
    }
}

/// Map an event into surface pixel space.
///
/// `density` is the device pixel ratio the surface was created with, *not* the current one.
pub fn normalize(
    event: &PointerEvent,
    bounds: &impl BoundingBox,
    density: f32,
) -> Result<Point, InputError> {
    let (x, y) = event.client_position()?;
    let rect = bounds.bounding_rect();
    Ok(Point {
        x: (x - rect.left) * density,
        y: (y - rect.top) * density,
    })
}
