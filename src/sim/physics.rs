//! Physics primitives
//!
//! Plain value pairs. The engine and the ball read and write the fields
//! directly; there is no arithmetic hidden behind them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point in arena space, in pixels.
///
/// Also used as an extent, where `x` is the width and `y` the height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl Location {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Location> for Vec2 {
    fn from(loc: Location) -> Self {
        Vec2::new(loc.x, loc.y)
    }
}

impl From<Vec2> for Location {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Per-step displacement. The sign on each axis is the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Magnitude in pixels per step
    #[inline]
    pub fn speed(&self) -> f32 {
        Vec2::from(*self).length()
    }
}

impl From<Velocity> for Vec2 {
    fn from(vel: Velocity) -> Self {
        Vec2::new(vel.dx, vel.dy)
    }
}
