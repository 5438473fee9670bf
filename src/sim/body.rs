//! Body entity and per-body physics
//!
//! A body is a filled disc falling under its own gravity. Everything here works
//! on a single body plus the surface it lives in; pairwise work is in
//! `collision`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::distance;

/// Palette identifier (a CSS color string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Drawing surface extents. Origin top-left, +y down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Whether a disc's bounding box extends past any edge of `surface`
#[inline]
pub fn disc_touches_borders(center: Vec2, radius: f32, surface: Surface) -> bool {
    center.x - radius < 0.0
        || center.x + radius > surface.width
        || center.y - radius < 0.0
        || center.y + radius > surface.height
}

/// A circular particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Constant vertical acceleration
    pub gravity: f32,
    /// Bounce damping in [0, 1]
    pub friction: f32,
    pub mass: f32,
}

impl Body {
    /// Create a body at rest. Panics on a non-positive or non-finite radius.
    pub fn new(id: u32, pos: Vec2, radius: f32, color: Color) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "body radius must be positive, got {radius}"
        );
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
            gravity: crate::consts::GRAVITY,
            friction: crate::consts::FRICTION,
            mass: crate::consts::MASS,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_dynamics(mut self, gravity: f32, friction: f32, mass: f32) -> Self {
        self.gravity = gravity;
        self.friction = friction;
        self.mass = mass;
        self
    }

    /// Center distance ≤ sum of radii (touching counts)
    #[inline]
    pub fn is_colliding(&self, other: &Body) -> bool {
        let d = distance(self.pos.x, self.pos.y, other.pos.x, other.pos.y);
        d <= self.radius + other.radius
    }

    /// Bounding box pokes past any surface edge
    #[inline]
    pub fn is_touching_borders(&self, surface: Surface) -> bool {
        disc_touches_borders(self.pos, self.radius, surface)
    }

    /// Top edge above the surface
    #[inline]
    pub fn is_above_top(&self) -> bool {
        self.pos.y - self.radius < 0.0
    }

    /// Next vertical step would put the bottom edge past `floor`
    #[inline]
    pub fn would_cross(&self, floor: f32) -> bool {
        self.pos.y + self.radius + self.vel.y > floor
    }

    /// Reverse and damp vertical velocity
    #[inline]
    pub fn bounce_vertical(&mut self) {
        self.vel.y = -self.vel.y * self.friction;
    }

    /// Floor bounce or gravity, then advance y. x is left alone.
    pub fn integrate(&mut self, surface: Surface) {
        if self.would_cross(surface.height) {
            self.bounce_vertical();
        } else {
            self.vel.y += self.gravity;
        }
        self.pos.y += self.vel.y;
    }

    /// Pull the center back into `[radius, extent - radius]` on both axes
    pub fn clamp_into(&mut self, surface: Surface) {
        // max/min rather than f32::clamp: a surface narrower than the disc must not panic
        self.pos.x = self.radius.max((surface.width - self.radius).min(self.pos.x));
        self.pos.y = self.radius.max((surface.height - self.radius).min(self.pos.y));
    }
}
