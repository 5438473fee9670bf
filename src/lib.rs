//! Drop Merge - click to drop circles, match colors to clear the board
//!
//! Core modules:
//! - `sim`: Seeded simulation (bodies, collisions, run state)
//! - `renderer`: Drawing collaborator trait + Canvas 2D backend
//! - `settings`: Data-driven physics tuning

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, SimConfig, SpawnPolicy};

use glam::Vec2;
use rand::Rng;

/// Reference physics constants (per-frame units, no timestep scaling)
pub mod consts {
    /// Downward acceleration added to vy each frame
    pub const GRAVITY: f32 = 0.5;
    /// Bounce damping applied when a body reverses off the floor
    pub const FRICTION: f32 = 0.8;
    /// Nominal body mass (carried, not used by the impulse model)
    pub const MASS: f32 = 1.0;
    /// Velocity given to a freshly spawned body (pixels/frame)
    pub const SPAWN_VELOCITY: (f32, f32) = (0.0, 3.0);

    /// Spawn radius range (inclusive)
    pub const RADIUS_MIN: i32 = 5;
    pub const RADIUS_MAX: i32 = 50;

    /// Within this distance of the floor a body contact only damps vy
    pub const FLAT_GROUND_MARGIN: f32 = 5.0;

    /// Delay before ticking resumes after a restart
    pub const RESTART_DELAY_MS: f64 = 1000.0;

    /// Default color palette
    pub const PALETTE: [&str; 4] = ["#2185C5", "#7ECEFD", "#FFF6E5", "#FF7F66"];
}

/// Uniform integer in the closed range `[min, max]`
#[inline]
pub fn random_int_from_range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    debug_assert!(min <= max, "empty range [{min}, {max}]");
    rng.random_range(min..=max)
}

/// Uniformly pick one element of a non-empty slice
///
/// Panics on an empty slice; callers validate their palettes up front.
#[inline]
pub fn random_color<'a, T, R: Rng + ?Sized>(rng: &mut R, colors: &'a [T]) -> &'a T {
    assert!(!colors.is_empty(), "random_color called with an empty palette");
    &colors[rng.random_range(0..colors.len())]
}

/// Euclidean distance between (x1, y1) and (x2, y2)
#[inline]
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    Vec2::new(x2 - x1, y2 - y1).length()
}
