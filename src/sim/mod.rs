//! Simulation module
//!
//! All physics lives here. This module must stay pure:
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No DOM, wall clock, or rendering backend dependencies

pub mod body;
pub mod collision;
pub mod state;
pub mod tick;

pub use body::{Body, Color, Surface, disc_touches_borders};
pub use collision::{Contact, PairOutcome, mtv_component, resolve_pair};
pub use state::{RunPhase, SimEvent, Simulation};
pub use tick::{step_bodies, tick};
