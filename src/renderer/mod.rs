//! Rendering module
//!
//! The simulation only needs two primitives: wipe the surface and fill a disc.
//! Backends implement `Renderer`; the browser build uses Canvas 2D.

use glam::Vec2;

use crate::sim::{Color, Surface};

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Drawing collaborator for the frame pass
pub trait Renderer {
    /// Wipe the whole surface
    fn clear(&mut self, surface: Surface);

    /// Fill a disc
    fn draw_disc(&mut self, center: Vec2, radius: f32, color: &Color);
}

/// Discards all drawing (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self, _surface: Surface) {}

    fn draw_disc(&mut self, _center: Vec2, _radius: f32, _color: &Color) {}
}

/// Counts draw calls per frame; the native build logs these
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsRenderer {
    pub clears: u64,
    pub discs: u64,
}

impl Renderer for StatsRenderer {
    fn clear(&mut self, _surface: Surface) {
        self.clears += 1;
    }

    fn draw_disc(&mut self, _center: Vec2, _radius: f32, _color: &Color) {
        self.discs += 1;
    }
}
