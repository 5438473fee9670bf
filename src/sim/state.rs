//! Simulation context and run state
//!
//! `Simulation` owns the live bodies, the surface, the RNG and the event queue.
//! Bodies never reference the collection; the per-frame pass in `tick` borrows
//! it explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Color, Surface, disc_touches_borders};
use crate::settings::{SimConfig, SpawnPolicy};
use crate::{random_color, random_int_from_range};

/// Run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Not accepting spawns (fresh, or waiting out a restart delay)
    #[default]
    Idle,
    /// Physics ticking, spawns accepted
    Running,
    /// A body crossed the top edge
    GameOver,
    /// Every body was merged away
    Won,
}

/// Notifications for the controller, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Spawned { id: u32 },
    SpawnRejected { x: f32, y: f32 },
    Merged { a: u32, b: u32 },
    GameOver { id: u32 },
    Won,
    Restarted,
    Resumed,
}

/// The simulation aggregate
#[derive(Debug, Clone)]
pub struct Simulation {
    pub config: SimConfig,
    pub surface: Surface,
    /// Live bodies in insertion order
    pub bodies: Vec<Body>,
    pub phase: RunPhase,
    /// Frames advanced since the last `init`
    pub frame: u64,
    pub(super) resume_at_ms: Option<f64>,
    pub(super) pending_spawns: Vec<Vec2>,
    pub(super) events: Vec<SimEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl Simulation {
    pub fn new(config: SimConfig, surface: Surface, seed: u64) -> Self {
        Self {
            config,
            surface,
            bodies: Vec::new(),
            phase: RunPhase::Idle,
            frame: 0,
            resume_at_ms: None,
            pending_spawns: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Clear everything and start accepting spawns
    pub fn init(&mut self) {
        self.bodies.clear();
        self.pending_spawns.clear();
        self.resume_at_ms = None;
        self.frame = 0;
        self.phase = RunPhase::Running;
        log::info!(
            "Simulation started on {}x{} surface",
            self.surface.width,
            self.surface.height
        );
    }

    /// Clear and go idle; ticking resumes once `now_ms + restart_delay_ms` passes
    pub fn restart(&mut self, now_ms: f64) {
        self.bodies.clear();
        self.pending_spawns.clear();
        self.phase = RunPhase::Idle;
        let resume_at = now_ms + self.config.restart_delay_ms;
        self.resume_at_ms = Some(resume_at);
        self.events.push(SimEvent::Restarted);
        log::info!("Restart requested, resuming at t={resume_at:.0}ms");
    }

    /// Pending resume deadline, if a restart is in flight
    pub fn resume_at_ms(&self) -> Option<f64> {
        self.resume_at_ms
    }

    /// Surface resized; bodies are untouched
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = Surface::new(width, height);
        log::debug!("Surface resized to {width}x{height}");
    }

    pub fn is_accepting_spawns(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Buffer a spawn request for the start of the next tick
    pub fn queue_spawn(&mut self, pos: Vec2) {
        if self.is_accepting_spawns() {
            self.pending_spawns.push(pos);
        } else {
            log::debug!("Ignoring spawn request in {:?}", self.phase);
        }
    }

    /// Spawn with a random radius and palette color
    pub fn spawn_at(&mut self, pos: Vec2) -> Option<u32> {
        if !self.is_accepting_spawns() {
            log::debug!("Ignoring spawn request in {:?}", self.phase);
            return None;
        }
        let radius = random_int_from_range(
            &mut self.rng,
            self.config.radius_min,
            self.config.radius_max,
        ) as f32;
        let color = random_color(&mut self.rng, &self.config.palette).clone();
        self.spawn_body(pos, radius, color)
    }

    /// Admit a body with caller-chosen radius/color, applying the spawn policy
    pub fn spawn_body(&mut self, pos: Vec2, radius: f32, color: Color) -> Option<u32> {
        if !self.is_accepting_spawns() {
            log::debug!("Ignoring spawn request in {:?}", self.phase);
            return None;
        }

        let pos = match self.admit_position(pos, radius) {
            Some(pos) => pos,
            None => {
                log::debug!("Spawn at ({:.1}, {:.1}) r={radius} rejected", pos.x, pos.y);
                self.events.push(SimEvent::SpawnRejected { x: pos.x, y: pos.y });
                return None;
            }
        };

        let id = self.next_entity_id();
        let cfg = &self.config;
        let body = Body::new(id, pos, radius, color)
            .with_velocity(cfg.initial_velocity)
            .with_dynamics(cfg.gravity, cfg.friction, cfg.mass);
        log::debug!(
            "Spawned body {id} at ({:.1}, {:.1}) r={radius} {}",
            pos.x,
            pos.y,
            body.color.as_str()
        );
        self.bodies.push(body);
        self.events.push(SimEvent::Spawned { id });
        Some(id)
    }

    /// Insert a fully-formed body, bypassing the spawn policy
    pub fn insert_body(&mut self, body: Body) {
        self.next_id = self.next_id.max(body.id + 1);
        self.bodies.push(body);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    fn admit_position(&self, pos: Vec2, radius: f32) -> Option<Vec2> {
        let s = self.surface;
        if !disc_touches_borders(pos, radius, s) {
            return Some(pos);
        }

        match self.config.spawn_policy {
            SpawnPolicy::Reject => None,
            SpawnPolicy::Clamp => {
                if s.width < 2.0 * radius || s.height < 2.0 * radius {
                    return None;
                }
                Some(Vec2::new(
                    pos.x.clamp(radius, s.width - radius),
                    pos.y.clamp(radius, s.height - radius),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(policy: SpawnPolicy) -> Simulation {
        let config = SimConfig {
            spawn_policy: policy,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config, Surface::new(800.0, 600.0), 42);
        sim.init();
        sim
    }

    #[test]
    fn test_new_is_idle_and_rejects_spawns() {
        let mut sim = Simulation::new(SimConfig::default(), Surface::new(800.0, 600.0), 1);
        assert_eq!(sim.phase, RunPhase::Idle);
        assert_eq!(sim.spawn_at(Vec2::new(400.0, 300.0)), None);
        assert!(sim.bodies.is_empty());
    }

    #[test]
    fn test_spawn_uses_config_ranges() {
        let mut sim = running(SpawnPolicy::Reject);
        for _ in 0..50 {
            sim.spawn_at(Vec2::new(400.0, 300.0));
        }
        assert_eq!(sim.bodies.len(), 50);
        for body in &sim.bodies {
            assert!(body.radius >= 5.0 && body.radius <= 50.0);
            assert_eq!(body.radius.fract(), 0.0);
            assert!(sim.config.palette.contains(&body.color));
            assert_eq!(body.vel, sim.config.initial_velocity);
        }
    }

    #[test]
    fn test_reject_policy_drops_border_spawn() {
        let mut sim = running(SpawnPolicy::Reject);
        assert_eq!(sim.spawn_body(Vec2::new(5.0, 300.0), 10.0, "red".into()), None);
        assert!(sim.bodies.is_empty());
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::SpawnRejected { x: 5.0, y: 300.0 }]
        );
    }

    #[test]
    fn test_clamp_policy_pulls_spawn_inside() {
        let mut sim = running(SpawnPolicy::Clamp);
        let id = sim.spawn_body(Vec2::new(5.0, 595.0), 10.0, "red".into());
        let body = sim.body(id.unwrap()).unwrap();
        assert_eq!(body.pos, Vec2::new(10.0, 590.0));
    }

    #[test]
    fn test_clamp_policy_rejects_oversized_disc() {
        let mut sim = running(SpawnPolicy::Clamp);
        sim.resize(30.0, 600.0);
        assert_eq!(sim.spawn_body(Vec2::new(15.0, 300.0), 20.0, "red".into()), None);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = running(SpawnPolicy::Reject);
        let mut b = running(SpawnPolicy::Reject);
        for i in 0..10 {
            let pos = Vec2::new(100.0 + i as f32 * 50.0, 300.0);
            a.spawn_at(pos);
            b.spawn_at(pos);
        }
        assert_eq!(a.bodies, b.bodies);
    }

    #[test]
    fn test_restart_clears_and_goes_idle() {
        let mut sim = running(SpawnPolicy::Reject);
        sim.spawn_at(Vec2::new(400.0, 300.0));
        sim.restart(5000.0);
        assert!(sim.bodies.is_empty());
        assert_eq!(sim.phase, RunPhase::Idle);
        assert_eq!(sim.resume_at_ms(), Some(6000.0));
        assert!(!sim.is_accepting_spawns());
    }

    #[test]
    fn test_resize_keeps_bodies() {
        let mut sim = running(SpawnPolicy::Reject);
        sim.spawn_body(Vec2::new(400.0, 300.0), 20.0, "red".into());
        let before = sim.bodies.clone();
        sim.resize(1024.0, 768.0);
        assert_eq!(sim.bodies, before);
        assert_eq!(sim.surface, Surface::new(1024.0, 768.0));
    }
}
