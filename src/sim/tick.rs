//! Per-frame simulation pass
//!
//! One call to `tick` is one animation frame: resume a pending restart, clear,
//! apply buffered spawns, update every body in order, compact merged bodies,
//! then check for game over / win.

use super::body::{Body, Surface};
use super::collision::resolve_pair;
use super::state::{RunPhase, SimEvent, Simulation};
use crate::renderer::Renderer;

/// Advance the simulation by one frame.
///
/// `now_ms` is the frame timestamp and only drives restart scheduling; physics
/// runs in per-frame units.
pub fn tick<R: Renderer + ?Sized>(sim: &mut Simulation, renderer: &mut R, now_ms: f64) {
    if let Some(resume_at) = sim.resume_at_ms {
        if now_ms >= resume_at {
            sim.init();
            sim.events.push(SimEvent::Resumed);
            log::info!("Resumed after restart");
        }
    }

    renderer.clear(sim.surface);

    // Frozen scene: draw, no physics
    if sim.phase != RunPhase::Running {
        for body in &sim.bodies {
            renderer.draw_disc(body.pos, body.radius, &body.color);
        }
        return;
    }

    // Spawn requests that arrived since the last frame
    let pending = std::mem::take(&mut sim.pending_spawns);
    for pos in pending {
        sim.spawn_at(pos);
    }

    let removed = step_bodies(&mut sim.bodies, sim.surface, renderer, &mut sim.events);
    sim.frame += 1;

    check_outcome(sim, removed);
}

/// Draw and update every live body once, in collection order.
///
/// Pairs are evaluated against the collection as it stood at the start of the
/// pass; merged bodies are only flagged, then compacted out after the scan.
/// A flagged body neither acts nor serves as a partner for the rest of the
/// pass. Returns how many bodies were removed.
pub fn step_bodies<R: Renderer + ?Sized>(
    bodies: &mut Vec<Body>,
    surface: Surface,
    renderer: &mut R,
    events: &mut Vec<SimEvent>,
) -> usize {
    let n = bodies.len();
    let mut removed = vec![false; n];

    for i in 0..n {
        if removed[i] {
            continue;
        }

        let body = &mut bodies[i];
        renderer.draw_disc(body.pos, body.radius, &body.color);
        body.integrate(surface);

        for j in 0..n {
            if j == i || removed[j] {
                continue;
            }
            let (a, b) = pair_mut(bodies, i, j);
            if !a.is_colliding(b) || a.is_touching_borders(surface) {
                continue;
            }

            if resolve_pair(a, b, surface).is_merge() {
                log::debug!("Bodies {} and {} merged ({})", a.id, b.id, a.color.as_str());
                events.push(SimEvent::Merged { a: a.id, b: b.id });
                removed[i] = true;
                removed[j] = true;
                // `a` is gone; it has nothing left to collide with
                break;
            }
        }
    }

    let count = removed.iter().filter(|&&r| r).count();
    if count > 0 {
        let mut flags = removed.into_iter();
        bodies.retain(|_| !flags.next().unwrap_or(false));
    }
    count
}

/// Disjoint mutable borrows of two bodies, returned as (bodies[i], bodies[j])
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Game over beats win when both happen on the same frame
fn check_outcome(sim: &mut Simulation, removed: usize) {
    if let Some(id) = sim.bodies.iter().find(|b| b.is_above_top()).map(|b| b.id) {
        sim.phase = RunPhase::GameOver;
        sim.pending_spawns.clear();
        sim.events.push(SimEvent::GameOver { id });
        log::info!("Game over: body {id} crossed the top edge on frame {}", sim.frame);
        return;
    }

    if removed > 0 && sim.bodies.is_empty() {
        sim.phase = RunPhase::Won;
        sim.pending_spawns.clear();
        sim.events.push(SimEvent::Won);
        log::info!("Board cleared on frame {}", sim.frame);
    }
}
