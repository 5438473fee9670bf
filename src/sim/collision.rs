//! Pairwise collision response between two bodies
//!
//! The acting body `a` is resolved against `b`: positional separation along the
//! contact normal, a radius-weighted impulse, and the same-color merge check.
//! Detection (`Body::is_colliding`) and the border gate live with the caller.

use glam::Vec2;

use super::body::{Body, Surface};
use crate::consts::FLAT_GROUND_MARGIN;
use crate::distance;

/// Contact geometry for an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from `a` toward `b`
    pub normal: Vec2,
    /// Interpenetration depth (sum of radii minus center distance)
    pub overlap: f32,
}

impl Contact {
    pub fn between(a: &Body, b: &Body) -> Self {
        let angle = (b.pos.y - a.pos.y).atan2(b.pos.x - a.pos.x);
        let overlap = a.radius + b.radius - distance(a.pos.x, a.pos.y, b.pos.x, b.pos.y);
        Self {
            normal: Vec2::new(angle.cos(), angle.sin()),
            overlap,
        }
    }

    /// Half the overlap along the normal
    #[inline]
    pub fn push(&self) -> Vec2 {
        self.normal * (self.overlap / 2.0)
    }
}

/// What `resolve_pair` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// `a` was on the floor; only its vy was damped
    GroundDamped,
    /// Moving the pair would leave the surface, nothing changed
    Blocked,
    /// Separated; impulse is `Some` when the velocity response fired
    Bounced { impulse: Option<f32> },
    /// Separated and bounced, and the colors match: both must despawn
    Merged { impulse: Option<f32> },
}

impl PairOutcome {
    pub fn is_merge(&self) -> bool {
        matches!(self, PairOutcome::Merged { .. })
    }
}

/// Clamp one push component to ±`sum_of_radii`
#[inline]
pub fn mtv_component(push: f32, sum_of_radii: f32) -> f32 {
    if push > 0.0 {
        push.min(sum_of_radii)
    } else {
        push.max(-sum_of_radii)
    }
}

/// Resolve `a` against `b`. Caller has already checked they collide and that
/// `a` is clear of the borders.
pub fn resolve_pair(a: &mut Body, b: &mut Body, surface: Surface) -> PairOutcome {
    let contact = Contact::between(a, b);
    let push = contact.push();

    log::trace!(
        "contact {} -> {}: normal=({:.3}, {:.3}) overlap={:.3}",
        a.id,
        b.id,
        contact.normal.x,
        contact.normal.y,
        contact.overlap
    );

    if a.would_cross(surface.height - FLAT_GROUND_MARGIN) {
        a.bounce_vertical();
        return PairOutcome::GroundDamped;
    }

    if push.x + a.radius >= surface.width || push.y + a.radius >= surface.height {
        return PairOutcome::Blocked;
    }

    separate(a, b, push, surface);
    let impulse = apply_impulse(a, b, contact.normal);

    if a.color == b.color {
        PairOutcome::Merged { impulse }
    } else {
        PairOutcome::Bounced { impulse }
    }
}

/// Move `a` by -MTV and `b` by +MTV, then clamp both back into the surface
fn separate(a: &mut Body, b: &mut Body, push: Vec2, surface: Surface) {
    let sum = a.radius + b.radius;
    let mtv = Vec2::new(mtv_component(push.x, sum), mtv_component(push.y, sum));

    a.pos -= mtv;
    b.pos += mtv;

    a.clamp_into(surface);
    b.clamp_into(surface);
}

/// 1D elastic exchange along `normal` with radius standing in for mass.
///
/// Fires only when the projected relative speed is negative. Returns the
/// impulse magnitude if applied.
fn apply_impulse(a: &mut Body, b: &mut Body, normal: Vec2) -> Option<f32> {
    let relative_speed = (a.vel - b.vel).dot(normal);
    if relative_speed >= 0.0 {
        return None;
    }

    let impulse = 2.0 * relative_speed / (1.0 / a.radius + 1.0 / b.radius);
    a.vel -= impulse * normal / a.radius;
    b.vel += impulse * normal / b.radius;
    Some(impulse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Color;

    const SURFACE: Surface = Surface {
        width: 800.0,
        height: 600.0,
    };

    fn body(id: u32, x: f32, y: f32, radius: f32, color: &str) -> Body {
        Body::new(id, Vec2::new(x, y), radius, Color::from(color))
    }

    #[test]
    fn test_contact_geometry() {
        let a = body(1, 100.0, 100.0, 20.0, "red");
        let b = body(2, 130.0, 100.0, 20.0, "blue");
        let contact = Contact::between(&a, &b);
        assert!((contact.normal - Vec2::X).length() < 1e-6);
        assert!((contact.overlap - 10.0).abs() < 1e-4);
        assert!((contact.push() - Vec2::new(5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_coincident_centers_use_x_axis() {
        let a = body(1, 100.0, 100.0, 20.0, "red");
        let b = body(2, 100.0, 100.0, 10.0, "blue");
        let contact = Contact::between(&a, &b);
        assert!(contact.normal.is_finite());
        assert_eq!(contact.overlap, 30.0);
    }

    #[test]
    fn test_mtv_component_clamps() {
        assert_eq!(mtv_component(50.0, 40.0), 40.0);
        assert_eq!(mtv_component(-50.0, 40.0), -40.0);
        assert_eq!(mtv_component(3.0, 40.0), 3.0);
        assert_eq!(mtv_component(-3.0, 40.0), -3.0);
        assert_eq!(mtv_component(0.0, 40.0), 0.0);
    }

    #[test]
    fn test_separates_different_colors() {
        let mut a = body(1, 100.0, 100.0, 20.0, "red");
        let mut b = body(2, 130.0, 100.0, 20.0, "blue");

        let outcome = resolve_pair(&mut a, &mut b, SURFACE);
        assert_eq!(outcome, PairOutcome::Bounced { impulse: None });
        assert!((a.pos.x - 95.0).abs() < 1e-4);
        assert!((b.pos.x - 135.0).abs() < 1e-4);
        assert!(a.pos.distance(b.pos) >= 30.0);
    }

    #[test]
    fn test_same_color_merges() {
        let mut a = body(1, 100.0, 100.0, 20.0, "red");
        let mut b = body(2, 130.0, 100.0, 20.0, "red");
        let outcome = resolve_pair(&mut a, &mut b, SURFACE);
        assert!(outcome.is_merge());
    }

    #[test]
    fn test_impulse_flips_relative_normal_speed() {
        let mut a = body(1, 100.0, 100.0, 20.0, "red").with_velocity(Vec2::new(-2.0, 0.0));
        let mut b = body(2, 130.0, 100.0, 20.0, "blue").with_velocity(Vec2::new(2.0, 0.0));
        let normal = Contact::between(&a, &b).normal;
        let before = (a.vel - b.vel).dot(normal);
        assert!(before < 0.0);

        let outcome = resolve_pair(&mut a, &mut b, SURFACE);
        assert!(matches!(outcome, PairOutcome::Bounced { impulse: Some(_) }));

        let after = (a.vel - b.vel).dot(normal);
        assert!((after + before).abs() < 1e-3, "before={before} after={after}");
    }

    #[test]
    fn test_impulse_weights_by_radius() {
        let mut a = body(1, 100.0, 100.0, 10.0, "red").with_velocity(Vec2::new(-3.0, 0.0));
        let mut b = body(2, 135.0, 100.0, 30.0, "blue").with_velocity(Vec2::new(1.0, 0.0));
        let weighted_before = a.vel * a.radius + b.vel * b.radius;
        let (va, vb) = (a.vel, b.vel);

        resolve_pair(&mut a, &mut b, SURFACE);

        // Smaller body takes the larger velocity change
        assert!((a.vel - va).length() > (b.vel - vb).length());
        let weighted_after = a.vel * a.radius + b.vel * b.radius;
        assert!((weighted_after - weighted_before).length() < 1e-3);
    }

    #[test]
    fn test_no_impulse_when_relative_speed_non_negative() {
        let mut a = body(1, 100.0, 100.0, 20.0, "red").with_velocity(Vec2::new(2.0, 0.0));
        let mut b = body(2, 130.0, 100.0, 20.0, "blue");
        let outcome = resolve_pair(&mut a, &mut b, SURFACE);
        assert_eq!(outcome, PairOutcome::Bounced { impulse: None });
        assert_eq!(a.vel, Vec2::new(2.0, 0.0));
        assert_eq!(b.vel, Vec2::ZERO);
    }

    #[test]
    fn test_near_floor_only_damps() {
        let mut a = body(1, 400.0, 575.0, 20.0, "red").with_velocity(Vec2::new(0.0, 3.0));
        let mut b = body(2, 430.0, 575.0, 20.0, "red");
        let (pa, pb) = (a.pos, b.pos);

        let outcome = resolve_pair(&mut a, &mut b, SURFACE);
        assert_eq!(outcome, PairOutcome::GroundDamped);
        assert_eq!(a.vel.y, -3.0 * a.friction);
        assert_eq!(a.pos, pa);
        assert_eq!(b.pos, pb);
    }

    #[test]
    fn test_blocked_when_push_leaves_surface() {
        let narrow = Surface::new(25.0, 600.0);
        let mut a = body(1, 0.0, 300.0, 20.0, "red");
        let mut b = body(2, 5.0, 300.0, 20.0, "red");

        let outcome = resolve_pair(&mut a, &mut b, narrow);
        assert_eq!(outcome, PairOutcome::Blocked);
        assert_eq!(a.pos.x, 0.0);
        assert_eq!(b.pos.x, 5.0);
    }

    #[test]
    fn test_separation_clamps_into_surface() {
        let mut a = body(1, 25.0, 300.0, 20.0, "red");
        let mut b = body(2, 35.0, 300.0, 20.0, "blue");
        resolve_pair(&mut a, &mut b, SURFACE);
        assert!(a.pos.x >= a.radius);
        assert!(!a.is_touching_borders(SURFACE));
    }
}
