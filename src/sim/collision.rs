//! Collision detection and response against the course
//!
//! Resolution order within a tick is fixed: course boundary first, then each
//! hazard in layout order, then a final containment clamp, then the sink check.
//! Hazards are swept: the ball's path from its previous position is tested
//! against the hazard rectangle grown by the ball radius, so a fast ball cannot
//! skip through a thin hazard in one tick.

use glam::Vec2;

use super::state::{Ball, Hazard, HoleLayout};
use crate::both_axes_below;
use crate::settings::PhysicsConfig;

/// Result of a hazard contact check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Ball center after correction
    pub point: Vec2,
    /// Unit surface normal (axis-aligned, pointing out of the hazard)
    pub normal: Vec2,
}

/// Outcome of resolving one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolveResult {
    /// Ball was pushed up onto the floor or a hazard top this tick
    pub supported: bool,
    pub hit_boundary: bool,
    /// Index of the last hazard hit this tick
    pub hit_hazard: Option<usize>,
    pub entered_sink: bool,
}

/// Correct the ball after integration. `prev` is the ball position before integration.
pub fn resolve(
    ball: &mut Ball,
    prev: Vec2,
    layout: &HoleLayout,
    bounds: Vec2,
    config: &PhysicsConfig,
) -> ResolveResult {
    let mut result = ResolveResult::default();

    let (hit, supported) = resolve_boundary(ball, bounds, config);
    result.hit_boundary = hit;
    result.supported |= supported;

    for (index, hazard) in layout.hazards.iter().enumerate() {
        if let Some(contact) = hazard_contact(prev, ball.pos, ball.radius, hazard) {
            ball.pos = contact.point;
            ball.vel = bounce(
                ball.vel,
                contact.normal,
                hazard.kind.restitution(),
                hazard.kind.tangential_damping(),
            );
            if contact.normal.y < 0.0 {
                if ball.vel.y.abs() < config.settle_speed {
                    ball.vel.y = 0.0;
                }
                result.supported = true;
            }
            result.hit_hazard = Some(index);
        }
    }

    // A hazard flush with a wall can push the ball past it
    clamp_inside(ball, bounds);

    if layout.sink.contains(ball.pos) && both_axes_below(ball.vel, config.sink_capture_speed) {
        ball.vel = Vec2::ZERO;
        result.entered_sink = true;
    }

    result
}

/// Clamp against walls, ceiling and floor. Returns (any hit, floor contact).
pub fn resolve_boundary(ball: &mut Ball, bounds: Vec2, config: &PhysicsConfig) -> (bool, bool) {
    let r = ball.radius;
    let mut hit = false;
    let mut floor = false;

    if ball.pos.x < r {
        ball.pos.x = r;
        ball.vel = bounce(ball.vel, Vec2::X, config.wall_restitution, 1.0);
        hit = true;
    } else if ball.pos.x > bounds.x - r {
        ball.pos.x = bounds.x - r;
        ball.vel = bounce(ball.vel, Vec2::NEG_X, config.wall_restitution, 1.0);
        hit = true;
    }

    if ball.pos.y < r {
        ball.pos.y = r;
        ball.vel = bounce(ball.vel, Vec2::Y, config.wall_restitution, 1.0);
        hit = true;
    } else if ball.pos.y > bounds.y - r {
        ball.pos.y = bounds.y - r;
        ball.vel = bounce(
            ball.vel,
            Vec2::NEG_Y,
            config.floor_restitution,
            config.floor_roll_damping,
        );
        if ball.vel.y.abs() < config.settle_speed {
            ball.vel.y = 0.0;
        }
        hit = true;
        floor = true;
    }

    (hit, floor)
}

/// Swept test of the segment `prev -> pos` against `hazard` grown by `radius`
///
/// Returns the corrected center and the face normal. A ball that was already
/// inside at `prev` is pushed out through the nearest face.
pub fn hazard_contact(prev: Vec2, pos: Vec2, radius: f32, hazard: &Hazard) -> Option<Contact> {
    let lo = hazard.min() - Vec2::splat(radius);
    let hi = hazard.max() + Vec2::splat(radius);
    let delta = pos - prev;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in [0usize, 1] {
        let (p, d, a, b) = (prev[axis], delta[axis], lo[axis], hi[axis]);
        if d.abs() < 1e-9 {
            if p <= a || p >= b {
                return None;
            }
            continue;
        }
        let (t_near, t_far) = if d > 0.0 {
            ((a - p) / d, (b - p) / d)
        } else {
            ((b - p) / d, (a - p) / d)
        };
        // Equal entry times go to the vertical axis, so a corner landing hits the top or bottom
        if t_near > t_enter || (axis == 1 && t_near == t_enter) {
            t_enter = t_near;
            let mut n = Vec2::ZERO;
            n[axis] = -d.signum();
            normal = n;
        }
        t_exit = t_exit.min(t_far);
    }

    if t_enter > t_exit || t_exit <= 0.0 {
        return None;
    }

    if t_enter >= 0.0 {
        if t_enter >= 1.0 {
            return None;
        }
        return Some(Contact {
            point: prev + delta * t_enter,
            normal,
        });
    }

    // Started inside: shouldn't happen with swept entry, but a boundary
    // clamp or an overlapping hazard can put us here
    if !hazard.contains_expanded(pos, radius) {
        return None;
    }
    Some(nearest_face(pos, lo, hi))
}

/// Push out through the face needing the smallest correction.
/// Ties resolve top, bottom, left, right.
fn nearest_face(pos: Vec2, lo: Vec2, hi: Vec2) -> Contact {
    let candidates = [
        (pos.y - lo.y, Vec2::new(pos.x, lo.y), Vec2::NEG_Y),
        (hi.y - pos.y, Vec2::new(pos.x, hi.y), Vec2::Y),
        (pos.x - lo.x, Vec2::new(lo.x, pos.y), Vec2::NEG_X),
        (hi.x - pos.x, Vec2::new(hi.x, pos.y), Vec2::X),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }

    Contact {
        point: best.1,
        normal: best.2,
    }
}

/// Reflect the normal component (scaled by `restitution`) and damp the tangential one.
/// A velocity already leaving the surface keeps its normal component.
#[inline]
pub fn bounce(velocity: Vec2, normal: Vec2, restitution: f32, tangential: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    let normal_part = normal * vn;
    let tangent_part = (velocity - normal_part) * tangential;
    if vn < 0.0 {
        tangent_part - normal_part * restitution
    } else {
        tangent_part + normal_part
    }
}

/// Keep the ball center inside [r, size - r] on both axes
#[inline]
pub fn clamp_inside(ball: &mut Ball, bounds: Vec2) {
    let r = Vec2::splat(ball.radius);
    ball.pos = ball.pos.clamp(r, (bounds - r).max(r));
}
