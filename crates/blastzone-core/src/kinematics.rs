//! Kinematic integrator for accelerating bodies.
//!
//! One call advances a body by `dt`:
//!
//! 1. Friction: `acceleration -= μ · velocity`
//! 2. `velocity += acceleration · dt`
//! 3. If `|velocity|² < ε` the body stops: velocity and displacement are zero.
//!    Otherwise `displacement = velocity · dt + ½ · acceleration · dt²`.
//! 4. The displacement is applied one axis at a time. After moving along `x`
//!    the hit box is tested against the blockers; the first overlapping
//!    blocker snaps the body flush against its near edge and zeroes the `x`
//!    velocity. The same then happens independently for `y`.
//!
//! Resolving axes separately lets a body slide along a wall it grazes
//! instead of sticking to it. The step reports which axes were stopped;
//! agents only care whether either was, to trigger wall avoidance.
//!
//! # Example
//!
//! ```
//! use blastzone_core::config::PhysicsConfig;
//! use blastzone_core::entity::MovementState;
//! use blastzone_core::geometry::HitBox;
//! use blastzone_core::kinematics::integrate;
//! use glam::Vec2;
//!
//! let wall = HitBox::new(Vec2::new(30.0, 0.0), Vec2::new(10.0, 100.0));
//! let mut body = MovementState::at(Vec2::ZERO);
//! body.velocity = Vec2::new(400.0, 0.0);
//!
//! let hit = integrate(&mut body, Vec2::splat(10.0), 0.1, &PhysicsConfig::default(), &[wall]);
//! assert!(hit.x && !hit.y);
//! assert_eq!(body.position.x, 15.0); // flush against the wall's left edge
//! assert_eq!(body.velocity.x, 0.0);
//! ```

use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::entity::MovementState;
use crate::geometry::HitBox;

/// Axes on which a step ran into a blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisHits {
    /// Stopped horizontally; `velocity.x` is zero.
    pub x: bool,
    /// Stopped vertically; `velocity.y` is zero.
    pub y: bool,
}

impl AxisHits {
    /// `true` if either axis was stopped.
    #[must_use]
    pub const fn any(self) -> bool {
        self.x || self.y
    }
}

/// Advances `body` by `dt` seconds, resolving against `blockers`.
///
/// `half_extents` is the body's hit box half size. `body.acceleration` is
/// the thrust for this step; friction is folded into it in place.
pub fn integrate(
    body: &mut MovementState,
    half_extents: Vec2,
    dt: f32,
    physics: &PhysicsConfig,
    blockers: &[HitBox],
) -> AxisHits {
    body.acceleration -= physics.friction * body.velocity;
    body.velocity += body.acceleration * dt;

    let displacement = if body.velocity.length_squared() < physics.stop_epsilon {
        body.velocity = Vec2::ZERO;
        Vec2::ZERO
    } else {
        body.velocity * dt + 0.5 * body.acceleration * dt * dt
    };

    let x = resolve_axis(body, half_extents, displacement.x, Axis::X, blockers);
    let y = resolve_axis(body, half_extents, displacement.y, Axis::Y, blockers);
    AxisHits { x, y }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn resolve_axis(
    body: &mut MovementState,
    half_extents: Vec2,
    delta: f32,
    axis: Axis,
    blockers: &[HitBox],
) -> bool {
    match axis {
        Axis::X => body.position.x += delta,
        Axis::Y => body.position.y += delta,
    }

    let hit_box = HitBox {
        center: body.position,
        half_extents,
    };
    let Some(blocker) = blockers.iter().find(|b| hit_box.overlaps(b)) else {
        return false;
    };

    match axis {
        Axis::X => {
            body.position.x = if body.position.x < blocker.center.x {
                blocker.left() - half_extents.x
            } else {
                blocker.right() + half_extents.x
            };
            body.velocity.x = 0.0;
        }
        Axis::Y => {
            body.position.y = if body.position.y < blocker.center.y {
                blocker.top() - half_extents.y
            } else {
                blocker.bottom() + half_extents.y
            };
            body.velocity.y = 0.0;
        }
    }
    true
}
