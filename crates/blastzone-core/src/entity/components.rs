//! Owned sub-components embedded in entity kinds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kinematic state of an accelerating body.
///
/// `acceleration` is the thrust requested for the current tick. The
/// integrator folds friction into it, and the owner clears it afterwards so
/// thrust never carries over between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Center position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Acceleration in world units per second squared.
    pub acceleration: Vec2,
}

impl MovementState {
    /// A body at rest at `position`.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }

    /// Squared speed.
    #[must_use]
    pub fn speed_squared(&self) -> f32 {
        self.velocity.length_squared()
    }
}

/// Hit points bounded by `[0, max]` from above; damage may push `current`
/// to or below zero, which marks the owner as destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// `true` once health has dropped to zero or below.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtracts `amount` hit points.
    pub fn damage(&mut self, amount: f32) {
        self.current -= amount.max(0.0);
    }

    /// Adds `amount` hit points, never exceeding max. Returns the amount
    /// actually restored.
    pub fn restore(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_starts_at_rest() {
        let m = MovementState::at(Vec2::new(3.0, 4.0));
        assert_eq!(m.velocity, Vec2::ZERO);
        assert_eq!(m.speed_squared(), 0.0);
    }

    #[test]
    fn damage_can_deplete() {
        let mut h = Health::full(10.0);
        h.damage(4.0);
        assert!(!h.is_depleted());
        h.damage(6.0);
        assert!(h.is_depleted());
        assert_eq!(h.current, 0.0);
    }

    #[test]
    fn restore_clamps_to_max() {
        let mut h = Health::full(100.0);
        h.damage(5.0);
        let restored = h.restore(20.0);
        assert_eq!(restored, 5.0);
        assert_eq!(h.current(), 100.0);
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut h = Health::full(10.0);
        h.damage(-3.0);
        assert_eq!(h.current(), 10.0);
        assert_eq!(h.restore(-3.0), 0.0);
    }
}
