//! Player intent for one frame.
//!
//! The host fills a [`PlayerInput`] from whatever devices it reads, and
//! [`World::step`](crate::simulation::World::step) consumes it: the discrete
//! action set is cleared after use, while the aim point persists until the
//! host moves it.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Discrete actions held during a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Actions: u8 {
        /// Thrust forward along the hull heading.
        const FORWARD = 1 << 0;
        /// Thrust backward.
        const REVERSE = 1 << 1;
        /// Turn the hull counter-clockwise on screen.
        const TURN_LEFT = 1 << 2;
        /// Turn the hull clockwise on screen.
        const TURN_RIGHT = 1 << 3;
        /// Fire every barrel.
        const FIRE = 1 << 4;
    }
}

impl Actions {
    /// Thrust fraction: `1` forward, `-1` reverse, `0` for neither or both.
    #[must_use]
    pub fn thrust(self) -> f32 {
        match (self.contains(Self::FORWARD), self.contains(Self::REVERSE)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// Turn direction in the degree convention: `1` left, `-1` right.
    #[must_use]
    pub fn turn(self) -> f32 {
        match (self.contains(Self::TURN_LEFT), self.contains(Self::TURN_RIGHT)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// Everything the player asked for this frame.
///
/// # Example
///
/// ```
/// use blastzone_core::input::{Actions, PlayerInput};
/// use glam::Vec2;
///
/// let mut input = PlayerInput::default();
/// input.press(Actions::FORWARD | Actions::FIRE);
/// input.aim_at(Vec2::new(300.0, 200.0));
///
/// let taken = input.take_actions();
/// assert!(taken.contains(Actions::FIRE));
/// assert!(input.actions.is_empty());
/// assert_eq!(input.aim, Some(Vec2::new(300.0, 200.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Actions held this frame.
    pub actions: Actions,
    /// World position the barrels should point at.
    pub aim: Option<Vec2>,
}

impl PlayerInput {
    /// Adds `actions` to this frame's set.
    pub fn press(&mut self, actions: Actions) {
        self.actions |= actions;
    }

    /// Points the barrels at `target`.
    pub fn aim_at(&mut self, target: Vec2) {
        self.aim = Some(target);
    }

    /// Returns this frame's actions and clears them.
    pub fn take_actions(&mut self) -> Actions {
        std::mem::take(&mut self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_cancel() {
        assert_eq!((Actions::FORWARD | Actions::REVERSE).thrust(), 0.0);
        assert_eq!((Actions::TURN_LEFT | Actions::TURN_RIGHT).turn(), 0.0);
        assert_eq!(Actions::REVERSE.thrust(), -1.0);
        assert_eq!(Actions::TURN_RIGHT.turn(), -1.0);
        assert_eq!(Actions::empty().thrust(), 0.0);
    }

    #[test]
    fn take_clears_only_actions() {
        let mut input = PlayerInput::default();
        input.press(Actions::TURN_LEFT);
        input.aim_at(Vec2::ONE);
        assert_eq!(input.take_actions(), Actions::TURN_LEFT);
        assert_eq!(input.take_actions(), Actions::empty());
        assert_eq!(input.aim, Some(Vec2::ONE));
    }
}
