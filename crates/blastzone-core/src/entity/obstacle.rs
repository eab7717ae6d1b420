//! Static blockers: trees, boundary walls, and destructible item boxes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{sizes, BOX_WEAR};
use crate::geometry::HitBox;

use super::Collidable;

/// What kind of static blocker an [`Obstacle`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Level boundary segment.
    Wall,
    /// Decorative tree.
    Tree,
}

/// An indestructible blocker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Blocker kind.
    pub kind: ObstacleKind,
    hit_box: HitBox,
}

impl Obstacle {
    /// A tree centered at `position`.
    #[must_use]
    pub fn tree(position: Vec2) -> Self {
        Self {
            kind: ObstacleKind::Tree,
            hit_box: HitBox::new(position, sizes::TREE),
        }
    }

    /// A wall whose top-left corner is `corner`.
    #[must_use]
    pub fn wall(corner: Vec2, size: Vec2) -> Self {
        Self {
            kind: ObstacleKind::Wall,
            hit_box: HitBox::from_corner(corner, size),
        }
    }

    /// The four walls enclosing a `width` × `height` level.
    #[must_use]
    pub fn boundary(width: f32, height: f32) -> [Self; 4] {
        let t = sizes::WALL_THICKNESS;
        [
            Self::wall(Vec2::ZERO, Vec2::new(width, t)),
            Self::wall(Vec2::new(0.0, height), Vec2::new(width, t)),
            Self::wall(Vec2::ZERO, Vec2::new(t, height)),
            Self::wall(Vec2::new(width, 0.0), Vec2::new(t, height)),
        ]
    }
}

impl Collidable for Obstacle {
    fn hit_box(&self) -> HitBox {
        self.hit_box
    }
}

/// A crate that blocks movement and breaks after a few hits, dropping a
/// pickup where it stood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBox {
    /// Center position.
    pub position: Vec2,
    wear: u32,
}

impl ItemBox {
    /// A fresh box at `position`.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            wear: BOX_WEAR,
        }
    }

    /// Hits left before the box breaks.
    #[must_use]
    pub const fn wear(&self) -> u32 {
        self.wear
    }

    /// Absorbs one hit. Returns `true` when this hit broke the box.
    pub fn wear_out(&mut self) -> bool {
        self.wear = self.wear.saturating_sub(1);
        self.is_broken()
    }

    /// `true` once the box has no wear left.
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.wear == 0
    }
}

impl Collidable for ItemBox {
    fn hit_box(&self) -> HitBox {
        HitBox::new(self.position, sizes::ITEM_BOX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_breaks_on_third_hit() {
        let mut item_box = ItemBox::new(Vec2::ZERO);
        assert!(!item_box.wear_out());
        assert!(!item_box.wear_out());
        assert!(item_box.wear_out());
        assert!(item_box.is_broken());
        assert_eq!(item_box.wear(), 0);
    }

    #[test]
    fn boundary_encloses_level() {
        let walls = Obstacle::boundary(800.0, 600.0);
        let inside = HitBox::new(Vec2::new(400.0, 300.0), Vec2::splat(40.0));
        assert!(walls.iter().all(|w| !w.hit_box().overlaps(&inside)));

        let poking_left = HitBox::new(Vec2::new(10.0, 300.0), Vec2::splat(40.0));
        assert!(walls.iter().any(|w| w.hit_box().overlaps(&poking_left)));
        assert!(walls.iter().all(|w| w.kind == ObstacleKind::Wall));
    }

    #[test]
    fn tree_is_centered() {
        let tree = Obstacle::tree(Vec2::new(100.0, 100.0));
        assert_eq!(tree.position(), Vec2::new(100.0, 100.0));
    }
}
