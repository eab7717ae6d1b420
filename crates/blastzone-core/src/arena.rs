//! Per-category entity storage.
//!
//! The [`Arena`] owns one [`Registry`] per entity category and allocates ids.
//! Every registry is a `BTreeMap` keyed by [`EntityId`], so iteration order is
//! creation order on every platform, and a removed entity vanishes from all
//! later lookups at once.
//!
//! Code that removes entities while walking a registry must iterate over an
//! id snapshot ([`Registry::ids`]) rather than the live map:
//!
//! ```
//! use blastzone_core::arena::Arena;
//! use blastzone_core::entity::{Obstacle, EntityTag};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! for x in [0.0, 50.0, 100.0] {
//!     arena.spawn_obstacle(Obstacle::tree(Vec2::new(x, 0.0)));
//! }
//!
//! for id in arena.obstacles.ids() {
//!     if arena.position_of(id).is_some_and(|p| p.x > 10.0) {
//!         assert_eq!(arena.despawn(id), Some(EntityTag::Obstacle));
//!     }
//! }
//! assert_eq!(arena.obstacles.len(), 1);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;

use crate::entity::{
    Collidable, Damageable, Effect, EntityId, EntityTag, ItemBox, Obstacle, Pickup, Projectile,
    Tank, Turret,
};
use crate::geometry::HitBox;

// =============================================================================
// Registry
// =============================================================================

/// Deterministically ordered storage for one entity category.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: BTreeMap<EntityId, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `id`, returning any previous occupant.
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        self.entries.insert(id, value)
    }

    /// Removes and returns the entry for `id`.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.entries.remove(&id)
    }

    /// Looks up `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Looks up `id` mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    /// `true` if `id` is stored here.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Snapshot of the ids currently stored, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.keys().copied().collect()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Collidable> Registry<T> {
    /// `(id, hit box)` pairs in ascending id order.
    #[must_use]
    pub fn hit_boxes(&self) -> Vec<(EntityId, HitBox)> {
        self.iter().map(|(id, e)| (id, e.hit_box())).collect()
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Every live entity, grouped by category.
#[derive(Debug, Clone)]
pub struct Arena {
    next_id: u64,
    /// Player and enemy tanks.
    pub tanks: Registry<Tank>,
    /// Gun emplacements.
    pub turrets: Registry<Turret>,
    /// Shots in flight.
    pub projectiles: Registry<Projectile>,
    /// Loose collectibles.
    pub pickups: Registry<Pickup>,
    /// Trees and walls.
    pub obstacles: Registry<Obstacle>,
    /// Destructible item boxes.
    pub item_boxes: Registry<ItemBox>,
    /// Visual markers.
    pub effects: Registry<Effect>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Creates an empty arena. The first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            tanks: Registry::new(),
            turrets: Registry::new(),
            projectiles: Registry::new(),
            pickups: Registry::new(),
            obstacles: Registry::new(),
            item_boxes: Registry::new(),
            effects: Registry::new(),
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // ===== Spawning =====

    /// Adds a tank.
    pub fn spawn_tank(&mut self, tank: Tank) -> EntityId {
        let id = self.allocate();
        self.tanks.insert(id, tank);
        id
    }

    /// Adds a turret.
    pub fn spawn_turret(&mut self, turret: Turret) -> EntityId {
        let id = self.allocate();
        self.turrets.insert(id, turret);
        id
    }

    /// Adds a projectile.
    pub fn spawn_projectile(&mut self, projectile: Projectile) -> EntityId {
        let id = self.allocate();
        self.projectiles.insert(id, projectile);
        id
    }

    /// Adds a pickup.
    pub fn spawn_pickup(&mut self, pickup: Pickup) -> EntityId {
        let id = self.allocate();
        self.pickups.insert(id, pickup);
        id
    }

    /// Adds an obstacle.
    pub fn spawn_obstacle(&mut self, obstacle: Obstacle) -> EntityId {
        let id = self.allocate();
        self.obstacles.insert(id, obstacle);
        id
    }

    /// Adds an item box.
    pub fn spawn_item_box(&mut self, item_box: ItemBox) -> EntityId {
        let id = self.allocate();
        self.item_boxes.insert(id, item_box);
        id
    }

    /// Adds a visual effect.
    pub fn spawn_effect(&mut self, effect: Effect) -> EntityId {
        let id = self.allocate();
        self.effects.insert(id, effect);
        id
    }

    // ===== Removal & lookup =====

    /// Removes `id` from whichever registry holds it and returns its
    /// category. Owned children (barrels, active items) go with it.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityTag> {
        let tag = self.tag_of(id)?;
        let removed = match tag {
            EntityTag::Tank => self.tanks.remove(id).is_some(),
            EntityTag::Turret => self.turrets.remove(id).is_some(),
            EntityTag::Projectile => self.projectiles.remove(id).is_some(),
            EntityTag::Pickup => self.pickups.remove(id).is_some(),
            EntityTag::Obstacle => self.obstacles.remove(id).is_some(),
            EntityTag::ItemBox => self.item_boxes.remove(id).is_some(),
            EntityTag::Effect => self.effects.remove(id).is_some(),
        };
        debug_assert!(removed, "{tag} {id} vanished between lookup and removal");
        Some(tag)
    }

    /// Category of a live entity.
    #[must_use]
    pub fn tag_of(&self, id: EntityId) -> Option<EntityTag> {
        if self.tanks.contains(id) {
            Some(EntityTag::Tank)
        } else if self.turrets.contains(id) {
            Some(EntityTag::Turret)
        } else if self.projectiles.contains(id) {
            Some(EntityTag::Projectile)
        } else if self.pickups.contains(id) {
            Some(EntityTag::Pickup)
        } else if self.obstacles.contains(id) {
            Some(EntityTag::Obstacle)
        } else if self.item_boxes.contains(id) {
            Some(EntityTag::ItemBox)
        } else if self.effects.contains(id) {
            Some(EntityTag::Effect)
        } else {
            None
        }
    }

    /// `true` while `id` is stored in any registry.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.tag_of(id).is_some()
    }

    /// Hit box of a live collidable entity. Effects have none.
    #[must_use]
    pub fn hit_box_of(&self, id: EntityId) -> Option<HitBox> {
        match self.tag_of(id)? {
            EntityTag::Tank => self.tanks.get(id).map(Collidable::hit_box),
            EntityTag::Turret => self.turrets.get(id).map(Collidable::hit_box),
            EntityTag::Projectile => self.projectiles.get(id).map(Collidable::hit_box),
            EntityTag::Pickup => self.pickups.get(id).map(Collidable::hit_box),
            EntityTag::Obstacle => self.obstacles.get(id).map(Collidable::hit_box),
            EntityTag::ItemBox => self.item_boxes.get(id).map(Collidable::hit_box),
            EntityTag::Effect => None,
        }
    }

    /// Center of a live entity.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        match self.tag_of(id)? {
            EntityTag::Effect => self.effects.get(id).map(|e| e.position),
            _ => self.hit_box_of(id).map(|b| b.center),
        }
    }

    /// Everything that stops a tank: obstacles, item boxes, and turrets, in
    /// ascending id order.
    #[must_use]
    pub fn blockers(&self) -> Vec<HitBox> {
        let mut all = self.obstacles.hit_boxes();
        all.extend(self.item_boxes.hit_boxes());
        all.extend(self.turrets.hit_boxes());
        all.sort_by_key(|(id, _)| *id);
        all.into_iter().map(|(_, b)| b).collect()
    }

    /// Damage interface of a live tank or turret.
    pub fn damageable_mut(&mut self, id: EntityId) -> Option<&mut dyn Damageable> {
        if let Some(tank) = self.tanks.get_mut(id) {
            return Some(tank);
        }
        self.turrets
            .get_mut(id)
            .map(|turret| turret as &mut dyn Damageable)
    }

    /// Ids of every damageable entity (tanks and turrets), ascending.
    #[must_use]
    pub fn damageable_ids(&self) -> Vec<EntityId> {
        let mut ids = self.tanks.ids();
        ids.extend(self.turrets.ids());
        ids.sort_unstable();
        ids
    }

    /// Total number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tanks.len()
            + self.turrets.len()
            + self.projectiles.len()
            + self.pickups.len()
            + self.obstacles.len()
            + self.item_boxes.len()
            + self.effects.len()
    }

    /// `true` when the arena holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
