//! Tanks: mobile, damageable units carrying one or more barrels.
//!
//! A tank's acceleration cap is derived, never accumulated: the effective cap
//! is the base cap times the factor of every active boost, recomputed whenever
//! the active set changes. Expiring the last boost therefore restores the base
//! value exactly, however many boosts overlapped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{tank_size, AmmoCategory, PhysicsConfig, TankColor, TankSize, TANK_MAX_HEALTH};
use crate::geometry::{heading_vector, HitBox};
use crate::kinematics;
use crate::timer::{Seconds, Stopwatch};

use super::{
    ActiveItem, Barrel, Collidable, Damageable, EntityId, Health, ItemEffect, Movable,
    MovementState, PickupKind, Rotatable, Shot,
};

/// A mobile armored unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    movement: MovementState,
    rotation: f32,
    /// Hull turn rate in degrees per second, applied during `update`.
    pub angular_velocity: f32,
    size: Vec2,
    health: Health,
    barrels: Vec<Barrel>,
    items: Vec<ActiveItem>,
    base_acceleration: f32,
    acceleration_cap: f32,
    hit_wall: bool,
    color: Option<TankColor>,
    class: Option<TankSize>,
    last_track: Stopwatch,
}

impl Tank {
    fn bare(position: Vec2, class: Option<TankSize>, base_acceleration: f32) -> Self {
        Self {
            movement: MovementState::at(position),
            rotation: 0.0,
            angular_velocity: 0.0,
            size: tank_size(class),
            health: Health::full(TANK_MAX_HEALTH),
            barrels: Vec::new(),
            items: Vec::new(),
            base_acceleration,
            acceleration_cap: base_acceleration,
            hit_wall: false,
            color: None,
            class,
            last_track: Stopwatch::idle(),
        }
    }

    /// A player-style tank with a single barrel of `category`.
    #[must_use]
    pub fn color_tank(
        position: Vec2,
        color: TankColor,
        category: AmmoCategory,
        max_acceleration: f32,
    ) -> Self {
        let mut tank = Self::bare(position, None, max_acceleration);
        tank.color = Some(color);
        let mount = Vec2::new((tank.size.y / 3.0).floor(), 0.0);
        tank.barrels.push(Barrel::new(category, mount));
        tank
    }

    /// An enemy tank of the given size class.
    ///
    /// `big` and `large` carry two side-by-side barrels; `huge` adds a third,
    /// rear-mounted one. Larger classes accelerate slower.
    #[must_use]
    pub fn enemy(position: Vec2, class: TankSize, max_acceleration: f32) -> Self {
        let mut tank = Self::bare(
            position,
            Some(class),
            max_acceleration * class.acceleration_factor(),
        );
        let forward = match class {
            TankSize::Big | TankSize::Large => 0.0,
            TankSize::Huge => 20.0,
        };
        for side in [-10.0, 10.0] {
            tank.barrels
                .push(Barrel::new(AmmoCategory::Standard, Vec2::new(forward, side)));
        }
        if class == TankSize::Huge {
            tank.barrels
                .push(Barrel::new(AmmoCategory::Standard, Vec2::new(-10.0, 0.0)));
        }
        tank
    }

    // ===== Queries =====

    /// Paint scheme, for color tanks.
    #[must_use]
    pub const fn color(&self) -> Option<TankColor> {
        self.color
    }

    /// Size class, for enemy tanks.
    #[must_use]
    pub const fn class(&self) -> Option<TankSize> {
        self.class
    }

    /// Owned barrels.
    #[must_use]
    pub fn barrels(&self) -> &[Barrel] {
        &self.barrels
    }

    /// Ammo of the lead barrel.
    #[must_use]
    pub fn ammo(&self) -> u32 {
        self.barrels.first().map_or(0, Barrel::ammo)
    }

    /// Range of the lead barrel.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.barrels.first().map_or(0.0, Barrel::range)
    }

    /// Effective acceleration cap including active boosts.
    #[must_use]
    pub const fn max_acceleration(&self) -> f32 {
        self.acceleration_cap
    }

    /// Acceleration cap without boosts.
    #[must_use]
    pub const fn base_acceleration(&self) -> f32 {
        self.base_acceleration
    }

    /// Timed effects currently active.
    #[must_use]
    pub fn active_items(&self) -> &[ActiveItem] {
        &self.items
    }

    /// Whether the last integration step ran into a blocker.
    #[must_use]
    pub const fn hit_wall(&self) -> bool {
        self.hit_wall
    }

    // ===== Control =====

    /// Requests thrust along the hull heading at `fraction` of the cap for
    /// the next update. Negative fractions drive in reverse.
    pub fn thrust(&mut self, fraction: f32) {
        self.movement.acceleration =
            heading_vector(self.rotation) * self.acceleration_cap * fraction;
    }

    /// Turns hull and barrels to `heading`.
    pub fn face(&mut self, heading: f32) {
        self.rotation = heading;
        self.aim(heading);
    }

    /// Turns every barrel to `bearing`, leaving the hull alone.
    pub fn aim(&mut self, bearing: f32) {
        for barrel in &mut self.barrels {
            barrel.set_rotation(bearing);
        }
    }

    /// Pulls the trigger on every barrel; each ready barrel yields a shot.
    pub fn fire(&mut self, id: EntityId, now: Seconds) -> Vec<Shot> {
        let origin = self.movement.position;
        self.barrels
            .iter_mut()
            .filter_map(|barrel| barrel.fire(id, origin, now))
            .collect()
    }

    /// Refills every barrel.
    pub fn reload(&mut self) {
        for barrel in &mut self.barrels {
            barrel.reload();
        }
    }

    // ===== Items =====

    /// Applies a collected item's effect exactly once. Timed effects are
    /// registered for expiry.
    pub fn pickup(&mut self, effect: ItemEffect, now: Seconds) {
        match effect {
            ItemEffect::Heal { fraction } => {
                self.heal(fraction);
            }
            ItemEffect::Reload => self.reload(),
            ItemEffect::SpeedBoost { factor, duration } => {
                self.items.push(ActiveItem {
                    kind: PickupKind::SpeedBoost,
                    factor,
                    applied_at: now,
                    duration,
                });
                self.refresh_acceleration_cap();
            }
        }
    }

    /// Removes every item whose duration has elapsed and reverts its effect.
    /// Returns the kinds removed, in application order.
    pub fn expire_items(&mut self, now: Seconds) -> Vec<PickupKind> {
        let mut expired = Vec::new();
        self.items.retain(|item| {
            if item.has_subsided(now) {
                expired.push(item.kind);
                false
            } else {
                true
            }
        });
        if !expired.is_empty() {
            self.refresh_acceleration_cap();
        }
        expired
    }

    /// Reverts and discards every active item regardless of time left.
    pub fn clear_items(&mut self) -> Vec<PickupKind> {
        let cleared = self.items.drain(..).map(|item| item.kind).collect();
        self.refresh_acceleration_cap();
        cleared
    }

    fn refresh_acceleration_cap(&mut self) {
        self.acceleration_cap = self
            .items
            .iter()
            .fold(self.base_acceleration, |cap, item| cap * item.factor);
    }

    // ===== Per-tick =====

    /// Turns by the angular velocity, integrates against `blockers`, and
    /// clears the thrust request. Returns whether a blocker was hit.
    pub fn update(&mut self, dt: f32, physics: &PhysicsConfig, blockers: &[HitBox]) -> bool {
        self.rotation += self.angular_velocity * dt;
        let half_extents = self.size * 0.5;
        self.hit_wall = kinematics::integrate(&mut self.movement, half_extents, dt, physics, blockers).any();
        self.movement.acceleration = Vec2::ZERO;
        self.hit_wall
    }

    /// Returns `true` and restarts the track timer when the tank is fast
    /// enough and enough time has passed since its last track mark.
    pub fn should_leave_track(&mut self, now: Seconds, min_speed_sq: f32, interval: Seconds) -> bool {
        if self.movement.speed_squared() > min_speed_sq && self.last_track.has_elapsed(now, interval) {
            self.last_track.restart(now);
            true
        } else {
            false
        }
    }
}

impl Collidable for Tank {
    fn hit_box(&self) -> HitBox {
        HitBox::new(self.movement.position, self.size)
    }
}

impl Movable for Tank {
    fn movement(&self) -> &MovementState {
        &self.movement
    }

    fn movement_mut(&mut self) -> &mut MovementState {
        &mut self.movement
    }
}

impl Rotatable for Tank {
    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation_deg: f32) {
        self.rotation = rotation_deg;
    }
}

impl Damageable for Tank {
    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Tank {
        Tank::color_tank(Vec2::ZERO, TankColor::Green, AmmoCategory::Standard, 768.0)
    }

    mod factory_tests {
        use super::*;

        #[test]
        fn color_tank_has_one_barrel() {
            let tank = player();
            assert_eq!(tank.barrels().len(), 1);
            assert_eq!(tank.color(), Some(TankColor::Green));
            assert_eq!(tank.ammo(), 20);
            assert!((tank.range() - 375.0).abs() < 1e-3);
        }

        #[test]
        fn enemy_barrel_counts() {
            assert_eq!(Tank::enemy(Vec2::ZERO, TankSize::Big, 768.0).barrels().len(), 2);
            assert_eq!(Tank::enemy(Vec2::ZERO, TankSize::Large, 768.0).barrels().len(), 2);
            assert_eq!(Tank::enemy(Vec2::ZERO, TankSize::Huge, 768.0).barrels().len(), 3);
        }

        #[test]
        fn heavier_enemies_accelerate_slower() {
            let large = Tank::enemy(Vec2::ZERO, TankSize::Large, 1000.0);
            let huge = Tank::enemy(Vec2::ZERO, TankSize::Huge, 1000.0);
            assert!((large.max_acceleration() - 900.0).abs() < 1e-3);
            assert!((huge.max_acceleration() - 800.0).abs() < 1e-3);
        }
    }

    mod control_tests {
        use super::*;

        #[test]
        fn face_turns_hull_and_barrels() {
            let mut tank = Tank::enemy(Vec2::ZERO, TankSize::Huge, 768.0);
            tank.face(45.0);
            assert_eq!(tank.rotation(), 45.0);
            assert!(tank.barrels().iter().all(|b| b.rotation() == 45.0));
        }

        #[test]
        fn aim_leaves_hull() {
            let mut tank = player();
            tank.aim(-30.0);
            assert_eq!(tank.rotation(), 0.0);
            assert_eq!(tank.barrels()[0].rotation(), -30.0);
        }

        #[test]
        fn fire_uses_every_barrel() {
            let mut tank = Tank::enemy(Vec2::ZERO, TankSize::Huge, 768.0);
            let shots = tank.fire(EntityId::new(1), 0.0);
            assert_eq!(shots.len(), 3);
            assert!(tank.fire(EntityId::new(1), 0.1).is_empty());
            assert_eq!(tank.ammo(), 19);
        }

        #[test]
        fn thrust_follows_heading_and_clears_after_update() {
            let mut tank = player();
            tank.face(90.0);
            tank.thrust(0.5);
            assert!(tank
                .movement()
                .acceleration
                .abs_diff_eq(Vec2::new(0.0, -384.0), 1e-3));
            tank.update(0.016, &PhysicsConfig::default(), &[]);
            assert_eq!(tank.movement().acceleration, Vec2::ZERO);
            assert!(tank.movement().position.y < 0.0);
        }

        #[test]
        fn angular_velocity_turns_hull() {
            let mut tank = player();
            tank.angular_velocity = 150.0;
            tank.update(0.5, &PhysicsConfig::default(), &[]);
            assert!((tank.rotation() - 75.0).abs() < 1e-4);
        }
    }

    mod item_tests {
        use super::*;

        #[test]
        fn speed_boost_round_trip_is_bit_exact() {
            let mut tank = Tank::enemy(Vec2::ZERO, TankSize::Large, 768.0);
            let before = tank.max_acceleration();
            tank.pickup(
                ItemEffect::SpeedBoost {
                    factor: 1.8,
                    duration: 10.0,
                },
                0.0,
            );
            assert!(tank.max_acceleration() > before);
            assert!(tank.expire_items(5.0).is_empty());
            assert_eq!(tank.expire_items(10.5), vec![PickupKind::SpeedBoost]);
            assert_eq!(tank.max_acceleration().to_bits(), before.to_bits());
        }

        #[test]
        fn stacked_boosts_restore_exactly() {
            let mut tank = player();
            let before = tank.max_acceleration();
            let boost = ItemEffect::SpeedBoost {
                factor: 1.8,
                duration: 10.0,
            };
            tank.pickup(boost, 0.0);
            tank.pickup(boost, 4.0);
            assert_eq!(tank.expire_items(11.0).len(), 1);
            assert!((tank.max_acceleration() - before * 1.8).abs() < 1e-2);
            assert_eq!(tank.expire_items(15.0).len(), 1);
            assert_eq!(tank.max_acceleration().to_bits(), before.to_bits());
        }

        #[test]
        fn heal_clamps_at_max() {
            let mut tank = player();
            tank.inflict_damage(5.0);
            tank.pickup(ItemEffect::Heal { fraction: 0.2 }, 0.0);
            assert_eq!(tank.health().current(), 100.0);
            assert!(tank.active_items().is_empty());
        }

        #[test]
        fn reload_item_refills() {
            let mut tank = player();
            let _ = tank.fire(EntityId::new(1), 0.0);
            tank.pickup(ItemEffect::Reload, 1.0);
            assert_eq!(tank.ammo(), 20);
        }

        #[test]
        fn clear_items_reverts_everything() {
            let mut tank = player();
            let before = tank.max_acceleration();
            tank.pickup(
                ItemEffect::SpeedBoost {
                    factor: 1.8,
                    duration: 10.0,
                },
                0.0,
            );
            assert_eq!(tank.clear_items(), vec![PickupKind::SpeedBoost]);
            assert_eq!(tank.max_acceleration(), before);
            assert!(tank.clear_items().is_empty());
        }
    }

    mod track_tests {
        use super::*;

        #[test]
        fn tracks_need_speed_and_interval() {
            let mut tank = player();
            assert!(!tank.should_leave_track(0.0, 100.0, 0.1));
            tank.movement_mut().velocity = Vec2::new(50.0, 0.0);
            assert!(tank.should_leave_track(0.0, 100.0, 0.1));
            assert!(!tank.should_leave_track(0.05, 100.0, 0.1));
            assert!(tank.should_leave_track(0.2, 100.0, 0.1));
        }
    }
}
