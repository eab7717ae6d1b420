//! Interaction resolver: everything that happens because two hit boxes
//! overlap after movement.
//!
//! The resolver runs once per tick, after agents have acted and every entity
//! has moved. It is an ordered list of [`InteractionPass`]es, each covering a
//! disjoint family of entity pairs:
//!
//! 1. [`TankContactPass`]: overlapping tanks knock each other apart.
//! 2. [`PickupPass`]: tanks collect the pickups they touch.
//! 3. [`ProjectilePass`]: projectiles hit item boxes, damageables, or
//!    obstacles.
//!
//! # Invariants
//!
//! - Passes iterate over id snapshots, so entities removed mid-pass are
//!   skipped rather than revisited.
//! - A projectile affects at most one entity per tick. Item boxes are checked
//!   first, then damageables, then static obstacles; within a category the
//!   lowest id wins.
//! - Destruction is complete: a destroyed tank's active items are reverted
//!   and reported before the tank leaves the arena.

mod contact;
mod pickup;
mod projectile;

pub use contact::TankContactPass;
pub use pickup::PickupPass;
pub use projectile::ProjectilePass;

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{EntityId, EntityTag, Tank};
use crate::output::{Event, EventLog};
use crate::timer::Seconds;

/// Mutable world state a pass may touch.
pub struct ResolveContext<'a> {
    /// Entity registries.
    pub arena: &'a mut Arena,
    /// Side channel for presentation.
    pub events: &'a mut EventLog,
    /// The world's only randomness source.
    pub rng: &'a mut ChaCha8Rng,
    /// Tuning.
    pub config: &'a SimConfig,
    /// Simulation clock.
    pub now: Seconds,
    /// Tick being resolved.
    pub tick: u64,
}

impl ResolveContext<'_> {
    /// Records an event for the current tick.
    pub fn emit(&mut self, event: Event) {
        self.events.push(self.tick, event);
    }

    /// Removes `id` from the arena and reports it.
    ///
    /// Tanks first revert and report every active item, so no timed effect
    /// outlives its holder.
    pub fn destroy(&mut self, id: EntityId, destroyer: Option<EntityId>) -> Option<EntityTag> {
        let cleared = self
            .arena
            .tanks
            .get_mut(id)
            .map(Tank::clear_items)
            .unwrap_or_default();
        for kind in cleared {
            self.emit(Event::ItemExpired { tank: id, kind });
        }
        let tag = self.arena.despawn(id)?;
        debug!(%id, %tag, ?destroyer, "entity destroyed");
        self.emit(Event::EntityDestroyed {
            entity: id,
            destroyer,
        });
        Some(tag)
    }
}

/// What the world's bookkeeping needs to know after resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Item boxes broken this tick.
    pub boxes_broken: u32,
    /// Tanks and turrets destroyed this tick, in destruction order.
    pub destroyed: Vec<EntityId>,
}

/// One family of overlap checks.
pub trait InteractionPass {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Finds and applies every interaction of this family.
    fn run(&self, ctx: &mut ResolveContext<'_>, report: &mut ResolveReport);
}

/// Runs the interaction passes in order.
///
/// # Example
///
/// ```
/// use blastzone_core::resolver::InteractionResolver;
///
/// let resolver = InteractionResolver::new();
/// assert_eq!(resolver.pass_names(), vec!["tank_contact", "pickup", "projectile"]);
/// ```
pub struct InteractionResolver {
    passes: Vec<Box<dyn InteractionPass>>,
}

impl Default for InteractionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InteractionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionResolver")
            .field("passes", &self.pass_names())
            .finish()
    }
}

impl InteractionResolver {
    /// The standard pass order.
    #[must_use]
    pub fn new() -> Self {
        Self::with_passes(vec![
            Box::new(TankContactPass),
            Box::new(PickupPass),
            Box::new(ProjectilePass),
        ])
    }

    /// A resolver running exactly `passes`, in order.
    #[must_use]
    pub fn with_passes(passes: Vec<Box<dyn InteractionPass>>) -> Self {
        Self { passes }
    }

    /// Names of the passes, in run order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Runs every pass once.
    pub fn resolve(&self, ctx: &mut ResolveContext<'_>) -> ResolveReport {
        let mut report = ResolveReport::default();
        for pass in &self.passes {
            pass.run(ctx, &mut report);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AmmoCategory, TankSize};
    use crate::entity::Damageable;
    use glam::Vec2;
    use rand::SeedableRng;

    pub(super) struct Fixture {
        pub arena: Arena,
        pub events: EventLog,
        pub rng: ChaCha8Rng,
        pub config: SimConfig,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                arena: Arena::new(),
                events: EventLog::new(),
                rng: ChaCha8Rng::seed_from_u64(11),
                config: SimConfig::default(),
            }
        }

        pub fn ctx(&mut self, now: Seconds) -> ResolveContext<'_> {
            ResolveContext {
                arena: &mut self.arena,
                events: &mut self.events,
                rng: &mut self.rng,
                config: &self.config,
                now,
                tick: 1,
            }
        }

        pub fn event_list(&mut self) -> Vec<Event> {
            self.events.drain().into_iter().map(|r| r.event).collect()
        }
    }

    #[test]
    fn pass_order_is_fixed() {
        assert_eq!(
            InteractionResolver::default().pass_names(),
            vec!["tank_contact", "pickup", "projectile"]
        );
    }

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_pass: Box<dyn InteractionPass>) {}
    }

    #[test]
    fn destroying_a_boosted_tank_reverts_its_items() {
        let mut fx = Fixture::new();
        let mut tank = Tank::enemy(Vec2::ZERO, TankSize::Big, 768.0);
        tank.pickup(
            crate::entity::ItemEffect::SpeedBoost {
                factor: 1.8,
                duration: 10.0,
            },
            0.0,
        );
        let id = fx.arena.spawn_tank(tank);

        let tag = fx.ctx(1.0).destroy(id, None);

        assert_eq!(tag, Some(EntityTag::Tank));
        assert!(!fx.arena.is_alive(id));
        assert_eq!(
            fx.event_list(),
            vec![
                Event::ItemExpired {
                    tank: id,
                    kind: crate::entity::PickupKind::SpeedBoost
                },
                Event::EntityDestroyed {
                    entity: id,
                    destroyer: None
                },
            ]
        );
    }

    #[test]
    fn destroying_twice_is_a_no_op() {
        let mut fx = Fixture::new();
        let id = fx.arena.spawn_turret(crate::entity::Turret::new(
            Vec2::ZERO,
            AmmoCategory::Standard,
            0,
        ));
        assert!(fx.arena.turrets.get(id).is_some_and(|t| t.health().current() > 0.0));
        assert!(fx.ctx(0.0).destroy(id, None).is_some());
        assert!(fx.ctx(0.0).destroy(id, None).is_none());
        assert_eq!(fx.event_list().len(), 1);
    }
}
