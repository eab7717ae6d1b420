//! Tank-vs-pickup collection.

use tracing::debug;

use crate::entity::Collidable;
use crate::output::Event;

use super::{InteractionPass, ResolveContext, ResolveReport};

/// Lets every tank collect the pickups it touches.
///
/// Collection is unconditional: a touched pickup always leaves the world and
/// always applies its effect, even to a tank at full health or ammo. Tanks
/// are visited in id order, so of two tanks touching the same pickup the
/// older one gets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickupPass;

impl InteractionPass for PickupPass {
    fn name(&self) -> &'static str {
        "pickup"
    }

    fn run(&self, ctx: &mut ResolveContext<'_>, _report: &mut ResolveReport) {
        for tank_id in ctx.arena.tanks.ids() {
            for pickup_id in ctx.arena.pickups.ids() {
                let (Some(tank), Some(pickup)) =
                    (ctx.arena.tanks.get(tank_id), ctx.arena.pickups.get(pickup_id))
                else {
                    continue;
                };
                if !tank.hit_box().overlaps(&pickup.hit_box()) {
                    continue;
                }

                let kind = pickup.kind;
                let effect = kind.roll_effect(&mut *ctx.rng, &ctx.config.items);
                ctx.arena.pickups.remove(pickup_id);
                if let Some(tank) = ctx.arena.tanks.get_mut(tank_id) {
                    tank.pickup(effect, ctx.now);
                }
                debug!(tank = %tank_id, pickup = %pickup_id, ?kind, "pickup consumed");
                ctx.emit(Event::PickupConsumed {
                    tank: tank_id,
                    pickup: pickup_id,
                    kind,
                });
                ctx.emit(Event::Sound(kind.sound()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AmmoCategory, TankColor, TankSize};
    use crate::entity::{Damageable, Pickup, PickupKind, Tank};
    use crate::output::SoundCue;
    use crate::resolver::tests::Fixture;
    use glam::Vec2;

    #[test]
    fn touching_a_pickup_consumes_it_once() {
        let mut fx = Fixture::new();
        let tank = fx.arena.spawn_tank(Tank::color_tank(
            Vec2::ZERO,
            TankColor::Blue,
            AmmoCategory::Standard,
            768.0,
        ));
        let pickup = fx
            .arena
            .spawn_pickup(Pickup::new(PickupKind::SpeedBoost, Vec2::new(10.0, 0.0)));

        PickupPass.run(&mut fx.ctx(2.0), &mut ResolveReport::default());
        PickupPass.run(&mut fx.ctx(2.1), &mut ResolveReport::default());

        assert!(fx.arena.pickups.is_empty());
        let t = fx.arena.tanks.get(tank).unwrap();
        assert_eq!(t.active_items().len(), 1);
        assert!((t.max_acceleration() - 768.0 * 1.8).abs() < 1e-3);
        assert_eq!(
            fx.event_list(),
            vec![
                Event::PickupConsumed {
                    tank,
                    pickup,
                    kind: PickupKind::SpeedBoost
                },
                Event::Sound(SoundCue::SpeedUp),
            ]
        );
    }

    #[test]
    fn heal_restores_between_ten_and_twenty_percent() {
        let mut fx = Fixture::new();
        let mut damaged = Tank::enemy(Vec2::ZERO, TankSize::Big, 768.0);
        damaged.inflict_damage(50.0);
        let tank = fx.arena.spawn_tank(damaged);
        fx.arena
            .spawn_pickup(Pickup::new(PickupKind::Heal, Vec2::ZERO));

        PickupPass.run(&mut fx.ctx(0.0), &mut ResolveReport::default());

        let hp = fx.arena.tanks.get(tank).unwrap().health().current();
        assert!((60.0..=70.0).contains(&hp), "healed to {hp}");
    }

    #[test]
    fn older_tank_wins_a_shared_pickup() {
        let mut fx = Fixture::new();
        let first = fx.arena.spawn_tank(Tank::enemy(Vec2::new(-10.0, 0.0), TankSize::Big, 768.0));
        let _second = fx.arena.spawn_tank(Tank::enemy(Vec2::new(10.0, 0.0), TankSize::Big, 768.0));
        fx.arena
            .spawn_pickup(Pickup::new(PickupKind::Reload, Vec2::ZERO));

        PickupPass.run(&mut fx.ctx(0.0), &mut ResolveReport::default());

        let consumed: Vec<_> = fx
            .event_list()
            .into_iter()
            .filter_map(|e| match e {
                Event::PickupConsumed { tank, .. } => Some(tank),
                _ => None,
            })
            .collect();
        assert_eq!(consumed, vec![first]);
    }
}
