//! Tank-vs-tank knockback.

use crate::entity::{Collidable, Movable, Rotatable};
use crate::geometry::heading_vector;

use super::{InteractionPass, ResolveContext, ResolveReport};

/// Pushes overlapping tanks apart.
///
/// For each unordered pair `(a, b)` with `a < b`, the impulse points along
/// `b`'s facing: `a` gains it and `b` loses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TankContactPass;

impl InteractionPass for TankContactPass {
    fn name(&self) -> &'static str {
        "tank_contact"
    }

    fn run(&self, ctx: &mut ResolveContext<'_>, _report: &mut ResolveReport) {
        let ids = ctx.arena.tanks.ids();
        let knockback = ctx.config.physics.knockback;

        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let (Some(tank_a), Some(tank_b)) = (ctx.arena.tanks.get(a), ctx.arena.tanks.get(b))
                else {
                    continue;
                };
                if !tank_a.hit_box().overlaps(&tank_b.hit_box()) {
                    continue;
                }
                let impulse = heading_vector(tank_b.rotation()) * knockback;
                if let Some(tank) = ctx.arena.tanks.get_mut(a) {
                    tank.movement_mut().velocity += impulse;
                }
                if let Some(tank) = ctx.arena.tanks.get_mut(b) {
                    tank.movement_mut().velocity -= impulse;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Tank;
    use crate::resolver::tests::Fixture;
    use glam::Vec2;

    fn tank_at(x: f32) -> Tank {
        Tank::enemy(Vec2::new(x, 0.0), crate::config::TankSize::Big, 768.0)
    }

    #[test]
    fn overlapping_tanks_are_pushed_along_second_heading() {
        let mut fx = Fixture::new();
        let a = fx.arena.spawn_tank(tank_at(0.0));
        let mut second = tank_at(20.0);
        second.set_rotation(90.0);
        let b = fx.arena.spawn_tank(second);

        TankContactPass.run(&mut fx.ctx(0.0), &mut ResolveReport::default());

        let va = fx.arena.tanks.get(a).unwrap().movement().velocity;
        let vb = fx.arena.tanks.get(b).unwrap().movement().velocity;
        // Facing 90 degrees is straight up the screen.
        assert!(va.x.abs() < 1e-3 && (va.y + 100.0).abs() < 1e-3);
        assert!(vb.x.abs() < 1e-3 && (vb.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn separated_tanks_are_untouched() {
        let mut fx = Fixture::new();
        let a = fx.arena.spawn_tank(tank_at(0.0));
        let b = fx.arena.spawn_tank(tank_at(200.0));

        TankContactPass.run(&mut fx.ctx(0.0), &mut ResolveReport::default());

        for id in [a, b] {
            assert_eq!(fx.arena.tanks.get(id).unwrap().movement().velocity, Vec2::ZERO);
        }
    }
}
