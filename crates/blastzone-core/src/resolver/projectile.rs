//! Projectile impacts.

use glam::Vec2;
use tracing::debug;

use crate::entity::{
    Collidable, Effect, EffectKind, EntityId, EntityTag, Pickup, PickupKind, Projectile,
};
use crate::geometry::HitBox;
use crate::output::Event;

use super::{InteractionPass, ResolveContext, ResolveReport};

/// Resolves each live projectile against at most one entity.
///
/// Categories are tried in a fixed priority: item boxes, then damageables
/// (tanks and turrets together, by id), then static obstacles. The first
/// overlapping entity the projectile may hit consumes it. Its owner is never
/// a valid target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectilePass;

enum Impact {
    ItemBox(EntityId),
    Damageable(EntityId),
    Obstacle,
}

impl ProjectilePass {
    fn find_impact(ctx: &ResolveContext<'_>, projectile: &Projectile) -> Option<Impact> {
        let hit = projectile.hit_box();
        let touches = |id: EntityId, other: HitBox| projectile.can_hit(id) && hit.overlaps(&other);

        if let Some((id, _)) = ctx
            .arena
            .item_boxes
            .iter()
            .find(|(id, b)| touches(*id, b.hit_box()))
        {
            return Some(Impact::ItemBox(id));
        }
        if let Some(id) = ctx.arena.damageable_ids().into_iter().find(|id| {
            ctx.arena
                .hit_box_of(*id)
                .is_some_and(|other| touches(*id, other))
        }) {
            return Some(Impact::Damageable(id));
        }
        ctx.arena
            .obstacles
            .iter()
            .any(|(id, o)| touches(id, o.hit_box()))
            .then_some(Impact::Obstacle)
    }

    fn wear_box(ctx: &mut ResolveContext<'_>, report: &mut ResolveReport, item_box: EntityId, owner: EntityId) {
        let Some(target) = ctx.arena.item_boxes.get_mut(item_box) else {
            return;
        };
        let broken = target.wear_out();
        let remaining = target.wear();
        let position = target.position;
        ctx.emit(Event::BoxWorn {
            item_box,
            remaining,
        });
        if !broken {
            return;
        }

        ctx.destroy(item_box, Some(owner));
        report.boxes_broken += 1;

        let kind = PickupKind::random(&mut *ctx.rng);
        let pickup = ctx.arena.spawn_pickup(Pickup::new(kind, position));
        debug!(%item_box, %pickup, ?kind, "item box broken");
        ctx.emit(Event::EntitySpawned {
            entity: pickup,
            tag: EntityTag::Pickup,
        });
    }

    fn strike(
        ctx: &mut ResolveContext<'_>,
        report: &mut ResolveReport,
        target: EntityId,
        projectile: &Projectile,
    ) {
        Self::explode(ctx, projectile.position);

        let Some(victim) = ctx.arena.damageable_mut(target) else {
            return;
        };
        let destroyed = victim.inflict_damage(projectile.damage);
        ctx.emit(Event::DamageDealt {
            source: projectile.owner,
            target,
            amount: projectile.damage,
        });
        if destroyed && ctx.destroy(target, Some(projectile.owner)).is_some() {
            report.destroyed.push(target);
        }
    }

    fn explode(ctx: &mut ResolveContext<'_>, position: Vec2) {
        let effect = ctx.arena.spawn_effect(Effect {
            kind: EffectKind::Explosion,
            position,
            rotation: 0.0,
            spawned_at: ctx.now,
            lifetime: ctx.config.effects.explosion_lifetime,
        });
        ctx.emit(Event::EffectSpawned {
            effect,
            kind: EffectKind::Explosion,
            position,
        });
    }
}

impl InteractionPass for ProjectilePass {
    fn name(&self) -> &'static str {
        "projectile"
    }

    fn run(&self, ctx: &mut ResolveContext<'_>, report: &mut ResolveReport) {
        for id in ctx.arena.projectiles.ids() {
            let Some(projectile) = ctx.arena.projectiles.get(id) else {
                continue;
            };
            let Some(impact) = Self::find_impact(ctx, projectile) else {
                continue;
            };
            let Some(projectile) = ctx.arena.projectiles.remove(id) else {
                continue;
            };

            match impact {
                Impact::ItemBox(item_box) => Self::wear_box(ctx, report, item_box, projectile.owner),
                Impact::Damageable(target) => Self::strike(ctx, report, target, &projectile),
                Impact::Obstacle => {}
            }
        }
    }
}
