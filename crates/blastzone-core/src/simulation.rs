//! The world and its per-frame tick.
//!
//! [`World::step`] advances the simulation by one frame in four phases:
//!
//! 1. **AGENTS**: player input and every agent's state machine issue
//!    commands, decided against the world as the previous tick left it.
//! 2. **UPDATE**: tanks integrate against the blockers, leave tracks, and
//!    shed expired items; projectiles fly or expire; effects expire.
//! 3. **RESOLUTION**: the [`InteractionResolver`] applies every overlap.
//! 4. **BOOKKEEPING**: agents whose entity died are dropped, and an item box
//!    may respawn.
//!
//! # Determinism
//!
//! Given the same level, config, seed and per-frame inputs, two worlds
//! produce identical arenas and event logs:
//! - every registry iterates in id order
//! - agents run in construction order
//! - all randomness comes from one `ChaCha8Rng` seeded at construction
//!
//! # Example
//!
//! ```
//! use blastzone_core::config::SimConfig;
//! use blastzone_core::input::{Actions, PlayerInput};
//! use blastzone_core::level::LevelDescription;
//! use blastzone_core::simulation::World;
//!
//! let level = LevelDescription::from_json(r#"{
//!     "width": 1024, "height": 768,
//!     "spawns": [
//!         { "kind": "player", "position": [100, 100] },
//!         { "kind": "enemy_tank", "position": [900, 600], "size": "big" },
//!         { "kind": "patrol_point", "position": [800, 600] },
//!         { "kind": "patrol_point", "position": [900, 500] }
//!     ]
//! }"#).unwrap();
//!
//! let mut world = World::from_level(&level, SimConfig::default(), 7).unwrap();
//! let mut input = PlayerInput::default();
//! for _ in 0..60 {
//!     input.press(Actions::FORWARD);
//!     world.step(1.0 / 60.0, &mut input).unwrap();
//! }
//!
//! assert_eq!(world.tick(), 60);
//! assert!(world.is_player_alive());
//! assert_eq!(world.mob_count(), 1);
//! ```

use std::fmt;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::ai::{
    Agent, AgentCommand, Brain, Hook, PatrolRoute, TankBrain, TankObservation, TurretBrain,
    TurretObservation, WallAvoidance,
};
use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{
    Collidable, Effect, EffectKind, EntityId, EntityTag, ItemBox, Obstacle, Projectile,
    Rotatable, Shot, Tank, Turret,
};
use crate::error::{ConfigError, SimError};
use crate::geometry::bearing_to;
use crate::input::{Actions, PlayerInput};
use crate::level::LevelDescription;
use crate::output::{Event, EventLog, EventRecord, SoundCue};
use crate::resolver::{InteractionResolver, ResolveContext, ResolveReport};
use crate::timer::{Seconds, Stopwatch};

// =============================================================================
// World
// =============================================================================

/// A running game: entities, agents, and the clock.
pub struct World {
    arena: Arena,
    agents: Vec<Agent>,
    avoidance: WallAvoidance,
    resolver: InteractionResolver,
    events: EventLog,
    rng: ChaCha8Rng,
    config: SimConfig,
    player: EntityId,
    box_spawns: Vec<Vec2>,
    respawn: Stopwatch,
    size: Vec2,
    clock: Seconds,
    tick: u64,
    seed: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("clock", &self.clock)
            .field("seed", &self.seed)
            .field("entities", &self.arena.len())
            .field("agents", &self.agents.len())
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Builds a world from `level`.
    ///
    /// Spawn order fixes entity ids: player, boss, turrets, trees, item
    /// boxes, then the four boundary walls. The boss patrols a shuffled copy
    /// of the level's patrol points, and every turret defers to the boss.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in `level` or `config`. No
    /// partially built world is ever returned.
    pub fn from_level(level: &LevelDescription, config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        level.validate()?;
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut arena = Arena::new();
        let max_acceleration = config.physics.max_acceleration;

        let spawn = level.player()?;
        let player = arena.spawn_tank(Tank::color_tank(
            spawn.position,
            spawn.color,
            spawn.category,
            max_acceleration,
        ));

        let boss_spawn = level.boss()?;
        let boss = arena.spawn_tank(Tank::enemy(boss_spawn.position, boss_spawn.size, max_acceleration));
        let route = PatrolRoute::shuffled(level.patrol_points().collect(), &mut rng)?;
        let mut agents = vec![Agent {
            controlled: boss,
            target: player,
            brain: Brain::Tank(TankBrain::new(route)),
        }];

        for turret in level.turrets() {
            let id = arena.spawn_turret(Turret::new(turret.position, turret.category, turret.special));
            agents.push(Agent {
                controlled: id,
                target: player,
                brain: Brain::Turret(TurretBrain::new(Some(boss))),
            });
        }

        for position in level.trees() {
            arena.spawn_obstacle(Obstacle::tree(position));
        }

        let box_spawns: Vec<Vec2> = level.box_spawns().collect();
        for &position in &box_spawns {
            arena.spawn_item_box(ItemBox::new(position));
        }

        for wall in Obstacle::boundary(level.width, level.height) {
            arena.spawn_obstacle(wall);
        }

        info!(
            seed,
            entities = arena.len(),
            agents = agents.len(),
            width = level.width,
            height = level.height,
            "world constructed"
        );

        Ok(Self {
            arena,
            agents,
            avoidance: WallAvoidance::new(),
            resolver: InteractionResolver::new(),
            events: EventLog::new(),
            rng,
            config,
            player,
            box_spawns,
            respawn: Stopwatch::started(0.0),
            size: Vec2::new(level.width, level.height),
            clock: 0.0,
            tick: 0,
            seed,
        })
    }

    /// Advances the world by `dt` seconds.
    ///
    /// The input's action set is consumed and cleared; its aim point is kept.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidFrameTime`] for a negative or non-finite `dt`
    /// (checked before anything changes), or the invariant violation an
    /// agent command triggered.
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&mut self, dt: Seconds, input: &mut PlayerInput) -> Result<(), SimError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidFrameTime(dt));
        }
        self.clock += dt;
        trace!(tick = self.tick, clock = self.clock, dt, "step");

        // PHASE 1: AGENTS
        self.apply_player_input(input);
        self.run_agents()?;

        // PHASE 2: UPDATE
        self.update_entities(dt as f32);

        // PHASE 3: RESOLUTION
        let report = self.resolver.resolve(&mut ResolveContext {
            arena: &mut self.arena,
            events: &mut self.events,
            rng: &mut self.rng,
            config: &self.config,
            now: self.clock,
            tick: self.tick,
        });

        // PHASE 4: BOOKKEEPING
        self.bookkeeping(&report);
        self.tick += 1;
        Ok(())
    }

    // ===== Phase 1 =====

    fn apply_player_input(&mut self, input: &mut PlayerInput) {
        let actions = input.take_actions();
        let now = self.clock;
        let turn_rate = self.config.physics.turn_rate;
        let Some(tank) = self.arena.tanks.get_mut(self.player) else {
            return;
        };

        tank.angular_velocity = actions.turn() * turn_rate;
        tank.thrust(actions.thrust());
        if let Some(aim) = input.aim {
            tank.aim(bearing_to(aim - tank.position()));
        }
        if actions.contains(Actions::FIRE) {
            let shots = tank.fire(self.player, now);
            self.spawn_shots(shots);
        }
    }

    fn run_agents(&mut self) -> Result<(), SimError> {
        for index in 0..self.agents.len() {
            if let Some((controlled, commands)) = self.think(index) {
                for command in commands {
                    self.apply_command(controlled, command)?;
                }
            }
        }
        Ok(())
    }

    /// Steps one agent's state machine. `None` when its entity is gone.
    fn think(&mut self, index: usize) -> Option<(EntityId, Vec<AgentCommand>)> {
        let boss_pursuing = self.boss_pursuing(index);
        let now = self.clock;
        let agent = self.agents.get_mut(index)?;
        let controlled = agent.controlled;
        let target = self.arena.position_of(agent.target);

        let commands = match &mut agent.brain {
            Brain::Tank(brain) => {
                let tank = self.arena.tanks.get(controlled)?;
                let obs = TankObservation {
                    now,
                    position: tank.position(),
                    rotation: tank.rotation(),
                    hit_wall: tank.hit_wall(),
                    ammo: tank.ammo(),
                    range: tank.range(),
                    target,
                };
                let step = brain.step(&obs, &mut self.avoidance, &self.config.ai);
                log_hooks(controlled, &step.hooks);
                step.commands
            }
            Brain::Turret(brain) => {
                let turret = self.arena.turrets.get(controlled)?;
                let obs = TurretObservation {
                    now,
                    position: turret.position(),
                    ammo: turret.ammo(),
                    range: turret.range(),
                    target,
                    boss_pursuing,
                };
                let step = brain.step(&obs, &self.config.ai);
                log_hooks(controlled, &step.hooks);
                step.commands
            }
        };
        Some((controlled, commands))
    }

    /// Whether the boss a turret agent defers to is currently pursuing.
    fn boss_pursuing(&self, index: usize) -> bool {
        let Some(Brain::Turret(brain)) = self.agents.get(index).map(|a| &a.brain) else {
            return false;
        };
        brain.boss().is_some_and(|boss| {
            self.agents
                .iter()
                .any(|agent| agent.controlled == boss && agent.is_pursuing())
        })
    }

    fn apply_command(&mut self, id: EntityId, command: AgentCommand) -> Result<(), SimError> {
        if let AgentCommand::Accelerate(fraction) = command {
            if fraction < 0.0 {
                return Err(SimError::NegativeAcceleration { entity: id, fraction });
            }
        }

        let now = self.clock;
        if let Some(tank) = self.arena.tanks.get_mut(id) {
            match command {
                AgentCommand::Face(heading) => tank.face(heading),
                AgentCommand::Aim(bearing) => tank.aim(bearing),
                AgentCommand::Accelerate(fraction) => tank.thrust(fraction),
                AgentCommand::Reload => tank.reload(),
                AgentCommand::Fire => {
                    let shots = tank.fire(id, now);
                    self.spawn_shots(shots);
                }
            }
            return Ok(());
        }

        let Some(turret) = self.arena.turrets.get_mut(id) else {
            return Err(SimError::NotControllable { entity: id });
        };
        match command {
            AgentCommand::Face(bearing) | AgentCommand::Aim(bearing) => turret.aim(bearing),
            AgentCommand::Accelerate(_) => return Err(SimError::Immobile { entity: id }),
            AgentCommand::Reload => turret.reload(),
            AgentCommand::Fire => {
                let shots = turret.fire(id, now).into_iter().collect();
                self.spawn_shots(shots);
            }
        }
        Ok(())
    }

    fn spawn_shots(&mut self, shots: Vec<Shot>) {
        let now = self.clock;
        for shot in shots {
            let projectile = self.arena.spawn_projectile(Projectile::from_shot(&shot, now));
            self.emit(Event::ProjectileFired {
                shooter: shot.owner,
                projectile,
            });
            self.spawn_effect(
                EffectKind::MuzzleFlash,
                shot.position,
                shot.rotation,
                self.config.effects.muzzle_flash_lifetime,
            );
            self.emit(Event::Sound(SoundCue::Fire));
        }
    }

    // ===== Phase 2 =====

    fn update_entities(&mut self, dt: f32) {
        let now = self.clock;
        let blockers = self.arena.blockers();
        let fx = self.config.effects.clone();

        for id in self.arena.tanks.ids() {
            let Some(tank) = self.arena.tanks.get_mut(id) else {
                continue;
            };
            tank.update(dt, &self.config.physics, &blockers);
            let track = tank
                .should_leave_track(now, fx.track_min_speed_sq, fx.track_interval)
                .then(|| (tank.position(), tank.rotation()));
            let expired = tank.expire_items(now);

            if let Some((position, rotation)) = track {
                self.spawn_effect(EffectKind::Tracks, position, rotation, fx.track_lifetime);
            }
            for kind in expired {
                debug!(tank = %id, ?kind, "item expired");
                self.emit(Event::ItemExpired { tank: id, kind });
            }
        }

        for id in self.arena.projectiles.ids() {
            let expired = self
                .arena
                .projectiles
                .get(id)
                .is_some_and(|p| p.is_expired(now));
            if expired {
                self.arena.projectiles.remove(id);
            } else if let Some(projectile) = self.arena.projectiles.get_mut(id) {
                projectile.advance(dt);
            }
        }

        for id in self.arena.effects.ids() {
            if self.arena.effects.get(id).is_some_and(|e| e.is_expired(now)) {
                self.arena.effects.remove(id);
            }
        }
    }

    fn spawn_effect(&mut self, kind: EffectKind, position: Vec2, rotation: f32, lifetime: Seconds) {
        let effect = self.arena.spawn_effect(Effect {
            kind,
            position,
            rotation,
            spawned_at: self.clock,
            lifetime,
        });
        self.emit(Event::EffectSpawned {
            effect,
            kind,
            position,
        });
    }

    // ===== Phase 4 =====

    fn bookkeeping(&mut self, report: &ResolveReport) {
        let now = self.clock;
        let arena = &self.arena;
        self.agents.retain(|agent| {
            let alive = arena.is_alive(agent.controlled);
            if !alive {
                debug!(agent = %agent.controlled, "agent removed");
            }
            alive
        });

        if report.boxes_broken > 0 {
            self.respawn.restart(now);
        }

        let items = self.arena.item_boxes.len() + self.arena.pickups.len();
        if items >= self.config.items.item_cap
            || !self.respawn.has_elapsed(now, self.config.items.respawn_time)
        {
            return;
        }
        let Some(&position) = self.box_spawns.choose(&mut self.rng) else {
            return;
        };
        let item_box = self.arena.spawn_item_box(ItemBox::new(position));
        self.respawn.restart(now);
        debug!(%item_box, x = position.x, y = position.y, "item box respawned");
        self.emit(Event::EntitySpawned {
            entity: item_box,
            tag: EntityTag::ItemBox,
        });
    }

    fn emit(&mut self, event: Event) {
        self.events.push(self.tick, event);
    }

    // ===== Queries =====

    /// `true` while the player's tank is in the arena.
    #[must_use]
    pub fn is_player_alive(&self) -> bool {
        self.arena.tanks.contains(self.player)
    }

    /// Number of live agents. Zero means every enemy is defeated.
    #[must_use]
    pub fn mob_count(&self) -> usize {
        self.agents.len()
    }

    /// Id of the player's tank, live or not.
    #[must_use]
    pub const fn player(&self) -> EntityId {
        self.player
    }

    /// The player's tank while it is alive.
    #[must_use]
    pub fn player_tank(&self) -> Option<&Tank> {
        self.arena.tanks.get(self.player)
    }

    /// Live agents in run order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Read-only view of every entity.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable access to the entities, for scenario setup between steps.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Events recorded but not yet drained.
    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// Removes and returns every recorded event, oldest first.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.events.drain()
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since construction.
    #[must_use]
    pub const fn clock(&self) -> Seconds {
        self.clock
    }

    /// Seed the world's randomness was derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Level width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }
}

fn log_hooks<K: fmt::Debug>(agent: EntityId, hooks: &[Hook<K>]) {
    for hook in hooks {
        debug!(%agent, ?hook, "agent state hook");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AmmoCategory, TankSize};
    use crate::entity::{Movable, Pickup, PickupKind};
    use crate::level::SpawnDescriptor;

    fn level() -> LevelDescription {
        LevelDescription {
            width: 1000.0,
            height: 1000.0,
            spawns: vec![
                SpawnDescriptor::Player {
                    position: Vec2::new(100.0, 100.0),
                    color: crate::config::TankColor::Green,
                    category: AmmoCategory::Standard,
                },
                SpawnDescriptor::EnemyTank {
                    position: Vec2::new(900.0, 900.0),
                    size: TankSize::Big,
                },
                SpawnDescriptor::PatrolPoint {
                    position: Vec2::new(900.0, 800.0),
                },
                SpawnDescriptor::Turret {
                    position: Vec2::new(800.0, 200.0),
                    category: AmmoCategory::Power,
                    special: 1,
                },
                SpawnDescriptor::BoxSpawn {
                    position: Vec2::new(500.0, 500.0),
                },
            ],
        }
    }

    fn world() -> World {
        World::from_level(&level(), SimConfig::default(), 1).unwrap()
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn spawn_order_fixes_ids() {
            let world = world();
            assert_eq!(world.player(), EntityId::new(1));
            assert_eq!(world.agents()[0].controlled, EntityId::new(2));
            assert_eq!(world.agents()[1].controlled, EntityId::new(3));
            assert_eq!(world.arena().item_boxes.ids(), vec![EntityId::new(4)]);
            // Four boundary walls.
            assert_eq!(world.arena().obstacles.len(), 4);
        }

        #[test]
        fn turrets_defer_to_the_boss() {
            let world = world();
            let Brain::Turret(brain) = &world.agents()[1].brain else {
                panic!("expected a turret agent");
            };
            assert_eq!(brain.boss(), Some(EntityId::new(2)));
        }

        #[test]
        fn invalid_config_aborts_construction() {
            let mut config = SimConfig::default();
            config.physics.friction = -1.0;
            assert!(matches!(
                World::from_level(&level(), config, 1),
                Err(ConfigError::InvalidTuning { field: "physics.friction", .. })
            ));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn bad_frame_time_changes_nothing() {
            let mut world = world();
            let mut input = PlayerInput::default();
            assert_eq!(
                world.step(-0.1, &mut input),
                Err(SimError::InvalidFrameTime(-0.1))
            );
            assert!(world.step(f64::NAN, &mut input).is_err());
            assert_eq!(world.tick(), 0);
            assert_eq!(world.clock(), 0.0);
        }

        #[test]
        fn player_input_is_consumed() {
            let mut world = world();
            let mut input = PlayerInput::default();
            input.press(Actions::FORWARD | Actions::FIRE);
            world.step(0.1, &mut input).unwrap();

            assert!(input.actions.is_empty());
            let tank = world.player_tank().unwrap();
            assert!(tank.movement().velocity.x > 0.0);
            assert_eq!(tank.ammo(), 19);
            let events = world.drain_events();
            assert!(events
                .iter()
                .any(|r| r.event == Event::Sound(SoundCue::Fire)));
        }

        #[test]
        fn player_turns_at_turn_rate() {
            let mut world = world();
            let mut input = PlayerInput::default();
            input.press(Actions::TURN_LEFT);
            world.step(0.5, &mut input).unwrap();
            assert!((world.player_tank().unwrap().rotation() - 75.0).abs() < 1e-3);

            // No key held: the hull stops turning.
            world.step(0.5, &mut input).unwrap();
            assert!((world.player_tank().unwrap().rotation() - 75.0).abs() < 1e-3);
        }

        #[test]
        fn command_to_missing_entity_is_an_error() {
            let mut world = world();
            assert_eq!(
                world.apply_command(EntityId::new(999), AgentCommand::Fire),
                Err(SimError::NotControllable {
                    entity: EntityId::new(999)
                })
            );
        }

        #[test]
        fn turrets_cannot_accelerate() {
            let mut world = world();
            let turret = EntityId::new(3);
            assert_eq!(
                world.apply_command(turret, AgentCommand::Accelerate(0.5)),
                Err(SimError::Immobile { entity: turret })
            );
            assert_eq!(
                world.apply_command(turret, AgentCommand::Accelerate(-0.5)),
                Err(SimError::NegativeAcceleration {
                    entity: turret,
                    fraction: -0.5
                })
            );
        }
    }

    mod bookkeeping_tests {
        use super::*;

        #[test]
        fn dead_agents_are_dropped() {
            let mut world = world();
            world.arena_mut().despawn(EntityId::new(3));
            world.step(0.01, &mut PlayerInput::default()).unwrap();
            assert_eq!(world.mob_count(), 1);
        }

        #[test]
        fn box_respawns_after_cooldown_when_below_cap() {
            let mut world = world();
            let original = EntityId::new(4);
            world.arena_mut().despawn(original);

            world.step(4.0, &mut PlayerInput::default()).unwrap();
            assert!(world.arena().item_boxes.is_empty());

            world.step(1.5, &mut PlayerInput::default()).unwrap();
            let boxes = world.arena().item_boxes.ids();
            assert_eq!(boxes.len(), 1);
            assert_ne!(boxes[0], original);
        }

        #[test]
        fn loose_pickup_counts_against_the_cap() {
            let mut world = world();
            world.arena_mut().despawn(EntityId::new(4));
            world
                .arena_mut()
                .spawn_pickup(Pickup::new(PickupKind::Reload, Vec2::new(50.0, 900.0)));

            world.step(6.0, &mut PlayerInput::default()).unwrap();
            assert!(world.arena().item_boxes.is_empty());
        }
    }
}
