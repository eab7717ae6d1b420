//! Test helper functions for setting up worlds and driving them.
//!
//! This module provides level builders and stepping utilities that make
//! writing scenario tests more ergonomic and consistent.

use glam::Vec2;

use crate::ai::{Brain, TankStateKind, TurretStateKind};
use crate::config::{AmmoCategory, SimConfig, TankColor, TankSize};
use crate::entity::{Damageable, EntityId, Tank, Turret};
use crate::input::{Actions, PlayerInput};
use crate::level::{LevelDescription, SpawnDescriptor};
use crate::output::{Event, EventRecord};
use crate::simulation::World;

/// Frame time used by every scenario.
pub const FRAME: f64 = 1.0 / 60.0;

// =============================================================================
// Level Builders
// =============================================================================

/// A large empty level holding just a player and a big boss tank.
///
/// # Arguments
///
/// * `player` - Player tank center
/// * `boss` - Boss tank center
/// * `patrol` - Boss patrol waypoints (must not be empty)
pub fn duel_level(player: Vec2, boss: Vec2, patrol: &[Vec2]) -> LevelDescription {
    let mut spawns = vec![
        SpawnDescriptor::Player {
            position: player,
            color: TankColor::Blue,
            category: AmmoCategory::Standard,
        },
        SpawnDescriptor::EnemyTank {
            position: boss,
            size: TankSize::Big,
        },
    ];
    spawns.extend(
        patrol
            .iter()
            .map(|&position| SpawnDescriptor::PatrolPoint { position }),
    );
    LevelDescription {
        width: 6000.0,
        height: 6000.0,
        spawns,
    }
}

/// A level exercising every spawn kind, used for determinism runs.
pub fn full_level() -> LevelDescription {
    let mut level = duel_level(
        Vec2::new(300.0, 300.0),
        Vec2::new(1500.0, 1500.0),
        &[
            Vec2::new(400.0, 400.0),
            Vec2::new(1400.0, 300.0),
            Vec2::new(1200.0, 1200.0),
            Vec2::new(300.0, 1400.0),
            Vec2::new(800.0, 800.0),
        ],
    );
    level.width = 1800.0;
    level.height = 1800.0;
    level.spawns.extend([
        SpawnDescriptor::Turret {
            position: Vec2::new(600.0, 300.0),
            category: AmmoCategory::Rapid,
            special: 0,
        },
        SpawnDescriptor::Turret {
            position: Vec2::new(300.0, 700.0),
            category: AmmoCategory::Power,
            special: 2,
        },
        SpawnDescriptor::Tree {
            position: Vec2::new(900.0, 600.0),
        },
        SpawnDescriptor::Tree {
            position: Vec2::new(700.0, 1100.0),
        },
        SpawnDescriptor::BoxSpawn {
            position: Vec2::new(450.0, 300.0),
        },
        SpawnDescriptor::BoxSpawn {
            position: Vec2::new(1000.0, 1000.0),
        },
    ]);
    level
}

/// Builds a world with default tuning.
///
/// # Panics
///
/// Panics if `level` is invalid.
pub fn new_world(level: &LevelDescription, seed: u64) -> World {
    World::from_level(level, SimConfig::default(), seed).expect("test level must be valid")
}

// =============================================================================
// Stepping
// =============================================================================

/// Steps `world` `n` frames with no player input.
pub fn idle(world: &mut World, n: usize) {
    let mut input = PlayerInput::default();
    for _ in 0..n {
        world.step(FRAME, &mut input).expect("step must succeed");
    }
}

/// Steps one frame holding `actions`.
pub fn step_with(world: &mut World, actions: Actions) {
    let mut input = PlayerInput::default();
    input.press(actions);
    world.step(FRAME, &mut input).expect("step must succeed");
}

/// Tops the player back up to full health.
pub fn heal_player(world: &mut World) {
    let player = world.player();
    if let Some(tank) = world.arena_mut().tanks.get_mut(player) {
        tank.heal(1.0);
    }
}

// =============================================================================
// Inspection
// =============================================================================

/// The boss tank, while alive.
pub fn boss(world: &World) -> Option<&Tank> {
    let id = world.agents().first()?.controlled;
    world.arena().tanks.get(id)
}

/// Current state of the first mobile agent.
pub fn boss_state(world: &World) -> Option<TankStateKind> {
    world.agents().iter().find_map(|agent| match &agent.brain {
        Brain::Tank(brain) => brain.kind(),
        Brain::Turret(_) => None,
    })
}

/// Current state of the turret agent controlling `id`.
pub fn turret_state(world: &World, id: EntityId) -> Option<TurretStateKind> {
    world
        .agents()
        .iter()
        .find(|agent| agent.controlled == id)
        .and_then(|agent| match &agent.brain {
            Brain::Turret(brain) => brain.kind(),
            Brain::Tank(_) => None,
        })
}

/// The turret with `id`.
pub fn turret(world: &World, id: EntityId) -> &Turret {
    world.arena().turrets.get(id).expect("turret must be alive")
}

/// Installs a test-writer subscriber so `RUST_LOG`-style output shows up
/// under `cargo test -- --nocapture`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Counts records matching `pred`.
pub fn count_events(records: &[EventRecord], pred: impl Fn(&Event) -> bool) -> usize {
    records.iter().filter(|r| pred(&r.event)).count()
}
