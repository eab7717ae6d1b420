use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;

use blastzone_core::config::{AmmoCategory, SimConfig, TankColor, TankSize};
use blastzone_core::input::{Actions, PlayerInput};
use blastzone_core::level::{LevelDescription, SpawnDescriptor};
use blastzone_core::World;

const FRAME: f64 = 1.0 / 60.0;

fn arena_level() -> LevelDescription {
    let mut spawns = vec![
        SpawnDescriptor::Player {
            position: Vec2::new(300.0, 300.0),
            color: TankColor::Red,
            category: AmmoCategory::Rapid,
        },
        SpawnDescriptor::EnemyTank {
            position: Vec2::new(1500.0, 1500.0),
            size: TankSize::Huge,
        },
    ];
    for i in 0..6 {
        let t = i as f32;
        spawns.push(SpawnDescriptor::PatrolPoint {
            position: Vec2::new(300.0 + 220.0 * t, 1400.0 - 180.0 * t),
        });
        spawns.push(SpawnDescriptor::Turret {
            position: Vec2::new(250.0 + 250.0 * t, 900.0),
            category: AmmoCategory::ALL[i % 3],
            special: 0,
        });
        spawns.push(SpawnDescriptor::Tree {
            position: Vec2::new(200.0 + 260.0 * t, 600.0),
        });
    }
    spawns.push(SpawnDescriptor::BoxSpawn {
        position: Vec2::new(900.0, 300.0),
    });
    LevelDescription {
        width: 1800.0,
        height: 1800.0,
        spawns,
    }
}

fn new_world() -> World {
    World::from_level(&arena_level(), SimConfig::default(), 42).expect("bench level is valid")
}

fn bench_idle_step(c: &mut Criterion) {
    let mut world = new_world();
    let mut input = PlayerInput::default();

    c.bench_function("world_step_idle", |b| {
        b.iter(|| {
            world.step(black_box(FRAME), &mut input).expect("step");
            world.drain_events();
        })
    });
}

fn bench_combat_step(c: &mut Criterion) {
    // Fresh world per batch so turrets and the boss still have targets
    c.bench_function("world_step_combat_600", |b| {
        b.iter(|| {
            let mut world = new_world();
            let mut input = PlayerInput::default();
            for frame in 0..600 {
                if frame % 2 == 0 {
                    input.press(Actions::FORWARD | Actions::FIRE);
                }
                input.aim_at(Vec2::new(900.0, 900.0));
                world.step(FRAME, &mut input).expect("step");
            }
            black_box(world.drain_events().len())
        })
    });
}

criterion_group!(benches, bench_idle_step, bench_combat_step);
criterion_main!(benches);
