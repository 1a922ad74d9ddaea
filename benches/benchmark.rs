use criterion::{black_box, criterion_group, criterion_main, Criterion};

use strider::block::BlockRegistry;
use strider::math::{BoundingBox, Vector3};
use strider::physics::{CollisionResolver, Integrator};
use strider::settings::{CollisionSettings, PhysicsSettings};
use strider::world::World;

/// Floor with a wall and a slab row, enough to hit multi-axis contact.
fn course(registry: &BlockRegistry) -> World {
    let slab = registry.id_for_name("stone_slab").unwrap_or(1);
    let mut world = World::new();
    world.fill((-32, 0, -32), (32, 0, 32), 1);
    world.fill((4, 1, -32), (4, 3, 32), 1);
    world.fill((-32, 1, 6), (32, 1, 6), slab);
    world
}

/// A single clear move, the common case.
fn bench_find_mtv_clear(c: &mut Criterion) {
    let registry = BlockRegistry::with_defaults();
    let world = course(&registry);
    let settings = CollisionSettings::default();
    let resolver = CollisionResolver::new(&world, &registry, BoundingBox::default(), &settings);
    c.bench_function("find_mtv_clear", |b| {
        b.iter(|| {
            black_box(resolver.find_mtv(
                black_box(Vector3::new(0.5, 3.0, 0.5)),
                black_box(Vector3::new(0.1, -0.2, 0.1)),
            ))
        })
    });
}

/// Landing into a floor/wall corner needs a two-hop correction.
fn bench_find_mtv_corner(c: &mut Criterion) {
    let registry = BlockRegistry::with_defaults();
    let world = course(&registry);
    let settings = CollisionSettings::default();
    let resolver = CollisionResolver::new(&world, &registry, BoundingBox::default(), &settings);
    c.bench_function("find_mtv_corner", |b| {
        b.iter(|| {
            black_box(resolver.find_mtv(
                black_box(Vector3::new(3.6, 1.05, 0.5)),
                black_box(Vector3::new(0.15, -0.2, 0.0)),
            ))
        })
    });
}

/// Buried in solid blocks: the search runs to exhaustion and deadlocks.
fn bench_find_mtv_deadlock(c: &mut Criterion) {
    let registry = BlockRegistry::with_defaults();
    let mut world = World::new();
    world.fill((-2, 0, -2), (2, 4, 2), 1);
    let settings = CollisionSettings::default();
    let resolver = CollisionResolver::new(&world, &registry, BoundingBox::default(), &settings);
    c.bench_function("find_mtv_deadlock", |b| {
        b.iter(|| {
            black_box(resolver.find_mtv(
                black_box(Vector3::new(0.5, 1.5, 0.5)),
                black_box(Vector3::new(0.3, 0.3, 0.0)),
            ))
        })
    });
}

/// Simulate many ticks of a player wandering the course (deterministic LCG
/// steering with occasional jumps).
fn bench_integrator_ticks(c: &mut Criterion) {
    let registry = BlockRegistry::with_defaults();
    let world = course(&registry);
    c.bench_function("integrator_1000_ticks", |b| {
        b.iter(|| {
            let mut player = Integrator::new(PhysicsSettings::default(), Vector3::new(0.5, 1.0, 0.5));
            let mut state: u32 = 0x9e37_79b9;
            for _ in 0..1_000 {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let intent = player.intent_mut();
                intent.sprint();
                intent.move_angle(f64::from(state >> 20), false);
                if state & 0xf == 0 {
                    intent.jump();
                }
                black_box(player.on_tick(&world, &registry));
            }
            black_box(player.position());
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_find_mtv_clear,
        bench_find_mtv_corner,
        bench_find_mtv_deadlock,
        bench_integrator_ticks
}
criterion_main!(benches);
