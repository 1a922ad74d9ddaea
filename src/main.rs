use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;
use strider::block::loader as block_loader;
use strider::block::{blocks, BlockRegistry};
use strider::math::Vector3;
use strider::physics::{Integrator, PhysicsPlugin, PhysicsSet, PositionPublished};
use strider::settings::loader as settings_loader;
use strider::world::World;

const SPAWN: Vector3 = Vector3::new(0.5, 4.0, 0.5);
const WAYPOINT: Vector3 = Vector3::new(0.5, 1.0, 40.5);

// Give up if the bot has not arrived after this many ticks
const MAX_TICKS: u64 = 1200;

#[derive(Resource)]
struct Waypoint {
    target: Vector3,
    arrived: bool,
}

/// Stone field with an ice strip and a row of slabs to hop over.
fn build_course(registry: &BlockRegistry) -> World {
    let stone = blocks::lookup::id_for(registry, "stone").unwrap_or(blocks::DEFAULT);
    let ice = blocks::lookup::id_for(registry, "ice").unwrap_or(stone);
    let slab = blocks::lookup::id_for(registry, "stone_slab").unwrap_or(stone);

    let mut world = World::new();
    world.fill((-16, 0, -16), (16, 0, 64), stone);
    world.fill((-3, 0, 10), (3, 0, 20), ice);
    world.fill((-3, 1, 30), (3, 1, 30), slab);
    world
}

/// Sprint toward the waypoint, jumping whenever something blocks the path.
#[allow(clippy::needless_pass_by_value)]
fn drive_bot(
    mut integrator: ResMut<Integrator>,
    mut waypoint: ResMut<Waypoint>,
    world: Res<World>,
    registry: Res<BlockRegistry>,
    mut exit: EventWriter<AppExit>,
) {
    if waypoint.arrived {
        return;
    }
    if integrator.ticks() >= MAX_TICKS {
        error!("bot did not reach {} in {MAX_TICKS} ticks", waypoint.target);
        exit.send(AppExit::error());
        return;
    }

    integrator.intent_mut().sprint();
    if integrator.move_target(waypoint.target) {
        waypoint.arrived = true;
        info!(
            "arrived at {} after {} ticks",
            integrator.position().coords,
            integrator.ticks()
        );
        exit.send(AppExit::Success);
        return;
    }

    let position = integrator.position();
    let ahead = position.coords + integrator.intent().direction().norm() * 0.6;
    let (x, y, z) = ahead.block_coords();
    if position.on_ground && registry.is_solid(world.get_block(x, y, z)) {
        integrator.intent_mut().jump();
    }
}

fn log_positions(mut published: EventReader<PositionPublished>, mut count: Local<u64>) {
    for PositionPublished(position) in published.read() {
        *count += 1;
        if *count % 20 == 0 {
            info!("tick {}: {} on_ground={}", *count, position.coords, position.on_ground);
        } else {
            debug!("tick {}: {}", *count, position.coords);
        }
    }
}

fn main() {
    let settings = settings_loader::load_settings_from_dir("data/settings");
    let blocks_dir = settings.session.blocks_dir.clone();
    let registry = block_loader::load_blocks_from_dir(&blocks_dir);
    let world = build_course(&registry);

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin::default());

    if settings.session.hot_reload_blocks {
        let watcher = block_loader::setup_block_watcher(&blocks_dir).unwrap_or_else(|e| {
            warn!("block watcher unavailable ({e}), hot reload disabled");
            block_loader::BlockWatcher::stub(&blocks_dir)
        });
        app.insert_resource(watcher);
    }

    app.insert_resource(registry);
    app.insert_resource(world);
    app.insert_resource(settings);
    app.insert_resource(Waypoint {
        target: WAYPOINT,
        arrived: false,
    });
    app.add_plugins(PhysicsPlugin::new(SPAWN));

    app.add_systems(FixedUpdate, drive_bot.before(PhysicsSet));
    app.add_systems(Update, log_positions);

    app.run();
}
