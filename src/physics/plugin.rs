//! Scheduler wiring for the integrator.
//!
//! Server packets arrive as events. Every fixed tick the plugin applies them,
//! advances the integrator and publishes the resulting position, in that
//! order.
use super::{Integrator, Position, TickOutcome};
use crate::block::loader::{check_block_changes, BlockWatcher};
use crate::block::BlockRegistry;
use crate::math::Vector3;
use crate::settings::Settings;
use crate::world::World;
use bevy::log::{info, warn};
use bevy::prelude::*;

/// Authoritative position from the server (teleport or correction).
#[derive(Event, Debug, Clone, Copy)]
pub struct ClientPositionUpdate {
    pub position: Vector3,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ClientMount;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ClientUnmount;

/// Server-granted movement abilities.
#[derive(Event, Debug, Clone, Copy)]
pub struct ClientAbilities {
    pub walking_speed: f64,
}

/// Position snapshot emitted once per client tick.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PositionPublished(pub Position);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsSet;

/// Runs the player integrator at `session.tick_rate`.
///
/// Reads `Settings` if present (defaults otherwise). A `World` and a
/// `BlockRegistry` are created when the app does not provide them.
pub struct PhysicsPlugin {
    pub spawn: Vector3,
}

impl PhysicsPlugin {
    #[must_use]
    pub fn new(spawn: Vector3) -> Self {
        Self { spawn }
    }
}

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let settings = app.world().get_resource::<Settings>().cloned().unwrap_or_default();
        let tick_rate = if settings.session.tick_rate > 0.0 {
            settings.session.tick_rate
        } else {
            warn!(
                "invalid tick_rate {}, falling back to 20",
                settings.session.tick_rate
            );
            20.0
        };

        if !app.world().contains_resource::<BlockRegistry>() {
            app.insert_resource(BlockRegistry::with_defaults());
        }
        app.init_resource::<World>()
            .insert_resource(Time::<Fixed>::from_hz(tick_rate))
            .insert_resource(Integrator::new(settings.physics.clone(), self.spawn))
            .add_event::<ClientPositionUpdate>()
            .add_event::<ClientMount>()
            .add_event::<ClientUnmount>()
            .add_event::<ClientAbilities>()
            .add_event::<PositionPublished>()
            .add_systems(
                FixedUpdate,
                (apply_server_signals, physics_tick, publish_position)
                    .chain()
                    .in_set(PhysicsSet),
            )
            .add_systems(
                Update,
                check_block_changes.run_if(resource_exists::<BlockWatcher>),
            );

        info!("physics running at {tick_rate} Hz, spawn {}", self.spawn);
    }
}

/// Corrections first, then mount state, then abilities.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_server_signals(
    mut integrator: ResMut<Integrator>,
    mut updates: EventReader<ClientPositionUpdate>,
    mut mounts: EventReader<ClientMount>,
    mut unmounts: EventReader<ClientUnmount>,
    mut abilities: EventReader<ClientAbilities>,
) {
    for update in updates.read() {
        integrator.on_skip_signal(update.position);
    }
    for _ in mounts.read() {
        integrator.on_mount();
    }
    for _ in unmounts.read() {
        integrator.on_unmount();
    }
    if let Some(granted) = abilities.read().last() {
        integrator.on_abilities(granted.walking_speed);
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn physics_tick(
    mut integrator: ResMut<Integrator>,
    world: Res<World>,
    registry: Res<BlockRegistry>,
) {
    if integrator.on_tick(&*world, &*registry) == TickOutcome::Stopped {
        warn!(
            "player stuck at {}, velocity cleared",
            integrator.position().coords
        );
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn publish_position(integrator: Res<Integrator>, mut published: EventWriter<PositionPublished>) {
    published.send(PositionPublished(integrator.on_client_tick()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TickState;

    fn app_with_floor(spawn: Vector3) -> App {
        let mut world = World::new();
        world.fill((-8, 0, -8), (8, 0, 8), 1);
        let mut app = App::new();
        app.insert_resource(world);
        app.add_plugins(PhysicsPlugin::new(spawn));
        app
    }

    fn tick(app: &mut App) {
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn published(app: &App) -> Vec<Position> {
        let events = app.world().resource::<Events<PositionPublished>>();
        let mut reader = events.get_reader();
        reader.read(events).map(|e| e.0).collect()
    }

    #[test]
    fn plugin_inserts_defaults() {
        let app = app_with_floor(Vector3::new(0.5, 1.0, 0.5));
        let registry = app.world().resource::<BlockRegistry>();
        assert_eq!(registry.id_for_name("ice"), Some(3));
        assert_eq!(app.world().resource::<Integrator>().state(), TickState::Running);
    }

    #[test]
    fn each_tick_publishes_one_position() {
        let mut app = app_with_floor(Vector3::new(0.5, 4.0, 0.5));
        for _ in 0..3 {
            tick(&mut app);
        }
        let positions = published(&app);
        assert_eq!(positions.len(), 3);
        assert!(positions[2].coords.y < positions[0].coords.y);
    }

    #[test]
    fn falls_and_lands_through_the_schedule() {
        let mut app = app_with_floor(Vector3::new(0.5, 4.0, 0.5));
        for _ in 0..40 {
            tick(&mut app);
        }
        let integrator = app.world().resource::<Integrator>();
        assert!(integrator.position().on_ground);
        assert!((integrator.position().coords.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn position_update_is_published_unchanged_on_the_skipped_tick() {
        let mut app = app_with_floor(Vector3::new(0.5, 1.0, 0.5));
        tick(&mut app);
        let target = Vector3::new(2.5, 6.0, 2.5);
        app.world_mut().send_event(ClientPositionUpdate { position: target });
        tick(&mut app);
        let last = *published(&app).last().expect("published");
        assert_eq!(last.coords, target);
        assert_eq!(app.world().resource::<Integrator>().state(), TickState::Running);
    }

    #[test]
    fn mount_and_unmount_events_toggle_suspension() {
        let mut app = app_with_floor(Vector3::new(0.5, 4.0, 0.5));
        app.world_mut().send_event(ClientMount);
        tick(&mut app);
        assert_eq!(app.world().resource::<Integrator>().state(), TickState::Suspended);
        tick(&mut app);
        assert_eq!(app.world().resource::<Integrator>().position().coords.y, 4.0);

        app.world_mut().send_event(ClientUnmount);
        tick(&mut app);
        assert_eq!(app.world().resource::<Integrator>().state(), TickState::Running);
    }

    #[test]
    fn abilities_change_walking_speed() {
        let mut app = app_with_floor(Vector3::new(0.5, 1.0, 0.5));
        app.world_mut().send_event(ClientAbilities { walking_speed: 0.2 });
        tick(&mut app);
        let integrator = app.world().resource::<Integrator>();
        assert!((integrator.intent().move_accel() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn tick_rate_comes_from_settings() {
        let mut settings = Settings::defaults();
        settings.session.tick_rate = 10.0;
        let mut app = App::new();
        app.insert_resource(settings);
        app.add_plugins(PhysicsPlugin::new(Vector3::ZERO));
        let step = app.world().resource::<Time<Fixed>>().timestep();
        assert!((step.as_secs_f64() - 0.1).abs() < 1e-9);
    }
}
