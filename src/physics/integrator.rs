//! Per-tick movement integration.
//!
//! The `Integrator` owns the player's position, velocity and intent for the
//! whole session. Its callback slots are invoked by the scheduler:
//!
//! * [`Integrator::on_tick`] once per physics tick,
//! * [`Integrator::on_skip_signal`] when the server corrects our position,
//! * [`Integrator::on_mount`] / [`Integrator::on_unmount`] around riding,
//! * [`Integrator::on_client_tick`] to snapshot the position for the network.
//!
//! A running tick performs, in order: jump, acceleration, collision search,
//! movement, gravity, drag, then clears the intent.

use super::collision::{CollisionResolver, Mtv};
use super::intent::MovementIntent;
use super::Position;
use crate::block::BlockRegistry;
use crate::math::Vector3;
use crate::settings::PhysicsSettings;
use crate::world::BlockSource;
use bevy::log::{debug, info};
use bevy::prelude::Resource;

/// Depth below the feet at which the supporting block is sampled.
const SUPPORT_PROBE_DEPTH: f64 = 0.500_000_1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    Running,
    /// The next tick is skipped because the server just placed us.
    SkipNextTick,
    /// Riding another entity; ticks are ignored until unmounted.
    Suspended,
}

/// What a call to [`Integrator::on_tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Moved { mtv: Vector3 },
    /// The collision search found no way out; velocity was zeroed and the
    /// player stayed put.
    Stopped,
    Skipped,
    Suspended,
}

#[derive(Resource, Debug, Clone)]
pub struct Integrator {
    settings: PhysicsSettings,
    position: Position,
    velocity: Vector3,
    intent: MovementIntent,
    state: TickState,
    ticks: u64,
    deadlocks: u64,
}

impl Integrator {
    #[must_use]
    pub fn new(settings: PhysicsSettings, spawn: Vector3) -> Self {
        let intent = MovementIntent::new(settings.walking_speed, settings.sprint_multiplier);
        Self {
            settings,
            position: Position::new(spawn),
            velocity: Vector3::ZERO,
            intent,
            state: TickState::Running,
            ticks: 0,
            deadlocks: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    #[must_use]
    pub fn state(&self) -> TickState {
        self.state
    }

    /// Physics ticks that actually integrated (not skipped or suspended).
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks on which the collision search gave up.
    #[must_use]
    pub fn deadlocks(&self) -> u64 {
        self.deadlocks
    }

    #[must_use]
    pub fn intent(&self) -> &MovementIntent {
        &self.intent
    }

    pub fn intent_mut(&mut self) -> &mut MovementIntent {
        &mut self.intent
    }

    /// Steer toward `point` from the current position; `true` on arrival.
    pub fn move_target(&mut self, point: Vector3) -> bool {
        self.intent.move_target(point, self.position.coords, self.velocity)
    }

    // Callback slots

    /// Advance one physics tick.
    pub fn on_tick<W: BlockSource + ?Sized>(&mut self, world: &W, registry: &BlockRegistry) -> TickOutcome {
        match self.state {
            TickState::Suspended => {
                self.intent.consume();
                return TickOutcome::Suspended;
            }
            TickState::SkipNextTick => {
                self.state = TickState::Running;
                self.intent.consume();
                return TickOutcome::Skipped;
            }
            TickState::Running => {}
        }

        self.apply_jump();
        self.apply_accel(world, registry);
        let mtv = self.get_mtv(world, registry);
        let outcome = match mtv {
            Mtv::Resolved(v) => TickOutcome::Moved { mtv: v },
            Mtv::Deadlock { .. } => {
                self.deadlocks += 1;
                self.velocity = Vector3::ZERO;
                TickOutcome::Stopped
            }
        };
        self.apply_vector(mtv.vector());
        self.apply_gravity();
        self.apply_drag(world, registry);
        self.intent.consume();
        self.ticks += 1;
        outcome
    }

    /// The server placed the player at `position`: trust it, drop local
    /// velocity and skip the next tick.
    /// Ground contact is unknown until the next integrated move, so the
    /// player counts as airborne until then.
    pub fn on_skip_signal(&mut self, position: Vector3) {
        self.position.coords = position;
        self.position.on_ground = false;
        self.velocity = Vector3::ZERO;
        if self.state != TickState::Suspended {
            self.state = TickState::SkipNextTick;
        }
        debug!("server position correction to {position}");
    }

    /// Movement issued while riding is discarded tick by tick.
    pub fn on_mount(&mut self) {
        self.velocity = Vector3::ZERO;
        self.position.on_ground = false;
        self.state = TickState::Suspended;
        info!("mounted, physics suspended");
    }

    pub fn on_unmount(&mut self) {
        if self.state == TickState::Suspended {
            self.state = TickState::Running;
            info!("unmounted, physics resumed");
        }
    }

    /// Snapshot for publication on the client tick.
    #[must_use]
    pub fn on_client_tick(&self) -> Position {
        self.position
    }

    /// Server granted a new walking speed.
    pub fn on_abilities(&mut self, walking_speed: f64) {
        self.intent.set_walking_speed(walking_speed);
    }

    // Tick steps

    /// Slipperiness under the player, or 1.0 while airborne.
    pub fn block_slip<W: BlockSource + ?Sized>(&self, world: &W, registry: &BlockRegistry) -> f64 {
        if !self.position.on_ground {
            return 1.0;
        }
        let probe = self.position.coords - Vector3::new(0.0, SUPPORT_PROBE_DEPTH, 0.0);
        let (x, y, z) = probe.block_coords();
        registry.slipperiness(world.get_block(x, y, z))
    }

    /// Consume a pending jump request.
    pub fn apply_jump(&mut self) {
        if !self.intent.take_jump() || !self.position.on_ground {
            return;
        }
        if self.intent.sprinting() {
            let ground = self.velocity.horizontal();
            if !ground.is_zero() {
                self.velocity += ground.norm() * self.settings.jump_sprint_boost;
            }
        }
        self.velocity.y = self.settings.jump_speed;
    }

    pub fn apply_accel<W: BlockSource + ?Sized>(&mut self, world: &W, registry: &BlockRegistry) {
        let direction = self.intent.direction();
        if direction.is_zero() {
            return;
        }
        let accel = if self.position.on_ground {
            let slip = self.block_slip(world, registry);
            let ratio = self.settings.baseline_slipperiness / slip;
            self.intent.move_accel() * ratio.powi(3) * self.settings.base_drag
        } else {
            self.settings.air_accel
        };
        self.velocity += direction.norm() * accel;
    }

    pub fn get_mtv<W: BlockSource + ?Sized>(&self, world: &W, registry: &BlockRegistry) -> Mtv {
        CollisionResolver::new(
            world,
            registry,
            self.settings.bounding_box,
            &self.settings.collision,
        )
        .find_mtv(self.position.coords, self.velocity)
    }

    /// Move by velocity plus correction; a correction on an axis cancels the
    /// velocity on that axis.
    pub fn apply_vector(&mut self, mtv: Vector3) {
        self.position.coords += self.velocity + mtv;
        for axis in 0..3 {
            if mtv[axis] != 0.0 {
                self.velocity[axis] = 0.0;
            }
        }
        self.position.on_ground = mtv.y > 0.0;
    }

    pub fn apply_gravity(&mut self) {
        self.velocity.y -= self.settings.gravity;
    }

    pub fn apply_drag<W: BlockSource + ?Sized>(&mut self, world: &W, registry: &BlockRegistry) {
        let drag = (self.block_slip(world, registry) * self.settings.drag_multiplier).min(1.0);
        self.velocity.x *= drag;
        self.velocity.z *= drag;
        self.velocity.y *= self.settings.base_drag;
    }
}
