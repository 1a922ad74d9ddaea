//! Movement intent: what the player wants to do on the next tick.
//!
//! Intent never touches position or velocity. The integrator reads it once
//! per tick and then clears the direction and any jump request, so callers
//! re-issue movement every tick the way a held key would.

use crate::math::Vector3;

#[derive(Debug, Clone, PartialEq)]
pub struct MovementIntent {
    direction: Vector3,
    sprinting: bool,
    move_accel: f64,
    walking_speed: f64,
    sprint_multiplier: f64,
    jump_requested: bool,
}

impl MovementIntent {
    #[must_use]
    pub fn new(walking_speed: f64, sprint_multiplier: f64) -> Self {
        Self {
            direction: Vector3::ZERO,
            sprinting: false,
            move_accel: walking_speed,
            walking_speed,
            sprint_multiplier,
            jump_requested: false,
        }
    }

    pub fn walk(&mut self) {
        self.sprinting = false;
        self.move_accel = self.walking_speed;
    }

    pub fn sprint(&mut self) {
        self.sprinting = true;
        self.move_accel = self.walking_speed * self.sprint_multiplier;
    }

    /// Request a jump on the next tick.
    ///
    /// The request only has an effect if the player is on the ground when the
    /// tick consumes it; an airborne request is dropped, not queued.
    pub fn jump(&mut self) {
        self.jump_requested = true;
    }

    /// Steer toward `point` from `origin`.
    ///
    /// Returns `true` once the remaining horizontal distance is no larger than
    /// the current horizontal speed, i.e. this tick's movement would reach or
    /// pass the target. Callers use it to stop re-issuing the command.
    pub fn move_target(&mut self, point: Vector3, origin: Vector3, velocity: Vector3) -> bool {
        self.direction = (point - origin).horizontal();
        self.direction.dist_sq() <= velocity.horizontal().dist_sq()
    }

    /// Steer along `vector`; its vertical component is ignored.
    pub fn move_vector(&mut self, vector: Vector3) {
        self.direction = vector.horizontal();
    }

    /// Steer along a compass angle: 0 faces +z, 90° faces +x.
    pub fn move_angle(&mut self, angle: f64, is_radians: bool) {
        let theta = if is_radians { angle } else { angle.to_radians() };
        self.direction = Vector3::new(theta.sin(), 0.0, theta.cos());
    }

    /// Apply a server-granted walking speed, keeping the current walk/sprint
    /// mode.
    pub fn set_walking_speed(&mut self, walking_speed: f64) {
        self.walking_speed = walking_speed;
        if self.sprinting {
            self.sprint();
        } else {
            self.walk();
        }
    }

    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    #[must_use]
    pub fn sprinting(&self) -> bool {
        self.sprinting
    }

    #[must_use]
    pub fn move_accel(&self) -> f64 {
        self.move_accel
    }

    #[must_use]
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    pub(crate) fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    /// Forget this tick's direction and jump request.
    pub(crate) fn consume(&mut self) {
        self.direction = Vector3::ZERO;
        self.jump_requested = false;
    }
}
