//! Velocity state and acceleration limits for dynamic bodies

use super::body::Body;
use super::types::Vector2;

/// Remaining speed below which decay snaps straight to zero
const DECAY_EPSILON: f64 = 1e-9;

/// Linear and angular velocity of a body, with bounded acceleration
#[derive(Debug, Clone, PartialEq)]
pub struct Kinetics {
    pub linear_velocity: Vector2,
    /// Degrees per second
    pub angular_velocity: f64,
    pub mass: f64,
    /// Largest change in linear velocity per second
    pub linear_acceleration: f64,
    /// Largest change in angular velocity per second
    pub angular_acceleration: f64,
    pub linear_mu: f64,
    pub angular_mu: f64,
}

impl Kinetics {
    pub fn new(
        mass: f64,
        linear_acceleration: f64,
        angular_acceleration: f64,
        linear_mu: f64,
        angular_mu: f64,
    ) -> Self {
        Self {
            linear_velocity: Vector2::ZERO,
            angular_velocity: 0.0,
            mass,
            linear_acceleration,
            angular_acceleration,
            linear_mu,
            angular_mu,
        }
    }

    /// Apply an instantaneous push; heavier bodies react less
    pub fn apply_force(&mut self, linear_force: Vector2, angular_force: f64) {
        if self.mass <= 0.0 {
            return;
        }
        self.linear_velocity += Vector2::new(linear_force.x / self.mass, linear_force.y / self.mass);
        self.angular_velocity += angular_force / self.mass;
    }

    /// Move linear velocity toward `target`, at most `linear_acceleration * delta`
    pub fn steer_linear(&mut self, target: Vector2, delta: f64) {
        let correction = target - self.linear_velocity;
        self.linear_velocity += correction.clamp_length(self.linear_acceleration * delta);
    }

    /// Move angular velocity toward `target`, at most `angular_acceleration * delta`
    pub fn steer_angular(&mut self, target: f64, delta: f64) {
        let limit = self.angular_acceleration * delta;
        self.angular_velocity += (target - self.angular_velocity).clamp(-limit, limit);
    }

    /// Friction with constant deceleration `mass * mu`, clamped at zero
    pub fn apply_drag(&mut self, delta: f64) {
        let speed = self.linear_velocity.length();
        let linear_drop = self.mass * self.linear_mu * delta;
        if speed - linear_drop <= DECAY_EPSILON {
            self.linear_velocity = Vector2::ZERO;
        } else {
            self.linear_velocity = self.linear_velocity * ((speed - linear_drop) / speed);
        }

        let spin = self.angular_velocity.abs();
        let angular_drop = self.mass * self.angular_mu * delta;
        if spin - angular_drop <= DECAY_EPSILON {
            self.angular_velocity = 0.0;
        } else {
            self.angular_velocity = self.angular_velocity.signum() * (spin - angular_drop);
        }
    }

    /// Advance `body` by one step of `delta` seconds
    pub fn integrate(&self, body: &mut Body, delta: f64) {
        body.position += self.linear_velocity * delta;
        body.rotation += self.angular_velocity * delta;
    }

    pub fn stop(&mut self) {
        self.linear_velocity = Vector2::ZERO;
        self.angular_velocity = 0.0;
    }

    pub fn is_at_rest(&self) -> bool {
        self.linear_velocity == Vector2::ZERO && self.angular_velocity == 0.0
    }
}
