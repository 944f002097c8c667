//! Agents: a body, its kinetics and a steering behaviour composed together

use log::debug;

use super::body::{Body, Shape};
use super::kinetics::Kinetics;
use super::settings::SimSettings;
use super::steering::Steering;
use super::types::{simplify_angle, AgentId, Network, Vector2};

/// How an agent turns desired velocity into motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locomotion {
    /// Accelerates only along its heading, like a car
    Drive,
    /// Follows the desired velocity directly, like a pedestrian
    Walk,
}

/// Parameters to instantiate agents of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct AgentBlueprint {
    pub name: String,
    pub shape: Shape,
    pub mass: f64,
    pub linear_acceleration: f64,
    /// Degrees per second squared
    pub angular_acceleration: f64,
    pub max_speed: f64,
    /// Degrees per second
    pub max_angular_speed: f64,
}

impl AgentBlueprint {
    /// A compact car, 20 wide and 40 long
    pub fn car() -> Self {
        Self {
            name: "car".to_string(),
            shape: Shape::Rectangle {
                half_extents: Vector2::new(10.0, 20.0),
            },
            mass: 1.0,
            linear_acceleration: 60.0,
            angular_acceleration: 360.0,
            max_speed: 120.0,
            max_angular_speed: 180.0,
        }
    }

    /// A slower, heavier truck
    pub fn truck() -> Self {
        Self {
            name: "truck".to_string(),
            shape: Shape::Rectangle {
                half_extents: Vector2::new(12.0, 32.0),
            },
            mass: 3.0,
            linear_acceleration: 30.0,
            angular_acceleration: 180.0,
            max_speed: 80.0,
            max_angular_speed: 120.0,
        }
    }

    pub fn pedestrian() -> Self {
        Self {
            name: "pedestrian".to_string(),
            shape: Shape::Circle { radius: 5.0 },
            mass: 1.0,
            linear_acceleration: 40.0,
            angular_acceleration: 720.0,
            max_speed: 20.0,
            max_angular_speed: 360.0,
        }
    }

    pub fn instantiate(
        &self,
        id: AgentId,
        position: Vector2,
        network: Network,
        settings: &SimSettings,
    ) -> Agent {
        Agent {
            id,
            blueprint: self.name.clone(),
            network,
            body: Body::new(self.shape, position, 0.0),
            kinetics: Kinetics::new(
                self.mass,
                self.linear_acceleration,
                self.angular_acceleration,
                settings.linear_mu,
                settings.angular_mu,
            ),
            steering: Steering::new(
                self.max_speed,
                self.max_angular_speed,
                settings.path_min_distance,
                settings.min_next_desired_difference,
            ),
            active: true,
        }
    }
}

/// A vehicle or pedestrian moving through the city
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    /// Name of the blueprint this agent was built from
    pub blueprint: String,
    pub network: Network,
    pub body: Body,
    pub kinetics: Kinetics,
    pub steering: Steering,
    /// False once crashed; crashed agents never move again
    pub active: bool,
}

impl Agent {
    pub fn position(&self) -> Vector2 {
        self.body.position
    }

    pub fn rotation(&self) -> f64 {
        self.body.rotation
    }

    pub fn locomotion(&self) -> Locomotion {
        match self.body.shape {
            Shape::Rectangle { .. } => Locomotion::Drive,
            Shape::Circle { .. } => Locomotion::Walk,
        }
    }

    /// Advance by `delta` seconds
    pub fn update(&mut self, delta: f64) {
        if !self.active {
            return;
        }

        self.steering.advance_waypoints(&self.body.position);
        let coasting = self.steering.is_idle();
        if coasting {
            self.kinetics.apply_drag(delta);
        } else {
            self.steer(delta);
        }

        let turned = self.kinetics.angular_velocity * delta;
        self.kinetics.integrate(&mut self.body, delta);
        if coasting && self.locomotion() == Locomotion::Drive {
            // Wheels carry the velocity round with the heading
            self.kinetics.linear_velocity = self.kinetics.linear_velocity.rotate(turned);
        }
    }

    fn steer(&mut self, delta: f64) {
        let desired = self.steering.desired_velocity(&self.body.position);

        let max_spin = self.steering.max_angular_speed;
        let target_spin = desired
            .heading()
            .map(|heading| {
                self.spin_toward(simplify_angle(heading - self.body.rotation))
                    .clamp(-max_spin, max_spin)
            })
            .unwrap_or(0.0);
        self.kinetics.steer_angular(target_spin, delta);

        let target_velocity = match self.locomotion() {
            Locomotion::Drive => {
                let forward = Vector2::forward(self.body.rotation);
                forward * desired.dot(&forward)
            }
            Locomotion::Walk => desired,
        };
        self.kinetics.steer_linear(target_velocity, delta);
    }

    /// Fastest spin that can still brake to rest after turning `error` degrees
    fn spin_toward(&self, error: f64) -> f64 {
        error.signum() * (2.0 * self.kinetics.angular_acceleration * error.abs()).sqrt()
    }

    /// Stop for good; crashing twice changes nothing
    pub fn crash(&mut self) {
        if !self.active {
            return;
        }
        debug!(
            "Agent {:?} crashed at ({:.1}, {:.1})",
            self.id, self.body.position.x, self.body.position.y
        );
        self.active = false;
        self.kinetics.stop();
    }
}
