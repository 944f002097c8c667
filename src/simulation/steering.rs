//! Path following: waypoint consumption and desired velocity

use std::collections::VecDeque;

use super::types::Vector2;

/// Waypoint queue plus the speed limits used to chase it
#[derive(Debug, Clone, PartialEq)]
pub struct Steering {
    /// Upcoming waypoints; the front is the next one to reach
    pub path: VecDeque<Vector2>,
    /// The last waypoint passed
    pub previous_vertex: Option<Vector2>,
    pub max_speed: f64,
    allowed_speed: f64,
    /// Degrees per second
    pub max_angular_speed: f64,
    pub path_min_distance: f64,
    pub min_next_desired_difference: f64,
}

impl Steering {
    pub fn new(
        max_speed: f64,
        max_angular_speed: f64,
        path_min_distance: f64,
        min_next_desired_difference: f64,
    ) -> Self {
        Self {
            path: VecDeque::new(),
            previous_vertex: None,
            max_speed,
            allowed_speed: max_speed,
            max_angular_speed,
            path_min_distance,
            min_next_desired_difference,
        }
    }

    pub fn allowed_speed(&self) -> f64 {
        self.allowed_speed
    }

    /// Cap the speed (e.g. for a speed zone); never above `max_speed`
    pub fn set_allowed_speed(&mut self, speed: f64) {
        self.allowed_speed = speed.clamp(0.0, self.max_speed);
    }

    pub fn set_path(&mut self, path: impl IntoIterator<Item = Vector2>) {
        self.path = path.into_iter().collect();
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    /// Pop every waypoint already within `path_min_distance` of `position`
    pub fn advance_waypoints(&mut self, position: &Vector2) {
        while let Some(next) = self.path.front() {
            if position.distance(next) > self.path_min_distance {
                break;
            }
            self.previous_vertex = self.path.pop_front();
        }
    }

    /// Velocity the agent would like to have at `position`
    ///
    /// Aims at the next waypoint and keeps extending the aim over following
    /// waypoints while each leg stays almost parallel to the running
    /// direction, so straight runs are not slowed at every waypoint. The
    /// result is capped at the allowed speed; zero when the path is empty.
    pub fn desired_velocity(&self, position: &Vector2) -> Vector2 {
        let Some(first) = self.path.front() else {
            return Vector2::ZERO;
        };

        let mut desired = *first - *position;
        let mut last = *first;
        for waypoint in self.path.iter().skip(1) {
            // Coincident waypoints (a joint shared by two legs) add no direction
            let Ok(leg) = (*waypoint - last).try_normalize() else {
                continue;
            };
            let running = desired.normalize_or_zero();
            if (leg - running).length() > self.min_next_desired_difference {
                break;
            }
            desired = *waypoint - *position;
            last = *waypoint;
        }

        desired.clamp_length(self.allowed_speed)
    }
}
