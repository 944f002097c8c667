//! Tunable constants for the simulation
//!
//! The constants are the defaults; a [`SimSettings`] value carries them into
//! a running [`Simulation`](super::Simulation) so a caller can override any
//! of them without touching global state.

/// Frames per second the interactive front end aims for
pub const FRAMERATE: u32 = 60;

/// Width of a single road lane in world units
pub const ROAD_SIZE: f64 = 48.0;

/// Width of a single sidewalk lane in world units
pub const SIDEWALK_SIZE: f64 = 12.0;

/// Linear friction coefficient (deceleration = mass * mu)
pub const LINEAR_MU: f64 = 1.0;

/// Angular friction coefficient
pub const ANGULAR_MU: f64 = 1.0;

/// A waypoint counts as passed once the agent is this close to it
pub const PATH_MIN_DISTANCE: f64 = 16.0;

/// Spacing of the intermediate waypoints laid along every road segment
pub const PATH_INTERMEDIATE_POINTS_DISTANCE: f64 = 64.0;

/// Largest difference between unit directions that still gets folded into
/// the desired velocity when looking ahead along the path
pub const MIN_NEXT_DESIRED_DIFFERENCE: f64 = 0.1;

/// Random destinations tried per idle agent and tick before giving up
pub const MAX_ROUTE_ATTEMPTS: usize = 3;

/// Runtime copy of the tunable constants
#[derive(Debug, Clone, PartialEq)]
pub struct SimSettings {
    pub road_size: f64,
    pub sidewalk_size: f64,
    pub linear_mu: f64,
    pub angular_mu: f64,
    pub path_min_distance: f64,
    pub path_intermediate_points_distance: f64,
    pub min_next_desired_difference: f64,
    pub max_route_attempts: usize,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            road_size: ROAD_SIZE,
            sidewalk_size: SIDEWALK_SIZE,
            linear_mu: LINEAR_MU,
            angular_mu: ANGULAR_MU,
            path_min_distance: PATH_MIN_DISTANCE,
            path_intermediate_points_distance: PATH_INTERMEDIATE_POINTS_DISTANCE,
            min_next_desired_difference: MIN_NEXT_DESIRED_DIFFERENCE,
            max_route_attempts: MAX_ROUTE_ATTEMPTS,
        }
    }
}
