//! Traffic simulation core
//!
//! Road graph pathfinding, lane path generation, steering and collision
//! detection. Nothing here draws, reads input or owns a window.

mod agent;
mod body;
mod error;
mod kinetics;
mod map;
mod matrix;
mod path;
mod road_graph;
mod settings;
mod steering;
mod types;
mod world;

pub use agent::{Agent, AgentBlueprint, Locomotion};
pub use body::{Body, Shape};
pub use error::{SimError, SimResult};
pub use kinetics::Kinetics;
pub use map::{test_map, GraphData, MapDescriptor, Obstacle, TEST_MAP_BLOCK_SIZE};
pub use matrix::SquareMatrix;
pub use path::{generate_path, plan_route};
pub use road_graph::{Road, RoadGraph};
pub use settings::{
    SimSettings, ANGULAR_MU, FRAMERATE, LINEAR_MU, MAX_ROUTE_ATTEMPTS,
    MIN_NEXT_DESIRED_DIFFERENCE, PATH_INTERMEDIATE_POINTS_DISTANCE, PATH_MIN_DISTANCE, ROAD_SIZE,
    SIDEWALK_SIZE,
};
pub use steering::Steering;
pub use types::{segments_intersect, simplify_angle, AgentId, Network, Vector2};
pub use world::{Collision, ObjectRef, SimStats, Simulation, MAX_MAP_SIDE};
