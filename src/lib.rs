//! City traffic sandbox
//!
//! Vehicles and pedestrians routing over a weighted road graph, steered by
//! a bounded-acceleration kinematics model.

pub mod simulation;
