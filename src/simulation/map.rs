//! Map data handed to a simulation at construction
//!
//! Plain structured data: joint positions, lane matrices, building
//! placements and agent blueprints.

use super::agent::AgentBlueprint;
use super::body::Body;
use super::types::Vector2;

/// Joint positions plus the directed lane-count matrix between them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphData {
    pub joints: Vec<Vector2>,
    pub lanes: Vec<Vec<u32>>,
}

impl GraphData {
    /// A `columns`×`rows` grid of joints placed by `position_of(column, row)`
    ///
    /// Joint `(column, row)` has index `row * columns + column`. Neighbouring
    /// joints get `lanes_for(from, to)` lanes in each direction.
    pub fn grid(
        columns: usize,
        rows: usize,
        position_of: impl Fn(usize, usize) -> Vector2,
        lanes_for: impl Fn(usize, usize) -> u32,
    ) -> Self {
        let n = columns * rows;
        let joints = (0..n)
            .map(|index| position_of(index % columns, index / columns))
            .collect();

        let mut lanes = vec![vec![0; n]; n];
        for index in 0..n {
            let (column, row) = (index % columns, index / columns);
            let mut neighbors = Vec::new();
            if column + 1 < columns {
                neighbors.push(index + 1);
            }
            if row + 1 < rows {
                neighbors.push(index + columns);
            }
            for neighbor in neighbors {
                lanes[index][neighbor] = lanes_for(index, neighbor);
                lanes[neighbor][index] = lanes_for(neighbor, index);
            }
        }

        Self { joints, lanes }
    }
}

/// A static building; collides like a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub body: Body,
    /// Number of floors, for renderers
    pub height: u32,
}

impl Obstacle {
    pub fn building(position: Vector2, half_extents: Vector2, rotation: f64, height: u32) -> Self {
        Self {
            body: Body::rectangle(position, half_extents, rotation),
            height,
        }
    }
}

/// Everything needed to set up a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    pub roads: GraphData,
    pub sidewalks: GraphData,
    pub buildings: Vec<Obstacle>,
    pub vehicle_blueprints: Vec<AgentBlueprint>,
    pub pedestrian_blueprints: Vec<AgentBlueprint>,
}

/// Distance between neighbouring road joints in [`test_map`]
pub const TEST_MAP_BLOCK_SIZE: f64 = 512.0;

/// Inset of the sidewalk grid from the road centrelines in [`test_map`]
const TEST_MAP_SIDEWALK_INSET: f64 = 140.0;

/// A 3×3 road grid with four buildings and a sidewalk grid between them
///
/// The middle east-west avenue (joints 3, 4, 5) carries two lanes each way,
/// every other road one.
pub fn test_map() -> MapDescriptor {
    let roads = GraphData::grid(
        3,
        3,
        |column, row| {
            Vector2::new(
                column as f64 * TEST_MAP_BLOCK_SIZE,
                row as f64 * TEST_MAP_BLOCK_SIZE,
            )
        },
        |from, to| if (3..6).contains(&from) && (3..6).contains(&to) { 2 } else { 1 },
    );

    // Two sidewalk lines per block in each axis, crossing the roads between
    let near = TEST_MAP_SIDEWALK_INSET;
    let far = TEST_MAP_BLOCK_SIZE - TEST_MAP_SIDEWALK_INSET;
    let offsets = [near, far, TEST_MAP_BLOCK_SIZE + near, TEST_MAP_BLOCK_SIZE + far];
    let sidewalks = GraphData::grid(
        4,
        4,
        |column, row| Vector2::new(offsets[column], offsets[row]),
        |_, _| 1,
    );

    let center = TEST_MAP_BLOCK_SIZE / 2.0;
    let buildings = vec![
        Obstacle::building(Vector2::new(center, center), Vector2::new(80.0, 80.0), 0.0, 7),
        Obstacle::building(
            Vector2::new(TEST_MAP_BLOCK_SIZE + center, center),
            Vector2::new(80.0, 60.0),
            90.0,
            3,
        ),
        Obstacle::building(
            Vector2::new(center, TEST_MAP_BLOCK_SIZE + center),
            Vector2::new(80.0, 80.0),
            0.0,
            5,
        ),
        Obstacle::building(
            Vector2::new(TEST_MAP_BLOCK_SIZE + center, TEST_MAP_BLOCK_SIZE + center),
            Vector2::new(60.0, 60.0),
            0.0,
            4,
        ),
    ];

    MapDescriptor {
        roads,
        sidewalks,
        buildings,
        vehicle_blueprints: vec![AgentBlueprint::car(), AgentBlueprint::truck()],
        pedestrian_blueprints: vec![AgentBlueprint::pedestrian()],
    }
}
