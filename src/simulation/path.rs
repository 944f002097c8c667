//! Turns a joint route into a lane-offset waypoint polyline
//!
//! Lanes sit on the right-hand side of the direction of travel: the lane
//! offset is the road direction rotated by -90 degrees. Lane `k` is centred
//! `(k + 0.5)` lane widths away from the road's centreline.

use rand::Rng;

use super::error::{SimError, SimResult};
use super::road_graph::RoadGraph;
use super::types::Vector2;

/// Build the waypoints an agent follows along `route`
///
/// `route` runs start to end (reverse the output of
/// [`RoadGraph::get_shortest_path`] first). Every leg picks one of its
/// outgoing lanes uniformly at random and lays a waypoint every
/// `intermediate_distance` units between the two joints. A single-joint
/// route yields an empty path.
pub fn generate_path<R: Rng + ?Sized>(
    graph: &RoadGraph,
    route: &[usize],
    intermediate_distance: f64,
    rng: &mut R,
) -> SimResult<Vec<Vector2>> {
    let mut path = Vec::new();

    for leg in route.windows(2) {
        let (index, next_index) = (leg[0], leg[1]);
        let lanes = graph.lane_count(index, next_index)?;
        if lanes == 0 {
            return Err(SimError::InvalidGraph(format!(
                "route uses joint {} -> {} which has no lanes in that direction",
                index, next_index
            )));
        }

        let start = graph.joint(index)?;
        let end = graph.joint(next_index)?;
        let road = end - start;
        let direction = road.normalize_or_zero();
        let lane_vector = direction.rotate(-90.0) * graph.road_size();
        let lane = rng.random_range(0..lanes);
        let offset = lane_vector * (f64::from(lane) + 0.5);

        path.push(start + offset);

        if intermediate_distance > 0.0 {
            let length = road.length();
            let mut travelled = intermediate_distance;
            while travelled < length {
                path.push(start + direction * travelled + offset);
                travelled += intermediate_distance;
            }
        }

        path.push(end + offset);
    }

    Ok(path)
}

/// Shortest route from `start` to `end` laid out as agent waypoints
pub fn plan_route<R: Rng + ?Sized>(
    graph: &RoadGraph,
    start: usize,
    end: usize,
    intermediate_distance: f64,
    rng: &mut R,
) -> SimResult<Vec<Vector2>> {
    let mut route = graph.get_shortest_path(start, end)?;
    route.reverse();
    generate_path(graph, &route, intermediate_distance, rng)
}
