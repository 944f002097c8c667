//! Road graph for pathfinding
//!
//! Joints (intersections and road ends) connected by directed lane counts.
//! The same structure carries both the road and the sidewalk network.

use ordered_float::OrderedFloat;
use petgraph::algo::{dijkstra, kosaraju_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use super::error::{SimError, SimResult};
use super::matrix::SquareMatrix;
use super::types::Vector2;

/// An undirected road between two joints, with lanes in each direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Road {
    pub start: usize,
    pub end: usize,
    /// Lanes running from `start` to `end`
    pub lanes_forward: u32,
    /// Lanes running from `end` to `start`
    pub lanes_backward: u32,
}

impl Road {
    pub fn total_lanes(&self) -> u32 {
        self.lanes_forward + self.lanes_backward
    }
}

/// Weighted directed multigraph of joints and lane counts
#[derive(Debug, Clone)]
pub struct RoadGraph {
    /// Joint positions, identified by index
    joints: Vec<Vector2>,

    /// `lanes[i][j]` is the number of lanes running from `i` to `j`
    lanes: SquareMatrix<u32>,

    /// Cached Euclidean distances between every pair of joints
    distances: SquareMatrix<f64>,

    /// Width of a single lane in world units
    road_size: f64,
}

impl RoadGraph {
    /// Build a graph from joint positions and a lane-count matrix
    pub fn new(joints: Vec<Vector2>, lanes: &[Vec<u32>], road_size: f64) -> SimResult<Self> {
        let lanes = SquareMatrix::from_rows(lanes)?;
        if lanes.size() != joints.len() {
            return Err(SimError::InvalidGraph(format!(
                "{} joints but a {}x{} lane matrix",
                joints.len(),
                lanes.size(),
                lanes.size()
            )));
        }
        if let Some(index) = (0..joints.len()).find(|&i| lanes.get(i, i) != 0) {
            return Err(SimError::InvalidGraph(format!(
                "joint {} has a lane to itself",
                index
            )));
        }

        let mut graph = Self {
            distances: SquareMatrix::new(joints.len()),
            joints,
            lanes,
            road_size,
        };
        graph.recompute_distances();
        Ok(graph)
    }

    /// A graph with no joints
    pub fn empty(road_size: f64) -> Self {
        Self {
            joints: Vec::new(),
            lanes: SquareMatrix::new(0),
            distances: SquareMatrix::new(0),
            road_size,
        }
    }

    pub fn n_joints(&self) -> usize {
        self.joints.len()
    }

    pub fn road_size(&self) -> f64 {
        self.road_size
    }

    pub fn joints(&self) -> &[Vector2] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> SimResult<Vector2> {
        self.check_index(index)?;
        Ok(self.joints[index])
    }

    pub fn lane_count(&self, from: usize, to: usize) -> SimResult<u32> {
        self.check_index(from)?;
        self.check_index(to)?;
        Ok(self.lanes.get(from, to))
    }

    pub fn distance(&self, from: usize, to: usize) -> SimResult<f64> {
        self.check_index(from)?;
        self.check_index(to)?;
        Ok(self.distances.get(from, to))
    }

    /// Lane matrix as nested rows (renderer / editor export)
    pub fn lane_rows(&self) -> Vec<Vec<u32>> {
        self.lanes.to_rows()
    }

    /// Joints reachable from `index` through an outgoing lane
    ///
    /// A one-way road `j -> index` is not a neighbour of `index`.
    pub fn get_neighbors_of(&self, index: usize) -> SimResult<Vec<usize>> {
        self.check_index(index)?;
        Ok(self.outgoing(index).collect())
    }

    fn outgoing(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.lanes
            .row(index)
            .iter()
            .enumerate()
            .filter(|(_, lanes)| **lanes != 0)
            .map(|(neighbor, _)| neighbor)
    }

    /// Dijkstra shortest path over joint distances
    ///
    /// The result runs backwards, from `end` to `start`. Among joints with
    /// equal tentative distance the lowest index is settled first, so equal
    /// length routes resolve deterministically.
    pub fn get_shortest_path(&self, start: usize, end: usize) -> SimResult<Vec<usize>> {
        self.check_index(start)?;
        self.check_index(end)?;

        let n = self.n_joints();
        let mut tentative = vec![f64::INFINITY; n];
        let mut previous: Vec<Option<usize>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut queue = BinaryHeap::new();

        tentative[start] = 0.0;
        queue.push(Reverse((OrderedFloat(0.0), start)));

        while let Some(Reverse((OrderedFloat(distance), joint))) = queue.pop() {
            if visited[joint] || distance > tentative[joint] {
                continue;
            }
            visited[joint] = true;
            if joint == end {
                break;
            }

            for neighbor in self.outgoing(joint) {
                if visited[neighbor] {
                    continue;
                }
                let candidate = distance + self.distances.get(joint, neighbor);
                if candidate < tentative[neighbor] {
                    tentative[neighbor] = candidate;
                    previous[neighbor] = Some(joint);
                    queue.push(Reverse((OrderedFloat(candidate), neighbor)));
                }
            }
        }

        if !visited[end] {
            return Err(SimError::PathNotFound { start, end });
        }

        let mut path = vec![end];
        let mut current = end;
        while current != start {
            current = previous[current].ok_or(SimError::PathNotFound { start, end })?;
            path.push(current);
        }
        Ok(path)
    }

    /// Summed joint distances along a route
    pub fn path_length(&self, route: &[usize]) -> SimResult<f64> {
        route
            .windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }

    /// Joint nearest to `position`; the first one wins on ties
    pub fn get_closest_joint_to(&self, position: &Vector2) -> Option<usize> {
        let mut closest: Option<(usize, f64)> = None;
        for (index, joint) in self.joints.iter().enumerate() {
            let distance = position.distance(joint);
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((index, distance));
            }
        }
        closest.map(|(index, _)| index)
    }

    /// First joint whose radius contains `position` (editor hit-test)
    pub fn get_joint_at(&self, position: &Vector2) -> Option<usize> {
        self.joints.iter().enumerate().find_map(|(index, joint)| {
            let radius = self.road_size * f64::from(self.busiest_lane_count(index));
            (position.distance(joint) <= radius).then_some(index)
        })
    }

    /// Radius proportional to the busiest outgoing lane count at the joint
    pub fn get_joint_radius(&self, index: usize) -> SimResult<f64> {
        self.check_index(index)?;
        Ok(self.road_size * f64::from(self.busiest_lane_count(index)))
    }

    fn busiest_lane_count(&self, index: usize) -> u32 {
        self.lanes.row(index).iter().copied().max().unwrap_or(0)
    }

    /// Append a joint connected to `connected_index`
    ///
    /// `conn_to` lanes run from the new joint to `connected_index`,
    /// `conn_from` lanes run back. Returns the new joint's index.
    pub fn add_joint(
        &mut self,
        position: Vector2,
        connected_index: usize,
        conn_to: u32,
        conn_from: u32,
    ) -> SimResult<usize> {
        self.check_index(connected_index)?;

        let index = self.joints.len();
        self.joints.push(position);
        self.lanes.resize(index + 1);
        self.lanes.set(index, connected_index, conn_to);
        self.lanes.set(connected_index, index, conn_from);
        self.recompute_distances();
        Ok(index)
    }

    /// Move a joint; distances are refreshed immediately
    pub fn set_joint_position(&mut self, index: usize, position: Vector2) -> SimResult<()> {
        self.check_index(index)?;
        self.joints[index] = position;
        self.recompute_distances();
        Ok(())
    }

    /// Set the number of lanes running from `from` to `to` (0 removes them)
    pub fn set_lane_count(&mut self, from: usize, to: usize, lanes: u32) -> SimResult<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Err(SimError::InvalidGraph(format!(
                "joint {} cannot have a lane to itself",
                from
            )));
        }
        self.lanes.set(from, to, lanes);
        Ok(())
    }

    /// Undirected roads, each reported once with `start < end`
    pub fn roads(&self) -> impl Iterator<Item = Road> + '_ {
        let n = self.n_joints();
        (0..n).flat_map(move |start| {
            (start + 1..n).filter_map(move |end| {
                let road = Road {
                    start,
                    end,
                    lanes_forward: self.lanes.get(start, end),
                    lanes_backward: self.lanes.get(end, start),
                };
                (road.total_lanes() > 0).then_some(road)
            })
        })
    }

    /// Directed petgraph view; node `i` is joint `i`, edges weighted by length
    pub fn to_digraph(&self) -> DiGraph<usize, f64> {
        let mut graph = DiGraph::with_capacity(self.n_joints(), 0);
        for index in 0..self.n_joints() {
            graph.add_node(index);
        }
        for from in 0..self.n_joints() {
            for to in self.outgoing(from) {
                graph.add_edge(
                    NodeIndex::new(from),
                    NodeIndex::new(to),
                    self.distances.get(from, to),
                );
            }
        }
        graph
    }

    /// Shortest route length from `start` to every reachable joint
    pub fn route_lengths_from(&self, start: usize) -> SimResult<BTreeMap<usize, f64>> {
        self.check_index(start)?;
        let graph = self.to_digraph();
        let lengths = dijkstra(&graph, NodeIndex::new(start), None, |edge| *edge.weight());
        Ok(lengths
            .into_iter()
            .map(|(node, length)| (node.index(), length))
            .collect())
    }

    /// Whether every joint can reach every other joint
    pub fn is_strongly_connected(&self) -> bool {
        kosaraju_scc(&self.to_digraph()).len() <= 1
    }

    fn recompute_distances(&mut self) {
        let n = self.joints.len();
        if self.distances.size() != n {
            self.distances.resize(n);
        }
        for i in 0..n {
            for j in 0..n {
                let distance = self.joints[i].distance(&self.joints[j]);
                self.distances.set(i, j, distance);
            }
        }
    }

    fn check_index(&self, index: usize) -> SimResult<()> {
        if index < self.joints.len() {
            Ok(())
        } else {
            Err(SimError::InvalidGraph(format!(
                "joint {} out of range ({} joints)",
                index,
                self.joints.len()
            )))
        }
    }
}
