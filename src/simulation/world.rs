//! Main simulation context that ties everything together
//!
//! A [`Simulation`] owns the road and sidewalk graphs, every agent and
//! obstacle, the random source and the clock. One `update` call assigns
//! routes to idle agents, moves everyone and runs the collision pass.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;

use super::agent::{Agent, AgentBlueprint};
use super::error::{SimError, SimResult};
use super::map::{test_map, MapDescriptor, Obstacle};
use super::path::plan_route;
use super::road_graph::RoadGraph;
use super::settings::SimSettings;
use super::types::{AgentId, Network, Vector2};

/// Largest number of cells along either side of [`Simulation::draw_map`]
pub const MAX_MAP_SIDE: usize = 256;

/// Running counters for a simulation session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub agents_spawned: usize,
    pub routes_assigned: usize,
    /// Route attempts that hit an unreachable destination
    pub routes_unreachable: usize,
    pub crashes: usize,
}

/// One side of a detected collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef {
    Agent(AgentId),
    /// Index into [`Simulation::obstacles`]
    Obstacle(usize),
}

/// A touching pair, reported once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub first: ObjectRef,
    pub second: ObjectRef,
}

/// The simulation session
pub struct Simulation {
    pub settings: SimSettings,

    /// Graph vehicles drive on
    roads: RoadGraph,

    /// Graph pedestrians walk on
    sidewalks: RoadGraph,

    /// All agents, in spawn order
    agents: Vec<Agent>,

    /// Static buildings
    obstacles: Vec<Obstacle>,

    vehicle_blueprints: Vec<AgentBlueprint>,
    pedestrian_blueprints: Vec<AgentBlueprint>,

    /// Next ID to assign
    next_id: usize,

    /// Simulation time in seconds
    pub time: f64,

    rng: StdRng,

    stats: SimStats,
}

impl Simulation {
    fn new_internal(map: &MapDescriptor, settings: SimSettings, rng: StdRng) -> Result<Self> {
        let roads = RoadGraph::new(map.roads.joints.clone(), &map.roads.lanes, settings.road_size)
            .context("Invalid road graph in map")?;
        let sidewalks = RoadGraph::new(
            map.sidewalks.joints.clone(),
            &map.sidewalks.lanes,
            settings.sidewalk_size,
        )
        .context("Invalid sidewalk graph in map")?;

        if !roads.is_strongly_connected() {
            warn!("Road graph is not strongly connected; some destinations are unreachable");
        }
        if !sidewalks.is_strongly_connected() {
            warn!("Sidewalk graph is not strongly connected; some destinations are unreachable");
        }

        Ok(Self {
            settings,
            roads,
            sidewalks,
            agents: Vec::new(),
            obstacles: map.buildings.clone(),
            vehicle_blueprints: map.vehicle_blueprints.clone(),
            pedestrian_blueprints: map.pedestrian_blueprints.clone(),
            next_id: 0,
            time: 0.0,
            rng,
            stats: SimStats::default(),
        })
    }

    pub fn new(map: &MapDescriptor) -> Result<Self> {
        Self::with_settings(map, SimSettings::default(), None)
    }

    /// Create a simulation with a seeded RNG for reproducible runs
    pub fn new_with_seed(map: &MapDescriptor, seed: u64) -> Result<Self> {
        Self::with_settings(map, SimSettings::default(), Some(seed))
    }

    pub fn with_settings(map: &MapDescriptor, settings: SimSettings, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::new_internal(map, settings, rng)
    }

    /// Simulation over the built-in 3×3 city
    pub fn create_test_world() -> Result<Self> {
        Self::new(&test_map())
    }

    pub fn create_test_world_with_seed(seed: u64) -> Result<Self> {
        Self::new_with_seed(&test_map(), seed)
    }

    pub fn roads(&self) -> &RoadGraph {
        &self.roads
    }

    pub fn sidewalks(&self) -> &RoadGraph {
        &self.sidewalks
    }

    pub fn graph(&self, network: Network) -> &RoadGraph {
        match network {
            Network::Roads => &self.roads,
            Network::Sidewalks => &self.sidewalks,
        }
    }

    fn graph_mut(&mut self, network: Network) -> &mut RoadGraph {
        match network {
            Network::Roads => &mut self.roads,
            Network::Sidewalks => &mut self.sidewalks,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn active_agent_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.active).count()
    }

    // Editor entry points: the only way to change a graph once built.

    /// Append a joint to `network`, linked to `connected_index`
    pub fn add_joint(
        &mut self,
        network: Network,
        position: Vector2,
        connected_index: usize,
        conn_to: u32,
        conn_from: u32,
    ) -> SimResult<usize> {
        let index = self
            .graph_mut(network)
            .add_joint(position, connected_index, conn_to, conn_from)?;
        debug!("Added joint {} to {:?} at ({:.1}, {:.1})", index, network, position.x, position.y);
        Ok(index)
    }

    pub fn set_joint_position(
        &mut self,
        network: Network,
        index: usize,
        position: Vector2,
    ) -> SimResult<()> {
        self.graph_mut(network).set_joint_position(index, position)
    }

    pub fn set_lane_count(
        &mut self,
        network: Network,
        from: usize,
        to: usize,
        lanes: u32,
    ) -> SimResult<()> {
        self.graph_mut(network).set_lane_count(from, to, lanes)
    }

    fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place an agent built from `blueprint` at `position`
    pub fn spawn_agent(
        &mut self,
        blueprint: &AgentBlueprint,
        position: Vector2,
        network: Network,
    ) -> AgentId {
        let id = self.next_agent_id();
        let agent = blueprint.instantiate(id, position, network, &self.settings);
        self.agents.push(agent);
        self.stats.agents_spawned += 1;
        id
    }

    /// Spawn a random vehicle at each road joint with probability `density`
    ///
    /// Returns the number of vehicles spawned.
    pub fn spawn_agents(&mut self, density: f64) -> usize {
        self.spawn_on(Network::Roads, density)
    }

    /// Spawn a random pedestrian at each sidewalk joint with probability `density`
    pub fn spawn_pedestrians(&mut self, density: f64) -> usize {
        self.spawn_on(Network::Sidewalks, density)
    }

    fn spawn_on(&mut self, network: Network, density: f64) -> usize {
        let blueprints = match network {
            Network::Roads => self.vehicle_blueprints.clone(),
            Network::Sidewalks => self.pedestrian_blueprints.clone(),
        };
        if blueprints.is_empty() {
            warn!("No blueprints for {:?}; nothing spawned", network);
            return 0;
        }

        let probability = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let joints = self.graph(network).joints().to_vec();
        let mut spawned = 0;
        for joint in joints {
            if !self.rng.random_bool(probability) {
                continue;
            }
            let Some(blueprint) = blueprints.choose(&mut self.rng) else {
                continue;
            };
            self.spawn_agent(blueprint, joint, network);
            spawned += 1;
        }

        info!("Spawned {} agents on {:?}", spawned, network);
        spawned
    }

    /// Advance the whole simulation by `delta` seconds
    pub fn update(&mut self, delta: f64) {
        self.time += delta;

        self.assign_routes();

        for agent in &mut self.agents {
            agent.update(delta);
        }

        for collision in self.collisions() {
            self.crash(collision.first);
            self.crash(collision.second);
        }
    }

    /// Give every active agent without a path a route to a random joint
    fn assign_routes(&mut self) {
        let intermediate = self.settings.path_intermediate_points_distance;
        let attempts = self.settings.max_route_attempts;

        for agent in self.agents.iter_mut() {
            if !agent.active || !agent.steering.is_idle() {
                continue;
            }

            let graph = match agent.network {
                Network::Roads => &self.roads,
                Network::Sidewalks => &self.sidewalks,
            };
            let Some(start) = graph.get_closest_joint_to(&agent.body.position) else {
                continue;
            };

            for _ in 0..attempts {
                let destination = self.rng.random_range(0..graph.n_joints());
                match plan_route(graph, start, destination, intermediate, &mut self.rng) {
                    Ok(path) if path.is_empty() => continue,
                    Ok(path) => {
                        debug!(
                            "Agent {:?} routed from joint {} to joint {} ({} waypoints)",
                            agent.id,
                            start,
                            destination,
                            path.len()
                        );
                        agent.steering.set_path(path);
                        self.stats.routes_assigned += 1;
                        break;
                    }
                    Err(SimError::PathNotFound { .. }) => {
                        self.stats.routes_unreachable += 1;
                    }
                    Err(err) => {
                        warn!("Could not route agent {:?}: {}", agent.id, err);
                        break;
                    }
                }
            }
        }
    }

    /// Every touching pair among agents and obstacles, each reported once
    ///
    /// Obstacles never move, so obstacle pairs are not checked.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut collisions = Vec::new();
        for (i, agent) in self.agents.iter().enumerate() {
            for other in &self.agents[i + 1..] {
                if agent.body.collides_with(&other.body) {
                    collisions.push(Collision {
                        first: ObjectRef::Agent(agent.id),
                        second: ObjectRef::Agent(other.id),
                    });
                }
            }
            for (index, obstacle) in self.obstacles.iter().enumerate() {
                if agent.body.collides_with(&obstacle.body) {
                    collisions.push(Collision {
                        first: ObjectRef::Agent(agent.id),
                        second: ObjectRef::Obstacle(index),
                    });
                }
            }
        }
        collisions
    }

    /// Crash the referenced object if it can crash
    fn crash(&mut self, object: ObjectRef) {
        let ObjectRef::Agent(id) = object else {
            return;
        };
        if let Some(agent) = self.agent_mut(id) {
            if agent.active {
                agent.crash();
                self.stats.crashes += 1;
            }
        }
    }

    /// Multi-line report of the current state
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Traffic Simulation Summary ===");
        let _ = writeln!(out, "Time: {:.2}s", self.time);
        let _ = writeln!(
            out,
            "Road joints: {}, Roads: {}",
            self.roads.n_joints(),
            self.roads.roads().count()
        );
        let _ = writeln!(
            out,
            "Sidewalk joints: {}, Sidewalks: {}",
            self.sidewalks.n_joints(),
            self.sidewalks.roads().count()
        );
        let _ = writeln!(out, "Buildings: {}", self.obstacles.len());
        let _ = writeln!(
            out,
            "Agents: {} ({} active, {} crashed)",
            self.agents.len(),
            self.active_agent_count(),
            self.agents.len() - self.active_agent_count()
        );
        let _ = writeln!(
            out,
            "Routes assigned: {}, unreachable attempts: {}",
            self.stats.routes_assigned, self.stats.routes_unreachable
        );

        if !self.agents.is_empty() {
            let _ = writeln!(out, "--- Agents ---");
            for agent in &self.agents {
                let _ = writeln!(
                    out,
                    "  {} {:?}: position=({:.1}, {:.1}), rotation={:.1}, speed={:.1}, path_remaining={}{}",
                    agent.blueprint,
                    agent.id.0,
                    agent.body.position.x,
                    agent.body.position.y,
                    agent.body.rotation,
                    agent.kinetics.linear_velocity.length(),
                    agent.steering.path.len(),
                    if agent.active { "" } else { " [crashed]" }
                );
            }
        }
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.summary());
    }

    /// Draw a coarse text map: `+` joints, `.` roads, `:` sidewalks,
    /// `#` buildings, `c`/`p` vehicles/pedestrians, `x` crashed agents
    ///
    /// `cell_size` is raised as needed to keep each side within
    /// [`MAX_MAP_SIDE`] cells.
    pub fn draw_map(&self, cell_size: f64) -> String {
        let all_points = self
            .roads
            .joints()
            .iter()
            .chain(self.sidewalks.joints())
            .chain(self.agents.iter().map(|agent| &agent.body.position));

        let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for point in all_points {
            min = Vector2::new(min.x.min(point.x), min.y.min(point.y));
            max = Vector2::new(max.x.max(point.x), max.y.max(point.y));
        }
        let bounded = [min.x, min.y, max.x, max.y].iter().all(|value| value.is_finite());
        if !bounded || cell_size.is_nan() || cell_size <= 0.0 {
            return String::new();
        }

        // Coarsen rather than allocate an oversized grid
        let span = max - min;
        let cell_size = cell_size
            .max(span.x / MAX_MAP_SIDE as f64)
            .max(span.y / MAX_MAP_SIDE as f64);

        let width = ((span.x / cell_size) as usize + 1).min(MAX_MAP_SIDE + 1);
        let height = ((span.y / cell_size) as usize + 1).min(MAX_MAP_SIDE + 1);
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |point: &Vector2| -> Option<(usize, usize)> {
            let column = ((point.x - min.x) / cell_size).round();
            let row = ((point.y - min.y) / cell_size).round();
            if column < 0.0 || row < 0.0 {
                return None;
            }
            let (column, row) = (column as usize, row as usize);
            (column < width && row < height).then_some((row, column))
        };

        for obstacle in &self.obstacles {
            for (row, cells) in grid.iter_mut().enumerate() {
                for (column, cell) in cells.iter_mut().enumerate() {
                    let point = min
                        + Vector2::new(column as f64 * cell_size, row as f64 * cell_size);
                    if obstacle.body.contains_point(&point) {
                        *cell = '#';
                    }
                }
            }
        }

        for (graph, mark) in [(&self.sidewalks, ':'), (&self.roads, '.')] {
            for road in graph.roads() {
                let start = graph.joints()[road.start];
                let end = graph.joints()[road.end];
                let steps = (start.distance(&end) / cell_size).ceil().max(1.0) as usize;
                for step in 0..=steps {
                    let point = start + (end - start) * (step as f64 / steps as f64);
                    if let Some((row, column)) = to_grid(&point) {
                        grid[row][column] = mark;
                    }
                }
            }
            for joint in graph.joints() {
                if let Some((row, column)) = to_grid(joint) {
                    grid[row][column] = '+';
                }
            }
        }

        for agent in &self.agents {
            if let Some((row, column)) = to_grid(&agent.body.position) {
                grid[row][column] = match (agent.active, agent.network) {
                    (false, _) => 'x',
                    (true, Network::Roads) => 'c',
                    (true, Network::Sidewalks) => 'p',
                };
            }
        }

        let mut out = String::new();
        for row in grid.iter().rev() {
            let line: String = row.iter().collect();
            let _ = writeln!(out, "{}", line.trim_end());
        }
        out
    }
}
