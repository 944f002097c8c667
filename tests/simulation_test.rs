//! Simulation coordinator tests
//!
//! Spawning, route assignment, editing and long headless runs.

use city_traffic::simulation::{
    AgentBlueprint, GraphData, MapDescriptor, Network, SimError, SimSettings, Simulation,
    Vector2, MAX_MAP_SIDE,
};

fn square_map(vehicle_blueprints: Vec<AgentBlueprint>) -> MapDescriptor {
    MapDescriptor {
        roads: GraphData::grid(
            2,
            2,
            |column, row| Vector2::new(column as f64 * 300.0, row as f64 * 300.0),
            |_, _| 1,
        ),
        sidewalks: GraphData::default(),
        buildings: Vec::new(),
        vehicle_blueprints,
        pedestrian_blueprints: Vec::new(),
    }
}

fn patient_settings() -> SimSettings {
    SimSettings {
        max_route_attempts: 64,
        ..SimSettings::default()
    }
}

#[test]
fn test_zero_density_spawns_nothing() {
    let mut world = Simulation::new_with_seed(&square_map(vec![AgentBlueprint::car()]), 3).unwrap();
    assert_eq!(world.spawn_agents(0.0), 0);
    assert!(world.agents().is_empty());
}

#[test]
fn test_full_density_spawns_one_per_joint() {
    let map = square_map(vec![AgentBlueprint::car(), AgentBlueprint::truck()]);
    let mut world = Simulation::new_with_seed(&map, 3).unwrap();

    assert_eq!(world.spawn_agents(1.0), 4);
    assert_eq!(world.agents().len(), 4);
    for (agent, joint) in world.agents().iter().zip(world.roads().joints()) {
        assert_eq!(agent.position(), *joint);
        assert_eq!(agent.network, Network::Roads);
        assert!(agent.active);
        assert!(agent.steering.is_idle());
    }

    // Densities above one still mean "every joint"
    assert_eq!(world.spawn_agents(2.5), 4);
    assert_eq!(world.stats().agents_spawned, 8);
}

#[test]
fn test_spawning_without_blueprints_does_nothing() {
    let mut world = Simulation::new_with_seed(&square_map(Vec::new()), 3).unwrap();
    assert_eq!(world.spawn_agents(1.0), 0);
    assert_eq!(world.spawn_pedestrians(1.0), 0);
}

#[test]
fn test_idle_agents_receive_routes() {
    let map = square_map(vec![AgentBlueprint::car()]);
    let mut world = Simulation::with_settings(&map, patient_settings(), Some(11)).unwrap();
    world.spawn_agents(1.0);

    world.update(1.0 / 60.0);

    for agent in world.agents() {
        assert!(!agent.steering.is_idle(), "agent {:?} has no route", agent.id);
    }
    assert_eq!(world.stats().routes_assigned, 4);
}

#[test]
fn test_unreachable_destinations_leave_agent_idle() {
    let map = MapDescriptor {
        roads: GraphData {
            joints: vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(400.0, 0.0),
                Vector2::new(400.0, 400.0),
            ],
            lanes: vec![vec![0, 1, 0], vec![0, 0, 1], vec![0, 0, 0]],
        },
        ..square_map(vec![AgentBlueprint::car()])
    };
    let mut world = Simulation::with_settings(&map, patient_settings(), Some(5)).unwrap();
    let stuck = world.spawn_agent(&AgentBlueprint::car(), Vector2::new(400.0, 400.0), Network::Roads);

    world.update(0.1);

    let agent = world.agent(stuck).unwrap();
    assert!(agent.active);
    assert!(agent.steering.is_idle());
    assert_eq!(world.stats().routes_assigned, 0);
    assert!(world.stats().routes_unreachable > 0);
}

#[test]
fn test_editor_changes_go_through_the_simulation() {
    let mut world = Simulation::new_with_seed(&square_map(vec![AgentBlueprint::car()]), 1).unwrap();

    let index = world
        .add_joint(Network::Roads, Vector2::new(600.0, 0.0), 1, 1, 1)
        .unwrap();
    assert_eq!(index, 4);
    assert_eq!(world.roads().n_joints(), 5);
    assert_eq!(world.roads().distance(1, 4).unwrap(), 300.0);

    world
        .set_joint_position(Network::Roads, 4, Vector2::new(300.0, -400.0))
        .unwrap();
    assert_eq!(world.roads().distance(1, 4).unwrap(), 400.0);

    world.set_lane_count(Network::Roads, 4, 1, 3).unwrap();
    assert_eq!(world.roads().lane_count(4, 1).unwrap(), 3);

    assert!(matches!(
        world.set_lane_count(Network::Sidewalks, 0, 1, 1),
        Err(SimError::InvalidGraph(_))
    ));
}

#[test]
fn test_invalid_map_is_rejected() {
    let mut map = square_map(vec![AgentBlueprint::car()]);
    map.roads.lanes.pop();
    assert!(Simulation::new(&map).is_err());
}

#[test]
fn test_test_world_runs_headless() {
    let mut world = Simulation::create_test_world_with_seed(7).unwrap();
    assert_eq!(world.roads().n_joints(), 9);
    assert_eq!(world.sidewalks().n_joints(), 16);
    assert_eq!(world.obstacles().len(), 4);

    world.spawn_agents(1.0);
    world.spawn_pedestrians(0.5);
    let spawned: Vec<Vector2> = world.agents().iter().map(|agent| agent.position()).collect();
    assert!(spawned.len() >= 9);
    assert!(world.collisions().is_empty(), "agents spawn apart from each other");

    let delta = 1.0 / 60.0;
    for _ in 0..600 {
        world.update(delta);
    }
    assert!((world.time - 10.0).abs() < 1e-6);

    let mut moved = 0;
    for (agent, start) in world.agents().iter().zip(&spawned) {
        let position = agent.position();
        assert!(position.x.is_finite() && position.y.is_finite());
        assert!(agent.kinetics.linear_velocity.length() <= agent.steering.max_speed + 1e-9);
        if !agent.active {
            assert!(agent.kinetics.is_at_rest());
        }
        if position != *start {
            moved += 1;
        }
    }
    assert!(moved > 0, "nobody moved in ten seconds");

    // Crashed agents stay where they are
    let frozen: Vec<(usize, Vector2)> = world
        .agents()
        .iter()
        .enumerate()
        .filter(|(_, agent)| !agent.active)
        .map(|(index, agent)| (index, agent.position()))
        .collect();
    for _ in 0..60 {
        world.update(delta);
    }
    for (index, position) in frozen {
        assert_eq!(world.agents()[index].position(), position);
    }

    assert!(world.summary().contains("=== Traffic Simulation Summary ==="));
    assert!(!world.draw_map(32.0).is_empty());
}

#[test]
fn test_text_map_size_is_bounded() {
    let world = Simulation::create_test_world_with_seed(2).unwrap();

    let map = world.draw_map(1e-6);
    let lines: Vec<&str> = map.lines().collect();
    assert!(!lines.is_empty());
    assert!(lines.len() <= MAX_MAP_SIDE + 1);
    assert!(lines.iter().all(|line| line.chars().count() <= MAX_MAP_SIDE + 1));

    assert!(world.draw_map(0.0).is_empty());
    assert!(world.draw_map(f64::NAN).is_empty());
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let mut world = Simulation::create_test_world_with_seed(seed).unwrap();
        world.spawn_agents(0.75);
        for _ in 0..120 {
            world.update(1.0 / 30.0);
        }
        world
            .agents()
            .iter()
            .map(|agent| (agent.position(), agent.active))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(42), run(42));
}
