//! Lane path generation tests

use city_traffic::simulation::{generate_path, plan_route, RoadGraph, SimError, Vector2};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_close(actual: Vector2, expected: Vector2) {
    assert!(
        actual.distance(&expected) < 1e-9,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn one_way_chain(lanes_first_leg: u32) -> RoadGraph {
    RoadGraph::new(
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(100.0, 0.0),
            Vector2::new(100.0, 100.0),
        ],
        &[vec![0, lanes_first_leg, 0], vec![0, 0, 1], vec![0, 0, 0]],
        48.0,
    )
    .unwrap()
}

#[test]
fn test_single_lane_leg_is_offset_to_the_right() {
    let graph = one_way_chain(1);
    let mut rng = StdRng::seed_from_u64(1);

    let path = generate_path(&graph, &[0, 1], 40.0, &mut rng).unwrap();

    let expected = [
        Vector2::new(0.0, -24.0),
        Vector2::new(40.0, -24.0),
        Vector2::new(80.0, -24.0),
        Vector2::new(100.0, -24.0),
    ];
    assert_eq!(path.len(), expected.len());
    for (actual, expected) in path.iter().zip(expected) {
        assert_close(*actual, expected);
    }
}

#[test]
fn test_every_point_of_a_leg_shares_one_lane() {
    let graph = one_way_chain(2);

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let path = generate_path(&graph, &[0, 1], 30.0, &mut rng).unwrap();

        let offset = path[0].y;
        assert!(
            (offset + 24.0).abs() < 1e-9 || (offset + 72.0).abs() < 1e-9,
            "unexpected lane offset {}",
            offset
        );
        assert!(path.iter().all(|point| (point.y - offset).abs() < 1e-9));
    }
}

#[test]
fn test_single_joint_route_is_empty() {
    let graph = one_way_chain(1);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(generate_path(&graph, &[1], 64.0, &mut rng).unwrap().is_empty());
    assert!(plan_route(&graph, 2, 2, 64.0, &mut rng).unwrap().is_empty());
}

#[test]
fn test_leg_without_lanes_is_rejected() {
    let graph = one_way_chain(1);
    let mut rng = StdRng::seed_from_u64(1);
    let result = generate_path(&graph, &[1, 0], 64.0, &mut rng);
    assert!(matches!(result, Err(SimError::InvalidGraph(_))));
}

#[test]
fn test_planned_route_runs_start_to_end() {
    let graph = one_way_chain(1);
    let mut rng = StdRng::seed_from_u64(9);

    let path = plan_route(&graph, 0, 2, 64.0, &mut rng).unwrap();

    // Each 100 unit leg: joint, one intermediate point, joint
    assert_eq!(path.len(), 6);
    assert_close(path[0], Vector2::new(0.0, -24.0));
    assert_close(path[1], Vector2::new(64.0, -24.0));
    assert_close(path[2], Vector2::new(100.0, -24.0));
    assert_close(path[3], Vector2::new(124.0, 0.0));
    assert_close(path[4], Vector2::new(124.0, 64.0));
    assert_close(path[5], Vector2::new(124.0, 100.0));
}

#[test]
fn test_unreachable_route_propagates() {
    let graph = one_way_chain(1);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        plan_route(&graph, 2, 0, 64.0, &mut rng),
        Err(SimError::PathNotFound { start: 2, end: 0 })
    );
}
