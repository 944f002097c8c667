use std::process::{Command, Output};

fn run_headless(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_city_traffic"))
        .args(args)
        .env("RUST_LOG", "warn,city_traffic=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that a short seeded run completes
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&["--ticks", "120", "--seed", "3"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_headless(&["--ticks", "60", "--seed", "8", "--summary-every", "0"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for statistic in [
        "Total agents spawned:",
        "Active agents:",
        "Crashed agents:",
        "Routes assigned:",
        "Road joints: 9",
        "Sidewalk joints: 16",
    ] {
        assert!(stderr.contains(statistic), "Missing '{}' statistic", statistic);
    }
}

/// Test that summaries and the text map go to stdout
#[test]
fn test_summary_and_map_printed() {
    let output = run_headless(&[
        "--ticks",
        "30",
        "--seed",
        "1",
        "--summary-every",
        "30",
        "--draw-map",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initial state:"));
    assert!(stdout.contains("--- After tick 30"));
    assert!(stdout.contains("=== Traffic Simulation Summary ==="));
    assert!(stdout.contains('+'), "Map has no joints:\n{}", stdout);
}

#[test]
fn test_invalid_arguments_rejected() {
    let output = run_headless(&["--ticks", "many"]);
    assert!(!output.status.success());
}
