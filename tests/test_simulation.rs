use cluster_sim::domain::cluster_model::config::SimulationConfig;
use cluster_sim::domain::cluster_model::policy_type::PolicyType;
use cluster_sim::domain::cluster_model::statistics::snapshot_sink::MemorySnapshotSink;
use cluster_sim::domain::simulator::random_source::SeededRandom;
use cluster_sim::domain::simulator::simulator::{Simulation, TickOutcome};

fn config(policy: PolicyType, max_completions: u64, record_interval: u64) -> SimulationConfig {
    SimulationConfig {
        max_completions,
        record_interval,
        max_ticks: Some(200_000),
        output_file: None,
        ..SimulationConfig::for_policy(policy)
    }
}

fn simulation(config: SimulationConfig, seed: u64) -> (Simulation, MemorySnapshotSink) {
    let sink = MemorySnapshotSink::new();
    let simulation = Simulation::with_parts(config, Box::new(SeededRandom::new(seed)), Box::new(sink.clone()));
    (simulation, sink)
}

/// Ticks until the run finishes and checks the per-tick invariants along the way.
fn run_checked(simulation: &mut Simulation) {
    let mut last_completed = 0;

    while simulation.ticks() < 200_000 {
        let outcome = simulation.tick();

        let completed = simulation.stats().completed_jobs();
        assert!(completed >= last_completed, "completed jobs went down at tick {}", simulation.ticks());
        last_completed = completed;

        let mean_utilization = simulation.stats().mean_utilization();
        assert!((0.0..=100.0).contains(&mean_utilization), "mean utilization {} out of range", mean_utilization);

        for (_, resource) in simulation.state().resources.iter() {
            assert!(resource.used_time <= resource.total_time, "resource {} used longer than alive", resource.id);
        }

        if outcome == TickOutcome::Finished {
            return;
        }
    }
    panic!("simulation did not finish");
}

#[test]
fn ar_run_keeps_invariants_and_finishes() {
    let (mut simulation, sink) = simulation(config(PolicyType::AdvanceReservation, 300, 50), 42);

    run_checked(&mut simulation);

    assert!(simulation.is_finished());
    assert_eq!(simulation.stats().completed_jobs(), 300);
    let completed: Vec<u64> = sink.snapshots().iter().map(|s| s.completed_jobs).collect();
    assert_eq!(completed, vec![50, 100, 150, 200, 250, 300]);
}

#[test]
fn mixed_run_keeps_invariants_and_finishes() {
    let (mut simulation, sink) = simulation(config(PolicyType::Mixed, 200, 25), 7);

    run_checked(&mut simulation);

    assert!(simulation.is_finished());
    assert!(sink.snapshots().iter().all(|s| s.completed_jobs % 25 == 0));
    assert_eq!(sink.snapshots().len(), 8);
}

#[test]
fn snapshots_report_growing_submissions() {
    let (mut simulation, sink) = simulation(config(PolicyType::Mixed, 100, 10), 3);

    run_checked(&mut simulation);

    let snapshots = sink.snapshots();
    assert!(snapshots.windows(2).all(|pair| pair[0].jobs_submitted <= pair[1].jobs_submitted));
    assert!(snapshots.iter().all(|s| s.jobs_submitted >= s.completed_jobs));
    assert!(snapshots.iter().all(|s| s.mean_wait_time >= 0.0));
}

#[test]
fn same_seed_gives_same_run() {
    for policy in [PolicyType::AdvanceReservation, PolicyType::Mixed] {
        let (mut first, first_sink) = simulation(config(policy, 150, 30), 99);
        let (mut second, second_sink) = simulation(config(policy, 150, 30), 99);

        let first_summary = first.run();
        let second_summary = second.run();

        assert_eq!(first_summary, second_summary);
        assert_eq!(first_sink.snapshots(), second_sink.snapshots());
    }
}

#[test]
fn run_summary_matches_recorder() {
    let (mut simulation, sink) = simulation(config(PolicyType::AdvanceReservation, 120, 40), 11);

    let summary = simulation.run();

    assert!(summary.reached_target);
    assert_eq!(summary.completed_jobs, 120);
    assert_eq!(summary.snapshots, 3);
    assert_eq!(summary.snapshots as usize, sink.snapshots().len());
    assert!(summary.resources_created >= 5);
    assert!(summary.jobs_submitted >= summary.completed_jobs);
}

#[test]
fn run_without_resources_never_completes() {
    let config = SimulationConfig {
        initial_resources: 0,
        p_add_resource: 0,
        max_ticks: Some(500),
        ..config(PolicyType::Mixed, 10, 5)
    };
    let (mut simulation, sink) = simulation(config, 5);

    let summary = simulation.run();

    assert!(!summary.reached_target);
    assert_eq!(summary.ticks, 500);
    assert_eq!(summary.completed_jobs, 0);
    assert!(summary.jobs_submitted > 0);
    assert!(sink.snapshots().is_empty());
}

#[test]
fn run_for_stops_early_once_finished() {
    let (mut simulation, _) = simulation(config(PolicyType::Mixed, 20, 10), 21);

    assert_eq!(simulation.run_for(10), TickOutcome::Continue);
    assert_eq!(simulation.ticks(), 10);

    assert_eq!(simulation.run_for(200_000), TickOutcome::Finished);
    let finished_at = simulation.ticks();
    assert!(finished_at < 200_010);

    assert_eq!(simulation.run_for(5), TickOutcome::Finished);
    assert_eq!(simulation.ticks(), finished_at);
}
