use std::fmt;
use std::thread;
use std::time::Duration;

use crate::domain::cluster_model::admission::AdmissionController;
use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::config::SimulationConfig;
use crate::domain::cluster_model::policy_trait::SchedulingPolicy;
use crate::domain::cluster_model::policy_type::PolicyType;
use crate::domain::cluster_model::statistics::snapshot_sink::{FileSnapshotSink, MemorySnapshotSink, SnapshotSink};
use crate::domain::cluster_model::statistics::stats_recorder::StatsRecorder;
use crate::domain::simulator::random_source::{RandomSource, SeededRandom};

/// Result of a single [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,

    /// The completion target was reached. Further ticks do nothing.
    Finished,
}

/// Final numbers of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub policy: PolicyType,
    pub seed: Option<u64>,
    pub ticks: u64,
    pub completed_jobs: u64,
    pub jobs_submitted: u64,
    pub resources_created: u64,
    pub mean_utilization: f64,
    pub mean_wait_time: f64,
    pub snapshots: u64,

    /// `false` if the run stopped on `max_ticks` before reaching `max_completions`.
    pub reached_target: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation summary ({}) ---", self.policy)?;
        match self.seed {
            Some(seed) => writeln!(f, "Seed:               {}", seed)?,
            None => writeln!(f, "Seed:               unknown")?,
        }
        writeln!(f, "Ticks:              {}", self.ticks)?;
        writeln!(f, "Completed jobs:     {}", self.completed_jobs)?;
        writeln!(f, "Submitted jobs:     {}", self.jobs_submitted)?;
        writeln!(f, "Resources created:  {}", self.resources_created)?;
        writeln!(f, "Mean utilization:   {:.6} %", self.mean_utilization)?;
        writeln!(f, "Mean wait time:     {:.6}", self.mean_wait_time)?;
        writeln!(f, "Snapshots:          {}", self.snapshots)?;
        write!(f, "Target reached:     {}", self.reached_target)
    }
}

/// One simulation run: the cluster, its policy and the tick driver.
///
/// A tick is `trace -> admission -> execute -> schedule`. The tick itself never
/// blocks; pacing happens only in [`Simulation::run`].
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    state: ClusterState,
    policy: Box<dyn SchedulingPolicy>,
    stats: StatsRecorder,
    rng: Box<dyn RandomSource>,
    sink: Box<dyn SnapshotSink>,
    seed: Option<u64>,
    ticks: u64,
    finished: bool,
}

impl Simulation {
    /// Builds a run from its config: a [`SeededRandom`] (from `seed`, or from entropy) and a
    /// [`FileSnapshotSink`] on `output_file`, or an in-memory sink if there is none.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let seed = rng.seed();

        let sink: Box<dyn SnapshotSink> = match &config.output_file {
            Some(path) => Box::new(FileSnapshotSink::new(path)),
            None => Box::new(MemorySnapshotSink::new()),
        };

        let mut simulation = Self::with_parts(config, Box::new(rng), sink);
        simulation.seed = Some(seed);
        simulation
    }

    /// Builds a run with an injected random source and snapshot sink.
    pub fn with_parts(config: SimulationConfig, rng: Box<dyn RandomSource>, sink: Box<dyn SnapshotSink>) -> Self {
        let policy = config.policy.get_instance(&config);
        let stats = StatsRecorder::new(config.record_interval, config.max_completions);

        Simulation {
            seed: config.seed,
            config,
            state: ClusterState::new(),
            policy,
            stats,
            rng,
            sink,
            ticks: 0,
            finished: false,
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// Once the completion target is reached the remaining phases of that tick are skipped
    /// and every later call returns [`TickOutcome::Finished`] without touching the state.
    pub fn tick(&mut self) -> TickOutcome {
        if self.finished {
            return TickOutcome::Finished;
        }
        self.ticks += 1;

        if self.stats.trace(&mut self.state, self.sink.as_mut()) {
            self.finished = true;
            log::info!("Completion target of {} jobs reached after {} ticks.", self.config.max_completions, self.ticks);
            return TickOutcome::Finished;
        }

        AdmissionController::new(&self.config).add_remove(&mut self.state, self.rng.as_mut());

        let report = self.policy.execute(&mut self.state, self.rng.as_mut(), self.config.p_resource_leave);
        if report.departures > 0 {
            log::trace!("Tick {}: {:?}", self.ticks, report);
        }

        if let Some(binding) = self.policy.schedule(&mut self.state) {
            log::trace!("Tick {}: scheduled {:?}", self.ticks, binding);
        }

        TickOutcome::Continue
    }

    /// Ticks until the completion target or `max_ticks` is reached, sleeping
    /// `tick_interval_ms` between two ticks.
    pub fn run(&mut self) -> RunSummary {
        log::info!(
            "Starting {} simulation (seed {:?}, target {} completions).",
            self.config.policy,
            self.seed,
            self.config.max_completions
        );

        let pause = Duration::from_millis(self.config.tick_interval_ms);

        loop {
            if self.config.max_ticks.is_some_and(|max_ticks| self.ticks >= max_ticks) {
                log::warn!("Stopping after {} ticks with {} completed jobs.", self.ticks, self.stats.completed_jobs());
                break;
            }

            if self.tick() == TickOutcome::Finished {
                break;
            }

            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }

        let summary = self.summary();
        log::info!("Simulation ended: {} jobs completed in {} ticks.", summary.completed_jobs, summary.ticks);
        summary
    }

    /// Runs at most `ticks` ticks without pacing.
    pub fn run_for(&mut self, ticks: u64) -> TickOutcome {
        for _ in 0..ticks {
            if self.tick() == TickOutcome::Finished {
                return TickOutcome::Finished;
            }
        }
        if self.finished { TickOutcome::Finished } else { TickOutcome::Continue }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            policy: self.config.policy,
            seed: self.seed,
            ticks: self.ticks,
            completed_jobs: self.stats.completed_jobs(),
            jobs_submitted: self.state.jobs_submitted(),
            resources_created: self.state.resources_created(),
            mean_utilization: self.stats.mean_utilization(),
            mean_wait_time: self.state.mean_wait_time(),
            snapshots: self.stats.snapshots_emitted(),
            reached_target: self.finished,
        }
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ClusterState {
        &mut self.state
    }

    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cluster_model::config::UniformRange;
    use crate::domain::cluster_model::job::job::JobState;
    use crate::domain::simulator::random_source_mock::ScriptedRandom;

    fn quiet_config(policy: PolicyType) -> SimulationConfig {
        SimulationConfig {
            p_add_resource: 0,
            p_add_job: 0,
            p_resource_leave: 0,
            initial_resources: 0,
            output_file: None,
            ..SimulationConfig::for_policy(policy)
        }
    }

    #[test]
    fn first_tick_seeds_initial_resources() {
        let config = SimulationConfig { initial_resources: 3, ..quiet_config(PolicyType::Mixed) };
        let mut simulation =
            Simulation::with_parts(config, Box::new(ScriptedRandom::constant(500)), Box::new(MemorySnapshotSink::new()));

        assert_eq!(simulation.tick(), TickOutcome::Continue);

        assert_eq!(simulation.state().resources.len(), 3);
        assert_eq!(simulation.ticks(), 1);
    }

    #[test]
    fn tick_runs_execute_before_schedule() {
        let config = quiet_config(PolicyType::Mixed);
        let mut simulation =
            Simulation::with_parts(config, Box::new(ScriptedRandom::constant(500)), Box::new(MemorySnapshotSink::new()));
        simulation.state_mut().add_resource(5).unwrap();
        let job = simulation.state_mut().add_job(10, 1).unwrap();

        // scheduled at the end of tick 1, not yet transferred
        simulation.tick();
        assert_eq!(simulation.state().job(job).unwrap().transfer_remaining, 1);

        // transfer finishes in tick 2
        simulation.tick();
        assert_eq!(simulation.state().job(job).unwrap().state, JobState::Running);
    }

    #[test]
    fn finished_tick_skips_remaining_phases() {
        let config = SimulationConfig { max_completions: 1, ..quiet_config(PolicyType::Mixed) };
        let mut simulation =
            Simulation::with_parts(config, Box::new(ScriptedRandom::constant(999)), Box::new(MemorySnapshotSink::new()));
        let done = simulation.state_mut().add_job(10, 0).unwrap();
        simulation.state_mut().jobs.get_mut(done).unwrap().set_state(JobState::Done);

        assert_eq!(simulation.tick(), TickOutcome::Finished);

        // admission never ran, so the done job was not purged
        assert!(simulation.state().job(done).is_some());
        assert!(simulation.is_finished());

        assert_eq!(simulation.tick(), TickOutcome::Finished);
        assert_eq!(simulation.ticks(), 1);
    }

    #[test]
    fn run_stops_at_max_ticks() {
        let config = SimulationConfig { max_ticks: Some(25), ..quiet_config(PolicyType::AdvanceReservation) };
        let mut simulation =
            Simulation::with_parts(config, Box::new(ScriptedRandom::constant(500)), Box::new(MemorySnapshotSink::new()));

        let summary = simulation.run();

        assert_eq!(summary.ticks, 25);
        assert_eq!(summary.completed_jobs, 0);
        assert!(!summary.reached_target);
    }

    #[test]
    fn single_job_runs_to_completion() {
        let config = SimulationConfig {
            max_completions: 1,
            record_interval: 1,
            job_workload_range: UniformRange::new(6, 6),
            ..quiet_config(PolicyType::AdvanceReservation)
        };
        let sink = MemorySnapshotSink::new();
        let mut simulation = Simulation::with_parts(config, Box::new(ScriptedRandom::constant(999)), Box::new(sink.clone()));
        simulation.state_mut().add_resource(2).unwrap();
        simulation.state_mut().add_job(6, 0).unwrap();

        let summary = simulation.run();

        assert!(summary.reached_target);
        assert_eq!(summary.completed_jobs, 1);
        assert_eq!(sink.snapshots().len(), 1);
        assert_eq!(sink.snapshots()[0].jobs_submitted, 1);
    }

    #[test]
    fn new_uses_the_configured_seed() {
        let config = SimulationConfig { seed: Some(17), ..quiet_config(PolicyType::Mixed) };
        let simulation = Simulation::new(config);

        assert_eq!(simulation.summary().seed, Some(17));
    }

    #[test]
    fn summary_display_names_the_policy() {
        let simulation = Simulation::new(SimulationConfig { seed: Some(1), ..quiet_config(PolicyType::Mixed) });
        let text = simulation.summary().to_string();

        assert!(text.contains("(mixed)"));
        assert!(text.contains("Seed:               1"));
    }
}
