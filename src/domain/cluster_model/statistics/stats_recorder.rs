use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::statistics::snapshot_sink::{ANALYTICS_TARGET, Snapshot, SnapshotSink};

/// Per-tick accounting of wait times, completions and resource utilization.
#[derive(Debug, Clone)]
pub struct StatsRecorder {
    /// Completions between two snapshots.
    record_interval: u64,

    /// Completions after which the run is over.
    max_completions: u64,

    completed_jobs: u64,

    /// Resources folded into `mean_utilization` so far.
    resources_gone: u64,

    /// Running mean utilization of departed resources, in percent.
    mean_utilization: f64,

    snapshots_emitted: u64,
    last_snapshot: Option<Snapshot>,
}

impl StatsRecorder {
    pub fn new(record_interval: u64, max_completions: u64) -> Self {
        Self {
            record_interval: record_interval.max(1),
            max_completions,
            completed_jobs: 0,
            resources_gone: 0,
            mean_utilization: 0.0,
            snapshots_emitted: 0,
            last_snapshot: None,
        }
    }

    /// Accounts one tick.
    ///
    /// Ages every job that is not running yet, counts every `Done` job as one completion
    /// (emitting a snapshot on every multiple of the record interval), adds one tick of
    /// lifetime to every resource and folds the utilization of `Leaving` resources into
    /// the running mean.
    ///
    /// # Returns
    /// `true` once the number of completed jobs reached the configured maximum.
    pub fn trace(&mut self, state: &mut ClusterState, sink: &mut dyn SnapshotSink) -> bool {
        let mut newly_completed = 0;
        state.jobs.for_each_mut(|_, job| {
            if job.is_done() {
                newly_completed += 1;
            } else if job.is_pending() {
                job.wait_time += 1;
            }
        });

        for _ in 0..newly_completed {
            self.completed_jobs += 1;
            if self.completed_jobs % self.record_interval == 0 {
                self.emit_snapshot(state, sink);
            }
        }

        state.resources.for_each_mut(|_, resource| {
            resource.total_time += 1;
            if resource.is_leaving() {
                self.fold_utilization(resource.utilization_percent());
            }
        });

        self.target_reached()
    }

    /// Adds one departed resource to the running mean: `mean = (mean * n + x) / (n + 1)`.
    pub fn fold_utilization(&mut self, utilization_percent: f64) {
        let n = self.resources_gone as f64;
        self.mean_utilization = (self.mean_utilization * n + utilization_percent) / (n + 1.0);
        self.resources_gone += 1;
    }

    fn emit_snapshot(&mut self, state: &ClusterState, sink: &mut dyn SnapshotSink) {
        let snapshot = Snapshot {
            completed_jobs: self.completed_jobs,
            mean_utilization: self.mean_utilization,
            mean_wait_time: state.mean_wait_time(),
            jobs_submitted: state.jobs_submitted(),
        };

        tracing::info!(
            target: ANALYTICS_TARGET,
            CompletedJobs = snapshot.completed_jobs,
            MeanUtilization = snapshot.mean_utilization,
            MeanWaitTime = snapshot.mean_wait_time,
            JobsSubmitted = snapshot.jobs_submitted,
            "Statistics snapshot"
        );

        // A lost snapshot never stops the simulation.
        if let Err(e) = sink.record(&snapshot) {
            log::warn!("Dropping statistics snapshot at {} completed jobs: {}", snapshot.completed_jobs, e);
        }

        self.snapshots_emitted += 1;
        self.last_snapshot = Some(snapshot);
    }

    pub fn target_reached(&self) -> bool {
        self.completed_jobs >= self.max_completions
    }

    pub fn completed_jobs(&self) -> u64 {
        self.completed_jobs
    }

    pub fn mean_utilization(&self) -> f64 {
        self.mean_utilization
    }

    pub fn resources_gone(&self) -> u64 {
        self.resources_gone
    }

    pub fn snapshots_emitted(&self) -> u64 {
        self.snapshots_emitted
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }
}
