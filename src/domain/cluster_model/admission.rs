use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::config::SimulationConfig;
use crate::domain::cluster_model::job::job::JobKey;
use crate::domain::cluster_model::resource::resource::ResourceKey;
use crate::domain::simulator::random_source::{PERMILLE, RandomSource};

/// What the admission draw of one tick created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Resource(ResourceKey),
    Job(JobKey),
    Nothing,
}

/// Arrival and departure of entities.
///
/// Every tick the controller first purges `Done` jobs and `Leaving` resources,
/// then decides with one draw `d` in `1..=1000` whether a resource
/// (`d <= p_add_resource`) or a job (`d > 1000 - p_add_job`) joins.
#[derive(Debug)]
pub struct AdmissionController<'a> {
    config: &'a SimulationConfig,
}

impl<'a> AdmissionController<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    pub fn add_remove(&self, state: &mut ClusterState, rng: &mut dyn RandomSource) -> Admission {
        if !state.is_seeded() {
            self.seed_resources(state, rng);
        }

        state.purge_terminated();

        let draw = rng.draw_permille();
        if draw <= u64::from(self.config.p_add_resource) {
            self.spawn_resource(state, rng).map_or(Admission::Nothing, Admission::Resource)
        } else if draw > PERMILLE.saturating_sub(u64::from(self.config.p_add_job)) {
            self.spawn_job(state, rng).map_or(Admission::Nothing, Admission::Job)
        } else {
            Admission::Nothing
        }
    }

    fn seed_resources(&self, state: &mut ClusterState, rng: &mut dyn RandomSource) {
        for _ in 0..self.config.initial_resources {
            self.spawn_resource(state, rng);
        }
        state.mark_seeded();
        log::debug!("Seeded cluster with {} resources.", state.resources.len());
    }

    /// Creates a resource with a random level. Failures skip the creation for this tick.
    pub fn spawn_resource(&self, state: &mut ClusterState, rng: &mut dyn RandomSource) -> Option<ResourceKey> {
        let level = self.config.resource_level_range.sample(rng);
        match state.add_resource(level) {
            Ok(key) => Some(key),
            Err(e) => {
                log::warn!("Skipping resource creation this tick: {}", e);
                None
            }
        }
    }

    /// Creates a job with random workload and transfer time. Failures skip the creation for this tick.
    pub fn spawn_job(&self, state: &mut ClusterState, rng: &mut dyn RandomSource) -> Option<JobKey> {
        let workload = self.config.job_workload_range.sample(rng);
        let transfer = self.config.job_transfer_range.sample(rng);
        match state.add_job(workload, transfer) {
            Ok(key) => Some(key),
            Err(e) => {
                log::warn!("Skipping job submission this tick: {}", e);
                None
            }
        }
    }
}
