use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::executor::mixed_executor;
use crate::domain::cluster_model::job::job::{Job, JobKey, JobState, TransferPhase};
use crate::domain::cluster_model::policy_trait::{Binding, ExecutionReport, SchedulingPolicy};
use crate::domain::cluster_model::policy_type::PolicyType;
use crate::domain::cluster_model::resource::resource::{ResourceKey, ResourceState};
use crate::domain::simulator::random_source::RandomSource;

/// Mixed FCFS + LWF scheduling.
///
/// The first available resource gets the waiting job with the highest
/// `w_fcfs * wait_time + w_lwf * workload`. There is no queue, a resource serves one job at a time.
#[derive(Debug, Clone)]
pub struct MixedPolicy {
    /// Weight of the wait time (first come first served).
    pub w_fcfs: i64,

    /// Weight of the workload (largest workload first).
    pub w_lwf: i64,
}

impl MixedPolicy {
    pub fn new(w_fcfs: i64, w_lwf: i64) -> Self {
        Self { w_fcfs, w_lwf }
    }

    /// Saturates at the `i64` bounds, so extreme weights still rank jobs without overflowing.
    pub fn score(&self, job: &Job) -> i64 {
        let wait_time = i64::try_from(job.wait_time).unwrap_or(i64::MAX);
        self.w_fcfs.saturating_mul(wait_time).saturating_add(self.w_lwf.saturating_mul(job.workload))
    }

    /// First available resource in pool order.
    pub fn select_resource(state: &ClusterState) -> Option<ResourceKey> {
        state.resources.find_first(|resource| resource.state == ResourceState::Available)
    }

    /// Waiting job with the strictly highest score; the earliest job wins ties.
    pub fn select_job(&self, state: &ClusterState) -> Option<JobKey> {
        let mut best: Option<(JobKey, i64)> = None;

        for (key, job) in state.jobs.iter().filter(|(_, job)| job.is_waiting()) {
            let score = self.score(job);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((key, score)),
            }
        }

        best.map(|(key, _)| key)
    }

    /// Binds `job_key` directly to `resource_key`.
    pub fn bind(state: &mut ClusterState, job_key: JobKey, resource_key: ResourceKey) -> bool {
        let Some(resource) = state.resources.get_mut(resource_key) else {
            return false;
        };
        let Some(job) = state.jobs.get_mut(job_key) else {
            return false;
        };

        job.assigned_resource = Some(resource_key);
        job.set_state(JobState::TransferringIn(TransferPhase::Sending));
        resource.set_state(ResourceState::ReceivingData);
        log::debug!("Job {} bound to resource {}.", job.id, resource.id);
        true
    }
}

impl SchedulingPolicy for MixedPolicy {
    fn policy_type(&self) -> PolicyType {
        PolicyType::Mixed
    }

    fn schedule(&mut self, state: &mut ClusterState) -> Option<Binding> {
        let resource = Self::select_resource(state)?;
        let job = self.select_job(state)?;

        Self::bind(state, job, resource).then_some(Binding { job, resource })
    }

    fn execute(&mut self, state: &mut ClusterState, rng: &mut dyn RandomSource, p_resource_leave: u32) -> ExecutionReport {
        mixed_executor::send_and_run(state, rng, p_resource_leave)
    }
}
