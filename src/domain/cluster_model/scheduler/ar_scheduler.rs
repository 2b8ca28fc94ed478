use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::executor::ar_executor;
use crate::domain::cluster_model::job::job::{JobKey, JobState, TransferPhase};
use crate::domain::cluster_model::policy_trait::{Binding, ExecutionReport, SchedulingPolicy};
use crate::domain::cluster_model::policy_type::PolicyType;
use crate::domain::cluster_model::resource::resource::{ResourceKey, ResourceState};
use crate::domain::simulator::random_source::RandomSource;

/// Advance reservation scheduling.
///
/// Jobs are taken first come first served and reserved on the accepting resource
/// with the least reserved workload. Each resource serves its reservations strictly
/// in the order they were made.
#[derive(Debug, Default, Clone)]
pub struct AdvanceReservationPolicy;

impl AdvanceReservationPolicy {
    pub fn new() -> Self {
        Self
    }

    /// First waiting job in pool order.
    pub fn select_job(state: &ClusterState) -> Option<JobKey> {
        state.jobs.find_first(|job| job.is_waiting())
    }

    /// Accepting resource with the smallest `total_workload`, the earliest one on ties.
    pub fn select_resource(state: &ClusterState) -> Option<ResourceKey> {
        let mut best: Option<(ResourceKey, i64)> = None;

        for (key, resource) in state.resources.iter() {
            if !resource.accepts_reservations() {
                continue;
            }
            match best {
                Some((_, load)) if resource.total_workload >= load => {}
                _ => best = Some((key, resource.total_workload)),
            }
        }

        best.map(|(key, _)| key)
    }

    /// Reserves `job_key` on `resource_key`.
    ///
    /// # Returns
    /// `false` if either entity is gone or the reservation could not be stored.
    pub fn bind(state: &mut ClusterState, job_key: JobKey, resource_key: ResourceKey) -> bool {
        let Some(workload) = state.job(job_key).map(|job| job.workload) else {
            return false;
        };
        let Some(resource) = state.resources.get_mut(resource_key) else {
            return false;
        };

        if let Err(e) = resource.reservations.push(job_key) {
            log::warn!("Skipping reservation on resource {} this tick: {}", resource.id, e);
            return false;
        }
        resource.total_workload += workload;
        resource.set_state(ResourceState::Busy);
        let resource_id = resource.id;

        if let Some(job) = state.jobs.get_mut(job_key) {
            job.set_state(JobState::TransferringIn(TransferPhase::Queued));
            log::debug!("Job {} reserved on resource {}.", job.id, resource_id);
        }
        true
    }
}

impl SchedulingPolicy for AdvanceReservationPolicy {
    fn policy_type(&self) -> PolicyType {
        PolicyType::AdvanceReservation
    }

    fn schedule(&mut self, state: &mut ClusterState) -> Option<Binding> {
        let job = Self::select_job(state)?;
        let resource = Self::select_resource(state)?;

        Self::bind(state, job, resource).then_some(Binding { job, resource })
    }

    fn execute(&mut self, state: &mut ClusterState, rng: &mut dyn RandomSource, p_resource_leave: u32) -> ExecutionReport {
        ar_executor::run_and_send(state, rng, p_resource_leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_waiting_job_means_no_binding() {
        let mut state = ClusterState::new();
        state.add_resource(1).unwrap();

        assert_eq!(AdvanceReservationPolicy::new().schedule(&mut state), None);
    }

    #[test]
    fn no_accepting_resource_means_no_binding_and_job_keeps_waiting() {
        let mut state = ClusterState::new();
        let r = state.add_resource(1).unwrap();
        state.resources.get_mut(r).unwrap().set_state(ResourceState::NotAccepting);
        let j = state.add_job(100, 0).unwrap();

        assert_eq!(AdvanceReservationPolicy::new().schedule(&mut state), None);
        assert_eq!(state.job(j).unwrap().state, JobState::Waiting);
        assert!(state.resource(r).unwrap().reservations.is_empty());
    }

    #[test]
    fn least_loaded_resource_wins() {
        let mut state = ClusterState::new();
        let heavy = state.add_resource(1).unwrap();
        let light = state.add_resource(1).unwrap();
        state.resources.get_mut(heavy).unwrap().total_workload = 300;
        state.resources.get_mut(light).unwrap().total_workload = 100;
        let job = state.add_job(50, 0).unwrap();

        let binding = AdvanceReservationPolicy::new().schedule(&mut state);

        assert_eq!(binding, Some(Binding { job, resource: light }));
        assert_eq!(state.resource(light).unwrap().total_workload, 150);
        assert_eq!(state.resource(heavy).unwrap().total_workload, 300);
    }

    #[test]
    fn ties_go_to_the_earliest_resource() {
        let mut state = ClusterState::new();
        let first = state.add_resource(1).unwrap();
        state.add_resource(5).unwrap();

        assert_eq!(AdvanceReservationPolicy::select_resource(&state), Some(first));
    }

    #[test]
    fn not_accepting_resources_are_skipped_even_if_lighter() {
        let mut state = ClusterState::new();
        let closed = state.add_resource(1).unwrap();
        let open = state.add_resource(1).unwrap();
        state.resources.get_mut(open).unwrap().total_workload = 500;
        state.resources.get_mut(closed).unwrap().set_state(ResourceState::NotAccepting);

        assert_eq!(AdvanceReservationPolicy::select_resource(&state), Some(open));
    }

    #[test]
    fn first_waiting_job_is_taken_and_queued() {
        let mut state = ClusterState::new();
        let r = state.add_resource(1).unwrap();
        let older = state.add_job(900, 0).unwrap();
        let newer = state.add_job(100, 0).unwrap();

        let mut policy = AdvanceReservationPolicy::new();
        policy.schedule(&mut state);

        assert_eq!(state.job(older).unwrap().state, JobState::TransferringIn(TransferPhase::Queued));
        assert_eq!(state.job(newer).unwrap().state, JobState::Waiting);
        let resource = state.resource(r).unwrap();
        assert_eq!(resource.state, ResourceState::Busy);
        assert_eq!(resource.reservations.jobs().collect::<Vec<_>>(), vec![older]);
    }

    #[test]
    fn one_job_per_tick() {
        let mut state = ClusterState::new();
        state.add_resource(1).unwrap();
        state.add_resource(1).unwrap();
        for _ in 0..3 {
            state.add_job(100, 0).unwrap();
        }

        AdvanceReservationPolicy::new().schedule(&mut state);

        assert_eq!(state.jobs.iter().filter(|(_, job)| job.is_waiting()).count(), 2);
    }
}
