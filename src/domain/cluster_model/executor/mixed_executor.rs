use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::job::job::{JobKey, JobState};
use crate::domain::cluster_model::policy_trait::ExecutionReport;
use crate::domain::cluster_model::resource::resource::ResourceState;
use crate::domain::simulator::random_source::RandomSource;

/// One execution tick under the mixed policy.
///
/// Every matched job, in pool order, either receives one more tick of input data or
/// consumes one tick of its resource. A job whose resource vanished goes back to `Waiting`.
pub fn send_and_run(state: &mut ClusterState, rng: &mut dyn RandomSource, p_resource_leave: u32) -> ExecutionReport {
    let mut report = ExecutionReport::default();
    let keys: Vec<JobKey> = state.jobs.keys().collect();

    for key in keys {
        let Some(job) = state.jobs.get_mut(key) else {
            continue;
        };
        if !matches!(job.state, JobState::TransferringIn(_) | JobState::Running) {
            continue;
        }

        let Some(resource) = job.assigned_resource.and_then(|resource_key| state.resources.get_mut(resource_key)) else {
            log::warn!("Job {} lost its resource, returning it to the waiting jobs.", job.id);
            job.assigned_resource = None;
            job.set_state(JobState::Waiting);
            continue;
        };

        match job.state {
            JobState::TransferringIn(_) => {
                if job.advance_transfer() {
                    job.set_state(JobState::Running);
                    resource.set_state(ResourceState::Busy);
                    report.transfers_finished += 1;
                    report.started += 1;
                }
            }
            JobState::Running => {
                resource.used_time += 1;
                if job.consume(resource.level) {
                    log::debug!("Job {} finished on resource {}.", job.id, resource.id);
                    report.completed += 1;
                    resource.set_state(ResourceState::Available);

                    if rng.chance(p_resource_leave) {
                        log::debug!("Resource {} leaves the cluster.", resource.id);
                        resource.set_state(ResourceState::Leaving);
                        report.departures += 1;
                    }
                }
            }
            _ => {}
        }
    }

    report
}
