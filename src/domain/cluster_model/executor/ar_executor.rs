use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::job::job::{Job, JobKey, JobState, TransferPhase};
use crate::domain::cluster_model::policy_trait::ExecutionReport;
use crate::domain::cluster_model::resource::resource::{Resource, ResourceKey, ResourceState};
use crate::domain::cluster_model::utils::entity_pool::EntityPool;
use crate::domain::simulator::random_source::RandomSource;

/// One execution tick under advance reservation.
///
/// Every resource, in pool order, advances the job at the head of its reservation
/// queue and then moves the input transfer of its queue one step further. Transfers
/// on one resource happen one job at a time, in reservation order.
pub fn run_and_send(state: &mut ClusterState, rng: &mut dyn RandomSource, p_resource_leave: u32) -> ExecutionReport {
    let mut report = ExecutionReport::default();
    let keys: Vec<ResourceKey> = state.resources.keys().collect();

    for key in keys {
        let Some(resource) = state.resources.get_mut(key) else {
            continue;
        };

        if resource.state == ResourceState::NotAccepting && resource.reservations.is_empty() {
            log::debug!("Resource {} drained its reservations and leaves.", resource.id);
            resource.set_state(ResourceState::Leaving);
            continue;
        }

        run_head(resource, &mut state.jobs, rng, p_resource_leave, &mut report);
        send_input_data(resource, &mut state.jobs, &mut report);
    }

    report
}

/// Runs the job at the head of the queue for one tick, or starts it once its data arrived.
fn run_head(
    resource: &mut Resource,
    jobs: &mut EntityPool<JobKey, Job>,
    rng: &mut dyn RandomSource,
    p_resource_leave: u32,
    report: &mut ExecutionReport,
) {
    let Some(head) = resource.reservations.head().map(|reservation| reservation.job) else {
        return;
    };

    let Some(job) = jobs.get_mut(head) else {
        log::warn!("Resource {} holds a reservation for a job that no longer exists, dropping it.", resource.id);
        resource.reservations.pop_head();
        return;
    };

    match job.state {
        JobState::Running => {
            let finished = job.consume(resource.level);
            resource.total_workload -= resource.level;
            resource.used_time += 1;

            if finished {
                log::debug!("Job {} finished on resource {}.", job.id, resource.id);
                resource.reservations.pop_head();
                report.completed += 1;

                if rng.chance(p_resource_leave) {
                    log::debug!("Resource {} stops accepting reservations.", resource.id);
                    resource.set_state(ResourceState::NotAccepting);
                    report.departures += 1;
                } else if resource.reservations.is_empty() && resource.state == ResourceState::Busy {
                    resource.set_state(ResourceState::Available);
                }
            }
        }
        JobState::Ready => {
            job.set_state(JobState::Running);
            report.started += 1;
        }
        _ => {}
    }
}

/// Advances the first transferring job of the queue by one tick.
///
/// A finished transfer makes the job `Ready` and starts the transfer of the next reserved job.
/// A job still queued for transfer starts sending and consumes this tick.
fn send_input_data(resource: &Resource, jobs: &mut EntityPool<JobKey, Job>, report: &mut ExecutionReport) {
    for (position, job_key) in resource.reservations.jobs().enumerate() {
        let Some(job) = jobs.get_mut(job_key) else {
            continue;
        };

        match job.state {
            JobState::TransferringIn(TransferPhase::Sending) => {
                if job.advance_transfer() {
                    job.set_state(JobState::Ready);
                    report.transfers_finished += 1;

                    let next = resource.reservations.jobs().nth(position + 1);
                    if let Some(next_job) = next.and_then(|key| jobs.get_mut(key)) {
                        if next_job.state == JobState::TransferringIn(TransferPhase::Queued) {
                            next_job.set_state(JobState::TransferringIn(TransferPhase::Sending));
                        }
                    }
                }
                break;
            }
            JobState::TransferringIn(TransferPhase::Queued) => {
                job.set_state(JobState::TransferringIn(TransferPhase::Sending));
                break;
            }
            _ => {}
        }
    }
}
