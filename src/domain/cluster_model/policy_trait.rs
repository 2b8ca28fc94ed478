use crate::domain::cluster_model::cluster_state::ClusterState;
use crate::domain::cluster_model::job::job::JobKey;
use crate::domain::cluster_model::policy_type::PolicyType;
use crate::domain::cluster_model::resource::resource::ResourceKey;
use crate::domain::simulator::random_source::RandomSource;

/// A scheduling decision: `job` was matched to `resource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub job: JobKey,
    pub resource: ResourceKey,
}

/// What one execution pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Jobs whose input transfer finished.
    pub transfers_finished: usize,

    /// Jobs that moved to `Running`.
    pub started: usize,

    /// Jobs that moved to `Done`.
    pub completed: usize,

    /// Resources that decided to leave or stop accepting work.
    pub departures: usize,
}

/// One scheduling policy: how waiting jobs are matched to resources and how
/// matched jobs advance.
pub trait SchedulingPolicy: std::fmt::Debug {
    fn policy_type(&self) -> PolicyType;

    /// Matches at most one waiting job to a resource.
    fn schedule(&mut self, state: &mut ClusterState) -> Option<Binding>;

    /// Advances data transfers and running jobs by one tick.
    /// `p_resource_leave` is the per-completion departure chance out of 1000.
    fn execute(&mut self, state: &mut ClusterState, rng: &mut dyn RandomSource, p_resource_leave: u32) -> ExecutionReport;
}
