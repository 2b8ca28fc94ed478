use slotmap::new_key_type;

use crate::domain::cluster_model::resource::resource::ResourceKey;
use crate::domain::cluster_model::utils::id::JobId;

new_key_type! {
    /// Handle of a job inside the job pool.
    pub struct JobKey;
}

/// Progress of the input data transfer of a matched job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferPhase {
    /// Reserved, but an earlier job on the same resource still receives its data.
    Queued,

    /// Input data is being delivered, `transfer_remaining` counts down.
    Sending,
}

/// Lifecycle state of a simulated job.
///
/// `Waiting -> TransferringIn -> (Ready ->) Running -> Done`.
/// The mixed policy moves from `TransferringIn` straight to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Submitted, not matched to any resource yet.
    Waiting,

    /// Matched; input data has not fully arrived.
    TransferringIn(TransferPhase),

    /// Input data arrived, waiting to be started by its resource.
    Ready,

    Running,

    /// Finished, removed by the next admission pass.
    Done,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,

    pub state: JobState,

    /// Remaining work units.
    pub workload: i64,

    /// Ticks of input transfer still needed before the job can run.
    pub transfer_remaining: i64,

    /// Ticks spent in the system before running.
    pub wait_time: u64,

    /// Resource serving the job under the mixed policy. The handle may outlive the resource.
    pub assigned_resource: Option<ResourceKey>,
}

impl Job {
    pub fn new(id: JobId, workload: i64, transfer_remaining: i64) -> Self {
        Self { id, state: JobState::Waiting, workload, transfer_remaining, wait_time: 0, assigned_resource: None }
    }

    pub fn is_waiting(&self) -> bool {
        self.state == JobState::Waiting
    }

    pub fn is_done(&self) -> bool {
        self.state == JobState::Done
    }

    /// Jobs that have not started running yet accumulate wait time.
    pub fn is_pending(&self) -> bool {
        !matches!(self.state, JobState::Running | JobState::Done)
    }

    /// Consumes `level` work units.
    ///
    /// # Returns
    /// `true` if the job has no work left and moved to `Done`.
    pub fn consume(&mut self, level: i64) -> bool {
        self.workload -= level;
        if self.workload <= 0 {
            self.set_state(JobState::Done);
            return true;
        }
        false
    }

    /// Advances the input transfer by one tick.
    ///
    /// # Returns
    /// `true` if the countdown ran out during this tick.
    pub fn advance_transfer(&mut self) -> bool {
        self.transfer_remaining -= 1;
        self.transfer_remaining <= 0
    }

    pub fn set_state(&mut self, state: JobState) {
        if self.state != state {
            log::trace!("Job {} {:?} -> {:?}", self.id, self.state, state);
            self.state = state;
        }
    }
}
