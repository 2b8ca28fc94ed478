use slotmap::new_key_type;

use crate::domain::cluster_model::reservation::reservation_queue::ReservationQueue;
use crate::domain::cluster_model::utils::id::ResourceId;

new_key_type! {
    /// Handle of a resource inside the resource pool.
    pub struct ResourceKey;
}

/// Lifecycle state of a simulated server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Idle and ready to take a job.
    Available,

    /// Serving at least one job.
    Busy,

    /// Bound to a job whose input data is still being transferred (mixed policy).
    ReceivingData,

    /// Finishes its queued reservations but takes no new ones (advance reservation policy).
    NotAccepting,

    /// Left the cluster, removed by the next admission pass.
    Leaving,
}

/// A server of the simulated cluster.
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: ResourceId,

    pub state: ResourceState,

    /// Work units consumed from the running job per tick. Fixed at creation.
    pub level: i64,

    /// Ticks this resource has been part of the cluster.
    pub total_time: u64,

    /// Ticks this resource spent executing a job. Never exceeds `total_time`.
    pub used_time: u64,

    /// Remaining workload of all jobs reserved on this resource (advance reservation policy).
    pub total_workload: i64,

    /// FIFO of jobs reserved on this resource (advance reservation policy).
    pub reservations: ReservationQueue,
}

impl Resource {
    pub fn new(id: ResourceId, level: i64) -> Self {
        Self {
            id,
            state: ResourceState::Available,
            level,
            total_time: 0,
            used_time: 0,
            total_workload: 0,
            reservations: ReservationQueue::new(),
        }
    }

    pub fn is_leaving(&self) -> bool {
        self.state == ResourceState::Leaving
    }

    /// Whether the advance reservation scheduler may append a reservation.
    pub fn accepts_reservations(&self) -> bool {
        !matches!(self.state, ResourceState::NotAccepting | ResourceState::Leaving)
    }

    /// Share of the lifetime spent executing jobs, in percent.
    pub fn utilization_percent(&self) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        self.used_time as f64 / self.total_time as f64 * 100.0
    }

    pub fn set_state(&mut self, state: ResourceState) {
        if self.state != state {
            log::trace!("Resource {} {:?} -> {:?}", self.id, self.state, state);
            self.state = state;
        }
    }
}
