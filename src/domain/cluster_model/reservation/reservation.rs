use crate::domain::cluster_model::job::job::JobKey;

/// Binding of one job to the service queue of one resource.
///
/// A reservation carries no state of its own. Its position in the
/// [`ReservationQueue`](super::reservation_queue::ReservationQueue) is the service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reservation {
    pub job: JobKey,
}

impl Reservation {
    pub fn new(job: JobKey) -> Self {
        Self { job }
    }
}
