use std::collections::VecDeque;

use crate::domain::cluster_model::job::job::JobKey;
use crate::domain::cluster_model::reservation::reservation::Reservation;
use crate::error::{Error, Result};

/// FIFO of the reservations of one resource. Insertion order is service order.
#[derive(Debug, Clone, Default)]
pub struct ReservationQueue {
    queue: VecDeque<Reservation>,
}

impl ReservationQueue {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Appends a reservation for `job` at the tail.
    ///
    /// A job may only be reserved once per queue; a second push for the same job is ignored.
    pub fn push(&mut self, job: JobKey) -> Result<()> {
        if self.contains(job) {
            log::warn!("Job {:?} is already reserved on this resource, ignoring duplicate reservation.", job);
            return Ok(());
        }
        self.queue.try_reserve(1).map_err(|_| Error::AllocationError("reservation"))?;
        self.queue.push_back(Reservation::new(job));
        Ok(())
    }

    pub fn head(&self) -> Option<&Reservation> {
        self.queue.front()
    }

    pub fn pop_head(&mut self) -> Option<Reservation> {
        self.queue.pop_front()
    }

    pub fn contains(&self, job: JobKey) -> bool {
        self.queue.iter().any(|reservation| reservation.job == job)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Jobs from head to tail.
    pub fn jobs(&self) -> impl Iterator<Item = JobKey> + '_ {
        self.queue.iter().map(|reservation| reservation.job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn job_keys(n: usize) -> Vec<JobKey> {
        let mut map: SlotMap<JobKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn queue_is_fifo() {
        let keys = job_keys(3);
        let mut queue = ReservationQueue::new();
        for &key in &keys {
            queue.push(key).unwrap();
        }

        assert_eq!(queue.jobs().collect::<Vec<_>>(), keys);
        assert_eq!(queue.pop_head().map(|r| r.job), Some(keys[0]));
        assert_eq!(queue.head().map(|r| r.job), Some(keys[1]));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn same_job_is_reserved_once() {
        let keys = job_keys(1);
        let mut queue = ReservationQueue::new();
        queue.push(keys[0]).unwrap();
        queue.push(keys[0]).unwrap();

        assert_eq!(queue.len(), 1);
    }
}
