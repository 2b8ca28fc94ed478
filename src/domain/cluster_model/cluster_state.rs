use crate::domain::cluster_model::job::job::{Job, JobKey};
use crate::domain::cluster_model::resource::resource::{Resource, ResourceKey};
use crate::domain::cluster_model::utils::entity_pool::EntityPool;
use crate::domain::cluster_model::utils::id::{IdSequence, JobTag, ResourceTag};
use crate::error::Result;

/// All live entities of one simulation run.
///
/// Owned by exactly one [`Simulation`](crate::domain::simulator::simulator::Simulation)
/// and handed to every phase of a tick as `&mut`.
#[derive(Debug)]
pub struct ClusterState {
    pub resources: EntityPool<ResourceKey, Resource>,
    pub jobs: EntityPool<JobKey, Job>,

    resource_ids: IdSequence<ResourceTag>,
    job_ids: IdSequence<JobTag>,

    /// Set once the initial resources were created.
    seeded: bool,
}

impl ClusterState {
    pub fn new() -> Self {
        Self {
            resources: EntityPool::new("resource"),
            jobs: EntityPool::new("job"),
            resource_ids: IdSequence::new(),
            job_ids: IdSequence::new(),
            seeded: false,
        }
    }

    /// Appends a fresh `Available` resource.
    pub fn add_resource(&mut self, level: i64) -> Result<ResourceKey> {
        let resource = Resource::new(self.resource_ids.next_id(), level);
        let id = resource.id;
        let key = self.resources.insert(resource)?;
        log::debug!("Resource {} joined the cluster (level {}).", id, level);
        Ok(key)
    }

    /// Appends a fresh `Waiting` job.
    pub fn add_job(&mut self, workload: i64, transfer_remaining: i64) -> Result<JobKey> {
        let job = Job::new(self.job_ids.next_id(), workload, transfer_remaining);
        let id = job.id;
        let key = self.jobs.insert(job)?;
        log::debug!("Job {} submitted (workload {}, transfer {}).", id, workload, transfer_remaining);
        Ok(key)
    }

    /// Removes every `Done` job and every `Leaving` resource.
    ///
    /// # Returns
    /// `(removed_jobs, removed_resources)`.
    pub fn purge_terminated(&mut self) -> (usize, usize) {
        let removed_jobs = self.jobs.remove_if(Job::is_done);
        let removed_resources = self.resources.remove_if(Resource::is_leaving);

        if removed_jobs + removed_resources > 0 {
            log::trace!("Purged {} done jobs and {} leaving resources.", removed_jobs, removed_resources);
        }
        (removed_jobs, removed_resources)
    }

    pub fn resource(&self, key: ResourceKey) -> Option<&Resource> {
        self.resources.get(key)
    }

    pub fn job(&self, key: JobKey) -> Option<&Job> {
        self.jobs.get(key)
    }

    /// Total number of jobs ever submitted.
    pub fn jobs_submitted(&self) -> u64 {
        self.job_ids.issued()
    }

    /// Total number of resources ever created.
    pub fn resources_created(&self) -> u64 {
        self.resource_ids.issued()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn mark_seeded(&mut self) {
        self.seeded = true;
    }

    /// Mean `wait_time` over all live jobs, 0 for an empty pool.
    pub fn mean_wait_time(&self) -> f64 {
        let mut mean = 0.0;
        let mut count = 0.0;
        for (_, job) in self.jobs.iter() {
            mean = (mean * count + job.wait_time as f64) / (count + 1.0);
            count += 1.0;
        }
        mean
    }
}

impl Default for ClusterState {
    fn default() -> Self {
        Self::new()
    }
}
