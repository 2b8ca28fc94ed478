pub mod admission;
pub mod cluster_state;
pub mod config;
pub mod executor;
pub mod job;
pub mod policy_trait;
pub mod policy_type;
pub mod reservation;
pub mod resource;
pub mod scheduler;
pub mod statistics;
pub mod utils;
