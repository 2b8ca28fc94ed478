use std::fmt;
use std::str::FromStr;

use crate::domain::cluster_model::config::SimulationConfig;
use crate::domain::cluster_model::policy_trait::SchedulingPolicy;
use crate::domain::cluster_model::scheduler::ar_scheduler::AdvanceReservationPolicy;
use crate::domain::cluster_model::scheduler::mixed_scheduler::MixedPolicy;
use crate::error::ConversionError;

/// The scheduling policies a simulation can be run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyType {
    /// Jobs are queued per resource and served strictly in reservation order.
    AdvanceReservation,

    /// Waiting jobs are scored by wait time and workload and bound to a free resource.
    Mixed,
}

impl FromStr for PolicyType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ar" | "advance-reservation" | "advancereservation" => Ok(PolicyType::AdvanceReservation),
            "mixed" => Ok(PolicyType::Mixed),
            _ => Err(ConversionError::UnknownPolicyType(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyType::AdvanceReservation => write!(f, "ar"),
            PolicyType::Mixed => write!(f, "mixed"),
        }
    }
}

impl PolicyType {
    // Factory method to create the concrete policy
    pub fn get_instance(&self, config: &SimulationConfig) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyType::AdvanceReservation => Box::new(AdvanceReservationPolicy::new()),
            PolicyType::Mixed => Box::new(MixedPolicy::new(config.w_fcfs, config.w_lwf)),
        }
    }

    /// Snapshot file written when the config names none.
    pub fn default_output_file(&self) -> &'static str {
        match self {
            PolicyType::AdvanceReservation => "ar-sim.out.txt",
            PolicyType::Mixed => "mixed-sim.out.txt",
        }
    }
}
