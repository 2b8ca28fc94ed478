use serde::{Deserialize, Serialize};

/// JSON shape of a simulation config file. Every field is optional; missing
/// fields fall back to the defaults of the selected policy.
///
/// ```json
/// {
///   "policy": "mixed",
///   "recordInterval": 500,
///   "maxCompletions": 100000,
///   "jobWorkloadRange": { "min": 50, "max": 999 },
///   "pAddJob": 200,
///   "wFcfs": 1,
///   "wLwf": 1
/// }
/// ```
#[derive(Debug, Deserialize, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimulationConfigDto {
    pub policy: Option<String>,
    pub seed: Option<u64>,
    pub record_interval: Option<u64>,
    pub max_completions: Option<u64>,
    pub max_ticks: Option<u64>,
    pub initial_resources: Option<u32>,
    pub resource_level_range: Option<RangeDto>,
    pub job_workload_range: Option<RangeDto>,
    pub job_transfer_range: Option<RangeDto>,
    pub p_add_resource: Option<u32>,
    pub p_add_job: Option<u32>,
    pub p_resource_leave: Option<u32>,
    pub w_fcfs: Option<i64>,
    pub w_lwf: Option<i64>,
    pub tick_interval_ms: Option<u64>,
    pub output_file: Option<String>,
}

/// Inclusive bounds of a uniform draw.
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RangeDto {
    pub min: i64,
    pub max: i64,
}
