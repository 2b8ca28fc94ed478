use crate::api::simulation_config_dto::{RangeDto, SimulationConfigDto};
use crate::domain::cluster_model::policy_type::PolicyType;
use crate::domain::simulator::random_source::{PERMILLE, RandomSource};
use crate::error::ConversionError;

/// Inclusive bounds of a uniform integer draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformRange {
    pub min: i64,
    pub max: i64,
}

impl UniformRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut dyn RandomSource) -> i64 {
        rng.draw_inclusive(self.min, self.max)
    }

    fn validate(&self, name: &'static str) -> Result<(), ConversionError> {
        if self.min > self.max {
            return Err(ConversionError::EmptyRange { name, min: self.min, max: self.max });
        }
        Ok(())
    }
}

impl From<RangeDto> for UniformRange {
    fn from(dto: RangeDto) -> Self {
        UniformRange::new(dto.min, dto.max)
    }
}

/// Validated parameters of one simulation run.
///
/// All probabilities are integers out of 1000.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub policy: PolicyType,

    /// Seed of the random source. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Completions between two statistics snapshots.
    pub record_interval: u64,

    /// The run ends once this many jobs completed.
    pub max_completions: u64,

    /// Optional upper bound on the number of ticks, for runs that may never reach `max_completions`.
    pub max_ticks: Option<u64>,

    /// Resources created unconditionally on the first tick.
    pub initial_resources: u32,

    pub resource_level_range: UniformRange,
    pub job_workload_range: UniformRange,
    pub job_transfer_range: UniformRange,

    /// Chance per tick to add a resource.
    pub p_add_resource: u32,

    /// Chance per tick to add a job. Shares the admission draw with `p_add_resource`,
    /// so at most `1000 - p_add_resource` of it can take effect.
    pub p_add_job: u32,

    /// Chance for a resource to leave after completing a job.
    pub p_resource_leave: u32,

    /// Weight of the wait time in the mixed policy score.
    pub w_fcfs: i64,

    /// Weight of the workload in the mixed policy score.
    pub w_lwf: i64,

    /// Wall-clock delay between two ticks of the run loop. 0 runs as fast as possible.
    pub tick_interval_ms: u64,

    /// Snapshot file. `None` keeps snapshots in memory only.
    pub output_file: Option<String>,
}

impl SimulationConfig {
    /// Defaults of the given policy.
    pub fn for_policy(policy: PolicyType) -> Self {
        let p_add_job = match policy {
            PolicyType::AdvanceReservation => 950,
            PolicyType::Mixed => 200,
        };

        SimulationConfig {
            policy,
            seed: None,
            record_interval: 500,
            max_completions: 100_000,
            max_ticks: None,
            initial_resources: 5,
            resource_level_range: UniformRange::new(1, 5),
            job_workload_range: UniformRange::new(50, 999),
            job_transfer_range: UniformRange::new(0, 29),
            p_add_resource: 50,
            p_add_job,
            p_resource_leave: 300,
            w_fcfs: 1,
            w_lwf: 1,
            tick_interval_ms: 0,
            output_file: Some(policy.default_output_file().to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), ConversionError> {
        if self.record_interval == 0 {
            return Err(ConversionError::ZeroValue("recordInterval"));
        }
        if self.max_completions == 0 {
            return Err(ConversionError::ZeroValue("maxCompletions"));
        }

        self.resource_level_range.validate("resourceLevelRange")?;
        self.job_workload_range.validate("jobWorkloadRange")?;
        self.job_transfer_range.validate("jobTransferRange")?;

        if self.resource_level_range.min <= 0 {
            return Err(ConversionError::ZeroValue("resourceLevelRange.min"));
        }

        for (name, value) in
            [("pAddResource", self.p_add_resource), ("pAddJob", self.p_add_job), ("pResourceLeave", self.p_resource_leave)]
        {
            if u64::from(value) > PERMILLE {
                return Err(ConversionError::ProbabilityOutOfRange { name, value });
            }
        }

        if self.p_add_resource + self.p_add_job > PERMILLE as u32 {
            log::warn!(
                "pAddResource ({}) + pAddJob ({}) exceed 1000, the effective job probability is {}/1000.",
                self.p_add_resource,
                self.p_add_job,
                PERMILLE as u32 - self.p_add_resource
            );
        }

        Ok(())
    }
}

impl TryFrom<(SimulationConfigDto, Option<PolicyType>)> for SimulationConfig {
    type Error = ConversionError;

    /// Builds the config from a DTO. An explicit `policy` wins over the one named in the DTO.
    fn try_from(args: (SimulationConfigDto, Option<PolicyType>)) -> Result<Self, Self::Error> {
        let (dto, policy) = args;

        let policy = match (policy, dto.policy.as_deref()) {
            (Some(policy), _) => policy,
            (None, Some(name)) => name.parse()?,
            (None, None) => PolicyType::AdvanceReservation,
        };

        let defaults = SimulationConfig::for_policy(policy);

        let config = SimulationConfig {
            policy,
            seed: dto.seed.or(defaults.seed),
            record_interval: dto.record_interval.unwrap_or(defaults.record_interval),
            max_completions: dto.max_completions.unwrap_or(defaults.max_completions),
            max_ticks: dto.max_ticks.or(defaults.max_ticks),
            initial_resources: dto.initial_resources.unwrap_or(defaults.initial_resources),
            resource_level_range: dto.resource_level_range.map(UniformRange::from).unwrap_or(defaults.resource_level_range),
            job_workload_range: dto.job_workload_range.map(UniformRange::from).unwrap_or(defaults.job_workload_range),
            job_transfer_range: dto.job_transfer_range.map(UniformRange::from).unwrap_or(defaults.job_transfer_range),
            p_add_resource: dto.p_add_resource.unwrap_or(defaults.p_add_resource),
            p_add_job: dto.p_add_job.unwrap_or(defaults.p_add_job),
            p_resource_leave: dto.p_resource_leave.unwrap_or(defaults.p_resource_leave),
            w_fcfs: dto.w_fcfs.unwrap_or(defaults.w_fcfs),
            w_lwf: dto.w_lwf.unwrap_or(defaults.w_lwf),
            tick_interval_ms: dto.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
            output_file: dto.output_file.or(defaults.output_file),
        };

        config.validate()?;
        Ok(config)
    }
}
