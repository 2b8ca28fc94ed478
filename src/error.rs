use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse simulation config JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write statistics snapshot: {0}")]
    SnapshotWriteError(#[from] csv::Error),

    #[error("Could not grow the {0} pool")]
    AllocationError(&'static str),

    #[error("Invalid simulation config: {0}")]
    ConfigError(#[from] ConversionError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unknown policy type: '{0}' (expected 'ar' or 'mixed')")]
    UnknownPolicyType(String),

    #[error("Range '{name}' is empty: min {min} > max {max}")]
    EmptyRange { name: &'static str, min: i64, max: i64 },

    #[error("Probability '{name}' must be within 0..=1000, got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: u32 },

    #[error("'{0}' must be greater than zero")]
    ZeroValue(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
