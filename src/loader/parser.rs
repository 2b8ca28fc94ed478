use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed or does not match `T`.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let file_path = file_path.as_ref();
    log::debug!("Reading JSON from '{}'.", file_path.display());

    let data = fs::read_to_string(file_path)?;
    let parsed_data: T = serde_json::from_str(&data)?;

    Ok(parsed_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::simulation_config_dto::SimulationConfigDto;
    use crate::error::Error;

    #[test]
    fn parses_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "policy": "ar", "pAddJob": 900, "jobTransferRange": { "min": 1, "max": 3 } }"#).unwrap();

        let dto: SimulationConfigDto = parse_json_file(&path).unwrap();

        assert_eq!(dto.policy.as_deref(), Some("ar"));
        assert_eq!(dto.p_add_job, Some(900));
        assert_eq!(dto.job_transfer_range.map(|r| (r.min, r.max)), Some((1, 3)));
        assert!(dto.seed.is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_json_file::<SimulationConfigDto>(dir.path().join("nope.json"));

        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn unknown_field_is_a_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "pAddJobs": 900 }"#).unwrap();

        let result = parse_json_file::<SimulationConfigDto>(&path);

        assert!(matches!(result, Err(Error::DeserializationError(_))));
    }
}
