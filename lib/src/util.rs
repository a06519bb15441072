//! Timestamped YAML log output.
use std::fs;
use std::path::Path;

use chrono::Utc;
use log::info;
use serde::Serialize;

use crate::errors::SchedulerError;

/// Serializes a log structure to `<dir>/<run_name>-<UTC stamp>.yaml`,
/// creating the directory on demand, and returns the written path.
pub fn write_timestamped_yaml(
    dir_path: &str,
    run_name: &str,
    log: &impl Serialize,
) -> Result<String, SchedulerError> {
    let dir = Path::new(dir_path);
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|err| {
            SchedulerError::Output(format!("cannot create log directory {}: {}", dir_path, err))
        })?;
        info!("Created log directory {}.", dir_path);
    }

    let stamp = Utc::now().format("%Y-%m-%d-%H-%M-%S");
    let file_path = dir.join(format!("{}-{}.yaml", run_name, stamp));
    let yaml = serde_yaml::to_string(log).map_err(|err| {
        SchedulerError::Output(format!("cannot serialize {} log: {}", run_name, err))
    })?;
    fs::write(&file_path, yaml).map_err(|err| {
        SchedulerError::Output(format!("cannot write {}: {}", file_path.display(), err))
    })?;

    Ok(file_path.to_string_lossy().into_owned())
}
