//! Generate a task graph from runnable description JSON files.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde_derive::{Deserialize, Serialize};

use crate::errors::SchedulerError;
use crate::task_graph::{RunnableData, RunnableKind, TaskGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnableType {
    Periodic,
    Event,
}

/// One entry of the on-disk format: a top-level JSON object maps each
/// runnable name to this record. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnableSpec {
    #[serde(rename = "type")]
    pub runnable_type: RunnableType,
    pub execution_time: i32,
    #[serde(default)]
    pub period: i32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub deps: Vec<String>,
}

impl RunnableSpec {
    pub fn periodic(period: i32, execution_time: i32, priority: i32) -> Self {
        Self {
            runnable_type: RunnableType::Periodic,
            execution_time,
            period,
            priority,
            deps: Vec::new(),
        }
    }

    pub fn event(execution_time: i32, priority: i32, deps: &[&str]) -> Self {
        Self {
            runnable_type: RunnableType::Event,
            execution_time,
            period: 0,
            priority,
            deps: deps.iter().map(|dep| dep.to_string()).collect(),
        }
    }
}

/// Converts parsed specs to a validated graph. Dependencies naming absent
/// runnables are dropped with a warning, matching the wire-format contract;
/// programmatic construction through `TaskGraph::new` stays strict.
pub fn task_graph_from_specs(
    specs: &BTreeMap<String, RunnableSpec>,
) -> Result<TaskGraph, SchedulerError> {
    let mut runnables = Vec::with_capacity(specs.len());
    for (name, spec) in specs {
        let deps: Vec<String> = spec
            .deps
            .iter()
            .filter(|dep| {
                if specs.contains_key(*dep) {
                    true
                } else {
                    warn!("Dropping unknown dependency {} of runnable {}.", dep, name);
                    false
                }
            })
            .cloned()
            .collect();
        let kind = match spec.runnable_type {
            RunnableType::Periodic => RunnableKind::Periodic {
                period: spec.period,
            },
            RunnableType::Event => RunnableKind::Event,
        };
        runnables.push(RunnableData {
            name: name.clone(),
            kind,
            execution_time: spec.execution_time,
            priority: spec.priority,
            deps,
        });
    }
    TaskGraph::new(runnables)
}

/// Loads one runnable description file and returns a validated graph.
pub fn create_task_graph_from_json(file_path: &str) -> Result<TaskGraph, SchedulerError> {
    let specs = load_specs_from_json(file_path)?;
    task_graph_from_specs(&specs)
}

pub fn load_specs_from_json(
    file_path: &str,
) -> Result<BTreeMap<String, RunnableSpec>, SchedulerError> {
    let contents = fs::read_to_string(file_path).map_err(|err| {
        SchedulerError::InputShape(format!("failed to read {}: {}", file_path, err))
    })?;
    serde_json::from_str(&contents).map_err(|err| {
        SchedulerError::InputShape(format!("failed to parse {}: {}", file_path, err))
    })
}

/// Loads every `.json` file in a directory, in file name order.
pub fn create_task_graph_set_from_dir(dir_path: &str) -> Result<Vec<TaskGraph>, SchedulerError> {
    let mut graphs = Vec::new();
    for file_path in json_paths_from_dir(dir_path)? {
        graphs.push(create_task_graph_from_json(&file_path)?);
    }
    Ok(graphs)
}

pub fn json_paths_from_dir(dir_path: &str) -> Result<Vec<String>, SchedulerError> {
    let entries = fs::read_dir(dir_path).map_err(|err| {
        SchedulerError::InputShape(format!("failed to read directory {}: {}", dir_path, err))
    })?;
    let mut paths: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    paths.sort();
    Ok(paths)
}

pub fn dump_specs_to_json(
    file_path: &str,
    specs: &BTreeMap<String, RunnableSpec>,
) -> Result<(), SchedulerError> {
    if let Some(parent) = Path::new(file_path).parent() {
        fs::create_dir_all(parent).map_err(|err| {
            SchedulerError::InputShape(format!("failed to create {}: {}", parent.display(), err))
        })?;
    }
    let contents = serde_json::to_string_pretty(specs).map_err(|err| {
        SchedulerError::InputShape(format!("failed to serialize {}: {}", file_path, err))
    })?;
    fs::write(file_path, contents).map_err(|err| {
        SchedulerError::InputShape(format!("failed to write {}: {}", file_path, err))
    })
}
