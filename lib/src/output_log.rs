//! Serializable run log: graph bounds, processor allocation, the emitted
//! timeline, and the derived metrics, dumped to YAML.
use getset::{CopyGetters, Getters};
use serde_derive::{Deserialize, Serialize};

use crate::errors::SchedulerError;
use crate::metrics::ScheduleMetrics;
use crate::policy::{static_allocation, AllocationPolicy};
use crate::scheduler::{ScheduleEntry, SchedulerConfig, SimulationResult};
use crate::task_graph::TaskGraph;
use crate::topology::{
    critical_path_length, hyper_period, max_parallelism, min_core_count, total_work,
};
use crate::util::write_timestamped_yaml;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, CopyGetters)]
pub struct GraphInfo {
    #[getset(get_copy = "pub")]
    node_count: usize,
    #[getset(get_copy = "pub")]
    volume: i32,
    #[getset(get_copy = "pub")]
    critical_path_length: i32,
    #[getset(get_copy = "pub")]
    max_parallelism: usize,
    #[getset(get_copy = "pub")]
    min_core_count: usize,
    #[getset(get_copy = "pub")]
    hyper_period: Option<i32>,
}

impl GraphInfo {
    pub fn new(graph: &TaskGraph, num_cores: usize) -> Self {
        let volume = total_work(graph);
        let critical_path = critical_path_length(graph);
        Self {
            node_count: graph.node_count(),
            volume,
            critical_path_length: critical_path,
            max_parallelism: max_parallelism(graph),
            min_core_count: min_core_count(volume, critical_path, num_cores),
            hyper_period: hyper_period(graph),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, CopyGetters)]
pub struct ProcessorInfo {
    #[getset(get_copy = "pub")]
    number_of_cores: usize,
    /// Cores the allocation policy admits; equals `number_of_cores` under
    /// dynamic allocation.
    #[getset(get_copy = "pub")]
    allocated_cores: usize,
}

impl ProcessorInfo {
    pub fn new(graph: &TaskGraph, config: &SchedulerConfig) -> Self {
        let allocated_cores = match config.allocation_policy {
            AllocationPolicy::Static => {
                let info = GraphInfo::new(graph, config.num_cores);
                static_allocation(config.num_cores, info.max_parallelism, info.min_core_count)
                    .len()
            }
            AllocationPolicy::Dynamic => config.num_cores,
        };
        Self {
            number_of_cores: config.num_cores,
            allocated_cores,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct SimulationLog {
    #[getset(get = "pub")]
    scheduling_policy: String,
    #[getset(get = "pub")]
    allocation_policy: String,
    #[getset(get = "pub")]
    graph_info: GraphInfo,
    #[getset(get = "pub")]
    processor_info: ProcessorInfo,
    #[getset(get = "pub")]
    schedule: Vec<ScheduleEntry>,
    #[getset(get_copy = "pub")]
    total_delay: i32,
    #[getset(get = "pub")]
    metrics: ScheduleMetrics,
}

impl SimulationLog {
    pub fn new(graph: &TaskGraph, config: &SchedulerConfig, result: &SimulationResult) -> Self {
        Self {
            scheduling_policy: config.scheduling_policy.to_string(),
            allocation_policy: config.allocation_policy.to_string(),
            graph_info: GraphInfo::new(graph, config.num_cores),
            processor_info: ProcessorInfo::new(graph, config),
            schedule: result.schedule.clone(),
            total_delay: result.total_delay,
            metrics: ScheduleMetrics::from_result(result, config.num_cores),
        }
    }

    /// Writes the log as a timestamped YAML file and returns its path.
    pub fn write_yaml(&self, dir_path: &str, run_name: &str) -> Result<String, SchedulerError> {
        write_timestamped_yaml(dir_path, run_name, self)
    }
}
