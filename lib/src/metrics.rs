//! Post-run metrics over a completed timeline.
use getset::{CopyGetters, Getters};
use serde_derive::{Deserialize, Serialize};

use crate::scheduler::SimulationResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, CopyGetters)]
pub struct CoreUtilization {
    #[getset(get_copy = "pub")]
    core_id: usize,
    #[getset(get_copy = "pub")]
    busy_time: i32,
    #[getset(get_copy = "pub")]
    utilization: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct ScheduleMetrics {
    #[getset(get_copy = "pub")]
    makespan: i32,
    #[getset(get_copy = "pub")]
    executed_instances: usize,
    /// Queueing wait across entries plus the accumulated release and event
    /// shift delay.
    #[getset(get_copy = "pub")]
    total_wait_time: i32,
    #[getset(get_copy = "pub")]
    average_wait_time: f32,
    #[getset(get_copy = "pub")]
    average_execution_time: f32,
    #[getset(get = "pub")]
    core_utilization: Vec<CoreUtilization>,
}

impl ScheduleMetrics {
    pub fn from_result(result: &SimulationResult, num_cores: usize) -> Self {
        let executed_instances = result.schedule.len();

        let entry_wait: i32 = result
            .schedule
            .iter()
            .map(|entry| (entry.start_time - entry.eligible_time).max(0))
            .sum();
        let total_wait_time = entry_wait + result.total_delay;
        let average_wait_time = if executed_instances > 0 {
            total_wait_time as f32 / executed_instances as f32
        } else {
            0.0
        };

        let total_execution: i32 = result
            .schedule
            .iter()
            .map(|entry| entry.finish_time - entry.start_time)
            .sum();
        let average_execution_time = if executed_instances > 0 {
            total_execution as f32 / executed_instances as f32
        } else {
            0.0
        };

        let mut busy_time = vec![0; num_cores];
        for entry in &result.schedule {
            if entry.core < num_cores {
                busy_time[entry.core] += entry.finish_time - entry.start_time;
            }
        }
        let core_utilization = busy_time
            .into_iter()
            .enumerate()
            .map(|(core_id, busy)| CoreUtilization {
                core_id,
                busy_time: busy,
                utilization: if result.makespan > 0 {
                    busy as f32 / result.makespan as f32
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            makespan: result.makespan,
            executed_instances,
            total_wait_time,
            average_wait_time,
            average_execution_time,
            core_utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ScheduleEntry;

    fn entry(name: &str, start: i32, finish: i32, core: usize, eligible: i32) -> ScheduleEntry {
        ScheduleEntry {
            name: name.to_string(),
            start_time: start,
            finish_time: finish,
            core,
            eligible_time: eligible,
        }
    }

    fn sample_result() -> SimulationResult {
        SimulationResult {
            schedule: vec![
                entry("A", 0, 3, 0, 0),
                entry("B", 0, 2, 1, 0),
                entry("C", 4, 6, 0, 3),
            ],
            makespan: 6,
            total_delay: 5,
        }
    }

    #[test]
    fn test_metrics_wait_and_execution_averages() {
        let metrics = ScheduleMetrics::from_result(&sample_result(), 2);

        assert_eq!(metrics.executed_instances(), 3);
        // Entry wait 1 (C) plus 5 accumulated delay.
        assert_eq!(metrics.total_wait_time(), 6);
        assert_eq!(metrics.average_wait_time(), 2.0);
        // (3 + 2 + 2) / 3
        assert!((metrics.average_execution_time() - 7.0 / 3.0).abs() < 1e-6);
        assert_eq!(metrics.makespan(), 6);
    }

    #[test]
    fn test_metrics_core_utilization() {
        let metrics = ScheduleMetrics::from_result(&sample_result(), 3);
        let cores = metrics.core_utilization();

        assert_eq!(cores.len(), 3);
        assert_eq!(cores[0].busy_time(), 5);
        assert!((cores[0].utilization() - 5.0 / 6.0).abs() < 1e-6);
        assert_eq!(cores[1].busy_time(), 2);
        assert!((cores[1].utilization() - 2.0 / 6.0).abs() < 1e-6);
        assert_eq!(cores[2].busy_time(), 0);
        assert_eq!(cores[2].utilization(), 0.0);
    }

    #[test]
    fn test_metrics_empty_schedule() {
        let result = SimulationResult::default();
        let metrics = ScheduleMetrics::from_result(&result, 2);

        assert_eq!(metrics.executed_instances(), 0);
        assert_eq!(metrics.total_wait_time(), 0);
        assert_eq!(metrics.average_wait_time(), 0.0);
        assert_eq!(metrics.average_execution_time(), 0.0);
        assert!(metrics.core_utilization().iter().all(|c| c.utilization() == 0.0));
    }
}
