//! Analytical bounds derived from the task graph: total work, critical path
//! length, maximum parallelism, and the minimum useful core count.
use std::collections::{BTreeMap, BTreeSet};

use num_integer::lcm;

use crate::task_graph::TaskGraph;

/// Efficiency target of the DAG-aware Amdahl bound.
const EFFICIENCY_TARGET: f64 = 0.9;

pub fn total_work(graph: &TaskGraph) -> i32 {
    graph.runnables().map(|runnable| runnable.execution_time).sum()
}

/// Longest source-to-sink path weighted by execution time, via a longest-path
/// DP over the topological order.
pub fn critical_path_length(graph: &TaskGraph) -> i32 {
    let mut path_length: BTreeMap<&str, i32> = BTreeMap::new();
    for runnable in graph.topological_order() {
        let longest_prefix = graph
            .predecessors(&runnable.name)
            .iter()
            .map(|pred| path_length[pred] + graph.execution_time(pred))
            .max()
            .unwrap_or(0);
        path_length.insert(runnable.name.as_str(), longest_prefix);
    }

    graph
        .runnables()
        .map(|runnable| path_length[runnable.name.as_str()] + runnable.execution_time)
        .max()
        .unwrap_or(0)
}

/// Maximum parallelism: level-synchronous execution on unbounded cores,
/// recording the largest eligible frontier. At least 1.
pub fn max_parallelism(graph: &TaskGraph) -> usize {
    let mut completed: BTreeSet<&str> = BTreeSet::new();
    let mut eligible: BTreeSet<&str> = graph
        .runnables()
        .filter(|runnable| runnable.is_periodic() || runnable.deps.is_empty())
        .map(|runnable| runnable.name.as_str())
        .collect();
    let mut max_frontier = eligible.len();

    while !eligible.is_empty() {
        let frontier: Vec<&str> = eligible.iter().copied().collect();
        eligible.clear();
        completed.extend(frontier.iter().copied());

        for name in frontier {
            for succ in graph.successors(name) {
                if completed.contains(succ) || eligible.contains(succ) {
                    continue;
                }
                let preds = graph.predecessors(succ);
                if preds.iter().all(|pred| completed.contains(pred)) {
                    eligible.insert(succ);
                }
            }
        }
        max_frontier = max_frontier.max(eligible.len());
    }

    max_frontier.max(1)
}

/// Minimum useful core count per the DAG-aware Amdahl bound, with serial
/// fraction s = T_CP / W and efficiency target 0.9.
pub fn min_core_count(total_work: i32, critical_path: i32, num_cores: usize) -> usize {
    if total_work <= 0 {
        return 1;
    }

    let serial_fraction = (critical_path as f64 / total_work as f64).clamp(0.0, 1.0);
    let parallel_fraction = (1.0 - serial_fraction).max(0.0);

    if serial_fraction == 0.0 {
        return num_cores;
    }

    let epsilon = EFFICIENCY_TARGET.clamp(1e-9, 1.0 - 1e-9);
    let minimal = ((epsilon * parallel_fraction) / (serial_fraction * (1.0 - epsilon))).ceil();
    (minimal as usize).max(1)
}

/// `(P_max, N_min)` for one graph, as consumed by static allocation.
pub fn parallelism_bounds(graph: &TaskGraph, num_cores: usize) -> (usize, usize) {
    let p_max = max_parallelism(graph);
    let n_min = min_core_count(total_work(graph), critical_path_length(graph), num_cores);
    (p_max, n_min)
}

/// Least common multiple of the periodic source periods. None without
/// periodic sources. Reporting only; the horizon is work-derived.
pub fn hyper_period(graph: &TaskGraph) -> Option<i32> {
    graph
        .runnables()
        .filter_map(|runnable| runnable.period())
        .reduce(lcm)
}
