//! Queue-ordering and core-allocation policies. Both are small capability
//! points: an ordering over the eligible set and an admissible-core window
//! over the idle pool.
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::errors::SchedulerError;
use crate::task_graph::TaskGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingPolicy {
    Fcfs,
    Pas,
}

impl FromStr for SchedulingPolicy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" => Ok(SchedulingPolicy::Fcfs),
            "pas" => Ok(SchedulingPolicy::Pas),
            other => Err(SchedulerError::Policy(other.to_string())),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingPolicy::Fcfs => write!(f, "fcfs"),
            SchedulingPolicy::Pas => write!(f, "pas"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPolicy {
    Static,
    Dynamic,
}

impl FromStr for AllocationPolicy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(AllocationPolicy::Static),
            "dynamic" => Ok(AllocationPolicy::Dynamic),
            other => Err(SchedulerError::Policy(other.to_string())),
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPolicy::Static => write!(f, "static"),
            AllocationPolicy::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Orders the eligible set. FCFS sorts by `(eligible_time, name)`; PAS sorts
/// by `(priority descending, eligible_time, name)`. The name tie-break keeps
/// the schedule deterministic.
pub fn order_eligible(
    eligible: &[String],
    graph: &TaskGraph,
    eta: &BTreeMap<String, i32>,
    policy: SchedulingPolicy,
) -> Vec<String> {
    let mut ordered = eligible.to_vec();
    match policy {
        SchedulingPolicy::Fcfs => {
            ordered.sort_by_key(|name| (*eta.get(name).unwrap_or(&0), name.clone()));
        }
        SchedulingPolicy::Pas => {
            ordered.sort_by_key(|name| {
                (
                    Reverse(graph.priority(name)),
                    *eta.get(name).unwrap_or(&0),
                    name.clone(),
                )
            });
        }
    }
    ordered
}

/// Admissible cores under static allocation: the lowest
/// `max(1, min(num_cores, p_max, n_min))` indices, fixed for the run.
pub fn static_allocation(num_cores: usize, p_max: usize, n_min: usize) -> BTreeSet<usize> {
    let c_alloc = num_cores.min(p_max).min(n_min).max(1);
    (0..c_alloc).collect()
}

/// Admissible cores under dynamic allocation: the first
/// `min(|idle|, |eligible|)` idle cores, recomputed at every decision point.
pub fn dynamic_allocation(idle_cores: &BTreeSet<usize>, eligible_len: usize) -> BTreeSet<usize> {
    idle_cores
        .iter()
        .copied()
        .take(idle_cores.len().min(eligible_len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_graph::RunnableData;

    fn graph_with_priorities() -> TaskGraph {
        TaskGraph::new(vec![
            RunnableData::periodic("A", 10, 1, 1),
            RunnableData::periodic("B", 10, 1, 3),
            RunnableData::periodic("C", 10, 1, 3),
        ])
        .unwrap()
    }

    fn eta(pairs: &[(&str, i32)]) -> BTreeMap<String, i32> {
        pairs
            .iter()
            .map(|(name, time)| (name.to_string(), *time))
            .collect()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_order_eligible_fcfs_by_eligible_time_then_name() {
        let graph = graph_with_priorities();
        let ordered = order_eligible(
            &names(&["C", "B", "A"]),
            &graph,
            &eta(&[("A", 5), ("B", 0), ("C", 0)]),
            SchedulingPolicy::Fcfs,
        );
        assert_eq!(ordered, names(&["B", "C", "A"]));
    }

    #[test]
    fn test_order_eligible_pas_highest_priority_first() {
        let graph = graph_with_priorities();
        let ordered = order_eligible(
            &names(&["A", "B", "C"]),
            &graph,
            &eta(&[("A", 0), ("B", 0), ("C", 0)]),
            SchedulingPolicy::Pas,
        );
        assert_eq!(ordered, names(&["B", "C", "A"]));
    }

    #[test]
    fn test_order_eligible_pas_eligible_time_breaks_priority_tie() {
        let graph = graph_with_priorities();
        let ordered = order_eligible(
            &names(&["B", "C"]),
            &graph,
            &eta(&[("B", 7), ("C", 2)]),
            SchedulingPolicy::Pas,
        );
        assert_eq!(ordered, names(&["C", "B"]));
    }

    #[test]
    fn test_static_allocation_clamped_by_bounds() {
        assert_eq!(
            static_allocation(6, 2, 4),
            BTreeSet::from([0, 1])
        );
        assert_eq!(static_allocation(1, 4, 4), BTreeSet::from([0]));
        assert_eq!(static_allocation(6, 1, 0), BTreeSet::from([0]));
    }

    #[test]
    fn test_dynamic_allocation_matches_demand() {
        let idle = BTreeSet::from([0, 2, 5]);
        assert_eq!(dynamic_allocation(&idle, 2), BTreeSet::from([0, 2]));
        assert_eq!(dynamic_allocation(&idle, 0), BTreeSet::new());
        assert_eq!(dynamic_allocation(&idle, 9), idle);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("FCFS".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Fcfs);
        assert_eq!("pas".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Pas);
        assert_eq!("Static".parse::<AllocationPolicy>().unwrap(), AllocationPolicy::Static);
        assert_eq!("dynamic".parse::<AllocationPolicy>().unwrap(), AllocationPolicy::Dynamic);
        assert!(matches!(
            "edf".parse::<SchedulingPolicy>(),
            Err(SchedulerError::Policy(_))
        ));
        assert!(matches!(
            "greedy".parse::<AllocationPolicy>(),
            Err(SchedulerError::Policy(_))
        ));
    }
}
