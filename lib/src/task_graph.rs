//! Runnable table and task graph construction (petgraph).
use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Direction::{Incoming, Outgoing};

use crate::errors::SchedulerError;

/// How a runnable is released: on a fixed period, or by tokens arriving on
/// every incoming edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnableKind {
    Periodic { period: i32 },
    Event,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnableData {
    pub name: String,
    pub kind: RunnableKind,
    pub execution_time: i32,
    pub priority: i32,
    pub deps: Vec<String>,
}

impl RunnableData {
    pub fn periodic(name: &str, period: i32, execution_time: i32, priority: i32) -> Self {
        Self {
            name: name.to_string(),
            kind: RunnableKind::Periodic { period },
            execution_time,
            priority,
            deps: Vec::new(),
        }
    }

    pub fn event(name: &str, execution_time: i32, priority: i32, deps: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: RunnableKind::Event,
            execution_time,
            priority,
            deps: deps.iter().map(|dep| dep.to_string()).collect(),
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self.kind, RunnableKind::Periodic { .. })
    }

    pub fn period(&self) -> Option<i32> {
        match self.kind {
            RunnableKind::Periodic { period } => Some(period),
            RunnableKind::Event => None,
        }
    }
}

/// Immutable runnable graph: one node per runnable, one edge per dependency,
/// with name-keyed lookup. Validated on construction; read-only for the
/// duration of a run.
pub struct TaskGraph {
    graph: Graph<RunnableData, ()>,
    name_index: BTreeMap<String, NodeIndex>,
    topological_order: Vec<NodeIndex>,
}

impl TaskGraph {
    /// Builds a graph from a runnable table. Rejects non-positive execution
    /// times, periodic runnables with dependencies or without a positive
    /// period, unknown dependency targets, and dependency cycles.
    pub fn new(runnables: Vec<RunnableData>) -> Result<Self, SchedulerError> {
        let mut graph = Graph::<RunnableData, ()>::new();
        let mut name_index = BTreeMap::new();

        for runnable in runnables {
            if runnable.execution_time <= 0 {
                return Err(SchedulerError::InputShape(format!(
                    "runnable {} has non-positive execution_time {}",
                    runnable.name, runnable.execution_time
                )));
            }
            match runnable.kind {
                RunnableKind::Periodic { period } => {
                    if period <= 0 {
                        return Err(SchedulerError::InputShape(format!(
                            "periodic runnable {} has non-positive period {}",
                            runnable.name, period
                        )));
                    }
                    if !runnable.deps.is_empty() {
                        return Err(SchedulerError::InputShape(format!(
                            "periodic runnable {} must not have dependencies",
                            runnable.name
                        )));
                    }
                }
                RunnableKind::Event => {}
            }
            if name_index.contains_key(&runnable.name) {
                return Err(SchedulerError::InputShape(format!(
                    "duplicate runnable name {}",
                    runnable.name
                )));
            }
            let name = runnable.name.clone();
            let node_i = graph.add_node(runnable);
            name_index.insert(name, node_i);
        }

        let node_indices: Vec<NodeIndex> = graph.node_indices().collect();
        for node_i in node_indices {
            let deps = graph[node_i].deps.clone();
            for dep in deps {
                match name_index.get(&dep) {
                    Some(&dep_i) => {
                        graph.add_edge(dep_i, node_i, ());
                    }
                    None => {
                        return Err(SchedulerError::Graph(format!(
                            "runnable {} depends on unknown runnable {}",
                            graph[node_i].name, dep
                        )));
                    }
                }
            }
        }

        let topological_order = toposort(&graph, None).map_err(|cycle| {
            SchedulerError::Graph(format!(
                "dependency cycle detected at runnable {}",
                graph[cycle.node_id()].name
            ))
        })?;

        Ok(Self {
            graph,
            name_index,
            topological_order,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Runnables in ascending name order.
    pub fn runnables(&self) -> impl Iterator<Item = &RunnableData> {
        self.name_index.values().map(move |&node_i| &self.graph[node_i])
    }

    pub fn topological_order(&self) -> impl Iterator<Item = &RunnableData> {
        self.topological_order
            .iter()
            .map(move |&node_i| &self.graph[node_i])
    }

    pub fn get(&self, name: &str) -> Option<&RunnableData> {
        self.name_index.get(name).map(|&node_i| &self.graph[node_i])
    }

    pub fn execution_time(&self, name: &str) -> i32 {
        self.data(name).execution_time
    }

    pub fn priority(&self, name: &str) -> i32 {
        self.data(name).priority
    }

    pub fn period(&self, name: &str) -> Option<i32> {
        self.data(name).period()
    }

    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        self.neighbor_names(name, Incoming)
    }

    pub fn successors(&self, name: &str) -> Vec<&str> {
        self.neighbor_names(name, Outgoing)
    }

    fn data(&self, name: &str) -> &RunnableData {
        let node_i = self.name_index[name];
        &self.graph[node_i]
    }

    fn neighbor_names(&self, name: &str, direction: petgraph::Direction) -> Vec<&str> {
        let node_i = self.name_index[name];
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(node_i, direction)
            .map(|neighbor_i| self.graph[neighbor_i].name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
