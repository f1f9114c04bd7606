use std::collections::BTreeMap;

/// Distance the test harness writes for nodes the start node cannot reach.
pub const UNREACHABLE: i64 = i32::MAX as i64;

/// One directed, weighted edge as written in a `TEST:` line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WeightedEdge {
    pub source: u32,
    pub target: u32,
    pub weight: i64,
}

impl WeightedEdge {
    pub fn new(source: u32, target: u32, weight: i64) -> Self {
        WeightedEdge {
            source,
            target,
            weight,
        }
    }
}

/// Graph definition of a single test: vertex count, start node and edges in log order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TestCase {
    pub vertex_count: u32,
    pub start: u32,
    pub edges: Vec<WeightedEdge>,
}

/// What the algorithm reported for a test case.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// Distance from the start node, keyed by node id.
    Distances(BTreeMap<u32, i64>),
    NegativeCycle,
}

impl Outcome {
    /// Returns the distance map, or `None` when a negative cycle was reported.
    pub fn distances(&self) -> Option<&BTreeMap<u32, i64>> {
        match self {
            Outcome::Distances(map) => Some(map),
            Outcome::NegativeCycle => None,
        }
    }

    pub fn has_negative_cycle(&self) -> bool {
        matches!(self, Outcome::NegativeCycle)
    }

    pub fn distance(&self, node: u32) -> Option<i64> {
        self.distances().and_then(|map| map.get(&node).copied())
    }

    pub fn is_unreachable(distance: i64) -> bool {
        distance >= UNREACHABLE
    }
}

/// Formats a distance the way it is shown on images: `inf` for unreachable nodes.
pub fn format_distance(distance: i64) -> String {
    if Outcome::is_unreachable(distance) {
        String::from("inf")
    } else {
        distance.to_string()
    }
}

/// One `TEST:` / `RESULT:` pair from the log, with the optional `EXPECTED:` line.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LogEntry {
    pub test: TestCase,
    pub expected: Option<Outcome>,
    pub result: Outcome,
}

/// Wrapper for petgraph's graph type. Node weight is the node id from the log,
/// edge weight is the edge weight.
pub type CaseGraph = petgraph::graph::DiGraph<u32, i64>;
