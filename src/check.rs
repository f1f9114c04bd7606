use crate::types::{Outcome, TestCase, UNREACHABLE};
use petgraph::algo::bellman_ford;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeMap;

/// Result of comparing a logged outcome with a fresh Bellman-Ford run.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Verdict {
    Confirmed,
    /// Nodes whose distance differs or that only one side reports.
    /// Empty when the negative-cycle flag itself disagrees.
    Mismatch { nodes: Vec<u32> },
    /// The case references nodes outside `0..V`, there is nothing sound to recompute.
    Skipped,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Confirmed => write!(f, "Check: confirmed by Bellman-Ford"),
            Verdict::Mismatch { nodes } if nodes.is_empty() => {
                write!(f, "Check: MISMATCH, negative cycle flag disagrees")
            }
            Verdict::Mismatch { nodes } => {
                let list: Vec<_> = nodes.iter().map(|n| n.to_string()).collect();
                write!(f, "Check: MISMATCH at nodes {}", list.join(", "))
            }
            Verdict::Skipped => write!(f, "Check: skipped, node ids out of range"),
        }
    }
}

/// Runs Bellman-Ford on the case, keeping parallel edges as separate edges.
///
/// Returns `None` when the start node or an edge endpoint is not in `0..V`.
pub fn recompute(case: &TestCase) -> Option<Outcome> {
    let n = case.vertex_count;
    if case.start >= n || case.edges.iter().any(|e| e.source >= n || e.target >= n) {
        return None;
    }

    let mut graph = DiGraph::<u32, f64>::with_capacity(n as usize, case.edges.len());
    for id in 0..n {
        graph.add_node(id);
    }
    for e in &case.edges {
        graph.add_edge(
            NodeIndex::new(e.source as usize),
            NodeIndex::new(e.target as usize),
            e.weight as f64,
        );
    }

    let outcome = match bellman_ford(&graph, NodeIndex::new(case.start as usize)) {
        Ok(paths) => Outcome::Distances(
            paths
                .distances
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let d = if d.is_finite() { *d as i64 } else { UNREACHABLE };
                    (i as u32, d)
                })
                .collect::<BTreeMap<_, _>>(),
        ),
        Err(_) => Outcome::NegativeCycle,
    };

    Some(outcome)
}

/// Compares the logged outcome of a case with a recomputed one.
pub fn verify(case: &TestCase, logged: &Outcome) -> Verdict {
    let Some(fresh) = recompute(case) else {
        return Verdict::Skipped;
    };
    compare(&fresh, logged)
}

/// Compares two outcomes; `reference` is trusted, `other` is checked against it.
pub fn compare(reference: &Outcome, other: &Outcome) -> Verdict {
    match (reference.distances(), other.distances()) {
        (None, None) => Verdict::Confirmed,
        (Some(want), Some(got)) => {
            let mut nodes: Vec<u32> = want
                .iter()
                .filter(|&(node, d)| !same_distance(*d, got.get(node).copied()))
                .map(|(node, _)| *node)
                .collect();
            // nodes reported in `other` only
            nodes.extend(got.keys().filter(|node| !want.contains_key(*node)));
            nodes.sort_unstable();
            if nodes.is_empty() {
                Verdict::Confirmed
            } else {
                Verdict::Mismatch { nodes }
            }
        }
        _ => Verdict::Mismatch { nodes: Vec::new() },
    }
}

fn same_distance(want: i64, got: Option<i64>) -> bool {
    match got {
        Some(got) if Outcome::is_unreachable(want) => Outcome::is_unreachable(got),
        Some(got) => got == want,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{parse_result, parse_test_case};

    #[test]
    fn test_recompute_simple() {
        let case = parse_test_case("3 0 0,1,5 1,2,3 0,2,10").unwrap();
        assert_eq!(recompute(&case), Some(parse_result("0:0 1:5 2:8").unwrap()));
    }

    #[test]
    fn test_recompute_unreachable() {
        let case = parse_test_case("3 0 0,1,5").unwrap();
        let fresh = recompute(&case).unwrap();
        assert_eq!(fresh.distance(2), Some(UNREACHABLE));
        let logged = parse_result("0:0 1:5 2:2147483647").unwrap();
        assert_eq!(verify(&case, &logged), Verdict::Confirmed);
    }

    #[test]
    fn test_recompute_negative_cycle() {
        let case = parse_test_case("3 0 0,1,1 1,2,-3 2,1,1").unwrap();
        assert_eq!(recompute(&case), Some(Outcome::NegativeCycle));
    }

    #[test]
    fn test_unreachable_negative_cycle_is_ignored() {
        // cycle 1 <-> 2 is negative, but 0 cannot reach it
        let case = parse_test_case("3 0 1,2,-3 2,1,1").unwrap();
        let fresh = recompute(&case).unwrap();
        assert!(!fresh.has_negative_cycle());
    }

    #[test]
    fn test_parallel_edges_take_minimum() {
        let case = parse_test_case("2 0 0,1,9 0,1,4").unwrap();
        assert_eq!(recompute(&case).unwrap().distance(1), Some(4));
    }

    #[test]
    fn test_verify_mismatch() {
        let case = parse_test_case("3 0 0,1,5 1,2,3").unwrap();
        let wrong = parse_result("0:0 1:5 2:9").unwrap();
        assert_eq!(verify(&case, &wrong), Verdict::Mismatch { nodes: vec![2] });

        let missing = parse_result("0:0 1:5").unwrap();
        assert_eq!(verify(&case, &missing), Verdict::Mismatch { nodes: vec![2] });

        let cycle = parse_result("Graph contains negative cycle!").unwrap();
        assert_eq!(verify(&case, &cycle), Verdict::Mismatch { nodes: vec![] });
    }

    #[test]
    fn test_extra_nodes_are_a_mismatch() {
        let case = parse_test_case("2 0 0,1,4").unwrap();
        let extra = parse_result("0:0 1:4 5:7").unwrap();
        assert_eq!(verify(&case, &extra), Verdict::Mismatch { nodes: vec![5] });

        let want = parse_result("0:0 1:4").unwrap();
        let got = parse_result("0:0 1:3 3:1").unwrap();
        assert_eq!(compare(&want, &got), Verdict::Mismatch { nodes: vec![1, 3] });
        assert_eq!(compare(&want, &want), Verdict::Confirmed);
    }

    #[test]
    fn test_verify_skipped() {
        let case = parse_test_case("2 5 0,1,1").unwrap();
        let logged = parse_result("0:0").unwrap();
        assert_eq!(verify(&case, &logged), Verdict::Skipped);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(
            Verdict::Mismatch { nodes: vec![1, 4] }.to_string(),
            "Check: MISMATCH at nodes 1, 4"
        );
    }
}
