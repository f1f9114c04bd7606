use crate::types::{CaseGraph, TestCase};
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

/// Builds the directed graph of a test case.
///
/// Every vertex `0..V` becomes a node, in order, so isolated vertices and the start node
/// are drawn even without edges. Ids that appear only in edges (outside `0..V`) are
/// appended after them in order of first appearance.
///
/// A repeated `src -> dst` pair keeps one edge with the last weight from the log.
pub fn build_graph(case: &TestCase) -> CaseGraph {
    let mut graph = CaseGraph::new();
    let mut index: HashMap<u32, NodeIndex> = HashMap::new();

    for id in 0..case.vertex_count {
        index.insert(id, graph.add_node(id));
    }

    for edge in &case.edges {
        let s = *index
            .entry(edge.source)
            .or_insert_with(|| graph.add_node(edge.source));
        let t = *index
            .entry(edge.target)
            .or_insert_with(|| graph.add_node(edge.target));
        graph.update_edge(s, t, edge.weight);
    }

    graph
}
