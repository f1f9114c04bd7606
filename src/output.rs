use crate::check::Verdict;
use crate::layout::Position;
use crate::types::{CaseGraph, LogEntry, format_distance};
use petgraph::visit::EdgeRef;
use std::fmt::Write;
use std::path::Path;

const NODE_RADIUS: f64 = 20.0;
const MARGIN: f64 = 60.0;
const TITLE_FONT_SIZE: f64 = 16.0;
const TITLE_LINE_HEIGHT: f64 = 21.0;
/// Smallest height left for the graph itself under a long title.
const MIN_GRAPH_HEIGHT: f64 = 420.0;
/// Bend of a pair of opposite edges, relative to the distance between their nodes.
const CURVE_BEND: f64 = 0.15;

const START_FILL: &str = "#e53935";
const NODE_FILL: &str = "#87ceeb";
const LINE_COLOR: &str = "#000000";
const MISMATCH_COLOR: &str = "#c62828";
const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

/// Size of the drawing in SVG user units.
#[derive(Clone, Copy, Debug)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: 1400.0,
            height: 1000.0,
        }
    }
}

/// Everything needed to draw one test case.
pub struct CaseView<'a> {
    /// 1-based number shown in the title.
    pub index: usize,
    pub entry: &'a LogEntry,
    pub graph: &'a CaseGraph,
    /// Layout positions in `[-1, 1]`, indexed by node index.
    pub positions: &'a [Position],
    pub verdict: &'a Verdict,
}

/// Title block: case number, start node, then the distance table or the negative cycle notice.
pub fn title_lines(view: &CaseView) -> Vec<String> {
    let mut lines = vec![
        format!("Test Case {}", view.index),
        format!("Start node: {}", view.entry.test.start),
    ];

    match view.entry.result.distances() {
        None => lines.push(String::from("Graph contains negative cycle!")),
        Some(distances) => {
            lines.push(String::from("Shortest paths distances:"));
            for (node, dist) in distances {
                lines.push(format!("Node {}: {}", node, format_distance(*dist)));
            }
        }
    }

    lines
}

/// Text shown inside a node: its id, and its distance when the result has one.
pub fn node_label(view: &CaseView, id: u32) -> (String, Option<String>) {
    let distance = view
        .entry
        .result
        .distance(id)
        .map(|d| format!("({})", format_distance(d)));
    (id.to_string(), distance)
}

/// Returns an SVG drawing of a test case.
///
/// The start node is red, other nodes are sky blue. Edges are arrows labeled with
/// their weights; two opposite edges between the same nodes are drawn as two curves.
pub fn draw_case(view: &CaseView, canvas: &Canvas) -> String {
    let title = title_lines(view);
    let title_height = MARGIN / 2.0 + (title.len() as f64 + 1.0) * TITLE_LINE_HEIGHT;
    let width = canvas.width;
    let height = canvas.height.max(title_height + MIN_GRAPH_HEIGHT);

    // graph area below the title
    let area_top = title_height + NODE_RADIUS;
    let area_bottom = height - MARGIN;
    let area_left = MARGIN;
    let area_right = width - MARGIN;

    let to_canvas = |p: &Position| -> (f64, f64) {
        (
            area_left + (p.x + 1.0) / 2.0 * (area_right - area_left),
            area_top + (p.y + 1.0) / 2.0 * (area_bottom - area_top),
        )
    };
    let points: Vec<(f64, f64)> = view.positions.iter().map(to_canvas).collect();

    let mut output = String::new();
    writeln!(
        output,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = width,
        h = height
    )
    .unwrap();
    writeln!(output, "  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>").unwrap();
    writeln!(output, "  <defs>").unwrap();
    writeln!(
        output,
        "    <marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        LINE_COLOR
    )
    .unwrap();
    writeln!(output, "  </defs>").unwrap();

    // Title
    let mut y = MARGIN / 2.0 + TITLE_LINE_HEIGHT;
    for line in &title {
        writeln!(
            output,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\">{}</text>",
            width / 2.0,
            y,
            FONT_FAMILY,
            TITLE_FONT_SIZE,
            escape_xml(line)
        )
        .unwrap();
        y += TITLE_LINE_HEIGHT;
    }
    let check_color = match view.verdict {
        Verdict::Mismatch { .. } => MISMATCH_COLOR,
        _ => LINE_COLOR,
    };
    writeln!(
        output,
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-style=\"italic\" fill=\"{}\">{}</text>",
        width / 2.0,
        y,
        FONT_FAMILY,
        TITLE_FONT_SIZE - 2.0,
        check_color,
        escape_xml(&view.verdict.to_string())
    )
    .unwrap();

    // Edges
    for e in view.graph.edge_references() {
        let (u, v) = (e.source().index(), e.target().index());
        let weight = e.weight().to_string();

        if u == v {
            let (x, y) = points[u];
            let top = y - NODE_RADIUS;
            writeln!(
                output,
                "  <path d=\"M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" marker-end=\"url(#arrow)\"/>",
                x - 8.0,
                top + 2.0,
                x - 32.0,
                top - 48.0,
                x + 32.0,
                top - 48.0,
                x + 8.0,
                top + 2.0,
                LINE_COLOR
            )
            .unwrap();
            write_edge_label(&mut output, x, top - 40.0, &weight);
            continue;
        }

        let (p0, p2) = (points[u], points[v]);
        let reverse = view.graph.find_edge(e.target(), e.source()).is_some();
        let (dx, dy) = (p2.0 - p0.0, p2.1 - p0.1);

        if reverse {
            // bend to the right of the direction of travel, the opposite edge bends the other way
            let c = (
                (p0.0 + p2.0) / 2.0 - dy * CURVE_BEND,
                (p0.1 + p2.1) / 2.0 + dx * CURVE_BEND,
            );
            let start = shorten(p0, c, NODE_RADIUS);
            let end = shorten(p2, c, NODE_RADIUS);
            writeln!(
                output,
                "  <path d=\"M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" marker-end=\"url(#arrow)\"/>",
                start.0, start.1, c.0, c.1, end.0, end.1, LINE_COLOR
            )
            .unwrap();
            let mid = (
                0.25 * p0.0 + 0.5 * c.0 + 0.25 * p2.0,
                0.25 * p0.1 + 0.5 * c.1 + 0.25 * p2.1,
            );
            write_edge_label(&mut output, mid.0, mid.1, &weight);
        } else {
            let start = shorten(p0, p2, NODE_RADIUS);
            let end = shorten(p2, p0, NODE_RADIUS);
            writeln!(
                output,
                "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.5\" marker-end=\"url(#arrow)\"/>",
                start.0, start.1, end.0, end.1, LINE_COLOR
            )
            .unwrap();
            write_edge_label(
                &mut output,
                (p0.0 + p2.0) / 2.0,
                (p0.1 + p2.1) / 2.0,
                &weight,
            );
        }
    }

    // Nodes
    for node in view.graph.node_indices() {
        let id = view.graph[node];
        let (x, y) = points[node.index()];
        let fill = if id == view.entry.test.start {
            START_FILL
        } else {
            NODE_FILL
        };
        writeln!(
            output,
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            x, y, NODE_RADIUS, fill, LINE_COLOR
        )
        .unwrap();

        let (name, distance) = node_label(view, id);
        let name_y = if distance.is_some() { y - 5.0 } else { y };
        write_text(&mut output, x, name_y, 13.0, &name);
        if let Some(distance) = distance {
            write_text(&mut output, x, y + 10.0, 11.0, &distance);
        }
    }

    writeln!(output, "</svg>").unwrap();
    output
}

/// Moves `from` towards `towards` by `by` units.
fn shorten(from: (f64, f64), towards: (f64, f64), by: f64) -> (f64, f64) {
    let (dx, dy) = (towards.0 - from.0, towards.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= by {
        return from;
    }
    (from.0 + dx / len * by, from.1 + dy / len * by)
}

fn write_text(output: &mut String, x: f64, y: f64, size: f64, text: &str) {
    writeln!(
        output,
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\">{}</text>",
        x,
        y,
        FONT_FAMILY,
        size,
        escape_xml(text)
    )
    .unwrap();
}

/// Weight label with a white halo so it stays readable on top of lines.
fn write_edge_label(output: &mut String, x: f64, y: f64, text: &str) {
    writeln!(
        output,
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"12\" stroke=\"#ffffff\" stroke-width=\"4\" paint-order=\"stroke\">{}</text>",
        x,
        y,
        FONT_FAMILY,
        escape_xml(text)
    )
    .unwrap();
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

type Node = usize;

#[derive(Debug, Clone)]
struct Edge {
    source: Node,
    target: Node,
    weight: i64,
}

struct DotCase {
    labels: Vec<String>,
    edges: Vec<Edge>,
}

impl<'a> dot::Labeller<'a, Node, Edge> for DotCase {
    fn graph_id(&self) -> dot::Id<'_> {
        dot::Id::new("TestCase").unwrap()
    }

    fn node_id(&self, n: &Node) -> dot::Id<'_> {
        dot::Id::new(format!("N{}", n)).unwrap()
    }

    fn node_label(&self, n: &Node) -> dot::LabelText<'a> {
        dot::LabelText::label(self.labels[*n].clone())
    }

    fn edge_label(&self, e: &Edge) -> dot::LabelText<'a> {
        dot::LabelText::label(e.weight.to_string())
    }
}

impl<'a> dot::GraphWalk<'a, Node, Edge> for DotCase {
    fn nodes(&self) -> dot::Nodes<'_, Node> {
        (0..self.labels.len()).collect()
    }

    fn edges(&self) -> dot::Edges<'_, Edge> {
        self.edges.as_slice().into()
    }

    fn source(&self, e: &Edge) -> Node {
        e.source
    }

    fn target(&self, e: &Edge) -> Node {
        e.target
    }
}

/// Returns a test case in DOT format, for use with Graphviz.
///
/// Node labels carry the node id and its distance, the start node is marked with `start`.
/// Edge labels carry weights.
pub fn to_dot_str(view: &CaseView) -> std::io::Result<String> {
    let labels = view
        .graph
        .node_indices()
        .map(|n| {
            let id = view.graph[n];
            let (name, distance) = node_label(view, id);
            let mut label = name;
            if let Some(distance) = distance {
                label.push(' ');
                label.push_str(&distance);
            }
            if id == view.entry.test.start {
                label.push_str(" start");
            }
            label
        })
        .collect();
    let edges = view
        .graph
        .edge_references()
        .map(|e| Edge {
            source: e.source().index(),
            target: e.target().index(),
            weight: *e.weight(),
        })
        .collect();

    let case = DotCase { labels, edges };
    let mut buffer = Vec::new();
    dot::render(&case, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes a string to a file.
pub fn to_file(content: &str, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::input::from_str;
    use crate::layout::{SpringLayout, spring_layout};

    fn with_view<F: FnOnce(&CaseView)>(log: &str, verdict: Verdict, f: F) {
        let entries = from_str(log).unwrap();
        let entry = &entries[0];
        let graph = build_graph(&entry.test);
        let positions = spring_layout(&graph, &SpringLayout::default());
        let view = CaseView {
            index: 1,
            entry,
            graph: &graph,
            positions: &positions,
            verdict: &verdict,
        };
        f(&view);
    }

    #[test]
    fn test_title_with_distances() {
        with_view(
            "TEST: 3 0 0,1,5 1,2,3\nRESULT: 0:0 1:5 2:2147483647\n",
            Verdict::Confirmed,
            |view| {
                assert_eq!(
                    title_lines(view),
                    vec![
                        "Test Case 1",
                        "Start node: 0",
                        "Shortest paths distances:",
                        "Node 0: 0",
                        "Node 1: 5",
                        "Node 2: inf",
                    ]
                );
            },
        );
    }

    #[test]
    fn test_title_with_negative_cycle() {
        with_view(
            "TEST: 2 1 0,1,-1 1,0,-1\nRESULT: Graph contains negative cycle!\n",
            Verdict::Confirmed,
            |view| {
                assert_eq!(
                    title_lines(view),
                    vec!["Test Case 1", "Start node: 1", "Graph contains negative cycle!"]
                );
                assert_eq!(node_label(view, 0), (String::from("0"), None));
            },
        );
    }

    #[test]
    fn test_draw_case() {
        with_view(
            "TEST: 3 0 0,1,5 1,0,7 1,2,-3 2,2,1\nRESULT: 0:0 1:5 2:2\n",
            Verdict::Mismatch { nodes: vec![2] },
            |view| {
                let svg = draw_case(view, &Canvas::default());
                assert!(svg.starts_with("<svg"));
                assert!(svg.trim_end().ends_with("</svg>"));
                assert_eq!(svg.matches("<circle").count(), 3);
                assert_eq!(svg.matches(START_FILL).count(), 1);
                // two curves for 0 <-> 1 and one self loop
                assert_eq!(svg.matches(" Q ").count(), 2);
                assert_eq!(svg.matches(" C ").count(), 1);
                assert_eq!(svg.matches("<line ").count(), 1);
                assert!(svg.contains(">-3</text>"));
                assert!(svg.contains(">(5)</text>"));
                assert!(svg.contains("MISMATCH at nodes 2"));
                assert!(svg.contains(MISMATCH_COLOR));
            },
        );
    }

    #[test]
    fn test_long_title_grows_canvas() {
        let mut log = String::from("TEST: 30 0\nRESULT:");
        for i in 0..30 {
            log.push_str(&format!(" {}:{}", i, i));
        }
        log.push('\n');
        with_view(&log, Verdict::Confirmed, |view| {
            let canvas = Canvas {
                width: 800.0,
                height: 600.0,
            };
            let svg = draw_case(view, &canvas);
            assert!(!svg.contains("height=\"600\""));
        });
    }

    #[test]
    fn test_to_dot_str() {
        with_view(
            "TEST: 2 0 0,1,5\nRESULT: 0:0 1:5\n",
            Verdict::Confirmed,
            |view| {
                let dot = to_dot_str(view).unwrap();
                assert!(dot.starts_with("digraph TestCase"));
                assert!(dot.contains("N0 -> N1"));
                assert!(dot.contains("label=\"5\""));
                assert!(dot.contains("0 (0) start"));
            },
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
