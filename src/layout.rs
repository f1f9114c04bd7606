//! Force-directed placement of nodes.
//!
//! Fruchterman-Reingold with a fixed seed, so the same test case always gets
//! the same picture.

use log::debug;
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeCount, NodeIndexable};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ITERATIONS: usize = 50;

/// Starting temperature, as a fraction of the unit square.
const INITIAL_TEMPERATURE: f64 = 0.1;
/// Lower bound on the distance between two nodes, avoids division by zero.
const MIN_DISTANCE: f64 = 0.01;

/// A point of the layout. After [`spring_layout`] both coordinates lie in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Layout parameters.
#[derive(Clone, Copy, Debug)]
pub struct SpringLayout {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for SpringLayout {
    fn default() -> Self {
        SpringLayout {
            seed: DEFAULT_SEED,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Computes node positions, indexed by [`NodeIndexable::to_index`].
///
/// Edge direction is ignored. Self loops and parallel edges do not move anything.
pub fn spring_layout<G>(graph: G, params: &SpringLayout) -> Vec<Position>
where
    G: IntoEdgeReferences + NodeIndexable + NodeCount,
{
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Position::new(0.0, 0.0)];
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pos: Vec<Position> = (0..n)
        .map(|_| Position::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
        .collect();

    let edges: Vec<(usize, usize)> = graph
        .edge_references()
        .map(|e| (graph.to_index(e.source()), graph.to_index(e.target())))
        .filter(|(u, v)| u != v)
        .collect();

    // optimal pairwise distance
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = INITIAL_TEMPERATURE;
    let cooling = INITIAL_TEMPERATURE / (params.iterations as f64 + 1.0);

    for _ in 0..params.iterations {
        let mut disp = vec![(0.0f64, 0.0f64); n];

        // repulsion between every pair
        for u in 0..n {
            for v in u + 1..n {
                let (dx, dy, dist) = delta(&pos, u, v);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[u].0 += fx;
                disp[u].1 += fy;
                disp[v].0 -= fx;
                disp[v].1 -= fy;
            }
        }

        // attraction along edges
        for &(u, v) in &edges {
            let (dx, dy, dist) = delta(&pos, u, v);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[u].0 -= fx;
            disp[u].1 -= fy;
            disp[v].0 += fx;
            disp[v].1 += fy;
        }

        // move, capped by the temperature
        for (p, (dx, dy)) in pos.iter_mut().zip(disp) {
            let len = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let step = len.min(temperature);
            p.x += dx / len * step;
            p.y += dy / len * step;
        }

        temperature -= cooling;
    }

    debug!(
        "spring layout: {} nodes, {} edges, {} iterations",
        n,
        edges.len(),
        params.iterations
    );

    rescale(&mut pos);
    pos
}

/// Vector from `v` to `u` and its length (never below [`MIN_DISTANCE`]).
fn delta(pos: &[Position], u: usize, v: usize) -> (f64, f64, f64) {
    let dx = pos[u].x - pos[v].x;
    let dy = pos[u].y - pos[v].y;
    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
    (dx, dy, dist)
}

/// Centers the points at the origin and scales the largest coordinate to 1.
fn rescale(pos: &mut [Position]) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let mut lim = 0.0f64;
    for p in pos.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }

    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.x /= lim;
            p.y /= lim;
        }
    }
}
