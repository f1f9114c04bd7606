//! # bf_visualize
//!
//! Draws the test cases of a Bellman-Ford test log.
//!
//! Every `TEST:` / `RESULT:` pair of the log becomes one JPEG image: the graph laid out
//! with a seeded spring layout, edges labeled with weights, nodes labeled with the
//! reported distances and the start node highlighted.
//!
//! Based on [`petgraph`](https://docs.rs/petgraph).

pub mod check;
pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod layout;
pub mod output;
pub mod raster;
pub mod types;
pub mod visualize;

pub use config::Config;
pub use error::ParseError;
pub use input::{from_file, from_str};
pub use types::{CaseGraph, LogEntry, Outcome, TestCase, WeightedEdge};
pub use visualize::render_all;
