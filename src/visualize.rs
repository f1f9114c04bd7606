//! Turns a whole test log into images, one per test case.

use crate::check::{Verdict, compare, verify};
use crate::config::Config;
use crate::graph::build_graph;
use crate::input::from_file;
use crate::layout::spring_layout;
use crate::output::{CaseView, draw_case, to_dot_str, to_file};
use crate::raster::svg_to_jpeg;
use crate::types::LogEntry;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Path of the image of the `index`-th (1-based) test case.
pub fn image_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("test_case_{}.jpg", index))
}

/// Path of the DOT file of the `index`-th (1-based) test case.
pub fn dot_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("test_case_{}.dot", index))
}

/// Creates `dir` if needed and removes images left by a previous run.
///
/// Only `*.jpg` files are removed, plus `*.dot` when `with_dot` is set. Returns how many files were removed.
pub fn prepare_output_dir(dir: &Path, with_dot: bool) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
        let path = entry?.path();
        let stale = match path.extension().and_then(|e| e.to_str()) {
            Some("jpg") => true,
            Some("dot") => with_dot,
            _ => false,
        };
        if stale && path.is_file() {
            fs::remove_file(&path).with_context(|| format!("cannot remove {}", path.display()))?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// An image written by [`render_case`] and the check made on its result.
#[derive(Debug)]
pub struct RenderedCase {
    pub path: PathBuf,
    pub verdict: Verdict,
}

/// Renders one test case into `config.output_dir`.
pub fn render_case(index: usize, entry: &LogEntry, config: &Config) -> Result<RenderedCase> {
    let graph = build_graph(&entry.test);
    debug!(
        "test case {}: {} nodes, {} edges",
        index,
        graph.node_count(),
        graph.edge_count()
    );

    if is_unexpected(entry) {
        warn!("test case {}: RESULT differs from EXPECTED", index);
    }

    let verdict = verify(&entry.test, &entry.result);
    if matches!(verdict, Verdict::Mismatch { .. }) {
        warn!("test case {}: {}", index, verdict);
    }

    let positions = spring_layout(&graph, &config.layout());
    let view = CaseView {
        index,
        entry,
        graph: &graph,
        positions: &positions,
        verdict: &verdict,
    };

    let path = image_path(&config.output_dir, index);
    let svg = draw_case(&view, &config.canvas());
    svg_to_jpeg(&svg, &path, &config.raster())
        .with_context(|| format!("test case {}", index))?;

    if config.dot {
        let dot_file = dot_path(&config.output_dir, index);
        let dot = to_dot_str(&view)?;
        to_file(&dot, &dot_file).with_context(|| format!("cannot write {}", dot_file.display()))?;
    }

    Ok(RenderedCase { path, verdict })
}

/// Reads the log and renders every test case. Returns the number of images written.
pub fn render_all(config: &Config) -> Result<usize> {
    let entries = from_file(&config.log_file)
        .with_context(|| format!("cannot load {}", config.log_file.display()))?;

    let removed = prepare_output_dir(&config.output_dir, config.dot)?;
    if removed > 0 {
        debug!("removed {} old files from {}", removed, config.output_dir.display());
    }

    info!(
        "Found {} test cases in {}",
        entries.len(),
        config.log_file.display()
    );
    info!("Generating visualizations in {}/...", config.output_dir.display());

    let mut mismatches = 0;
    for (i, entry) in entries.iter().enumerate() {
        let rendered = render_case(i + 1, entry, config)?;
        if matches!(rendered.verdict, Verdict::Mismatch { .. }) {
            mismatches += 1;
        }
        info!("Saved visualization to {}", rendered.path.display());
    }

    info!(
        "All {} visualizations saved to {}/",
        entries.len(),
        config.output_dir.display()
    );

    let unexpected = count_unexpected(&entries);
    if mismatches > 0 || unexpected > 0 {
        warn!(
            "{} results disagree with Bellman-Ford, {} differ from EXPECTED",
            mismatches, unexpected
        );
    }

    Ok(entries.len())
}

/// Whether the `RESULT` line of a case disagrees with its `EXPECTED` line.
pub fn is_unexpected(entry: &LogEntry) -> bool {
    entry.expected.as_ref().is_some_and(|want| {
        matches!(compare(want, &entry.result), Verdict::Mismatch { .. })
    })
}

/// Counts test cases whose `RESULT` line disagrees with the `EXPECTED` line.
pub fn count_unexpected(entries: &[LogEntry]) -> usize {
    entries.iter().filter(|e| is_unexpected(e)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::from_str;

    #[test]
    fn test_prepare_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("vis");
        assert_eq!(prepare_output_dir(&out, false).unwrap(), 0);
        assert!(out.is_dir());

        fs::write(out.join("test_case_1.jpg"), b"old").unwrap();
        fs::write(out.join("test_case_1.dot"), b"old").unwrap();
        fs::write(out.join("notes.txt"), b"keep").unwrap();

        assert_eq!(prepare_output_dir(&out, false).unwrap(), 1);
        assert!(!out.join("test_case_1.jpg").exists());
        assert!(out.join("test_case_1.dot").exists());

        assert_eq!(prepare_output_dir(&out, true).unwrap(), 1);
        assert!(!out.join("test_case_1.dot").exists());
        assert!(out.join("notes.txt").exists());
    }

    #[test]
    fn test_paths() {
        let dir = Path::new("vis");
        assert_eq!(image_path(dir, 3), PathBuf::from("vis/test_case_3.jpg"));
        assert_eq!(dot_path(dir, 1), PathBuf::from("vis/test_case_1.dot"));
    }

    #[test]
    fn test_count_unexpected() {
        let entries = from_str(
            "TEST: 2 0 0,1,4\nEXPECTED: 0:0 1:4\nRESULT: 0:0 1:4\n\
             TEST: 2 0 0,1,4\nEXPECTED: 0:0 1:4\nRESULT: 0:0 1:3\n\
             TEST: 2 0 0,1,4\nEXPECTED: 0:0 1:4\nRESULT: 0:0 1:4 5:7\n\
             TEST: 2 0 0,1,-1 1,0,-1\nRESULT: 0:0 1:-1\n",
        )
        .unwrap();
        let flags: Vec<bool> = entries.iter().map(is_unexpected).collect();
        assert_eq!(flags, vec![false, true, true, false]);
        assert_eq!(count_unexpected(&entries), 2);
    }

    #[test]
    fn test_render_case_returns_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().join("bf_tests.log"), dir.path());
        config.width = 300.0;
        config.height = 200.0;
        config.scale = 1.0;

        let entries = from_str(
            "TEST: 2 0 0,1,4\nRESULT: 0:0 1:4\n\
             TEST: 2 0 0,1,-1 1,0,-1\nRESULT: 0:0 1:-1\n",
        )
        .unwrap();

        let first = render_case(1, &entries[0], &config).unwrap();
        assert_eq!(first.verdict, Verdict::Confirmed);
        assert_eq!(first.path, image_path(dir.path(), 1));
        assert!(first.path.is_file());

        let second = render_case(2, &entries[1], &config).unwrap();
        assert_eq!(second.verdict, Verdict::Mismatch { nodes: vec![] });
    }
}
