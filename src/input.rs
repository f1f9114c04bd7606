use crate::error::ParseError;
use crate::types::{LogEntry, Outcome, TestCase, WeightedEdge};
use log::warn;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use std::str::FromStr;

const TEST_PREFIX: &str = "TEST:";
const EXPECTED_PREFIX: &str = "EXPECTED:";
const RESULT_PREFIX: &str = "RESULT:";
const NEGATIVE_CYCLE_MARKER: &str = "negative cycle";

/// Reads test cases from a Bellman-Ford test log.
///
/// Log format, as written by the test harness:
/// - `TEST: <V> <start> <src,dst,weight> ...` opens a case,
/// - `EXPECTED: ...` (optional) is what the harness computed itself,
/// - `RESULT: ...` is what the tested program answered and closes the case,
/// - anything else (`---` separators, empty lines) is skipped.
///
/// A result is either `node:distance` tokens or a line containing `negative cycle`.
///
/// Example input:
/// ```text
/// TEST: 3 0 0,1,5 1,2,3
/// EXPECTED: 0:0 1:5 2:8
/// RESULT: 0:0 1:5 2:8
/// ---
/// TEST: 2 0 0,1,-1 1,0,-1
/// RESULT: Graph contains negative cycle!
/// ```
pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<LogEntry>, ParseError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    parse_log(reader)
}

/// This is equivalent to [`from_file`], but takes string as an input.
pub fn from_str(input: &str) -> Result<Vec<LogEntry>, ParseError> {
    let cursor = Cursor::new(input);
    let reader = BufReader::new(cursor);
    parse_log(reader)
}

fn parse_log<R: BufRead>(reader: R) -> Result<Vec<LogEntry>, ParseError> {
    let mut entries = Vec::new();
    let mut pending: Option<(TestCase, usize)> = None;
    let mut expected = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        if let Some(payload) = line.strip_prefix(TEST_PREFIX) {
            let test = parse_test_case(payload.trim()).map_err(|e| e.at_line(line_no))?;
            pending = Some((test, line_no));
            expected = None;
        } else if let Some(payload) = line.strip_prefix(EXPECTED_PREFIX) {
            expected = Some(parse_result(payload.trim()).map_err(|e| e.at_line(line_no))?);
        } else if let Some(payload) = line.strip_prefix(RESULT_PREFIX) {
            let (test, _) = pending
                .take()
                .ok_or(ParseError::ResultWithoutTest { line: line_no })?;
            let result = parse_result(payload.trim()).map_err(|e| e.at_line(line_no))?;
            entries.push(LogEntry {
                test,
                expected: expected.take(),
                result,
            });
        }
    }

    if let Some((_, line_no)) = pending {
        warn!("TEST on line {} has no RESULT, dropping it", line_no);
    }

    Ok(entries)
}

/// Parses the payload of a `TEST:` line: vertex count, start node, then `src,dst,weight` triples.
pub fn parse_test_case(input: &str) -> Result<TestCase, ParseError> {
    let mut parts = input.split_whitespace();

    let vertex_count = parts.next().ok_or(ParseError::MissingField {
        field: "vertex count",
        line: 0,
    })?;
    let start = parts.next().ok_or(ParseError::MissingField {
        field: "start node",
        line: 0,
    })?;

    let edges = parts.map(parse_edge).collect::<Result<Vec<_>, _>>()?;

    Ok(TestCase {
        vertex_count: parse_number(vertex_count)?,
        start: parse_number(start)?,
        edges,
    })
}

fn parse_edge(token: &str) -> Result<WeightedEdge, ParseError> {
    let fields: Vec<_> = token.split(',').collect();
    if fields.len() != 3 {
        return Err(ParseError::BadEdge {
            token: token.to_string(),
            line: 0,
        });
    }
    Ok(WeightedEdge::new(
        parse_number(fields[0])?,
        parse_number(fields[1])?,
        parse_number(fields[2])?,
    ))
}

/// Parses the payload of a `RESULT:` (or `EXPECTED:`) line.
pub fn parse_result(input: &str) -> Result<Outcome, ParseError> {
    if input.to_lowercase().contains(NEGATIVE_CYCLE_MARKER) {
        return Ok(Outcome::NegativeCycle);
    }

    let mut distances: BTreeMap<u32, i64> = BTreeMap::new();
    for part in input.split_whitespace() {
        // tokens without a colon carry no distance
        if let Some((node, dist)) = part.split_once(':') {
            distances.insert(parse_number(node)?, parse_number(dist)?);
        }
    }

    Ok(Outcome::Distances(distances))
}

fn parse_number<T: FromStr>(token: &str) -> Result<T, ParseError> {
    token.trim().parse().map_err(|_| ParseError::BadNumber {
        token: token.to_string(),
        line: 0,
    })
}
