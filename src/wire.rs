//! JSON and text forms of a solve request and its response.
//!
//! A request carries the scrambled matrix and optionally a goal matrix:
//!
//! ```json
//! {"puzzle": [[1, 2, 3], [4, 0, 6], [7, 5, 8]]}
//! ```
//!
//! A solved response lists every configuration on the path plus the move
//! count; any other outcome sends `"solution": null` with an `error` string.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

use crate::errors::PuzzleError;
use crate::puzzle::Puzzle;
use crate::search::{SearchOutcome, Solver};

pub const NO_SOLUTION: &str = "No solution found";
pub const LIMIT_EXCEEDED: &str = "Search limit exceeded";

/// Errors raised while turning request text into puzzles.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid number on line {line}: {source}")]
    Number {
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("{}", .0.display_detailed())]
    Puzzle(#[from] PuzzleError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub puzzle: Vec<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Vec<Vec<u32>>>,
}

impl SolveRequest {
    /// Parses either a JSON request or rows of whitespace-separated numbers.
    pub fn parse(text: &str) -> Result<Self, RequestError> {
        if text.trim_start().starts_with('{') {
            return Ok(serde_json::from_str(text)?);
        }
        Ok(Self {
            puzzle: parse_text_matrix(text)?,
            goal: None,
        })
    }

    pub fn start(&self) -> Result<Puzzle, PuzzleError> {
        Puzzle::from_rows(&self.puzzle)
    }

    /// The requested goal, or the canonical goal of the start's side.
    pub fn goal(&self) -> Result<Puzzle, PuzzleError> {
        match &self.goal {
            Some(rows) => Puzzle::from_rows(rows),
            None => Puzzle::goal(self.puzzle.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub solution: Option<Vec<Vec<Vec<u32>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moves: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            solution: None,
            moves: None,
            error: Some(message.into()),
        }
    }
}

impl From<&SearchOutcome> for SolveResponse {
    fn from(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Solved(solution) => Self {
                solution: Some(solution.path.iter().map(Puzzle::rows).collect()),
                moves: Some(solution.move_count()),
                error: None,
            },
            SearchOutcome::NoSolution(_) => Self::failure(NO_SOLUTION),
            SearchOutcome::LimitExceeded(_) => Self::failure(LIMIT_EXCEEDED),
        }
    }
}

/// Answers one JSON or text request; malformed input becomes an error response.
pub fn respond(request: &str, solver: &Solver) -> SolveResponse {
    match run(request, solver) {
        Ok(outcome) => SolveResponse::from(&outcome),
        Err(e) => {
            log::debug!("rejecting request: {e}");
            SolveResponse::failure(e.to_string())
        }
    }
}

fn run(request: &str, solver: &Solver) -> Result<SearchOutcome, RequestError> {
    let request = SolveRequest::parse(request)?;
    let start = request.start()?;
    let goal = request.goal()?;
    Ok(solver.solve(&start, &goal)?)
}

/// Reads one matrix row per non-blank line.
pub fn parse_text_matrix(text: &str) -> Result<Vec<Vec<u32>>, RequestError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.split_whitespace()
                .map(|cell| {
                    cell.parse::<u32>().map_err(|source| RequestError::Number {
                        line: index + 1,
                        source,
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchLimits;
    use serde_json::json;

    #[test]
    fn solved_response_lists_path_and_moves() {
        let response = respond(r#"{"puzzle": [[1, 2, 3], [4, 0, 6], [7, 5, 8]]}"#, &Solver::default());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "solution": [
                    [[1, 2, 3], [4, 0, 6], [7, 5, 8]],
                    [[1, 2, 3], [4, 5, 6], [7, 0, 8]],
                    [[1, 2, 3], [4, 5, 6], [7, 8, 0]],
                ],
                "moves": 2,
            })
        );
    }

    #[test]
    fn unsolvable_response_has_null_solution() {
        let response = respond(r#"{"puzzle": [[2, 1], [3, 0]]}"#, &Solver::default());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"solution": null, "error": NO_SOLUTION})
        );
    }

    #[test]
    fn explicit_goal_is_honoured() {
        let request = r#"{"puzzle": [[1, 0], [3, 2]], "goal": [[0, 1], [3, 2]]}"#;
        let response = respond(request, &Solver::default());
        assert_eq!(response.moves, Some(1));
    }

    #[test]
    fn limit_and_malformed_input_become_errors() {
        let capped = Solver::new(SearchLimits::with_max_expansions(1));
        let response = respond(r#"{"puzzle": [[2, 1, 3], [4, 5, 6], [7, 8, 0]]}"#, &capped);
        assert_eq!(response.error.as_deref(), Some(LIMIT_EXCEEDED));

        let response = respond(r#"{"puzzle": [[1, 1], [2, 0]]}"#, &Solver::default());
        let error = response.error.unwrap();
        assert!(error.contains("P007"), "{error}");
        assert!(response.solution.is_none());

        let response = respond(r#"{"puzzle": "#, &Solver::default());
        assert!(response.error.unwrap().starts_with("Invalid request JSON"));
    }

    #[test]
    fn text_matrix_parses_rows() {
        let request = SolveRequest::parse("1 2 3\n4 0 6\n\n7 5 8\n").unwrap();
        assert_eq!(request.puzzle, vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]);
        assert_eq!(request.goal().unwrap(), Puzzle::goal(3).unwrap());

        match parse_text_matrix("1 2\n3 x\n") {
            Err(RequestError::Number { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Number error, got {other:?}"),
        }
    }
}
