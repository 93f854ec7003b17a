//! Error types for malformed puzzle input.
//!
//! # Error Codes
//!
//! Each variant carries a stable code for lookup:
//!
//! - P001: `Empty` (no rows or no tiles at all)
//! - P002: `NotSquare` (row count and row length disagree)
//! - P003: `UnsupportedSide` (side outside the supported range)
//! - P004: `MissingBlank` (no 0 tile)
//! - P005: `DuplicateBlank` (more than one 0 tile)
//! - P006: `ValueOutOfRange` (tile value does not fit the grid)
//! - P007: `DuplicateValue` (a numbered tile appears twice)
//! - P008: `DimensionMismatch` (start and goal differ in size)
//! - P009: `WrongTileCount` (flat input is not side*side tiles long)
//!
//! An unreachable goal is not an error: the search reports it as
//! [`SearchOutcome::NoSolution`](crate::search::SearchOutcome::NoSolution).

use crate::puzzle::{MAX_SIDE, MIN_SIDE};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("Puzzle has no tiles")]
    Empty,

    #[error("Puzzle is not square: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported side length {side} (must be {}..={})", MIN_SIDE, MAX_SIDE)]
    UnsupportedSide { side: usize },

    #[error("Puzzle has no blank (0) tile")]
    MissingBlank,

    #[error("Puzzle has {count} blank (0) tiles")]
    DuplicateBlank { count: usize },

    #[error("Tile value {value} is out of range for a {side}x{side} puzzle")]
    ValueOutOfRange { value: u32, side: usize },

    #[error("Tile value {value} appears more than once")]
    DuplicateValue { value: u32 },

    #[error("Start is {start}x{start} but goal is {goal}x{goal}")]
    DimensionMismatch { start: usize, goal: usize },

    #[error("Expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },
}

impl PuzzleError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PuzzleError::Empty => "P001",
            PuzzleError::NotSquare { .. } => "P002",
            PuzzleError::UnsupportedSide { .. } => "P003",
            PuzzleError::MissingBlank => "P004",
            PuzzleError::DuplicateBlank { .. } => "P005",
            PuzzleError::ValueOutOfRange { .. } => "P006",
            PuzzleError::DuplicateValue { .. } => "P007",
            PuzzleError::DimensionMismatch { .. } => "P008",
            PuzzleError::WrongTileCount { .. } => "P009",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            PuzzleError::WrongTileCount { .. } => Some("A flat NxN puzzle lists exactly N*N tiles"),
            PuzzleError::NotSquare { .. } => Some("Every row must have as many cells as there are rows"),
            PuzzleError::MissingBlank | PuzzleError::DuplicateBlank { .. } => {
                Some("Mark exactly one cell as the blank using 0")
            }
            PuzzleError::ValueOutOfRange { .. } | PuzzleError::DuplicateValue { .. } => {
                Some("An NxN puzzle holds each of 1..N*N-1 exactly once plus a single 0")
            }
            PuzzleError::DimensionMismatch { .. } => Some("Start and goal must have the same side length"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self.help() {
            Some(help_text) => format!("{self} ({})\n{help_text}", self.code()),
            None => format!("{self} ({})", self.code()),
        }
    }
}
