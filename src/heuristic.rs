//! Manhattan-distance estimate of the moves left to reach a goal.
//!
//! Each move slides exactly one numbered tile by one cell, so the summed
//! taxicab distance of the numbered tiles never overestimates the remaining
//! cost and changes by exactly one per move. Both properties are what the
//! A* search in [`crate::search`] relies on.

use crate::puzzle::{Position, Puzzle};

/// Goal position of every tile value, indexed by value.
///
/// Built once per search so the per-node estimate is a table lookup instead
/// of a scan of the goal.
#[derive(Debug, Clone)]
pub struct GoalTable {
    side: usize,
    positions: Vec<Position>,
}

impl GoalTable {
    pub fn new(goal: &Puzzle) -> Self {
        let mut positions = vec![Position::new(0, 0); goal.tiles().len()];
        for (index, &value) in goal.tiles().iter().enumerate() {
            positions[value as usize] = Position::new(index / goal.side(), index % goal.side());
        }
        Self {
            side: goal.side(),
            positions,
        }
    }

    pub fn position_of(&self, value: u32) -> Position {
        self.positions[value as usize]
    }

    /// Sum of taxicab distances of all numbered tiles; the blank counts zero.
    ///
    /// `puzzle` must have the same side as the goal this table was built from.
    pub fn manhattan_distance(&self, puzzle: &Puzzle) -> u32 {
        debug_assert_eq!(puzzle.side(), self.side);
        puzzle
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != 0)
            .map(|(index, &value)| {
                let here = Position::new(index / self.side, index % self.side);
                here.distance(self.position_of(value))
            })
            .sum()
    }
}

/// One-shot estimate; prefer a [`GoalTable`] when evaluating many puzzles.
pub fn manhattan_distance(puzzle: &Puzzle, goal: &Puzzle) -> u32 {
    GoalTable::new(goal).manhattan_distance(puzzle)
}
