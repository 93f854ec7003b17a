//! Terminal output of puzzles and solution paths.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{style, Print, PrintStyledContent, Stylize};

use crate::puzzle::{Position, Puzzle};
use crate::search::Solution;

/// Writes `puzzle` as a grid, dimming the blank and highlighting `moved`.
pub fn write_puzzle<W: Write>(out: &mut W, puzzle: &Puzzle, moved: Option<Position>) -> io::Result<()> {
    let width = (puzzle.tiles().len() - 1).to_string().len();
    for row in 0..puzzle.side() {
        for col in 0..puzzle.side() {
            let pos = Position::new(row, col);
            let cell = format!("{:>width$}", puzzle.get(pos));
            if pos == puzzle.blank() {
                queue!(out, PrintStyledContent(style(cell).dark_grey()))?;
            } else if Some(pos) == moved {
                queue!(out, PrintStyledContent(style(cell).yellow().bold()))?;
            } else {
                queue!(out, Print(cell))?;
            }
            queue!(out, Print(" "))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

/// Writes every step of `solution`, naming the blank's move and marking the
/// tile it displaced.
pub fn write_solution<W: Write>(out: &mut W, solution: &Solution) -> io::Result<()> {
    writeln!(out, "Found optimal solution with: {} moves", solution.move_count())?;
    if let Some(start) = solution.path.first() {
        writeln!(out, "Start:")?;
        write_puzzle(out, start, None)?;
    }

    for (step, (pair, mv)) in solution.path.windows(2).zip(solution.moves()).enumerate() {
        writeln!(out)?;
        writeln!(out, "{}. {}", step + 1, mv)?;
        write_puzzle(out, &pair[1], Some(pair[0].blank()))?;
    }
    Ok(())
}
