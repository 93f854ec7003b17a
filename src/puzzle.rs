use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::errors::PuzzleError;

/// Smallest supported side length.
pub const MIN_SIDE: usize = 2;
/// Largest supported side length.
pub const MAX_SIDE: usize = 15;

/// A (row, column) coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Taxicab distance between two positions.
    pub fn distance(&self, other: Position) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

/// Direction the blank travels in a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Generation order for neighbors.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The move taking the blank from `from` to an adjacent `to`, if any.
    pub fn between(from: Position, to: Position) -> Option<Move> {
        Move::ALL.into_iter().find(|mv| {
            let (dr, dc) = mv.as_offset();
            from.row as isize + dr == to.row as isize && from.col as isize + dc == to.col as isize
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// One arrangement of the tiles on a square grid.
///
/// Tiles are stored row-major; `0` is the blank. A `Puzzle` is never mutated
/// after construction, every move yields a new value. Equality and hashing
/// are structural so a `Puzzle` can key the search tables directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Puzzle {
    side: usize,
    board: Box<[u32]>,
    blank: usize,
}

impl Puzzle {
    /// The canonical goal: `1..side*side-1` in row-major order, blank last.
    pub fn goal(side: usize) -> Result<Self, PuzzleError> {
        check_side(side)?;
        let cells = side * side;
        let board: Vec<u32> = (1..cells as u32).chain(std::iter::once(0)).collect();

        Ok(Self {
            side,
            board: board.into_boxed_slice(),
            blank: cells - 1,
        })
    }

    /// Builds a puzzle from a matrix of rows, validating shape and contents.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, PuzzleError> {
        if rows.is_empty() {
            return Err(PuzzleError::Empty);
        }
        let side = rows.len();
        let mut board = Vec::with_capacity(side * side);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != side {
                return Err(PuzzleError::NotSquare {
                    row,
                    expected: side,
                    found: cells.len(),
                });
            }
            board.extend_from_slice(cells);
        }
        Self::from_flat(side, board)
    }

    /// Builds a puzzle from `side * side` row-major tiles.
    pub fn from_flat(side: usize, board: Vec<u32>) -> Result<Self, PuzzleError> {
        if board.is_empty() {
            return Err(PuzzleError::Empty);
        }
        check_side(side)?;
        if board.len() != side * side {
            return Err(PuzzleError::WrongTileCount {
                expected: side * side,
                found: board.len(),
            });
        }
        let blank = validate_tiles(side, &board)?;

        Ok(Self {
            side,
            board: board.into_boxed_slice(),
            blank,
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Row-major tiles.
    pub fn tiles(&self) -> &[u32] {
        &self.board
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.board.chunks(self.side).map(<[u32]>::to_vec).collect()
    }

    pub fn get(&self, pos: Position) -> u32 {
        self.board[pos.row * self.side + pos.col]
    }

    /// Position of the blank tile.
    pub fn blank(&self) -> Position {
        self.position_of_index(self.blank)
    }

    pub(crate) fn position_of_index(&self, index: usize) -> Position {
        Position::new(index / self.side, index % self.side)
    }

    /// The cell reached from `pos` by `mv`, if it lies on the grid.
    pub fn step(&self, pos: Position, mv: Move) -> Option<Position> {
        let (dr, dc) = mv.as_offset();
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        (row < self.side && col < self.side).then_some(Position::new(row, col))
    }

    /// Blank-adjacent positions in up, down, left, right order.
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        let blank = self.blank();
        Move::ALL
            .into_iter()
            .filter_map(move |mv| self.step(blank, mv))
    }

    /// New puzzle with the blank swapped into `target`.
    ///
    /// # Panics
    /// If `target` is off the grid.
    pub fn swap_blank(&self, target: Position) -> Self {
        debug_assert_eq!(self.blank().distance(target), 1, "swap target must touch the blank");
        let index = target.row * self.side + target.col;
        let mut board = self.board.clone();
        board.swap(self.blank, index);

        Self {
            side: self.side,
            board,
            blank: index,
        }
    }

    pub fn apply(&self, mv: Move) -> Option<Self> {
        self.step(self.blank(), mv).map(|target| self.swap_blank(target))
    }

    /// Every configuration one move away, in neighbor order.
    pub fn successors(&self) -> impl Iterator<Item = Self> + '_ {
        self.neighbors().map(|target| self.swap_blank(target))
    }

    /// Whether `goal` lies in the same permutation parity class.
    ///
    /// Inversions are counted against the goal's own tile order, so any goal
    /// works, not just the canonical one. On even sides the blank's row
    /// distance to its goal row joins the parity.
    pub fn is_solvable_towards(&self, goal: &Puzzle) -> bool {
        if self.side != goal.side {
            return false;
        }
        let mut rank = vec![0usize; self.board.len()];
        for (order, &value) in goal.board.iter().filter(|&&v| v != 0).enumerate() {
            rank[value as usize] = order;
        }
        let sequence: Vec<usize> = self
            .board
            .iter()
            .filter(|&&v| v != 0)
            .map(|&v| rank[v as usize])
            .collect();
        let inversions = count_inversions(&sequence);

        if self.side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let row_gap = self.blank().row.abs_diff(goal.blank().row);
            (inversions + row_gap) % 2 == 0
        }
    }

    /// A uniformly random arrangement that can still reach the canonical goal.
    pub fn shuffled<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let goal = Self::goal(side)?;
        let mut flattened = goal.board.to_vec();

        loop {
            flattened.shuffle(rng);
            let candidate = Self::from_flat(side, flattened.clone())?;
            if candidate.is_solvable_towards(&goal) {
                return Ok(candidate);
            }
        }
    }

    /// Random walk of `steps` moves from the canonical goal, never undoing
    /// the previous move.
    pub fn scrambled<R: Rng + ?Sized>(side: usize, steps: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::goal(side)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<Move> = Move::ALL
                .into_iter()
                .filter(|mv| last.map_or(true, |l| *mv != l.opposite()))
                .filter(|mv| puzzle.step(puzzle.blank(), *mv).is_some())
                .collect();
            let Some(&mv) = options.choose(rng) else {
                break;
            };
            if let Some(next) = puzzle.apply(mv) {
                puzzle = next;
                last = Some(mv);
            }
        }

        Ok(puzzle)
    }
}

fn check_side(side: usize) -> Result<(), PuzzleError> {
    if (MIN_SIDE..=MAX_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(PuzzleError::UnsupportedSide { side })
    }
}

/// Returns the blank's index when `board` is a permutation of `0..side*side`.
fn validate_tiles(side: usize, board: &[u32]) -> Result<usize, PuzzleError> {
    let blanks = board.iter().filter(|&&v| v == 0).count();
    match blanks {
        0 => return Err(PuzzleError::MissingBlank),
        1 => {}
        count => return Err(PuzzleError::DuplicateBlank { count }),
    }

    let mut seen = vec![false; board.len()];
    for &value in board {
        let slot = seen
            .get_mut(value as usize)
            .ok_or(PuzzleError::ValueOutOfRange { value, side })?;
        if *slot {
            return Err(PuzzleError::DuplicateValue { value });
        }
        *slot = true;
    }

    Ok(board.iter().position(|&v| v == 0).unwrap_or_default())
}

fn count_inversions(sequence: &[usize]) -> usize {
    sequence
        .iter()
        .enumerate()
        .map(|(i, &val)| sequence[i + 1..].iter().filter(|&&next| next < val).count())
        .sum()
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.board.len() - 1).to_string().len();
        for row in self.board.chunks(self.side) {
            for &val in row {
                write!(f, "{:>width$} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
