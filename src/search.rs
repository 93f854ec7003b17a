//! A* search for an optimal move sequence between two configurations.
//!
//! # Examples
//!
//! ```
//! use slider_astar::puzzle::Puzzle;
//! use slider_astar::search::{solve, SearchOutcome};
//!
//! let start = Puzzle::from_rows(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]])?;
//! let goal = Puzzle::goal(3)?;
//!
//! match solve(&start, &goal)? {
//!     SearchOutcome::Solved(solution) => assert_eq!(solution.move_count(), 2),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok::<(), slider_astar::errors::PuzzleError>(())
//! ```
//!
//! An unreachable goal is reported as [`SearchOutcome::NoSolution`] once the
//! reachable space is exhausted, and a configured expansion cap ends the
//! search with [`SearchOutcome::LimitExceeded`]. Neither is an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info, trace};
use rustc_hash::FxHashMap;

use crate::errors::PuzzleError;
use crate::heuristic::GoalTable;
use crate::puzzle::{Move, Puzzle};

const PROGRESS_INTERVAL: usize = 100_000;

/// Bounds on a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of configurations to expand before giving up.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Configurations popped from the frontier and expanded.
    pub expanded: usize,
    /// Frontier pushes, including re-pushes after a cheaper path was found.
    pub generated: usize,
    /// Distinct configurations seen.
    pub discovered: usize,
    /// Popped entries dropped because a cheaper path superseded them.
    pub stale_skipped: usize,
    pub max_frontier: usize,
}

/// An optimal path, start first and goal last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: Vec<Puzzle>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn move_count(&self) -> usize {
        self.path.len() - 1
    }

    /// Direction of the blank for each step of the path.
    pub fn moves(&self) -> Vec<Move> {
        self.path
            .windows(2)
            .filter_map(|pair| Move::between(pair[0].blank(), pair[1].blank()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Every configuration reachable from the start was explored.
    NoSolution(SearchStats),
    /// The expansion cap was hit; nothing is known about reachability.
    LimitExceeded(SearchStats),
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Solved(solution) => &solution.stats,
            SearchOutcome::NoSolution(stats) | SearchOutcome::LimitExceeded(stats) => stats,
        }
    }
}

type NodeId = usize;

/// Best known way of reaching one configuration.
struct Node {
    puzzle: Puzzle,
    cost: u32,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    priority: u32,
    cost: u32,
    seq: u64,
    node: NodeId,
}

/// Min-heap order on `priority`; among equals the deeper entry first, then
/// the earlier push.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Frontier, cost record and predecessor links of one search call.
///
/// Nodes live in an arena; `index` maps each configuration to its slot, so
/// the node's `cost` is the cost record and `parent` the predecessor map.
struct SearchSpace<'g> {
    table: &'g GoalTable,
    nodes: Vec<Node>,
    index: FxHashMap<Puzzle, NodeId>,
    frontier: BinaryHeap<FrontierEntry>,
    next_seq: u64,
    stats: SearchStats,
}

impl<'g> SearchSpace<'g> {
    fn new(table: &'g GoalTable) -> Self {
        Self {
            table,
            nodes: Vec::new(),
            index: FxHashMap::default(),
            frontier: BinaryHeap::new(),
            next_seq: 0,
            stats: SearchStats::default(),
        }
    }

    /// Records `puzzle` at `cost` via `parent` unless an equal or cheaper
    /// path is already known, and pushes it onto the frontier.
    fn relax(&mut self, puzzle: Puzzle, cost: u32, parent: Option<NodeId>) {
        let id = match self.index.get(&puzzle).copied() {
            Some(id) => {
                let node = &mut self.nodes[id];
                if cost >= node.cost {
                    return;
                }
                node.cost = cost;
                node.parent = parent;
                id
            }
            None => {
                let id = self.nodes.len();
                self.index.insert(puzzle.clone(), id);
                self.nodes.push(Node { puzzle, cost, parent });
                self.stats.discovered += 1;
                id
            }
        };

        let priority = cost + self.table.manhattan_distance(&self.nodes[id].puzzle);
        self.frontier.push(FrontierEntry {
            priority,
            cost,
            seq: self.next_seq,
            node: id,
        });
        self.next_seq += 1;
        self.stats.generated += 1;
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }

    /// Follows predecessor links back from `id`, returned start first.
    fn path_to(&self, id: NodeId) -> Vec<Puzzle> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current];
            path.push(node.puzzle.clone());
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

/// A* solver. Holds only its limits; every call to [`Solver::solve`] builds
/// and drops its own search state, so one solver can serve many threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    limits: SearchLimits,
}

impl Solver {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Finds a shortest move sequence from `start` to `goal`.
    ///
    /// Fails only when the two configurations have different sides.
    pub fn solve(&self, start: &Puzzle, goal: &Puzzle) -> Result<SearchOutcome, PuzzleError> {
        if start.side() != goal.side() {
            return Err(PuzzleError::DimensionMismatch {
                start: start.side(),
                goal: goal.side(),
            });
        }

        let table = GoalTable::new(goal);
        let mut space = SearchSpace::new(&table);
        debug!(
            "A* start: side={} h={} limit={:?}",
            start.side(),
            table.manhattan_distance(start),
            self.limits.max_expansions
        );
        space.relax(start.clone(), 0, None);

        while let Some(entry) = space.frontier.pop() {
            let current = entry.node;
            if entry.cost > space.nodes[current].cost {
                space.stats.stale_skipped += 1;
                continue;
            }

            if space.nodes[current].puzzle == *goal {
                let path = space.path_to(current);
                debug!(
                    "A* solved in {} moves ({} expanded, {} discovered)",
                    path.len() - 1,
                    space.stats.expanded,
                    space.stats.discovered
                );
                return Ok(SearchOutcome::Solved(Solution {
                    path,
                    stats: space.stats,
                }));
            }

            if let Some(max) = self.limits.max_expansions {
                if space.stats.expanded >= max {
                    info!("A* gave up after {} expansions", space.stats.expanded);
                    return Ok(SearchOutcome::LimitExceeded(space.stats));
                }
            }

            space.stats.expanded += 1;
            if space.stats.expanded % PROGRESS_INTERVAL == 0 {
                trace!(
                    "A* progress: {} expanded, frontier {}, f={}",
                    space.stats.expanded,
                    space.frontier.len(),
                    entry.priority
                );
            }

            let successors: Vec<Puzzle> = space.nodes[current].puzzle.successors().collect();
            for next in successors {
                space.relax(next, entry.cost + 1, Some(current));
            }
        }

        debug!(
            "A* exhausted {} configurations without reaching the goal",
            space.stats.discovered
        );
        Ok(SearchOutcome::NoSolution(space.stats))
    }
}

/// Solves with no expansion cap.
pub fn solve(start: &Puzzle, goal: &Puzzle) -> Result<SearchOutcome, PuzzleError> {
    Solver::default().solve(start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::VecDeque;

    fn puzzle(rows: &[[u32; 3]]) -> Puzzle {
        Puzzle::from_rows(rows).unwrap()
    }

    /// Exact move distance from `goal` to every reachable configuration.
    fn bfs_distances(goal: &Puzzle) -> FxHashMap<Puzzle, usize> {
        let mut distances = FxHashMap::default();
        let mut queue = VecDeque::new();
        distances.insert(goal.clone(), 0);
        queue.push_back(goal.clone());
        while let Some(current) = queue.pop_front() {
            let depth = distances[&current];
            for next in current.successors() {
                if !distances.contains_key(&next) {
                    distances.insert(next.clone(), depth + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
    }

    fn assert_valid_path(path: &[Puzzle]) {
        for pair in path.windows(2) {
            let successors: Vec<_> = pair[0].successors().collect();
            assert!(successors.contains(&pair[1]), "{} -> {} is not one move", pair[0], pair[1]);
        }
    }

    #[test]
    fn two_move_scenario() {
        let start = puzzle(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        let goal = Puzzle::goal(3).unwrap();
        let solution = solve(&start, &goal).unwrap().into_solution().unwrap();

        assert_eq!(solution.path.len(), 3);
        assert_eq!(solution.move_count(), 2);
        assert_eq!(solution.path[0], start);
        assert_eq!(solution.path[1], puzzle(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]));
        assert_eq!(solution.path[2], goal);
        assert_eq!(solution.moves(), vec![Move::Down, Move::Right]);
    }

    #[test]
    fn start_equal_to_goal_is_single_element_path() {
        let goal = Puzzle::goal(4).unwrap();
        let solution = solve(&goal, &goal).unwrap().into_solution().unwrap();
        assert_eq!(solution.path, vec![goal]);
        assert_eq!(solution.move_count(), 0);
        assert!(solution.moves().is_empty());
        assert_eq!(solution.stats.expanded, 0);
    }

    #[test]
    fn transposed_tiles_exhaust_the_space() {
        let start = puzzle(&[[2, 1, 3], [4, 5, 6], [7, 8, 0]]);
        let goal = Puzzle::goal(3).unwrap();
        let outcome = solve(&start, &goal).unwrap();

        assert!(matches!(outcome, SearchOutcome::NoSolution(_)));
        // half of 9! is reachable from any 8-puzzle configuration
        assert_eq!(outcome.stats().discovered, 181_440);
        assert_eq!(outcome.stats().expanded, 181_440);
    }

    #[test]
    fn unsolvable_two_by_two() {
        let start = Puzzle::from_rows(&[[2, 1], [3, 0]]).unwrap();
        let goal = Puzzle::goal(2).unwrap();
        let outcome = solve(&start, &goal).unwrap();
        assert_eq!(outcome, SearchOutcome::NoSolution(*outcome.stats()));
        assert_eq!(outcome.stats().discovered, 12);
    }

    #[test]
    fn expansion_cap_is_distinct_from_no_solution() {
        let start = puzzle(&[[2, 1, 3], [4, 5, 6], [7, 8, 0]]);
        let goal = Puzzle::goal(3).unwrap();
        let solver = Solver::new(SearchLimits::with_max_expansions(500));
        let outcome = solver.solve(&start, &goal).unwrap();

        match outcome {
            SearchOutcome::LimitExceeded(stats) => assert_eq!(stats.expanded, 500),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn cap_does_not_block_cheap_solutions() {
        let start = puzzle(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        let goal = Puzzle::goal(3).unwrap();
        let solver = Solver::new(SearchLimits::with_max_expansions(2));
        let outcome = solver.solve(&start, &goal).unwrap();
        assert_eq!(outcome.solution().map(Solution::move_count), Some(2));

        let outcome = Solver::new(SearchLimits::with_max_expansions(0)).solve(&goal, &goal).unwrap();
        assert!(outcome.solution().is_some());
    }

    #[test]
    fn mismatched_sides_fail_fast() {
        let start = Puzzle::goal(3).unwrap();
        let goal = Puzzle::goal(4).unwrap();
        assert_eq!(
            solve(&start, &goal),
            Err(PuzzleError::DimensionMismatch { start: 3, goal: 4 })
        );
    }

    #[test]
    fn optimal_against_breadth_first_search() {
        let goal = Puzzle::goal(3).unwrap();
        let distances = bfs_distances(&goal);
        assert_eq!(distances.len(), 181_440);

        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..25 {
            let start = Puzzle::shuffled(3, &mut rng).unwrap();
            let solution = solve(&start, &goal).unwrap().into_solution().unwrap();
            assert_eq!(solution.move_count(), distances[&start]);
            assert_eq!(solution.path.first(), Some(&start));
            assert_eq!(solution.path.last(), Some(&goal));
            assert_valid_path(&solution.path);
        }
    }

    #[test]
    fn arbitrary_goal_on_two_by_two() {
        let goal = Puzzle::from_rows(&[[0, 1], [3, 2]]).unwrap();
        let distances = bfs_distances(&goal);
        assert_eq!(distances.len(), 12);

        for (start, &expected) in &distances {
            let solution = solve(start, &goal).unwrap().into_solution().unwrap();
            assert_eq!(solution.move_count(), expected);
            assert_valid_path(&solution.path);
        }
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = Puzzle::scrambled(4, 20, &mut rng).unwrap();
        let goal = Puzzle::goal(4).unwrap();
        let first = solve(&start, &goal).unwrap();
        let second = solve(&start, &goal).unwrap();
        assert_eq!(first, second);
        assert!(first.solution().unwrap().move_count() <= 20);
    }

    #[test]
    fn frontier_orders_by_priority_then_depth_then_age() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { priority: 5, cost: 1, seq: 0, node: 0 });
        heap.push(FrontierEntry { priority: 4, cost: 1, seq: 1, node: 1 });
        heap.push(FrontierEntry { priority: 5, cost: 3, seq: 2, node: 2 });
        heap.push(FrontierEntry { priority: 5, cost: 3, seq: 3, node: 3 });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.node).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }
}
