//! The incremental breadth-first traversal engine.
//!
//! [`Traversal`] owns the FIFO frontier and performs exactly one expansion
//! per [`advance`](Traversal::advance) call, so a caller can interleave
//! search steps with input handling and rendering, one step per animation
//! frame. On an unweighted 4-connected grid the breadth-first order makes
//! the reconstructed path shortest in edge count.

use std::collections::VecDeque;

use crate::board::{Board, CellId};

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// Outcome of a traversal so far.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// Frontier non-empty, target not yet reached.
    Searching,
    /// Target reached. `distance` counts the cells strictly between start
    /// and target (the path length, excluding both endpoints).
    Found { distance: usize },
    /// Frontier exhausted without reaching the target.
    NoSolution,
}

impl SearchState {
    /// Whether the traversal is over.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Searching)
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// A single breadth-first search in progress over a [`Board`].
///
/// The frontier is seeded with the board's start cell at construction.
/// Traversal flags (`queued`, `visited`, `prior`) live on the board's cells
/// so the renderer can read them directly; a fresh search therefore needs a
/// fresh board.
pub struct Traversal {
    frontier: VecDeque<CellId>,
    path: Vec<CellId>,
    state: SearchState,
    // Scratch buffer so neighbor ids can be walked while cells are mutated.
    nbuf: Vec<CellId>,
}

impl Traversal {
    /// Create a traversal with the frontier seeded from `board`'s start.
    pub fn new(board: &Board) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(board.start());
        Self {
            frontier,
            path: Vec::new(),
            state: SearchState::Searching,
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Current state. `Searching` until a terminal state is reached.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The reconstructed path, target-side first, excluding both the start
    /// and the target cell. Empty until the search succeeds.
    #[inline]
    pub fn path(&self) -> &[CellId] {
        &self.path
    }

    /// Number of cells currently awaiting expansion.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Perform one expansion step toward `target`.
    ///
    /// Pops the oldest frontier cell, marks it visited, and either finishes
    /// (target reached, or frontier empty) or enqueues its unqueued non-wall
    /// neighbors with their predecessor links. Terminal states are sticky:
    /// once `Found` or `NoSolution` is returned, further calls return the
    /// same state without touching the board.
    pub fn advance(&mut self, board: &mut Board, target: CellId) -> SearchState {
        if self.state.is_terminal() {
            return self.state;
        }

        let Some(current) = self.frontier.pop_front() else {
            self.state = SearchState::NoSolution;
            return self.state;
        };

        board.cell_mut(current).visited = true;

        if current == target {
            self.path = backtrack(board, current);
            self.state = SearchState::Found {
                distance: self.path.len(),
            };
            return self.state;
        }

        self.nbuf.clear();
        self.nbuf.extend_from_slice(board.neighbors(current));
        for &n in &self.nbuf {
            let cell = board.cell_mut(n);
            if !cell.queued && !cell.wall {
                cell.queued = true;
                cell.prior = Some(current);
                self.frontier.push_back(n);
            }
        }

        SearchState::Searching
    }
}

/// Walk predecessor links from `from` back toward the start, collecting
/// every strictly-between cell. The start cell is never included; neither is
/// `from` itself.
fn backtrack(board: &Board, from: CellId) -> Vec<CellId> {
    let start = board.start();
    let mut path = Vec::new();
    let mut cur = from;
    while let Some(prior) = board.cell(cur).prior {
        if prior == start {
            break;
        }
        path.push(prior);
        cur = prior;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilegrid_core::Point;

    fn board(columns: i32, rows: i32, walls: &[(i32, i32)]) -> Board {
        let mut b = Board::new(columns, rows).unwrap();
        for &(x, y) in walls {
            assert!(b.paint_wall(Point::new(x, y)), "wall at ({x}, {y})");
        }
        b
    }

    /// Run to completion, asserting the termination bound along the way.
    fn run(b: &mut Board, target: CellId) -> (SearchState, Vec<CellId>, usize) {
        let mut t = Traversal::new(b);
        let bound = b.len();
        let mut steps = 0;
        loop {
            let state = t.advance(b, target);
            steps += 1;
            if state.is_terminal() {
                return (state, t.path().to_vec(), steps);
            }
            assert!(steps <= bound, "no terminal state within {bound} steps");
        }
    }

    /// Reference distance: plain whole-grid BFS over points, counting moves.
    fn min_moves(b: &Board, target: Point) -> Option<usize> {
        let mut dist = vec![None::<usize>; b.len()];
        let mut queue = std::collections::VecDeque::new();
        dist[0] = Some(0);
        queue.push_back(Point::ZERO);
        while let Some(p) = queue.pop_front() {
            let d = dist[b.id_at(p).unwrap().0].unwrap();
            if p == target {
                return Some(d);
            }
            for n in p.neighbors_4() {
                if let Some(id) = b.id_at(n) {
                    if dist[id.0].is_none() && !b.cell(id).wall {
                        dist[id.0] = Some(d + 1);
                        queue.push_back(n);
                    }
                }
            }
        }
        None
    }

    #[test]
    fn single_cell_board_finds_itself() {
        // Degenerate 1x1 case: the target is the start cell.
        let mut b = board(1, 1, &[]);
        let target = b.start();
        let (state, path, steps) = run(&mut b, target);
        assert_eq!(state, SearchState::Found { distance: 0 });
        assert!(path.is_empty());
        assert_eq!(steps, 1);
    }

    #[test]
    fn three_by_one_path_and_distance() {
        let mut b = board(3, 1, &[]);
        let target = b.id_at(Point::new(2, 0)).unwrap();
        let (state, path, _) = run(&mut b, target);
        assert_eq!(state, SearchState::Found { distance: 1 });
        let cells: Vec<Point> = path.iter().map(|&id| b.cell(id).pos()).collect();
        assert_eq!(cells, vec![Point::new(1, 0)]);
    }

    #[test]
    fn routes_through_the_only_gap() {
        // Middle row walled except (2, 1); the path must pass through it.
        let mut b = board(3, 3, &[(0, 1), (1, 1)]);
        let target = b.id_at(Point::new(0, 2)).unwrap();
        let (state, path, _) = run(&mut b, target);
        assert!(matches!(state, SearchState::Found { .. }));
        let gap = b.id_at(Point::new(2, 1)).unwrap();
        assert!(path.contains(&gap));
    }

    #[test]
    fn enclosed_target_exhausts_frontier() {
        // Target (3, 3) boxed in by walls on a 5x5 board.
        let mut b = board(5, 5, &[(2, 3), (4, 3), (3, 2), (3, 4)]);
        let target = b.id_at(Point::new(3, 3)).unwrap();
        let (state, path, _) = run(&mut b, target);
        assert_eq!(state, SearchState::NoSolution);
        assert!(path.is_empty());
        // Exactly the reachable cells were expanded before giving up.
        for p in b.bounds().iter() {
            let reachable = min_moves(&b, p).is_some();
            assert_eq!(
                b.cell_at(p).unwrap().visited,
                reachable,
                "visited/reachable mismatch at {p}"
            );
        }
    }

    #[test]
    fn walled_in_start_fails_immediately() {
        let mut b = board(3, 3, &[(1, 0), (0, 1)]);
        let target = b.id_at(Point::new(2, 2)).unwrap();
        let mut t = Traversal::new(&b);
        // Step 1 expands the start; nothing is enqueueable.
        assert_eq!(t.advance(&mut b, target), SearchState::Searching);
        assert_eq!(t.advance(&mut b, target), SearchState::NoSolution);
    }

    #[test]
    fn path_length_matches_reference_distance() {
        let configs: &[&[(i32, i32)]] = &[
            &[],
            &[(1, 0), (1, 1), (1, 2), (1, 3)],
            &[(2, 2), (3, 2), (2, 3), (0, 4)],
        ];
        for walls in configs {
            let mut b = board(5, 5, walls);
            let tp = Point::new(4, 4);
            let target = b.id_at(tp).unwrap();
            let (state, path, _) = run(&mut b, target);
            let expected = min_moves(&b, tp).expect("reachable in these configs");
            // Distance label counts strictly-between cells: moves - 1.
            assert_eq!(
                state,
                SearchState::Found {
                    distance: expected - 1
                },
                "walls: {walls:?}"
            );
            assert_eq!(path.len(), expected - 1);
        }
    }

    #[test]
    fn visited_implies_queued_and_walls_stay_out() {
        let mut b = board(4, 4, &[(1, 1), (2, 1)]);
        let target = b.id_at(Point::new(3, 3)).unwrap();
        let (_, path, _) = run(&mut b, target);
        for p in b.bounds().iter() {
            let cell = b.cell_at(p).unwrap();
            if cell.visited {
                assert!(cell.queued, "visited but never queued at {p}");
            }
            if cell.wall {
                assert!(!cell.queued, "wall enqueued at {p}");
                assert!(cell.prior.is_none(), "wall has a predecessor at {p}");
                assert!(!path.contains(&b.id_at(p).unwrap()), "wall on path at {p}");
            }
        }
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut b = board(2, 1, &[]);
        let target = b.id_at(Point::new(1, 0)).unwrap();
        let mut t = Traversal::new(&b);
        while !t.advance(&mut b, target).is_terminal() {}
        let done = t.state();
        let visited_before: Vec<bool> =
            b.bounds().iter().map(|p| b.cell_at(p).unwrap().visited).collect();
        assert_eq!(t.advance(&mut b, target), done);
        let visited_after: Vec<bool> =
            b.bounds().iter().map(|p| b.cell_at(p).unwrap().visited).collect();
        assert_eq!(visited_before, visited_after);
    }

    #[test]
    fn adjacent_target_has_distance_zero() {
        let mut b = board(2, 1, &[]);
        let target = b.id_at(Point::new(1, 0)).unwrap();
        let (state, path, _) = run(&mut b, target);
        assert_eq!(state, SearchState::Found { distance: 0 });
        assert!(path.is_empty());
    }
}
