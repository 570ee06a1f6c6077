//! Sudoku solving engines behind a single entry point.
//!
//! Three independent solvers share one input contract:
//!
//! - [`Method::Elimination`]: a human-style logical reasoner driving
//!   candidate exclusion, value exclusion, line-locked propagation, and
//!   box/line intersection analysis to fixed point, with recursive
//!   hypothesis when no rule fires;
//! - [`Method::Backtracking`]: a reference brute-force DFS;
//! - [`Method::ExactCover`]: an exact-cover encoding handed to the
//!   `dancing-links` library.
//!
//! All observable progress — grid transitions and rule traces — goes
//! through the observer bus in [`candoku_core::event`].
//!
//! # Examples
//!
//! ```
//! use candoku_core::{Order, Puzzle};
//! use candoku_solver::{solve, Method, Mode};
//!
//! let puzzle = Puzzle::parse(Order::new(2).unwrap(), "1234 4.2. .4.. 2..3").unwrap();
//! let outcome = solve(&puzzle, Method::Elimination, Mode::First);
//! assert_eq!(outcome, Some(Method::Elimination));
//! ```

mod backtracking;
mod counters;
mod elimination;
mod exact_cover;

use serde::{Deserialize, Serialize};

use candoku_core::{event, EventKinds, Grid, GridId, GridSnapshot};

pub use candoku_core::{Order, Puzzle};
pub use counters::Counters;

/// A solving method, both as requested and as actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Logical elimination; promotes to [`Method::Backtracking`] in the
    /// outcome when hypothesis was needed.
    Elimination,
    /// Brute-force depth-first search.
    Backtracking,
    /// Exact-cover search via Dancing Links.
    ExactCover,
}

/// Whether to stop at the first solution or enumerate them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Stop at the first solution found.
    First,
    /// Enumerate every solution; each one fires `SOLVED`.
    All,
}

/// Logical contradiction marker used inside the engines.
///
/// Rule functions return `Err(Contradiction)` for a logically-invalid
/// grid, `Ok(0)` for no-op, and `Ok(k)` for a firing at subset depth
/// `k`; the driver interprets. Inside a hypothesis branch the error is
/// recovered as a rejected guess, at the root it surfaces as no
/// solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Contradiction;

/// Solves a puzzle, reporting solutions through the observer bus.
///
/// Returns `None` for invalid input (a value outside `0..=N`, or givens
/// that contradict each other) and for puzzles without a solution;
/// otherwise the method that actually terminated — elimination promotes
/// to `Some(Method::Backtracking)` when it had to hypothesize.
#[must_use]
pub fn solve(puzzle: &Puzzle, method: Method, mode: Mode) -> Option<Method> {
    solve_with_counters(puzzle, method, mode).0
}

/// [`solve`], also returning the engine statistics.
#[must_use]
pub fn solve_with_counters(
    puzzle: &Puzzle,
    method: Method,
    mode: Mode,
) -> (Option<Method>, Counters) {
    let order = puzzle.order();
    let mut stats = counters::Counters::new(order);

    if puzzle
        .cells()
        .iter()
        .any(|&value| value as usize > order.size())
    {
        event::emit_message(GridId::UNKNOWN, "Grid is not valid.\n", 0);
        return (None, stats);
    }

    log::debug!(
        "solving {order} puzzle with {} givens: {method:?}, {mode:?}",
        puzzle.given_count()
    );

    let outcome = match method {
        Method::Elimination => {
            let mut grid = Grid::build(order, puzzle.cells());
            if event::has_grid_sinks(EventKinds::INIT) {
                event::emit_grid_event(EventKinds::INIT, grid.id(), &grid.snapshot());
            }
            match elimination::run(&mut grid, mode, &mut stats) {
                Ok(_) => {
                    if event::has_message_sinks() {
                        event::emit_message(grid.id(), stats.summary(), 0);
                    }
                    if stats.hypotheses() > 0 {
                        Some(Method::Backtracking)
                    } else {
                        Some(Method::Elimination)
                    }
                }
                Err(Contradiction) => {
                    event::emit_message(grid.id(), "Grid is not valid.\n", 0);
                    None
                }
            }
        }
        Method::Backtracking => {
            let id = GridId::next();
            if event::has_grid_sinks(EventKinds::INIT) {
                event::emit_grid_event(
                    EventKinds::INIT,
                    id,
                    &GridSnapshot::from_values(order, puzzle.cells()),
                );
            }
            if backtracking::is_consistent(order, puzzle.cells())
                && backtracking::search(id, order, puzzle.cells(), mode, &mut stats)
            {
                Some(Method::Backtracking)
            } else {
                event::emit_message(id, "Grid is not valid.\n", 0);
                None
            }
        }
        Method::ExactCover => {
            let id = GridId::next();
            if event::has_grid_sinks(EventKinds::INIT) {
                event::emit_grid_event(
                    EventKinds::INIT,
                    id,
                    &GridSnapshot::from_values(order, puzzle.cells()),
                );
            }
            match exact_cover::run(id, order, puzzle.cells(), mode) {
                None | Some(0) => None,
                Some(count) => {
                    stats.solutions = count;
                    Some(Method::ExactCover)
                }
            }
        }
    };

    (outcome, stats)
}

/// Maps a solve outcome to the conventional process exit code:
/// 0 no solution, 1 pure elimination, 2 backtracking (or elimination
/// that needed hypothesis), 3 exact cover.
#[must_use]
pub fn exit_code(outcome: Option<Method>) -> u8 {
    match outcome {
        None => 0,
        Some(Method::Elimination) => 1,
        Some(Method::Backtracking) => 2,
        Some(Method::ExactCover) => 3,
    }
}

/// The crate version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
