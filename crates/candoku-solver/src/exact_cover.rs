//! Exact-cover encoding of a puzzle for the `dancing-links` crate.
//!
//! The constraint universe has `4·N²` columns in four families — every
//! cell holds a value, every row / column / box holds each value once —
//! and `N³` placements, one per `(row, col, value)`, each satisfying
//! exactly four columns. Givens are pre-covered before the search:
//! their columns leave the universe and conflicting placements leave the
//! possibility list; two givens claiming the same column mean the input
//! is invalid. The search itself belongs to the library; this module
//! only encodes, decodes, and publishes.

use std::collections::HashSet;

use dancing_links::{ExactCover, Solver};

use candoku_core::{event, EventKinds, GridId, GridSnapshot, Order};

use crate::Mode;

/// One `(row, col, value)` assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Placement {
    row: usize,
    col: usize,
    value: u8,
}

impl Placement {
    /// The four constraint columns this placement satisfies.
    fn columns(self, order: Order) -> [Column; 4] {
        [
            Column::Cell {
                row: self.row,
                col: self.col,
            },
            Column::RowValue {
                row: self.row,
                value: self.value,
            },
            Column::ColumnValue {
                col: self.col,
                value: self.value,
            },
            Column::BoxValue {
                box_index: order.box_index(self.row, self.col),
                value: self.value,
            },
        ]
    }
}

/// One constraint column of the exact-cover matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    /// Cell `(row, col)` holds some value.
    Cell { row: usize, col: usize },
    /// Row `row` holds `value` once.
    RowValue { row: usize, value: u8 },
    /// Column `col` holds `value` once.
    ColumnValue { col: usize, value: u8 },
    /// Box `box_index` holds `value` once.
    BoxValue { box_index: usize, value: u8 },
}

/// A puzzle encoded as an exact-cover instance, givens pre-covered.
pub(crate) struct SudokuCover {
    order: Order,
    possibilities: Vec<Placement>,
    constraints: Vec<Column>,
}

impl SudokuCover {
    /// Encodes a puzzle; `None` means two givens collide.
    pub(crate) fn encode(order: Order, givens: &[u8]) -> Option<Self> {
        let n = order.size();

        let mut satisfied = HashSet::new();
        for row in 0..n {
            for col in 0..n {
                let value = givens[row * n + col];
                if value == 0 {
                    continue;
                }
                let placement = Placement { row, col, value };
                for column in placement.columns(order) {
                    if !satisfied.insert(column) {
                        return None;
                    }
                }
            }
        }

        let mut possibilities = Vec::new();
        for row in 0..n {
            for col in 0..n {
                if givens[row * n + col] != 0 {
                    continue;
                }
                for value in order.values() {
                    let placement = Placement { row, col, value };
                    if placement
                        .columns(order)
                        .iter()
                        .any(|column| satisfied.contains(column))
                    {
                        continue;
                    }
                    possibilities.push(placement);
                }
            }
        }

        let mut constraints = Vec::new();
        for row in 0..n {
            for col in 0..n {
                constraints.push(Column::Cell { row, col });
            }
        }
        for row in 0..n {
            for value in order.values() {
                constraints.push(Column::RowValue { row, value });
            }
        }
        for col in 0..n {
            for value in order.values() {
                constraints.push(Column::ColumnValue { col, value });
            }
        }
        for box_index in 0..n {
            for value in order.values() {
                constraints.push(Column::BoxValue { box_index, value });
            }
        }
        constraints.retain(|column| !satisfied.contains(column));

        Some(Self {
            order,
            possibilities,
            constraints,
        })
    }
}

impl ExactCover for SudokuCover {
    type Possibility = Placement;
    type Constraint = Column;

    fn satisfies(&self, poss: &Placement, cons: &Column) -> bool {
        poss.columns(self.order).contains(cons)
    }

    fn is_optional(&self, _cons: &Column) -> bool {
        false
    }

    fn possibilities(&self) -> &[Placement] {
        &self.possibilities
    }

    fn constraints(&self) -> &[Column] {
        &self.constraints
    }
}

/// Encodes, searches, and publishes solutions.
///
/// Returns `Some(count)` with the number of solutions found, or `None`
/// when the givens collide (invalid input).
pub(crate) fn run(id: GridId, order: Order, givens: &[u8], mode: Mode) -> Option<usize> {
    let Some(cover) = SudokuCover::encode(order, givens) else {
        event::emit_message(id, "Grid is not valid.\n", 0);
        return None;
    };
    log::debug!(
        "exact cover universe: {} placements over {} columns",
        cover.possibilities.len(),
        cover.constraints.len()
    );

    let mut solver = Solver::new(&cover);
    let mut count = 0usize;
    match mode {
        Mode::First => {
            if let Some(solution) = solver.next_solution() {
                publish(id, order, givens, &solution);
                count = 1;
            }
        }
        Mode::All => {
            for solution in solver.all_solutions() {
                publish(id, order, givens, &solution);
                count += 1;
            }
        }
    }

    if event::has_message_sinks() {
        let mut text = if count == 1 {
            String::from("1 solution found.\n")
        } else {
            format!("{count} solutions found.\n")
        };
        text.push_str("Solved using exact cover search method.\n");
        event::emit_message(id, text, 0);
    }
    Some(count)
}

/// Merges a solution with the givens and fires `SOLVED`.
fn publish(id: GridId, order: Order, givens: &[u8], solution: &[&Placement]) {
    let n = order.size();
    let mut values = givens.to_vec();
    for placement in solution {
        values[placement.row * n + placement.col] = placement.value;
    }
    event::emit_grid_event(EventKinds::SOLVED, id, &GridSnapshot::from_values(order, &values));
}

#[cfg(test)]
mod tests {
    use candoku_core::Puzzle;

    use super::*;

    #[test]
    fn test_empty_grid_universe_sizes() {
        let order = Order::new(2).unwrap();
        let cover = SudokuCover::encode(order, &[0; 16]).unwrap();
        assert_eq!(cover.possibilities.len(), 64);
        assert_eq!(cover.constraints.len(), 64);
    }

    #[test]
    fn test_given_prunes_placements_and_columns() {
        let order = Order::new(2).unwrap();
        let mut givens = vec![0u8; 16];
        givens[0] = 1;
        let cover = SudokuCover::encode(order, &givens).unwrap();

        // Removed: the 4 placements of cell (0,0), plus value-1
        // placements in the rest of row 0 (3), column 0 (3), and the one
        // box cell not already counted.
        assert_eq!(cover.possibilities.len(), 64 - 4 - 3 - 3 - 1);
        // The given's four columns leave the universe.
        assert_eq!(cover.constraints.len(), 60);
        assert!(!cover.constraints.contains(&Column::Cell { row: 0, col: 0 }));
        assert!(!cover
            .constraints
            .contains(&Column::RowValue { row: 0, value: 1 }));
    }

    #[test]
    fn test_each_placement_satisfies_four_columns() {
        let order = Order::new(2).unwrap();
        let cover = SudokuCover::encode(order, &[0; 16]).unwrap();
        for placement in &cover.possibilities {
            let satisfied = cover
                .constraints
                .iter()
                .filter(|column| cover.satisfies(placement, column))
                .count();
            assert_eq!(satisfied, 4);
        }
    }

    #[test]
    fn test_colliding_givens_fail_pre_cover() {
        let order = Order::new(2).unwrap();
        let puzzle = Puzzle::parse(order, "11.. .... .... ....").unwrap();
        assert!(SudokuCover::encode(order, puzzle.cells()).is_none());

        let puzzle = Puzzle::parse(order, "1... .1.. .... ....").unwrap();
        assert!(SudokuCover::encode(order, puzzle.cells()).is_none());
    }
}
