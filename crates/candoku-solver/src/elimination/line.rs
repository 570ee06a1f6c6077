//! Row-locked and column-locked propagation for a single value.
//!
//! For a subset of `k` rows, collect the columns in which the value is
//! still possible inside those rows. Fewer columns than rows violates
//! Hall's condition; exactly `k` columns pin the value to the subset
//! rows, so it disappears from those columns everywhere else. Columns
//! are treated symmetrically. The k = 2 case is the classic X-Wing.

use candoku_core::{event, BitSet, Grid, SubsetTable};

use crate::counters::Counters;
use crate::Contradiction;

use super::record_solved_cell;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Rows,
    Columns,
}

impl Axis {
    /// Flat cell index of (`line`, `cross`) on this axis.
    fn cell(self, line: usize, cross: usize, n: usize) -> usize {
        match self {
            Self::Rows => line * n + cross,
            Self::Columns => cross * n + line,
        }
    }
}

/// Scans the whole grid for one value over the subset table.
///
/// Same return contract and early-exit discipline as the region rules.
pub(super) fn skim(
    grid: &mut Grid,
    value_index: usize,
    table: &SubsetTable,
    stats: &mut Counters,
) -> Result<usize, Contradiction> {
    let n = grid.order().size();
    let mut stop = 0;
    for depth in 1..=n {
        if stop != 0 {
            break;
        }
        for &raw in table.of_cardinality(depth) {
            let bits = BitSet::from_bits(raw);
            for axis in [Axis::Rows, Axis::Columns] {
                if let Some(fired) = exclude(grid, value_index, bits, axis, stats)? {
                    if fired > 1 {
                        return Ok(fired);
                    }
                    stop = 1;
                }
            }
        }
    }
    Ok(stop)
}

/// Applies one subset of lines on one axis.
///
/// Returns `Ok(Some(k))` when the rule fired, `Ok(None)` when it did not
/// apply or had nothing left to remove.
fn exclude(
    grid: &mut Grid,
    value_index: usize,
    lines: BitSet,
    axis: Axis,
    stats: &mut Counters,
) -> Result<Option<usize>, Contradiction> {
    let n = grid.order().size();
    let depth = lines.len();

    // Cross-lines in which the value is still possible within `lines`.
    let mut cover = BitSet::EMPTY;
    for line in lines.iter() {
        for cross in 0..n {
            if grid.cell_mask(axis.cell(line, cross, n)).contains(value_index) {
                cover.insert(cross);
            }
        }
    }
    if cover.len() < depth {
        return Err(Contradiction);
    }
    if cover.len() > depth {
        return Ok(None);
    }

    let mut targets = Vec::new();
    for line in lines.complement(n).iter() {
        for cross in cover.iter() {
            let cell = axis.cell(line, cross, n);
            if grid.cell_mask(cell).contains(value_index) {
                targets.push(cell);
            }
        }
    }
    if targets.is_empty() {
        return Ok(None);
    }

    announce(grid, value_index, lines, cover, axis);

    let value_mask = BitSet::single(value_index);
    for cell in targets {
        if grid.clear_candidates(cell, value_mask) {
            if grid.cell_mutated(cell) {
                record_solved_cell(grid, cell, stats);
            }
            if grid.cell_mask(cell).is_empty() {
                return Err(Contradiction);
            }
        }
    }
    stats.rules += 1;
    stats.line_exclusions[depth - 1] += 1;
    Ok(Some(depth))
}

fn announce(grid: &Grid, value_index: usize, lines: BitSet, cover: BitSet, axis: Axis) {
    if !event::has_message_sinks() {
        return;
    }
    let n = grid.order().size();
    let depth = lines.len();

    // A single line whose value is already a given there adds no news.
    if depth == 1 {
        if let Some(line) = lines.as_single() {
            for cross in 0..n {
                let cell = axis.cell(line, cross, n);
                if grid.cell_mask(cell).contains(value_index) && grid.cell_is_given(cell) {
                    return;
                }
            }
        }
    }

    let order = grid.order();
    let value = order.value_symbol(value_index as u8 + 1);
    let line_names = |set: BitSet, rows: bool| -> String {
        let mut out = String::new();
        for index in set.iter() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(if rows {
                order.row_symbol(index)
            } else {
                order.column_symbol(index)
            });
        }
        out
    };

    let (text, verbosity) = match axis {
        Axis::Rows => {
            let rows = line_names(lines, true);
            let cols = line_names(cover, false);
            if depth > 1 {
                (
                    format!(
                        "Value {value} in each one of the {depth} rows [{rows}] lies only in one of the columns [{cols}].\n\
                         -> Value {value} in each one of the {depth} columns [{cols}] can only lie in the rows [{rows}].\n"
                    ),
                    1,
                )
            } else {
                (
                    format!(
                        "Value {value} in row [{rows}] lies only in column [{cols}].\n\
                         -> Value {value} in column [{cols}] can only lie in the row [{rows}].\n"
                    ),
                    3,
                )
            }
        }
        Axis::Columns => {
            let cols = line_names(lines, false);
            let rows = line_names(cover, true);
            if depth > 1 {
                (
                    format!(
                        "Value {value} in each one of the {depth} columns [{cols}] lies only in one of the rows [{rows}].\n\
                         -> Value {value} in each one of the {depth} rows [{rows}] can only lie in the columns [{cols}].\n"
                    ),
                    1,
                )
            } else {
                (
                    format!(
                        "Value {value} in column [{cols}] lies only in row [{rows}].\n\
                         -> Value {value} in row [{rows}] can only lie in the column [{cols}].\n"
                    ),
                    3,
                )
            }
        }
    };
    event::emit_message(grid.id(), text, verbosity);
}
