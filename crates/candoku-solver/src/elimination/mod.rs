//! The elimination solver: fixed-point rule propagation plus recursive
//! hypothesis.
//!
//! One pass scans the dirty regions (candidate/value exclusion), then
//! every digit (line rules), then the dirty intersections. A firing
//! region or line rule restarts the pass from the regions; intersection
//! eliminations feed straight back into the loop condition. When the
//! loop exits on an incomplete grid, the driver picks the unsolved cell
//! with the fewest candidates and tries each of them on a deep copy.

mod intersection;
mod line;
mod region;

use std::sync::Arc;

use candoku_core::{event, BitSet, EventKinds, Grid, SubsetTable};

use crate::counters::Counters;
use crate::{Contradiction, Mode};

/// Runs the elimination solver to completion.
///
/// Returns the backtracking depth of the solve on success; `Err` means
/// the grid admits no solution on this path.
pub(crate) fn run(
    grid: &mut Grid,
    mode: Mode,
    stats: &mut Counters,
) -> Result<usize, Contradiction> {
    let table = SubsetTable::shared(grid.order().size());
    solve(grid, &table, mode, stats)
}

fn solve(
    grid: &mut Grid,
    table: &Arc<SubsetTable>,
    mode: Mode,
    stats: &mut Counters,
) -> Result<usize, Contradiction> {
    fixed_point(grid, table, stats)?;

    // Pivot: unsolved cell with the fewest candidates, scan order breaking
    // ties, early exit on a 2-candidate cell.
    let mut pivot = None;
    let mut fewest = usize::MAX;
    for cell in 0..grid.order().cell_count() {
        let count = grid.cell_mask(cell).len();
        if count >= 2 && count < fewest {
            pivot = Some(cell);
            fewest = count;
            if fewest == 2 {
                break;
            }
        }
    }

    let Some(pivot) = pivot else {
        // Complete and contradiction-free.
        return Ok(solved(grid, stats));
    };

    if event::has_grid_sinks(EventKinds::CHANGE) {
        event::emit_grid_event(EventKinds::CHANGE, grid.id(), &grid.snapshot());
    }

    let candidates = grid.cell_mask(pivot);
    let mut outcome: Option<usize> = None;
    for value_index in candidates.iter() {
        let mut branch = grid.clone();
        branch.assign(pivot, value_index);

        let filled = branch.solved_count();
        let value = branch.order().value_symbol(value_index as u8 + 1);
        stats.record_fill(
            filled,
            format!("{:2}. {}={}?", filled, branch.cell_name(pivot), value),
        );
        if event::has_message_sinks() {
            event::emit_message(
                grid.id(),
                format!(
                    "  ??? Hypothesis: cell {} = {} ? (out of {}) [{:2}] ???\n",
                    branch.cell_name(pivot),
                    value,
                    grid.value_list(candidates),
                    filled
                ),
                1,
            );
        }
        branch.cell_mutated(pivot);

        stats.hypotheses += 1;
        stats.depth += 1;
        let result = solve(&mut branch, table, mode, stats);

        let steps = grid.empty_count() - branch.empty_count();
        if steps > stats.deepest_steps {
            stats.deepest_steps = steps;
        }

        match result {
            Ok(level) => {
                stats.depth = level;
                outcome = Some(level);
                if mode == Mode::First {
                    return Ok(level);
                }
            }
            Err(Contradiction) => {
                stats.depth -= 1;
                if event::has_message_sinks() {
                    event::emit_message(
                        grid.id(),
                        format!(
                            "  %%% Incorrect guess: cell {} = {} [{:2}] (after {} steps). %%%\n",
                            grid.cell_name(pivot),
                            value,
                            filled,
                            steps
                        ),
                        1,
                    );
                }
            }
        }
    }

    outcome.ok_or(Contradiction)
}

/// Drives the three rule families until nothing changes.
fn fixed_point(
    grid: &mut Grid,
    table: &SubsetTable,
    stats: &mut Counters,
) -> Result<(), Contradiction> {
    let mut progressed = true;
    while progressed {
        let fired = skim_regions(grid, table, stats)?;
        if fired > 0 {
            continue;
        }
        let fired = skim_lines(grid, table, stats)?;
        if fired > 0 {
            continue;
        }
        progressed = skim_intersections(grid, stats) > 0;
    }
    Ok(())
}

/// Runs the region rules over every dirty region; returns the highest
/// firing depth.
fn skim_regions(
    grid: &mut Grid,
    table: &SubsetTable,
    stats: &mut Counters,
) -> Result<usize, Contradiction> {
    let mut best = 0;
    for index in 0..grid.order().region_count() {
        if !grid.region_changed(index) {
            continue;
        }
        grid.set_region_changed(index, false);
        match region::skim(grid, index, table, stats) {
            Ok(0) => {}
            Ok(depth) => {
                best = best.max(depth);
                if event::has_grid_sinks(EventKinds::CHANGE) {
                    event::emit_grid_event(EventKinds::CHANGE, grid.id(), &grid.snapshot());
                }
            }
            Err(contradiction) => {
                event::emit_message(grid.id(), "  => Invalid grid.\n", 1);
                return Err(contradiction);
            }
        }
    }
    Ok(best)
}

/// Runs the line rules for every digit; returns the highest firing depth.
fn skim_lines(
    grid: &mut Grid,
    table: &SubsetTable,
    stats: &mut Counters,
) -> Result<usize, Contradiction> {
    let mut best = 0;
    for value_index in 0..grid.order().size() {
        match line::skim(grid, value_index, table, stats) {
            Ok(0) => {}
            Ok(depth) => {
                best = best.max(depth);
                if event::has_grid_sinks(EventKinds::CHANGE) {
                    event::emit_grid_event(EventKinds::CHANGE, grid.id(), &grid.snapshot());
                }
            }
            Err(contradiction) => {
                event::emit_message(grid.id(), "  => Invalid grid.\n", 1);
                return Err(contradiction);
            }
        }
    }
    Ok(best)
}

/// Runs the intersection rule over every dirty intersection; returns the
/// total number of values eliminated.
fn skim_intersections(grid: &mut Grid, stats: &mut Counters) -> usize {
    let mut total = 0;
    for index in 0..grid.order().intersection_count() {
        if !grid.intersection_changed(index) {
            continue;
        }
        grid.set_intersection_changed(index, false);
        let eliminated = intersection::skim(grid, index, stats);
        if eliminated > 0 {
            total += eliminated;
            if event::has_grid_sinks(EventKinds::CHANGE) {
                event::emit_grid_event(EventKinds::CHANGE, grid.id(), &grid.snapshot());
            }
        }
    }
    total
}

/// Reports a complete, contradiction-free grid.
fn solved(grid: &Grid, stats: &mut Counters) -> usize {
    stats.solutions += 1;
    if event::has_message_sinks() {
        let mut text = format!(
            "Solved using elimination method (solution #{}).\n",
            stats.solutions
        );
        text.push_str(&stats.render_trail());
        event::emit_message(grid.id(), text, 0);
    }
    if event::has_grid_sinks(EventKinds::SOLVED) {
        event::emit_grid_event(EventKinds::SOLVED, grid.id(), &grid.snapshot());
    }
    stats.depth
}

/// Logs the fill-trail entry for a cell that just became solved.
fn record_solved_cell(grid: &Grid, cell: usize, stats: &mut Counters) {
    if let Some(value_index) = grid.cell_mask(cell).as_single() {
        let filled = grid.solved_count();
        stats.record_fill(
            filled,
            format!(
                "{:2}. {}={}",
                filled,
                grid.cell_name(cell),
                grid.order().value_symbol(value_index as u8 + 1)
            ),
        );
    }
}

/// Space-separated names of the region cells at the subset positions.
fn position_names(grid: &Grid, members: &[usize], positions: BitSet) -> String {
    let mut out = String::new();
    for position in positions.iter() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(grid.cell_name(members[position]));
    }
    out
}
