//! Cross-region elimination over one box/line intersection.
//!
//! Let `A` be the union of candidates of the box cells outside the
//! overlap and `B` the union over the line cells outside it. A value in
//! `A ⊕ B` is missing from one of the two outsides, so the region that
//! lacks it must place it inside the overlap — and the other region's
//! outside cells can drop it.

use candoku_core::{event, BitSet, Grid};

use crate::counters::Counters;

use super::record_solved_cell;

/// Skims one intersection; returns the number of values eliminated.
///
/// A mask zeroed here is reported by the next region pass over the
/// owning regions, which the mutation flags guarantee.
pub(super) fn skim(grid: &mut Grid, intersection: usize, stats: &mut Counters) -> usize {
    let outside_box: Vec<usize> = grid
        .intersection_outside_box(intersection)
        .iter()
        .map(|&cell| usize::from(cell))
        .collect();
    let outside_line: Vec<usize> = grid
        .intersection_outside_line(intersection)
        .iter()
        .map(|&cell| usize::from(cell))
        .collect();

    let mut box_values = BitSet::EMPTY;
    for &cell in &outside_box {
        box_values |= grid.cell_mask(cell);
    }
    let mut line_values = BitSet::EMPTY;
    for &cell in &outside_line {
        line_values |= grid.cell_mask(cell);
    }

    let locked = box_values ^ line_values;
    if locked.is_empty() {
        return 0;
    }

    stats.rules += locked.len();
    stats.intersection_eliminations += locked.len();

    if event::has_message_sinks() {
        let name = grid.intersection_name(intersection);
        let values = grid.value_list(locked);
        let text = if locked.len() > 1 {
            format!("{name}: the values ({values}) can only lie in {name}.\n")
        } else {
            format!("{name}: the value ({values}) can only lie in {name}.\n")
        };
        event::emit_message(grid.id(), text, 1);
    }

    for &cell in outside_box.iter().chain(outside_line.iter()) {
        if grid.clear_candidates(cell, locked) {
            if grid.cell_mutated(cell) {
                record_solved_cell(grid, cell, stats);
            }
        }
    }

    locked.len()
}
