//! Candidate-exclusion and value-exclusion rules inside one region.
//!
//! Both rules are Hall's condition read in the two directions over one
//! subset mask: `k` cells confined to `k` values banish those values
//! from the rest of the region; `k` values confined to `k` cells banish
//! every other value from those cells. Fewer values than cells (or cells
//! than values) is a contradiction.

use candoku_core::{event, BitSet, Grid, SubsetTable};

use crate::counters::Counters;
use crate::Contradiction;

use super::{position_names, record_solved_cell};

/// Scans one region over the subset table.
///
/// Returns the highest subset depth at which something fired (0 for
/// none). A firing at depth 1 lets the size-1 block finish before
/// returning; a deeper firing returns immediately so the driver re-runs
/// the cheap deductions first.
pub(super) fn skim(
    grid: &mut Grid,
    region: usize,
    table: &SubsetTable,
    stats: &mut Counters,
) -> Result<usize, Contradiction> {
    let n = grid.order().size();
    let members: Vec<usize> = grid
        .region_cells(region)
        .iter()
        .map(|&cell| usize::from(cell))
        .collect();

    let mut stop = 0;
    for depth in 1..=n {
        if stop != 0 {
            break;
        }
        for &raw in table.of_cardinality(depth) {
            let bits = BitSet::from_bits(raw);

            // Candidate exclusion (direct Hall): the cells at the subset
            // positions collectively hold `values`.
            let mut values = BitSet::EMPTY;
            for position in bits.iter() {
                values |= grid.cell_mask(members[position]);
            }
            if values.len() < depth {
                return Err(Contradiction);
            }
            if values.len() == depth {
                let others = bits.complement(n);
                let fires = others
                    .iter()
                    .any(|position| grid.cell_mask(members[position]).intersects(values));
                if fires {
                    announce_candidate_exclusion(grid, region, &members, bits, values);
                    for position in others.iter() {
                        let cell = members[position];
                        if grid.clear_candidates(cell, values) {
                            if grid.cell_mutated(cell) {
                                record_solved_cell(grid, cell, stats);
                            }
                            if grid.cell_mask(cell).is_empty() {
                                return Err(Contradiction);
                            }
                        }
                    }
                    stats.rules += 1;
                    stats.candidate_exclusions[depth - 1] += 1;
                    if depth > 1 {
                        return Ok(depth);
                    }
                    stop = 1;
                }
            }

            // Value exclusion (dual Hall): the subset read as values can
            // only live in `holders` cells.
            let mut holders = BitSet::EMPTY;
            for (position, &cell) in members.iter().enumerate() {
                if grid.cell_mask(cell).intersects(bits) {
                    holders.insert(position);
                }
            }
            if depth > holders.len() {
                return Err(Contradiction);
            }
            if depth == holders.len() {
                let other_values = bits.complement(n);
                let fires = holders
                    .iter()
                    .any(|position| grid.cell_mask(members[position]).intersects(other_values));
                if fires {
                    announce_value_exclusion(grid, region, &members, bits, holders);
                    for position in holders.iter() {
                        let cell = members[position];
                        if grid.clear_candidates(cell, other_values) {
                            if grid.cell_mutated(cell) {
                                record_solved_cell(grid, cell, stats);
                            }
                            if grid.cell_mask(cell).is_empty() {
                                return Err(Contradiction);
                            }
                        }
                    }
                    stats.rules += 1;
                    stats.value_exclusions[depth - 1] += 1;
                    if depth > 1 {
                        return Ok(depth);
                    }
                    stop = 1;
                }
            }
        }
    }
    Ok(stop)
}

fn announce_candidate_exclusion(
    grid: &Grid,
    region: usize,
    members: &[usize],
    positions: BitSet,
    values: BitSet,
) {
    if !event::has_message_sinks() {
        return;
    }
    let k = positions.len();
    // Re-deriving a given is not worth a trace line.
    if k == 1 {
        if let Some(position) = positions.as_single() {
            if grid.cell_is_given(members[position]) {
                return;
            }
        }
    }
    let name = grid.region_name(region);
    let cells = position_names(grid, members, positions);
    let value_names = grid.value_list(values);
    let (text, verbosity) = if k > 1 {
        (
            format!(
                "{name}: each one of the {k} cells [{cells}] can only accept one of the {k} values ({value_names}).\n\
                 -> {name}: each one of the {k} values ({value_names}) can only lie in one of the {k} cells [{cells}].\n"
            ),
            1,
        )
    } else {
        (
            format!(
                "{name}: the cell [{cells}] can only accept the value ({value_names}).\n\
                 -> {name}: the value ({value_names}) can only lie in the cell [{cells}].\n"
            ),
            3,
        )
    };
    event::emit_message(grid.id(), text, verbosity);
}

fn announce_value_exclusion(
    grid: &Grid,
    region: usize,
    members: &[usize],
    values: BitSet,
    holders: BitSet,
) {
    if !event::has_message_sinks() {
        return;
    }
    let k = values.len();
    if k == 1 {
        if let Some(position) = holders.as_single() {
            if grid.cell_is_given(members[position]) {
                return;
            }
        }
    }
    let name = grid.region_name(region);
    let cells = position_names(grid, members, holders);
    let value_names = grid.value_list(values);
    let (text, verbosity) = if k > 1 {
        (
            format!(
                "{name}: each one of the {k} values ({value_names}) can only lie in one of the {k} cells [{cells}].\n\
                 -> {name}: each one of the {k} cells [{cells}] can only accept one of the {k} values ({value_names}).\n"
            ),
            1,
        )
    } else {
        (
            format!(
                "{name}: the value ({value_names}) can only lie in the cell [{cells}].\n\
                 -> {name}: the cell [{cells}] can only accept the value ({value_names}).\n"
            ),
            2,
        )
    };
    event::emit_message(grid.id(), text, verbosity);
}

#[cfg(test)]
mod tests {
    use candoku_core::{Order, Puzzle, SubsetTable};

    use super::*;

    fn grid_from(order: Order, text: &str) -> Grid {
        let puzzle = Puzzle::parse(order, text).unwrap();
        Grid::build(order, puzzle.cells())
    }

    #[test]
    fn test_naked_single_clears_region_peers() {
        let order = Order::new(2).unwrap();
        let mut grid = grid_from(order, "1... .... .... ....");
        let table = SubsetTable::shared(4);
        let mut stats = Counters::new(order);

        // Column 0 contains the given 1 at position 0.
        let column_region = 4;
        let fired = skim(&mut grid, column_region, &table, &mut stats).unwrap();
        assert_eq!(fired, 1);
        for row in 1..4 {
            assert!(!grid.cell_mask(grid.cell_index(row, 0)).contains(0));
        }
        assert_eq!(stats.candidate_exclusions[0], 1);
    }

    #[test]
    fn test_naked_pair_fires_at_depth_two() {
        let order = Order::new(2).unwrap();
        let mut grid = grid_from(order, &".".repeat(16));
        // Row 0: cells (0,0) and (0,1) restricted to values {1,2}.
        let pair = BitSet::from_iter([2, 3]);
        for col in 0..2 {
            let cell = grid.cell_index(0, col);
            grid.clear_candidates(cell, pair);
            grid.cell_mutated(cell);
        }
        let table = SubsetTable::shared(4);
        let mut stats = Counters::new(order);

        let fired = skim(&mut grid, 0, &table, &mut stats).unwrap();
        assert_eq!(fired, 2);
        // Values 1 and 2 are gone from the rest of row 0.
        for col in 2..4 {
            let mask = grid.cell_mask(grid.cell_index(0, col));
            assert!(!mask.contains(0));
            assert!(!mask.contains(1));
        }
        assert_eq!(stats.candidate_exclusions[1], 1);
    }

    #[test]
    fn test_hidden_single_strips_other_values() {
        let order = Order::new(2).unwrap();
        let mut grid = grid_from(order, &".".repeat(16));
        // Value 4 possible only at (0,3) within row 0.
        let four = BitSet::single(3);
        for col in 0..3 {
            let cell = grid.cell_index(0, col);
            grid.clear_candidates(cell, four);
            grid.cell_mutated(cell);
        }
        let table = SubsetTable::shared(4);
        let mut stats = Counters::new(order);

        let fired = skim(&mut grid, 0, &table, &mut stats).unwrap();
        assert_eq!(fired, 1);
        assert_eq!(grid.cell_mask(grid.cell_index(0, 3)), four);
        assert!(stats.value_exclusions[0] >= 1);
    }

    #[test]
    fn test_duplicate_givens_are_a_contradiction() {
        let order = Order::new(2).unwrap();
        let mut grid = grid_from(order, "11.. .... .... ....");
        let table = SubsetTable::shared(4);
        let mut stats = Counters::new(order);

        assert!(skim(&mut grid, 0, &table, &mut stats).is_err());
    }

    #[test]
    fn test_clean_region_reports_nothing() {
        let order = Order::new(2).unwrap();
        let mut grid = grid_from(order, &".".repeat(16));
        let table = SubsetTable::shared(4);
        let mut stats = Counters::new(order);

        assert_eq!(skim(&mut grid, 0, &table, &mut stats).unwrap(), 0);
        assert_eq!(stats.rules, 0);
    }
}
