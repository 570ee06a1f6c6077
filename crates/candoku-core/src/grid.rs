//! Grid model: cells, regions, and box/line intersections.
//!
//! Cells live in one flat array; regions and intersections reference them
//! by index, so the deep copy needed by the hypothesis step is a plain
//! `Clone` with no pointer fix-up. Regions and intersections carry a
//! `changed` flag set through per-cell membership tables whenever a cell
//! mask is mutated; the elimination driver only re-examines dirty
//! structures.
//!
//! Candidate masks are only ever narrowed: [`Grid::clear_candidates`]
//! removes bits and [`Grid::assign`] (used by the hypothesis step on a
//! fresh copy) replaces a mask by one of its own singletons.

use crate::bit_set::BitSet;
use crate::event::{self, GridId, GridSnapshot};
use crate::order::Order;

/// One cell: candidate mask, display name, given flag.
#[derive(Debug, Clone)]
struct Cell {
    mask: BitSet,
    name: String,
    given: bool,
}

/// The three region families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// A horizontal line of `N` cells.
    Row,
    /// A vertical line of `N` cells.
    Column,
    /// An `S×S` box.
    Box,
}

#[derive(Debug, Clone)]
struct Region {
    kind: RegionKind,
    cells: Vec<u16>,
    changed: bool,
    name: String,
}

/// The `S`-cell overlap of a box and a line, represented by the two
/// complements: box cells outside the overlap and line cells outside it.
/// Overlap cells themselves are not stored; mutating one does not dirty
/// the intersection, since the rule only reads the outside lists.
#[derive(Debug, Clone)]
struct Intersection {
    outside_box: Vec<u16>,
    outside_line: Vec<u16>,
    changed: bool,
    name: String,
}

/// An `N×N` grid of candidate masks with its regions and intersections.
#[derive(Debug, Clone)]
pub struct Grid {
    id: GridId,
    order: Order,
    cells: Vec<Cell>,
    regions: Vec<Region>,
    intersections: Vec<Intersection>,
    /// Row, column, and box region index of each cell.
    cell_regions: Vec<[u16; 3]>,
    /// Intersections in which each cell is an outside cell.
    cell_intersections: Vec<Vec<u16>>,
}

impl Grid {
    /// Builds a grid from row-major given values (0 = empty).
    ///
    /// Empty cells start with the full candidate mask, given cells with
    /// their singleton; every region and intersection starts `changed`.
    ///
    /// # Panics
    ///
    /// Panics if `givens.len() != order.cell_count()` or a value exceeds
    /// `N` (the public solve entry validates before building).
    #[must_use]
    pub fn build(order: Order, givens: &[u8]) -> Self {
        let n = order.size();
        let s = order.side();
        assert_eq!(givens.len(), order.cell_count());

        let full = BitSet::all(n);
        let mut cells = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let value = givens[row * n + col];
                assert!(value as usize <= n);
                let (mask, given) = if value == 0 {
                    (full, false)
                } else {
                    (BitSet::single(value as usize - 1), true)
                };
                cells.push(Cell {
                    mask,
                    name: order.cell_name(row, col),
                    given,
                });
            }
        }

        let mut regions = Vec::with_capacity(order.region_count());
        for row in 0..n {
            regions.push(Region {
                kind: RegionKind::Row,
                cells: (0..n).map(|col| (row * n + col) as u16).collect(),
                changed: true,
                name: format!("Row {}", order.row_symbol(row)),
            });
        }
        for col in 0..n {
            regions.push(Region {
                kind: RegionKind::Column,
                cells: (0..n).map(|row| (row * n + col) as u16).collect(),
                changed: true,
                name: format!("Column {}", order.column_symbol(col)),
            });
        }
        for box_index in 0..n {
            let (r0, c0) = order.box_origin(box_index);
            regions.push(Region {
                kind: RegionKind::Box,
                cells: (0..n)
                    .map(|i| ((r0 + i / s) * n + c0 + i % s) as u16)
                    .collect(),
                changed: true,
                name: format!(
                    "Square {}{}-{}{}",
                    order.row_symbol(r0),
                    order.column_symbol(c0),
                    order.row_symbol(r0 + s - 1),
                    order.column_symbol(c0 + s - 1)
                ),
            });
        }

        // Row-direction intersections first, then column-direction, both
        // box-major.
        let mut intersections = Vec::with_capacity(order.intersection_count());
        for box_index in 0..n {
            let (r0, c0) = order.box_origin(box_index);
            for dr in 0..s {
                let row = r0 + dr;
                let outside_box = (0..n)
                    .filter(|i| r0 + i / s != row)
                    .map(|i| ((r0 + i / s) * n + c0 + i % s) as u16)
                    .collect();
                let outside_line = (0..n)
                    .filter(|&col| col < c0 || col >= c0 + s)
                    .map(|col| (row * n + col) as u16)
                    .collect();
                intersections.push(Intersection {
                    outside_box,
                    outside_line,
                    changed: true,
                    name: format!(
                        "Segment {}{}-{}{}",
                        order.row_symbol(row),
                        order.column_symbol(c0),
                        order.row_symbol(row),
                        order.column_symbol(c0 + s - 1)
                    ),
                });
            }
        }
        for box_index in 0..n {
            let (r0, c0) = order.box_origin(box_index);
            for dc in 0..s {
                let col = c0 + dc;
                let outside_box = (0..n)
                    .filter(|i| c0 + i % s != col)
                    .map(|i| ((r0 + i / s) * n + c0 + i % s) as u16)
                    .collect();
                let outside_line = (0..n)
                    .filter(|&row| row < r0 || row >= r0 + s)
                    .map(|row| (row * n + col) as u16)
                    .collect();
                intersections.push(Intersection {
                    outside_box,
                    outside_line,
                    changed: true,
                    name: format!(
                        "Segment {}{}-{}{}",
                        order.row_symbol(r0),
                        order.column_symbol(col),
                        order.row_symbol(r0 + s - 1),
                        order.column_symbol(col)
                    ),
                });
            }
        }

        let mut cell_regions = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                cell_regions.push([
                    row as u16,
                    (n + col) as u16,
                    (2 * n + order.box_index(row, col)) as u16,
                ]);
            }
        }

        let mut cell_intersections = vec![Vec::new(); n * n];
        for (index, intersection) in intersections.iter().enumerate() {
            for &cell in intersection
                .outside_box
                .iter()
                .chain(intersection.outside_line.iter())
            {
                cell_intersections[cell as usize].push(index as u16);
            }
        }

        Self {
            id: GridId::next(),
            order,
            cells,
            regions,
            intersections,
            cell_regions,
            cell_intersections,
        }
    }

    /// The grid identifier carried by every event of this solve.
    #[inline]
    #[must_use]
    pub fn id(&self) -> GridId {
        self.id
    }

    /// The puzzle order.
    #[inline]
    #[must_use]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Flat index of a cell.
    #[inline]
    #[must_use]
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.order.size() + col
    }

    /// The candidate mask of a cell.
    #[inline]
    #[must_use]
    pub fn cell_mask(&self, index: usize) -> BitSet {
        self.cells[index].mask
    }

    /// Whether the cell value was supplied in the input.
    #[inline]
    #[must_use]
    pub fn cell_is_given(&self, index: usize) -> bool {
        self.cells[index].given
    }

    /// The two-symbol display name of a cell.
    #[inline]
    #[must_use]
    pub fn cell_name(&self, index: usize) -> &str {
        &self.cells[index].name
    }

    /// Removes `values` from a cell mask; returns `true` if it changed.
    ///
    /// Does not touch change flags: callers follow up with
    /// [`cell_mutated`](Self::cell_mutated) so that their trace message
    /// can precede the cell-filled marker.
    pub fn clear_candidates(&mut self, index: usize, values: BitSet) -> bool {
        let cell = &mut self.cells[index];
        let before = cell.mask;
        cell.mask = before.without(values);
        cell.mask != before
    }

    /// Replaces a cell mask by a singleton (hypothesis assignment).
    pub fn assign(&mut self, index: usize, value_index: usize) {
        debug_assert!(self.cells[index].mask.contains(value_index));
        self.cells[index].mask = BitSet::single(value_index);
    }

    /// Marks every region and intersection containing the cell as
    /// changed; emits the cell-filled marker and returns `true` if the
    /// cell became solved.
    pub fn cell_mutated(&mut self, index: usize) -> bool {
        for &region in &self.cell_regions[index] {
            self.regions[region as usize].changed = true;
        }
        for &intersection in &self.cell_intersections[index] {
            self.intersections[intersection as usize].changed = true;
        }

        if let Some(value_index) = self.cells[index].mask.as_single() {
            if event::has_message_sinks() {
                let filled = self.solved_count();
                event::emit_message(
                    self.id,
                    format!(
                        "\n  ### Cell {} must contain {} [{:2}] ###\n\n",
                        self.cells[index].name,
                        self.order.value_symbol(value_index as u8 + 1),
                        filled
                    ),
                    1,
                );
            }
            true
        } else {
            false
        }
    }

    /// Number of cells whose mask is not a singleton.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.mask.len() != 1)
            .count()
    }

    /// Number of solved cells, `N² − empty_count`.
    #[inline]
    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.order.cell_count() - self.empty_count()
    }

    /// The kind of a region.
    #[inline]
    #[must_use]
    pub fn region_kind(&self, region: usize) -> RegionKind {
        self.regions[region].kind
    }

    /// The display name of a region.
    #[inline]
    #[must_use]
    pub fn region_name(&self, region: usize) -> &str {
        &self.regions[region].name
    }

    /// The `N` cell indices of a region, in stored order.
    #[inline]
    #[must_use]
    pub fn region_cells(&self, region: usize) -> &[u16] {
        &self.regions[region].cells
    }

    /// Whether a region is flagged for re-examination.
    #[inline]
    #[must_use]
    pub fn region_changed(&self, region: usize) -> bool {
        self.regions[region].changed
    }

    /// Sets or clears a region's change flag.
    #[inline]
    pub fn set_region_changed(&mut self, region: usize, changed: bool) {
        self.regions[region].changed = changed;
    }

    /// The display name of an intersection.
    #[inline]
    #[must_use]
    pub fn intersection_name(&self, intersection: usize) -> &str {
        &self.intersections[intersection].name
    }

    /// Box cells outside the overlap (`N − S` of them).
    #[inline]
    #[must_use]
    pub fn intersection_outside_box(&self, intersection: usize) -> &[u16] {
        &self.intersections[intersection].outside_box
    }

    /// Line cells outside the overlap (`N − S` of them).
    #[inline]
    #[must_use]
    pub fn intersection_outside_line(&self, intersection: usize) -> &[u16] {
        &self.intersections[intersection].outside_line
    }

    /// Whether an intersection is flagged for re-examination.
    #[inline]
    #[must_use]
    pub fn intersection_changed(&self, intersection: usize) -> bool {
        self.intersections[intersection].changed
    }

    /// Sets or clears an intersection's change flag.
    #[inline]
    pub fn set_intersection_changed(&mut self, intersection: usize, changed: bool) {
        self.intersections[intersection].changed = changed;
    }

    /// Space-separated display symbols of a value set, e.g. `"1 4 7"`.
    #[must_use]
    pub fn value_list(&self, values: BitSet) -> String {
        let mut out = String::new();
        for value_index in values.iter() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(self.order.value_symbol(value_index as u8 + 1));
        }
        out
    }

    /// The full candidate-cube payload of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        let n = self.order.size();
        let mut cube = vec![0u8; n * n * n];
        for (index, cell) in self.cells.iter().enumerate() {
            for value_index in cell.mask.iter() {
                cube[index * n + value_index] = value_index as u8 + 1;
            }
        }
        GridSnapshot::from_parts(n, cube, self.solved_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::test_bus_guard;

    fn empty_grid(side: u8) -> Grid {
        let order = Order::new(side).unwrap();
        Grid::build(order, &vec![0; order.cell_count()])
    }

    #[test]
    fn test_build_masks_and_givens() {
        let _guard = test_bus_guard();
        let order = Order::new(2).unwrap();
        let mut givens = vec![0u8; 16];
        givens[0] = 3;
        let grid = Grid::build(order, &givens);

        assert_eq!(grid.cell_mask(0), BitSet::single(2));
        assert!(grid.cell_is_given(0));
        assert_eq!(grid.cell_mask(1), BitSet::all(4));
        assert!(!grid.cell_is_given(1));
        assert_eq!(grid.empty_count(), 15);
        assert_eq!(grid.solved_count(), 1);
    }

    #[test]
    fn test_region_layout() {
        let _guard = test_bus_guard();
        let grid = empty_grid(3);
        assert_eq!(grid.region_kind(0), RegionKind::Row);
        assert_eq!(grid.region_kind(9), RegionKind::Column);
        assert_eq!(grid.region_kind(18), RegionKind::Box);

        // Row 0, column 0, box 0 share cell 0.
        assert_eq!(grid.region_cells(0)[0], 0);
        assert_eq!(grid.region_cells(9)[0], 0);
        assert_eq!(grid.region_cells(18), &[0, 1, 2, 9, 10, 11, 18, 19, 20]);

        assert_eq!(grid.region_name(0), "Row A");
        assert_eq!(grid.region_name(9), "Column j");
        assert_eq!(grid.region_name(18), "Square Aj-Cl");
    }

    #[test]
    fn test_intersection_layout() {
        let _guard = test_bus_guard();
        let grid = empty_grid(3);
        assert_eq!(grid.order().intersection_count(), 54);

        // First intersection: box 0 ∩ row 0.
        assert_eq!(grid.intersection_outside_box(0), &[9, 10, 11, 18, 19, 20]);
        assert_eq!(grid.intersection_outside_line(0), &[3, 4, 5, 6, 7, 8]);
        assert_eq!(grid.intersection_name(0), "Segment Aj-Al");
    }

    #[test]
    fn test_cell_mutated_flags_membership() {
        let _guard = test_bus_guard();
        let mut grid = empty_grid(3);
        for region in 0..grid.order().region_count() {
            grid.set_region_changed(region, false);
        }
        for intersection in 0..grid.order().intersection_count() {
            grid.set_intersection_changed(intersection, false);
        }

        grid.clear_candidates(0, BitSet::single(8));
        grid.cell_mutated(0);

        assert!(grid.region_changed(0)); // row 0
        assert!(grid.region_changed(9)); // column 0
        assert!(grid.region_changed(18)); // box 0
        assert!(!grid.region_changed(1));

        // Cell (0,0) is an outside cell of exactly 8 intersections.
        let dirty = (0..grid.order().intersection_count())
            .filter(|&i| grid.intersection_changed(i))
            .count();
        assert_eq!(dirty, 8);
    }

    #[test]
    fn test_cell_mutated_reports_solved() {
        let _guard = test_bus_guard();
        let mut grid = empty_grid(2);
        assert!(grid.clear_candidates(5, BitSet::from_iter([0, 1, 2])));
        assert!(grid.cell_mutated(5));
        assert_eq!(grid.cell_mask(5), BitSet::single(3));

        // Clearing nothing changes nothing.
        assert!(!grid.clear_candidates(5, BitSet::from_iter([0, 1, 2])));
        // A zeroed mask is not "solved".
        assert!(grid.clear_candidates(5, BitSet::single(3)));
        assert!(!grid.cell_mutated(5));
        assert!(grid.cell_mask(5).is_empty());
    }

    #[test]
    fn test_clone_is_independent_and_keeps_id() {
        let _guard = test_bus_guard();
        let grid = empty_grid(3);
        let mut clone = grid.clone();
        assert_eq!(clone.id(), grid.id());

        clone.assign(40, 4);
        assert_eq!(clone.cell_mask(40), BitSet::single(4));
        assert_eq!(grid.cell_mask(40), BitSet::all(9));
    }

    #[test]
    fn test_snapshot_cube() {
        let _guard = test_bus_guard();
        let order = Order::new(2).unwrap();
        let mut givens = vec![0u8; 16];
        givens[5] = 2;
        let grid = Grid::build(order, &givens);
        let snapshot = grid.snapshot();

        assert_eq!(snapshot.solved_count(), 1);
        assert_eq!(snapshot.candidate(1, 1, 2), 2);
        assert_eq!(snapshot.candidate(1, 1, 3), 0);
        // Unsolved cells still expose all candidates.
        for value in 1..=4 {
            assert_eq!(snapshot.candidate(3, 3, value), value);
        }
        assert_eq!(snapshot.solved_value(1, 1), Some(2));
        assert_eq!(snapshot.solved_value(0, 0), None);
    }
}
