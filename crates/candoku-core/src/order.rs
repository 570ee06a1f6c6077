//! Puzzle order and the text referential derived from it.
//!
//! An [`Order`] is the square side `S` of the puzzle; the grid is
//! `N×N` with `N = S²`. The order also owns the text conventions: row
//! names are the first `N` uppercase letters, column names the next `N`
//! lowercase letters (when `N ≤ 9`; otherwise the first `N` lowercase),
//! and value names run `1..9`, then `a..z`, then `@`.

use std::fmt;

use serde::{Deserialize, Serialize};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const VALUE_SYMBOLS: &[u8] = b"123456789abcdefghijklmnopqrstuvwxyz@";

/// The square side of a puzzle, in `2..=5`.
///
/// # Examples
///
/// ```
/// use candoku_core::Order;
///
/// let order = Order::STANDARD;
/// assert_eq!(order.side(), 3);
/// assert_eq!(order.size(), 9);
/// assert_eq!(order.cell_count(), 81);
///
/// assert!(Order::new(4).is_some());
/// assert!(Order::new(6).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    side: u8,
}

impl Order {
    /// Smallest supported square side.
    pub const MIN_SIDE: u8 = 2;
    /// Largest supported square side.
    pub const MAX_SIDE: u8 = 5;
    /// The classic 9×9 order.
    pub const STANDARD: Self = Self { side: 3 };

    /// Creates an order from a square side, if supported.
    #[must_use]
    pub fn new(side: u8) -> Option<Self> {
        if (Self::MIN_SIDE..=Self::MAX_SIDE).contains(&side) {
            Some(Self { side })
        } else {
            None
        }
    }

    /// The square side `S`.
    #[inline]
    #[must_use]
    pub const fn side(self) -> usize {
        self.side as usize
    }

    /// The grid side `N = S²`: cells per region, candidates per cell.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        self.side() * self.side()
    }

    /// Total number of cells, `N²`.
    #[inline]
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.size() * self.size()
    }

    /// Total number of regions: `N` rows + `N` columns + `N` boxes.
    #[inline]
    #[must_use]
    pub const fn region_count(self) -> usize {
        3 * self.size()
    }

    /// Total number of box/line intersections, `2·N·S`.
    #[inline]
    #[must_use]
    pub const fn intersection_count(self) -> usize {
        2 * self.size() * self.side()
    }

    /// The box index (row-major over boxes) containing a cell.
    #[inline]
    #[must_use]
    pub const fn box_index(self, row: usize, col: usize) -> usize {
        (row / self.side()) * self.side() + col / self.side()
    }

    /// The top-left cell of a box.
    #[inline]
    #[must_use]
    pub const fn box_origin(self, box_index: usize) -> (usize, usize) {
        (
            (box_index / self.side()) * self.side(),
            (box_index % self.side()) * self.side(),
        )
    }

    /// All values of this order, `1..=N`.
    #[inline]
    pub fn values(self) -> impl Iterator<Item = u8> {
        1..=self.size() as u8
    }

    /// Display symbol of a row index.
    #[must_use]
    pub fn row_symbol(self, row: usize) -> char {
        debug_assert!(row < self.size());
        ALPHABET[row] as char
    }

    /// Display symbol of a column index.
    ///
    /// Columns use the `N` letters following the row letters when
    /// `N ≤ 9`, so that rows and columns never share a letter; larger
    /// orders start over at `a`.
    #[must_use]
    pub fn column_symbol(self, col: usize) -> char {
        debug_assert!(col < self.size());
        let offset = if self.size() <= 9 { self.size() } else { 0 };
        (ALPHABET[col + offset] as char).to_ascii_lowercase()
    }

    /// Display symbol of a value in `1..=N`.
    #[must_use]
    pub fn value_symbol(self, value: u8) -> char {
        debug_assert!(value >= 1 && value as usize <= self.size());
        VALUE_SYMBOLS[value as usize - 1] as char
    }

    /// Parses a value symbol, case-insensitively.
    #[must_use]
    pub fn value_from_symbol(self, symbol: char) -> Option<u8> {
        let wanted = symbol.to_ascii_lowercase();
        VALUE_SYMBOLS[..self.size()]
            .iter()
            .position(|&s| s as char == wanted)
            .map(|i| i as u8 + 1)
    }

    /// Returns `true` for the empty-cell codes `'0'` and `'.'`.
    #[inline]
    #[must_use]
    pub fn is_empty_symbol(symbol: char) -> bool {
        symbol == '0' || symbol == '.'
    }

    /// Two-symbol display name of a cell, e.g. `"Aj"`.
    #[must_use]
    pub fn cell_name(self, row: usize, col: usize) -> String {
        let mut name = String::with_capacity(2);
        name.push(self.row_symbol(row));
        name.push(self.column_symbol(col));
        name
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}×{0}", self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_sides() {
        assert!(Order::new(1).is_none());
        assert!(Order::new(2).is_some());
        assert!(Order::new(5).is_some());
        assert!(Order::new(6).is_none());
    }

    #[test]
    fn test_derived_sizes() {
        let order = Order::new(4).unwrap();
        assert_eq!(order.size(), 16);
        assert_eq!(order.cell_count(), 256);
        assert_eq!(order.region_count(), 48);
        assert_eq!(order.intersection_count(), 128);
    }

    #[test]
    fn test_box_arithmetic() {
        let order = Order::STANDARD;
        assert_eq!(order.box_index(0, 0), 0);
        assert_eq!(order.box_index(4, 7), 5);
        assert_eq!(order.box_index(8, 8), 8);
        assert_eq!(order.box_origin(5), (3, 6));
    }

    #[test]
    fn test_symbols_9x9() {
        let order = Order::STANDARD;
        assert_eq!(order.row_symbol(0), 'A');
        assert_eq!(order.row_symbol(8), 'I');
        // Columns continue after the row letters.
        assert_eq!(order.column_symbol(0), 'j');
        assert_eq!(order.column_symbol(8), 'r');
        assert_eq!(order.value_symbol(1), '1');
        assert_eq!(order.value_symbol(9), '9');
        assert_eq!(order.cell_name(0, 1), "Ak");
    }

    #[test]
    fn test_symbols_large_orders() {
        let order = Order::new(4).unwrap();
        assert_eq!(order.column_symbol(0), 'a');
        assert_eq!(order.value_symbol(10), 'a');
        assert_eq!(order.value_symbol(16), 'g');

        let order = Order::new(5).unwrap();
        assert_eq!(order.value_symbol(25), 'p');
    }

    #[test]
    fn test_value_from_symbol() {
        let order = Order::STANDARD;
        assert_eq!(order.value_from_symbol('5'), Some(5));
        assert_eq!(order.value_from_symbol('a'), None);

        let order = Order::new(4).unwrap();
        assert_eq!(order.value_from_symbol('a'), Some(10));
        assert_eq!(order.value_from_symbol('A'), Some(10));
        assert_eq!(order.value_from_symbol('z'), None);
    }

    #[test]
    fn test_empty_symbols() {
        assert!(Order::is_empty_symbol('0'));
        assert!(Order::is_empty_symbol('.'));
        assert!(!Order::is_empty_symbol('1'));
    }
}
