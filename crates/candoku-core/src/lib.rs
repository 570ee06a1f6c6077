//! Core data model for the candoku sudoku solvers.
//!
//! This crate owns the representations the solving engines share: the
//! puzzle [`Order`] and its text conventions, the [`BitSet`] candidate
//! masks, the popcount-ordered [`SubsetTable`] enumeration, the [`Grid`]
//! of cells/regions/intersections with change tracking, the [`Puzzle`]
//! input type, and the observer bus in [`event`] through which the
//! engines publish state transitions and rule traces.
//!
//! # Modules
//!
//! - [`order`]: puzzle order, symbol tables, naming
//! - [`bit_set`]: compact small-index sets
//! - [`subsets`]: subset enumeration by cardinality
//! - [`grid`]: the grid model
//! - [`puzzle`]: puzzle input and parsing
//! - [`event`]: grid events, messages, observer bus

pub mod bit_set;
pub mod event;
pub mod grid;
pub mod order;
pub mod puzzle;
pub mod subsets;

pub use self::bit_set::BitSet;
pub use self::event::{EventKinds, GridEventSink, GridId, GridSnapshot, Message, MessageSink};
pub use self::grid::{Grid, RegionKind};
pub use self::order::Order;
pub use self::puzzle::{Puzzle, PuzzleError};
pub use self::subsets::SubsetTable;
