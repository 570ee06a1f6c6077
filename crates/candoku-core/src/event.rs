//! Grid events, rule-trace messages, and the observer bus.
//!
//! The elimination engine exposes its reasoning only through this bus:
//! grid-state transitions go to [`GridEventSink`]s registered per event
//! kind, and human-readable rule traces go to [`MessageSink`]s with a
//! verbosity level. The bus is process-global and single-threaded in use
//! (one solve at a time); registration order is dispatch order, duplicate
//! registrations of the same sink are ignored, and removing `None`
//! removes every sink of the kind.
//!
//! Sink identity is the `Arc` allocation: register and remove with the
//! same `Arc` value.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use candoku_core::event::{self, EventKinds, GridEventSink};
//!
//! let sink: GridEventSink = Arc::new(|id, snapshot| {
//!     println!("grid {id}: {} cells solved", snapshot.solved_count());
//! });
//! event::on_grid_event(EventKinds::SOLVED, &sink);
//! // ... solve ...
//! event::off_grid_event(EventKinds::SOLVED, Some(&sink));
//! ```

use std::fmt;
use std::ops::BitOr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::order::Order;

/// Process-unique identifier of a grid under solve.
///
/// Hypothesis clones keep the identifier of the grid they were copied
/// from, so every event of one solve call carries one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridId(u64);

impl GridId {
    /// Identifier used for messages that precede any grid construction.
    pub const UNKNOWN: Self = Self(0);

    /// Allocates a fresh identifier.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Or-able set of grid event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKinds(u8);

impl EventKinds {
    /// Grid model initialized from the input.
    pub const INIT: Self = Self(1);
    /// Candidates were eliminated.
    pub const CHANGE: Self = Self(2);
    /// A complete solution was reached.
    pub const SOLVED: Self = Self(4);
    /// Every kind.
    pub const ALL: Self = Self(7);

    /// Returns `true` if every kind of `other` is included in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EventKinds {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A rule-trace message with a verbosity level.
///
/// Level 0 carries outcomes (solution found, invalid grid, statistics);
/// higher levels carry progressively finer-grained rule traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable trace text.
    pub text: String,
    /// Verbosity level; 0 is always worth showing.
    pub verbosity: u8,
}

/// Grid event payload: an `N×N×N` candidate cube plus the solved count.
///
/// `candidate(r, c, v)` is `v` while value `v` remains a candidate of
/// cell `(r, c)` and `0` once it has been eliminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    size: usize,
    cube: Vec<u8>,
    solved_count: usize,
}

impl GridSnapshot {
    pub(crate) fn from_parts(size: usize, cube: Vec<u8>, solved_count: usize) -> Self {
        debug_assert_eq!(cube.len(), size * size * size);
        Self {
            size,
            cube,
            solved_count,
        }
    }

    /// Builds a snapshot from a plain value grid (0 = empty).
    ///
    /// Solved cells carry their value as the only candidate; empty cells
    /// carry none.
    #[must_use]
    pub fn from_values(order: Order, values: &[u8]) -> Self {
        let n = order.size();
        debug_assert_eq!(values.len(), n * n);
        let mut cube = vec![0u8; n * n * n];
        let mut solved = 0usize;
        for (cell, &value) in values.iter().enumerate() {
            if value != 0 {
                cube[cell * n + value as usize - 1] = value;
                solved += 1;
            }
        }
        Self {
            size: n,
            cube,
            solved_count: solved,
        }
    }

    /// The grid side `N`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `N² − empty_count`.
    #[inline]
    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.solved_count
    }

    /// `value` if it is still a candidate of `(row, col)`, else 0.
    #[inline]
    #[must_use]
    pub fn candidate(&self, row: usize, col: usize, value: u8) -> u8 {
        self.cube[(row * self.size + col) * self.size + value as usize - 1]
    }

    /// The cell's value if it has exactly one candidate.
    #[must_use]
    pub fn solved_value(&self, row: usize, col: usize) -> Option<u8> {
        let mut found = None;
        for value in 1..=self.size as u8 {
            if self.candidate(row, col, value) != 0 {
                if found.is_some() {
                    return None;
                }
                found = Some(value);
            }
        }
        found
    }
}

/// A grid-event callback.
pub type GridEventSink = Arc<dyn Fn(GridId, &GridSnapshot) + Send + Sync>;

/// A message callback.
pub type MessageSink = Arc<dyn Fn(GridId, &Message) + Send + Sync>;

struct Registry {
    init: Vec<GridEventSink>,
    change: Vec<GridEventSink>,
    solved: Vec<GridEventSink>,
    messages: Vec<MessageSink>,
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    init: Vec::new(),
    change: Vec::new(),
    solved: Vec::new(),
    messages: Vec::new(),
});

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

fn add_grid_sink(list: &mut Vec<GridEventSink>, sink: &GridEventSink) {
    if !list.iter().any(|known| Arc::ptr_eq(known, sink)) {
        list.push(Arc::clone(sink));
    }
}

fn remove_grid_sink(list: &mut Vec<GridEventSink>, sink: Option<&GridEventSink>) {
    match sink {
        Some(sink) => list.retain(|known| !Arc::ptr_eq(known, sink)),
        None => list.clear(),
    }
}

/// Registers a grid-event sink for every kind in `kinds`.
pub fn on_grid_event(kinds: EventKinds, sink: &GridEventSink) {
    let mut registry = registry();
    if kinds.contains(EventKinds::INIT) {
        add_grid_sink(&mut registry.init, sink);
    }
    if kinds.contains(EventKinds::CHANGE) {
        add_grid_sink(&mut registry.change, sink);
    }
    if kinds.contains(EventKinds::SOLVED) {
        add_grid_sink(&mut registry.solved, sink);
    }
}

/// Removes a grid-event sink from every kind in `kinds`.
///
/// Passing `None` removes every sink of those kinds.
pub fn off_grid_event(kinds: EventKinds, sink: Option<&GridEventSink>) {
    let mut registry = registry();
    if kinds.contains(EventKinds::INIT) {
        remove_grid_sink(&mut registry.init, sink);
    }
    if kinds.contains(EventKinds::CHANGE) {
        remove_grid_sink(&mut registry.change, sink);
    }
    if kinds.contains(EventKinds::SOLVED) {
        remove_grid_sink(&mut registry.solved, sink);
    }
}

/// Registers a message sink.
pub fn on_message(sink: &MessageSink) {
    let mut registry = registry();
    if !registry.messages.iter().any(|known| Arc::ptr_eq(known, sink)) {
        registry.messages.push(Arc::clone(sink));
    }
}

/// Removes a message sink; `None` removes them all.
pub fn off_message(sink: Option<&MessageSink>) {
    let mut registry = registry();
    match sink {
        Some(sink) => registry.messages.retain(|known| !Arc::ptr_eq(known, sink)),
        None => registry.messages.clear(),
    }
}

/// Removes every registered sink of every kind.
pub fn clear_all() {
    off_grid_event(EventKinds::ALL, None);
    off_message(None);
}

/// Returns `true` if any message sink is registered.
///
/// Emitters use this to skip building trace strings nobody will read.
#[must_use]
pub fn has_message_sinks() -> bool {
    !registry().messages.is_empty()
}

/// Returns `true` if any sink is registered for the (single) kind.
#[must_use]
pub fn has_grid_sinks(kind: EventKinds) -> bool {
    let registry = registry();
    if kind == EventKinds::INIT {
        !registry.init.is_empty()
    } else if kind == EventKinds::CHANGE {
        !registry.change.is_empty()
    } else {
        !registry.solved.is_empty()
    }
}

/// Delivers a grid event to the sinks of one kind, in registration order.
pub fn emit_grid_event(kind: EventKinds, id: GridId, snapshot: &GridSnapshot) {
    let sinks: Vec<GridEventSink> = {
        let registry = registry();
        if kind == EventKinds::INIT {
            registry.init.clone()
        } else if kind == EventKinds::CHANGE {
            registry.change.clone()
        } else {
            registry.solved.clone()
        }
    };
    for sink in &sinks {
        sink(id, snapshot);
    }
}

/// Delivers a message to every message sink, in registration order.
///
/// The text conversion happens only when at least one sink is registered.
pub fn emit_message(id: GridId, text: impl Into<String>, verbosity: u8) {
    let sinks: Vec<MessageSink> = registry().messages.clone();
    if sinks.is_empty() {
        return;
    }
    let message = Message {
        text: text.into(),
        verbosity,
    };
    for sink in &sinks {
        sink(id, &message);
    }
}

/// Serializes tests that observe the global bus within this binary.
#[cfg(test)]
pub(crate) fn test_bus_guard() -> MutexGuard<'static, ()> {
    static GUARD: Mutex<()> = Mutex::new(());
    GUARD.lock().unwrap_or_else(PoisonError::into_inner)
}
