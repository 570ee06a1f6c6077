//! Ordered enumeration of the subsets of `{0..N-1}`.
//!
//! The elimination rules scan every non-empty subset of positions (or
//! values, or row indices) of a region in order of increasing cardinality,
//! so that cheap deductions are found before expensive ones. This module
//! precomputes that enumeration once per order and shares it process-wide.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// All `2^N` subset masks of `{0..N-1}`, sorted by population count
/// ascending (ties by numeric value ascending), with per-cardinality
/// block boundaries.
///
/// # Examples
///
/// ```
/// use candoku_core::SubsetTable;
///
/// let table = SubsetTable::shared(4);
/// assert_eq!(table.of_cardinality(1), &[0b0001, 0b0010, 0b0100, 0b1000]);
/// assert_eq!(table.of_cardinality(4), &[0b1111]);
/// ```
#[derive(Debug)]
pub struct SubsetTable {
    size: usize,
    subsets: Vec<u32>,
    /// `bounds[k]` is the first index whose subset has popcount `> k`.
    bounds: Vec<usize>,
}

impl SubsetTable {
    /// Returns the shared table for subsets of `{0..n-1}`.
    ///
    /// The table is built on first use for each `n` and is read-only
    /// afterward; repeated calls return the same allocation.
    #[must_use]
    pub fn shared(n: usize) -> Arc<Self> {
        static REGISTRY: Mutex<BTreeMap<usize, Arc<SubsetTable>>> = Mutex::new(BTreeMap::new());

        let mut registry = REGISTRY
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            registry
                .entry(n)
                .or_insert_with(|| Arc::new(Self::build(n))),
        )
    }

    /// Builds the table with a counting sort over `0..2^n`.
    fn build(n: usize) -> Self {
        assert!(n >= 1 && n <= 25, "unsupported subset universe: {n}");
        let total = 1usize << n;

        let mut counts = vec![0usize; n + 1];
        for mask in 0..total {
            counts[(mask as u32).count_ones() as usize] += 1;
        }

        let mut starts = vec![0usize; n + 1];
        let mut bounds = vec![0usize; n + 1];
        let mut acc = 0usize;
        for k in 0..=n {
            starts[k] = acc;
            acc += counts[k];
            bounds[k] = acc;
        }

        let mut subsets = vec![0u32; total];
        let mut next = starts;
        for mask in 0..total {
            let k = (mask as u32).count_ones() as usize;
            subsets[next[k]] = mask as u32;
            next[k] += 1;
        }

        Self {
            size: n,
            subsets,
            bounds,
        }
    }

    /// The universe size `N`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All subsets, popcount-major.
    #[inline]
    #[must_use]
    pub fn subsets(&self) -> &[u32] {
        &self.subsets
    }

    /// The block of subsets with exactly `k` elements (`1 <= k <= N`), in
    /// ascending numeric order.
    #[inline]
    #[must_use]
    pub fn of_cardinality(&self, k: usize) -> &[u32] {
        &self.subsets[self.bounds[k - 1]..self.bounds[k]]
    }

    /// The first table index whose subset has more than `k` elements.
    #[inline]
    #[must_use]
    pub fn boundary(&self, k: usize) -> usize {
        self.bounds[k]
    }
}
