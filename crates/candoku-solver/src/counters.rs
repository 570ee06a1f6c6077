//! Statistics collected during a solve.

use candoku_core::Order;

/// Counters kept by the solving engines.
///
/// The elimination engine records every rule application per subset
/// depth, the hypothesis figures, and an ordered log of cell fills; the
/// other engines fill in what applies to them (solutions, tries).
///
/// # Examples
///
/// ```no_run
/// use candoku_core::{Order, Puzzle};
/// use candoku_solver::{solve_with_counters, Method, Mode};
///
/// let puzzle = Puzzle::parse(Order::STANDARD, &"0".repeat(81)).unwrap();
/// let (outcome, counters) = solve_with_counters(&puzzle, Method::Elimination, Mode::First);
/// println!("{outcome:?}: {} solutions, {} rules", counters.solutions(), counters.rules());
/// ```
#[derive(Debug, Clone)]
pub struct Counters {
    order: Order,
    pub(crate) solutions: usize,
    pub(crate) rules: usize,
    pub(crate) hypotheses: usize,
    pub(crate) depth: usize,
    pub(crate) deepest_steps: usize,
    pub(crate) candidate_exclusions: Vec<usize>,
    pub(crate) value_exclusions: Vec<usize>,
    pub(crate) line_exclusions: Vec<usize>,
    pub(crate) intersection_eliminations: usize,
    trail: Vec<String>,
}

impl Counters {
    pub(crate) fn new(order: Order) -> Self {
        let n = order.size();
        Self {
            order,
            solutions: 0,
            rules: 0,
            hypotheses: 0,
            depth: 0,
            deepest_steps: 0,
            candidate_exclusions: vec![0; n],
            value_exclusions: vec![0; n],
            line_exclusions: vec![0; n],
            intersection_eliminations: 0,
            trail: vec![String::new(); n * n],
        }
    }

    /// Solutions found.
    #[inline]
    #[must_use]
    pub fn solutions(&self) -> usize {
        self.solutions
    }

    /// Rule applications (every exclusion counts once, intersection
    /// eliminations once per value).
    #[inline]
    #[must_use]
    pub fn rules(&self) -> usize {
        self.rules
    }

    /// Hypothesis assignments tried.
    #[inline]
    #[must_use]
    pub fn hypotheses(&self) -> usize {
        self.hypotheses
    }

    /// Depth of the deepest successful hypothesis chain.
    #[inline]
    #[must_use]
    pub fn backtracking_depth(&self) -> usize {
        self.depth
    }

    /// Most cells filled by a single hypothesis branch.
    #[inline]
    #[must_use]
    pub fn deepest_steps(&self) -> usize {
        self.deepest_steps
    }

    /// Candidate-exclusion firings per subset depth (index `k - 1`).
    #[inline]
    #[must_use]
    pub fn candidate_exclusions(&self) -> &[usize] {
        &self.candidate_exclusions
    }

    /// Value-exclusion firings per subset depth (index `k - 1`).
    #[inline]
    #[must_use]
    pub fn value_exclusions(&self) -> &[usize] {
        &self.value_exclusions
    }

    /// Line-exclusion firings per subset depth (index `k - 1`).
    #[inline]
    #[must_use]
    pub fn line_exclusions(&self) -> &[usize] {
        &self.line_exclusions
    }

    /// Values eliminated by the intersection rule.
    #[inline]
    #[must_use]
    pub fn intersection_eliminations(&self) -> usize {
        self.intersection_eliminations
    }

    /// Records the fill log entry for the `filled`-th solved cell.
    ///
    /// Later fills at the same count (other hypothesis branches)
    /// overwrite the entry, so the log always describes the most recent
    /// path.
    pub(crate) fn record_fill(&mut self, filled: usize, entry: String) {
        if filled >= 1 && filled <= self.trail.len() {
            self.trail[filled - 1] = entry;
        }
    }

    /// Renders the ordered fill log, `side` entries per line.
    pub(crate) fn render_trail(&self) -> String {
        let side = self.order.side();
        let mut out = String::new();
        for (index, entry) in self.trail.iter().enumerate() {
            if entry.is_empty() {
                continue;
            }
            out.push_str(entry);
            out.push(if (index + 1) % side == 0 { '\n' } else { '\t' });
        }
        out.push('\n');
        out
    }

    /// Renders the end-of-solve statistics block.
    pub(crate) fn summary(&self) -> String {
        let mut out = if self.solutions == 1 {
            String::from("1 solution found.\n")
        } else {
            format!("{} solutions found.\n", self.solutions)
        };
        out.push_str(&format!(
            "Solved with {} rules and {} hypotheses.\n",
            self.rules, self.hypotheses
        ));

        for (label, per_depth) in [
            ("Candidate exclusion", &self.candidate_exclusions),
            ("Value exclusion", &self.value_exclusions),
            ("Line exclusion", &self.line_exclusions),
        ] {
            out.push_str(label);
            out.push_str(":\n");
            for depth in (1..=per_depth.len()).rev() {
                if per_depth[depth - 1] > 0 {
                    out.push_str(&format!("\tDepth {}: {}\n", depth, per_depth[depth - 1]));
                }
            }
        }
        out.push_str(&format!(
            "Intersection exclusion:\n\t{}\n",
            self.intersection_eliminations
        ));
        out.push_str(&format!(
            "Backtracking:\n\tDepth: {}\n\tSteps: {}\n\tHypotheses: {}\n",
            self.depth, self.deepest_steps, self.hypotheses
        ));
        out
    }
}
