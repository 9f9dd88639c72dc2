//! Run counters and final pass/fail aggregation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::tool::Mode;

/// Found/fixed problem counters for one run.
///
/// Many jobs complete concurrently, so the counters are atomics shared
/// behind an `Arc` rather than relying on any single-threaded completion
/// order. Sums are commutative, which is the only ordering guarantee the
/// final tally needs.
#[derive(Debug, Default)]
pub struct RunTally {
    found_problems: AtomicU64,
    fixed_problems: AtomicU64,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(found: u64, fixed: u64) -> Self {
        Self {
            found_problems: AtomicU64::new(found),
            fixed_problems: AtomicU64::new(fixed),
        }
    }

    pub fn add_found(&self) {
        self.found_problems.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_fixed(&self) {
        self.fixed_problems.fetch_add(1, Ordering::Relaxed);
    }

    pub fn found(&self) -> u64 {
        self.found_problems.load(Ordering::Relaxed)
    }

    pub fn fixed(&self) -> u64 {
        self.fixed_problems.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            found_problems: self.found(),
            fixed_problems: self.fixed(),
        }
    }
}

/// Serializable view of the counters for summaries.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TallySnapshot {
    pub found_problems: u64,
    pub fixed_problems: u64,
}

/// Overall success: lint passes with zero problems; fmt passes when every
/// found problem was also fixed.
pub fn finalize(mode: Mode, tally: &RunTally) -> bool {
    match mode {
        Mode::Lint => tally.found() == 0,
        Mode::Fmt => tally.found() == tally.fixed(),
    }
}
