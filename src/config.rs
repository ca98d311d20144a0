// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for a planning run.

/// Configuration options for deriving grid states and reinforcement
/// combinations from a `Network`.
#[derive(Clone, Debug)]
pub struct PlanningConfig {
    /// Whether to report only the islands that can't cover their demand from
    /// local substation capacity.  When this is `false`, every island is
    /// reported in the curtailment expressions.
    pub reduced: bool,

    /// The maximum number of relevant candidate branches a grid state may
    /// have.  States above the limit would need `2^n` combinations, so they
    /// are skipped and reported instead of being enumerated.
    pub max_relevant_candidates: usize,

    /// Number of hours in a year, used for turning failure frequencies
    /// (occurrences per year) into probabilities.
    pub hours_per_year: f64,

    /// Allowed slack when checking that scenario probabilities don't add up
    /// to more than one.
    pub probability_tolerance: f64,

    /// Whether to evaluate grid states on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            reduced: true,
            max_relevant_candidates: 20,
            hours_per_year: 8760.0,
            probability_tolerance: 1e-9,
            parallel: true,
        }
    }
}
