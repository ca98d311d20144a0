// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Reinforcement combinations per grid state, and the load curtailment
//! expressions of the islands each combination leaves behind.
//!
//! For every grid state, the candidate branches that could reconnect a
//! deficient island to an island with generation are the *relevant*
//! candidates of the state.  Every on/off assignment over them is a
//! combination, identified by its position in binary counting order over the
//! relevant candidates, so combination `0` never reinforces anything.

mod enumeration;
mod index_sets;
mod report;

pub use index_sets::IndexSets;
pub use report::{EquationsReport, StatesReport};

use std::collections::BTreeMap;

use crate::{CurtailmentExpression, Error, Island, StateId};

/// One on/off assignment over the relevant candidates of a grid state.
#[derive(Clone, Debug, PartialEq)]
pub struct Combination {
    index: usize,
    on: Vec<usize>,
    off: Vec<usize>,
    islands: Vec<Island>,
    curtailment: Vec<CurtailmentExpression>,
}

impl Combination {
    /// Returns the position of the combination in the enumeration of its
    /// grid state.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the candidate branches that are built in this combination.
    pub fn on(&self) -> &[usize] {
        &self.on
    }

    /// Returns the relevant candidate branches that are not built in this
    /// combination.
    pub fn off(&self) -> &[usize] {
        &self.off
    }

    /// Returns all the islands of the grid state once the `on` branches are
    /// built.
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Returns the curtailment expressions for the islands.
    pub fn curtailment(&self) -> &[CurtailmentExpression] {
        &self.curtailment
    }
}

/// The relevant candidates and the combinations of one grid state.
#[derive(Clone, Debug, PartialEq)]
pub struct StateExpressions {
    state: StateId,
    relevant: Vec<usize>,
    combinations: Vec<Combination>,
}

impl StateExpressions {
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Returns the relevant candidate branches, in ascending index order.
    pub fn relevant(&self) -> &[usize] {
        &self.relevant
    }

    /// Returns the combinations, ordered by their index.
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    /// Returns the combination with the given index, if it exists.
    pub fn combination(&self, index: usize) -> Result<&Combination, Error> {
        self.combinations.get(index).ok_or_else(|| {
            Error::data_integrity(format!(
                "Combination {index} not found for {}.",
                self.state
            ))
        })
    }
}

/// The reinforcement combinations of every grid state of a planning run.
///
/// States whose relevant candidates exceed the configured limit are not
/// enumerated and are listed in [`skipped`][StateExpressionIndex::skipped]
/// instead.
#[derive(Clone, Debug, PartialEq)]
pub struct StateExpressionIndex {
    states: BTreeMap<StateId, StateExpressions>,
    skipped: BTreeMap<StateId, Error>,
}

impl StateExpressionIndex {
    /// Returns the expressions of the given grid state, if it was
    /// enumerated.
    pub fn state(&self, id: StateId) -> Result<&StateExpressions, Error> {
        if let Some(err) = self.skipped.get(&id) {
            return Err(err.clone());
        }
        self.states
            .get(&id)
            .ok_or_else(|| Error::data_integrity(format!("Grid state {id} not found.")))
    }

    /// Returns the expressions of all enumerated grid states, in state
    /// order.
    pub fn states(&self) -> impl Iterator<Item = &StateExpressions> {
        self.states.values()
    }

    /// Returns the grid states that were not enumerated, and why.
    pub fn skipped(&self) -> &BTreeMap<StateId, Error> {
        &self.skipped
    }

    /// Returns the total number of combinations over all grid states.
    pub fn combination_count(&self) -> usize {
        self.states.values().map(|s| s.combinations.len()).sum()
    }
}
