// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The data a planning run hands over to the optimization model.

use std::collections::BTreeMap;

use crate::{
    Error, FailureRegistry, Network, Scenario, StateExpressionIndex, StateId, StateTable,
};

/// Grid states, scenarios and reinforcement combinations of a network.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanningData {
    states: StateTable,
    expressions: StateExpressionIndex,
}

impl PlanningData {
    /// Derives the grid states and scenarios of the failure events in the
    /// registry, and enumerates the reinforcement combinations of every grid
    /// state, using the configuration of the network.
    pub fn build(network: &Network, registry: &FailureRegistry) -> Result<Self, Error> {
        let states = StateTable::synthesize(network, registry)?;
        let expressions = StateExpressionIndex::build(network, &states)?;
        Ok(Self {
            states,
            expressions,
        })
    }

    /// Returns the topology of every grid state, keyed by state id.
    pub fn grid_states(&self) -> BTreeMap<StateId, &BTreeMap<usize, bool>> {
        self.states
            .states()
            .iter()
            .map(|s| (s.id(), s.topology()))
            .collect()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        self.states.scenarios()
    }

    pub fn state_table(&self) -> &StateTable {
        &self.states
    }

    pub fn expressions(&self) -> &StateExpressionIndex {
        &self.expressions
    }
}
