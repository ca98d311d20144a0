// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Grid Contingency States

This is a library for enumerating the post-failure states of a distribution
network, and the reinforcements that could reconnect the parts of the
network a failure cuts off from generation.

Its output is the index an expansion planning model is built on: for every
grid state, every combination of relevant candidate lines, and every island
that may have to curtail load, the buses, storage candidates and substation
capacity involved.

## The `Network`

The main struct is [`Network`], instances of which can be created by passing
the buses, substations and branches to the [`try_new`][Network::try_new]
method, along with a [`PlanningConfig`].  Branches are either existing lines
or candidate lines the network could be reinforced with.

[`try_new`][Network::try_new] checks that all branches and substations refer
to existing buses, and that ids are unique.

## Failure events

A [`FailureRegistry`] collects the failure events of the network from
routine failure rates per asset class, a list of extreme events and an
explicit event table.  Failed substations take out every line connected to
their bus.

## Grid states and scenarios

[`StateTable::synthesize`] turns the failure events into grid states, one per
distinct set of failed branches, and into scenarios with a probability each.
`state_0` is the network without failures.

## Reinforcement combinations

[`StateExpressionIndex::build`] splits every grid state into islands, finds
the candidate lines that connect an island without generation to one with
generation, and enumerates every on/off combination of those candidates,
along with the load curtailment expressions of the islands left in each
combination.

The number of combinations of a state is `2^n` for `n` relevant candidates,
so states above
[`max_relevant_candidates`][PlanningConfig::max_relevant_candidates] are
skipped and reported instead.

[`PlanningData::build`] runs both steps.
*/

mod config;
pub use config::PlanningConfig;

mod elements;
pub use elements::{Branch, Bus, Substation};

mod network;
pub use network::{curtailment_expressions, CurtailmentExpression, Island, IslandKind, Network};

pub mod failures;
pub use failures::{FailureEvent, FailureRegistry};

mod states;
pub use states::{GridState, Scenario, StateId, StateTable, NO_FAILURE_SCENARIO};

mod combinations;
pub use combinations::{
    Combination, EquationsReport, IndexSets, StateExpressionIndex, StateExpressions,
    StatesReport,
};

mod planning;
pub use planning::PlanningData;

mod error;
pub use error::Error;
