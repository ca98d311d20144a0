// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Grid states and scenarios derived from a [`FailureRegistry`].
//!
//! Every distinct set of branches taken out by a failure event becomes a
//! grid state.  Every failure event becomes a scenario on its grid state,
//! with a probability derived from the event's frequency.  The remaining
//! probability goes to the `no_failure` scenario on the base topology,
//! `state_0`.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use tracing::{debug, info};

use crate::{Error, FailureRegistry, Network};

/// The id of the scenario that covers the time nothing has failed.
pub const NO_FAILURE_SCENARIO: &str = "no_failure";

/// Identifies a grid state.  Displayed as `state_<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
    /// The state in which nothing has failed.
    pub const BASE: StateId = StateId(0);

    pub fn new(number: usize) -> Self {
        Self(number)
    }

    pub fn number(&self) -> usize {
        self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "state_{}", self.0)
    }
}

/// A topology of the network, defined by the branches that are in service.
#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    id: StateId,
    outage: Vec<usize>,
    topology: BTreeMap<usize, bool>,
}

impl GridState {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns the branches that are out of service in this state, on top of
    /// those that are already open in the base topology.
    pub fn outage(&self) -> &[usize] {
        &self.outage
    }

    /// Returns whether each branch is in service, keyed by branch index.
    pub fn topology(&self) -> &BTreeMap<usize, bool> {
        &self.topology
    }

    /// Returns true if the given branch is in service.
    pub fn is_active(&self, branch: usize) -> bool {
        self.topology.get(&branch).copied().unwrap_or(false)
    }

    /// Returns the indices of the branches in service, in ascending order.
    pub fn active_branches(&self) -> impl Iterator<Item = usize> + '_ {
        self.topology
            .iter()
            .filter_map(|(&index, &active)| active.then_some(index))
    }
}

/// A grid state together with how likely it is and how long it lasts.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub state: StateId,
    pub probability: f64,
    pub duration: f64,
    pub routine: bool,
}

/// The grid states and scenarios of a planning run.
#[derive(Clone, Debug, PartialEq)]
pub struct StateTable {
    states: Vec<GridState>,
    scenarios: Vec<Scenario>,
    event_states: BTreeMap<String, StateId>,
}

impl StateTable {
    /// Derives the grid states and scenarios of the failure events in the
    /// given registry.
    ///
    /// Events that take out exactly the same branches share a grid state.
    /// Their scenarios stay separate, so their probabilities are not merged.
    ///
    /// Returns an error if the failure probabilities add up to more than
    /// one.
    pub fn synthesize(network: &Network, registry: &FailureRegistry) -> Result<Self, Error> {
        let config = network.config();
        let base = network.base_topology();
        let events = registry.events();

        let mut states = vec![GridState {
            id: StateId::BASE,
            outage: vec![],
            topology: base.clone(),
        }];
        let mut state_ids: HashMap<&[usize], StateId> = HashMap::new();
        let mut event_states = BTreeMap::new();
        let mut scenarios = vec![];
        let mut total_probability = 0.0;

        for event in &events {
            let id = match state_ids.get(event.branches()) {
                Some(&id) => id,
                None => {
                    let id = StateId(states.len());
                    let mut topology = base.clone();
                    for branch in event.branches() {
                        topology.insert(*branch, false);
                    }
                    debug!("{id} takes out branches {:?}", event.branches());
                    states.push(GridState {
                        id,
                        outage: event.branches().to_vec(),
                        topology,
                    });
                    state_ids.insert(event.branches(), id);
                    id
                }
            };

            let probability = event.frequency() / config.hours_per_year;
            total_probability += probability;
            event_states.insert(event.name().to_string(), id);
            scenarios.push(Scenario {
                id: event.name().to_string(),
                state: id,
                probability,
                duration: event.duration(),
                routine: event.is_routine(),
            });
        }

        let residual = residual_probability(total_probability, config.probability_tolerance)?;
        scenarios.insert(
            0,
            Scenario {
                id: NO_FAILURE_SCENARIO.to_string(),
                state: StateId::BASE,
                probability: residual,
                duration: 1.0,
                routine: true,
            },
        );

        info!(
            "Derived {} grid states and {} scenarios from {} failure events.",
            states.len(),
            scenarios.len(),
            events.len()
        );

        Ok(Self {
            states,
            scenarios,
            event_states,
        })
    }

    /// Returns the grid states, `state_0` first.
    pub fn states(&self) -> &[GridState] {
        &self.states
    }

    /// Returns the grid state with the given id, if it exists.
    pub fn state(&self, id: StateId) -> Result<&GridState, Error> {
        self.states
            .get(id.0)
            .ok_or_else(|| Error::data_integrity(format!("Grid state {id} not found.")))
    }

    /// Returns the scenarios, the `no_failure` scenario first.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Returns the grid state of the failure event with the given name.
    pub fn state_of(&self, event: &str) -> Option<StateId> {
        self.event_states.get(event).copied()
    }

    /// Returns the summed probability of the scenarios on the given state.
    pub fn state_probability(&self, id: StateId) -> f64 {
        self.scenarios
            .iter()
            .filter(|s| s.state == id)
            .map(|s| s.probability)
            .sum()
    }
}

/// Returns the probability left for the no-failure scenario, or an error if
/// the failure probabilities leave none, beyond the given tolerance.
fn residual_probability(total: f64, tolerance: f64) -> Result<f64, Error> {
    // Written so that a NaN total is rejected too.
    if !(total <= 1.0 + tolerance) {
        return Err(Error::probability_overflow(format!(
            "Failure probabilities add up to {total}, leaving no room for the \
             {NO_FAILURE_SCENARIO} scenario."
        )));
    }
    Ok((1.0 - total).max(0.0))
}
