// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Enumeration of the reinforcement combinations of each grid state.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::{debug, debug_span, info, warn};

use crate::network::curtailment_expressions;
use crate::{Error, GridState, Island, Network, StateTable};

use super::{Combination, StateExpressionIndex, StateExpressions};

impl StateExpressionIndex {
    /// Enumerates the reinforcement combinations of every grid state in the
    /// given table.
    ///
    /// States are independent of each other and are evaluated on the rayon
    /// thread pool when the network's config allows it.  The result is the
    /// same either way.
    ///
    /// A state with too many relevant candidates is skipped, and doesn't
    /// affect the other states.  Any other error aborts the whole run.
    pub fn build(network: &Network, table: &StateTable) -> Result<Self, Error> {
        let evaluate = |state: &GridState| (state.id(), evaluate_state(network, state));
        let results: Vec<_> = if network.config().parallel {
            table.states().par_iter().map(evaluate).collect()
        } else {
            table.states().iter().map(evaluate).collect()
        };

        let mut states = BTreeMap::new();
        let mut skipped = BTreeMap::new();
        for (id, result) in results {
            match result {
                Ok(expressions) => {
                    states.insert(id, expressions);
                }
                Err(err) if err.is_state_local() => {
                    warn!("Skipping {id}: {err}");
                    skipped.insert(id, err);
                }
                Err(err) => return Err(err),
            }
        }

        let index = Self { states, skipped };
        info!(
            "Enumerated {} combinations over {} grid states, skipped {}.",
            index.combination_count(),
            index.states.len(),
            index.skipped.len()
        );
        Ok(index)
    }
}

fn evaluate_state(network: &Network, state: &GridState) -> Result<StateExpressions, Error> {
    let _span = debug_span!("state", id = %state.id()).entered();
    let config = network.config();

    let graph = network.bus_graph(state.active_branches())?;
    let islands = network.islands_of(&graph);
    let relevant = relevant_candidates(network, &islands);
    let k = relevant.len();

    if k > config.max_relevant_candidates || k >= usize::BITS as usize {
        return Err(Error::combinatorial_limit_exceeded(format!(
            "{} has {k} relevant candidate branches, more than the limit of {}.",
            state.id(),
            config.max_relevant_candidates
        )));
    }
    debug!(
        "{} islands, relevant candidates {relevant:?}",
        islands.len()
    );

    let mut combinations = Vec::with_capacity(1 << k);
    for index in 0..(1usize << k) {
        // The first relevant candidate is the most significant bit.
        let mut on = vec![];
        let mut off = vec![];
        for (i, &branch) in relevant.iter().enumerate() {
            if (index >> (k - 1 - i)) & 1 == 1 {
                on.push(branch);
            } else {
                off.push(branch);
            }
        }

        let combination_islands = if on.is_empty() {
            islands.clone()
        } else {
            let mut reinforced = graph.clone();
            network.add_branches(&mut reinforced, on.iter().copied())?;
            network.islands_of(&reinforced)
        };
        let curtailment = curtailment_expressions(&combination_islands, config.reduced);

        combinations.push(Combination {
            index,
            on,
            off,
            islands: combination_islands,
            curtailment,
        });
    }

    Ok(StateExpressions {
        state: state.id(),
        relevant,
        combinations,
    })
}

/// Returns the candidate branches that connect a deficient island to an
/// island with generation, in ascending index order.
fn relevant_candidates(network: &Network, islands: &[Island]) -> Vec<usize> {
    let island_of: HashMap<u64, &Island> = islands
        .iter()
        .flat_map(|island| island.buses().iter().map(move |&bus| (bus, island)))
        .collect();
    let is_deficient = |bus: u64| island_of.get(&bus).is_some_and(|i| i.is_deficient());
    let is_connected = |bus: u64| island_of.get(&bus).is_some_and(|i| !i.is_deficient());

    network
        .candidate_branches()
        .filter(|b| b.bridges(&is_deficient, &is_connected))
        .map(|b| b.index)
        .collect()
}
