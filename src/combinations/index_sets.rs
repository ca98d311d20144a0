// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Flattening a [`StateExpressionIndex`] into the index sets of an
//! optimization model.

use std::collections::{BTreeMap, BTreeSet};

use crate::StateId;

use super::StateExpressionIndex;

/// The keys of a [`StateExpressionIndex`], flattened into tuples.
///
/// Here `c` is a grid state, `j` a combination, `e` an island with a
/// curtailment expression and `h` a storage candidate bus in that island.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexSets {
    /// All combination indices used by any state.
    pub combinations: BTreeSet<usize>,
    /// All island indices used by any combination.
    pub islands: BTreeSet<usize>,
    pub cj: Vec<(StateId, usize)>,
    pub cje: Vec<(StateId, usize, usize)>,
    pub cjeh: Vec<(StateId, usize, usize, u64)>,
    /// The islands of each `(c, j)`.
    pub ecj: BTreeMap<(StateId, usize), Vec<usize>>,
    /// The storage candidate buses of each `(c, j, e)`.
    pub hcje: BTreeMap<(StateId, usize, usize), Vec<u64>>,
    /// The load buses of each `(c, j, e)`.
    pub dcje: BTreeMap<(StateId, usize, usize), Vec<u64>>,
    /// The relevant candidates built in each `(c, j)`.
    pub rl_on_cj: BTreeMap<(StateId, usize), Vec<usize>>,
    /// The relevant candidates not built in each `(c, j)`.
    pub rl_off_cj: BTreeMap<(StateId, usize), Vec<usize>>,
}

impl StateExpressionIndex {
    /// Returns the index sets over all enumerated grid states, in state,
    /// combination and island order.
    pub fn index_sets(&self) -> IndexSets {
        let mut sets = IndexSets::default();
        for state in self.states() {
            let c = state.state();
            for combination in state.combinations() {
                let j = combination.index();
                sets.combinations.insert(j);
                sets.cj.push((c, j));
                sets.rl_on_cj.insert((c, j), combination.on().to_vec());
                sets.rl_off_cj.insert((c, j), combination.off().to_vec());
                let curtailment = combination.curtailment();
                sets.ecj.insert((c, j), (0..curtailment.len()).collect());
                for (e, expression) in curtailment.iter().enumerate() {
                    sets.islands.insert(e);
                    sets.cje.push((c, j, e));
                    sets.cjeh
                        .extend(expression.storage.iter().map(|&h| (c, j, e, h)));
                    sets.hcje.insert((c, j, e), expression.storage.clone());
                    sets.dcje.insert((c, j, e), expression.load_buses.clone());
                }
            }
        }
        sets
    }
}
