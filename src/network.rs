// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of a distribution network, with its buses,
//! substations, existing branches and candidate branches.

mod creation;
mod curtailment;
mod islands;
mod retrieval;

#[cfg(test)]
pub(crate) mod test_utils;

pub use curtailment::{curtailment_expressions, CurtailmentExpression};
pub use islands::{Island, IslandKind};

use crate::{Branch, Bus, PlanningConfig, Substation};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeMap, HashMap};

/// Buses are the nodes of a `BusGraph` and the edges carry the index of the
/// branch they were created from.
pub(crate) type BusGraph = UnGraph<u64, usize>;

/// `NodeIndexMap` stores the corresponding `NodeIndex` for any bus id, so
/// that nodes in a `BusGraph` can be retrieved from their bus ids.
pub(crate) type NodeIndexMap = HashMap<u64, NodeIndex>;

/// A distribution network.
///
/// The network is immutable once created.  Grid states, islands and
/// reinforcement combinations are all derived from it without changing it,
/// so a single instance can be shared between threads.
#[derive(Debug)]
pub struct Network {
    buses: BTreeMap<u64, Bus>,
    substations: BTreeMap<u64, Substation>,
    branches: BTreeMap<usize, Branch>,
    /// Aggregated substation capacity per bus, only for buses that have a
    /// substation.
    bus_capacity: BTreeMap<u64, f64>,
    /// A graph with all the buses and no edges.  Copies of it get the edges
    /// of a particular grid state added.
    graph: BusGraph,
    node_indices: NodeIndexMap,
    config: PlanningConfig,
}
