// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for splitting a [`Network`] into islands, given the set of
//! branches that are in service.

use std::fmt::Display;

use petgraph::graph::NodeIndex;

use crate::{Error, Network};

use super::BusGraph;

/// Whether an island has local generation capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IslandKind {
    /// The island has at least one substation with non-zero capacity.
    Connected,
    /// The island has no substation capacity, so all of its demand has to be
    /// curtailed or covered from storage.
    Deficient,
}

impl Display for IslandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IslandKind::Connected => write!(f, "Connected"),
            IslandKind::Deficient => write!(f, "Deficient"),
        }
    }
}

/// A set of buses that are electrically connected to each other, and
/// disconnected from all other buses.
#[derive(Clone, Debug, PartialEq)]
pub struct Island {
    buses: Vec<u64>,
    storage: Vec<u64>,
    demand_kw: f64,
    capacity_kw: f64,
}

impl Island {
    /// Returns the ids of the buses in the island, in ascending order.
    pub fn buses(&self) -> &[u64] {
        &self.buses
    }

    /// Returns the ids of the storage candidate buses in the island, in
    /// ascending order.
    pub fn storage(&self) -> &[u64] {
        &self.storage
    }

    /// Returns the total peak demand of the island.
    pub fn demand_kw(&self) -> f64 {
        self.demand_kw
    }

    /// Returns the total substation capacity in the island.
    pub fn capacity_kw(&self) -> f64 {
        self.capacity_kw
    }

    /// Returns true if the island contains the given bus.
    pub fn contains(&self, bus_id: u64) -> bool {
        self.buses.binary_search(&bus_id).is_ok()
    }

    pub fn kind(&self) -> IslandKind {
        if self.capacity_kw == 0.0 {
            IslandKind::Deficient
        } else {
            IslandKind::Connected
        }
    }

    pub fn is_deficient(&self) -> bool {
        self.kind() == IslandKind::Deficient
    }

    /// Returns true if the local substation capacity covers the peak demand
    /// of the island.
    pub fn is_satisfied(&self) -> bool {
        self.demand_kw <= self.capacity_kw
    }
}

/// Island detection.
impl Network {
    /// Returns the islands the network splits into when only the given
    /// branches are in service.
    ///
    /// Buses without any active branch become single-bus islands.  Islands
    /// are ordered by their smallest bus id.
    ///
    /// Returns an error if any of the given branch indices don't exist.
    pub fn islands(
        &self,
        active_branches: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<Island>, Error> {
        let graph = self.bus_graph(active_branches)?;
        Ok(self.islands_of(&graph))
    }

    /// Returns a graph of all the buses, with an edge for each of the given
    /// branches.
    pub(crate) fn bus_graph(
        &self,
        active_branches: impl IntoIterator<Item = usize>,
    ) -> Result<BusGraph, Error> {
        let mut graph = self.graph.clone();
        self.add_branches(&mut graph, active_branches)?;
        Ok(graph)
    }

    /// Adds an edge to the graph for each of the given branches.
    pub(crate) fn add_branches(
        &self,
        graph: &mut BusGraph,
        branches: impl IntoIterator<Item = usize>,
    ) -> Result<(), Error> {
        for index in branches {
            let branch = self.branch(index)?;
            let (Some(&from), Some(&to)) = (
                self.node_indices.get(&branch.from_bus),
                self.node_indices.get(&branch.to_bus),
            ) else {
                return Err(Error::internal(format!(
                    "Branch {index} has no node for its buses in the bus graph."
                )));
            };
            graph.add_edge(from, to, index);
        }
        Ok(())
    }

    /// Splits the given graph into islands.
    pub(crate) fn islands_of(&self, graph: &BusGraph) -> Vec<Island> {
        let mut visited = vec![false; graph.node_count()];
        let mut islands = vec![];

        // Node indices follow ascending bus ids, so every traversal starts
        // at the smallest bus of its island, and islands come out ordered.
        for start in graph.node_indices() {
            if visited[start.index()] {
                continue;
            }
            visited[start.index()] = true;

            let mut stack: Vec<NodeIndex> = vec![start];
            let mut buses = vec![];
            while let Some(index) = stack.pop() {
                buses.push(graph[index]);
                for neighbor in graph.neighbors(index) {
                    if !visited[neighbor.index()] {
                        visited[neighbor.index()] = true;
                        stack.push(neighbor);
                    }
                }
            }
            buses.sort_unstable();
            islands.push(self.create_island(buses));
        }

        islands
    }

    fn create_island(&self, buses: Vec<u64>) -> Island {
        let mut demand_kw = 0.0;
        let mut capacity_kw = 0.0;
        let mut storage = vec![];
        for bus in buses.iter().filter_map(|id| self.buses.get(id)) {
            demand_kw += bus.peak_demand_kw;
            capacity_kw += self.substation_capacity(bus.id);
            if bus.storage_candidate {
                storage.push(bus.id);
            }
        }
        Island {
            buses,
            storage,
            demand_kw,
            capacity_kw,
        }
    }
}
