// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving buses, substations and branches from a [`Network`].

use std::collections::BTreeMap;

use crate::{Branch, Bus, Error, Network, PlanningConfig, Substation};

/// `Bus`, `Substation` and `Branch` retrieval.
impl Network {
    /// Returns the bus with the given `bus_id`, if it exists.
    pub fn bus(&self, bus_id: u64) -> Result<&Bus, Error> {
        self.buses
            .get(&bus_id)
            .ok_or_else(|| Error::data_integrity(format!("Bus with id {bus_id} not found.")))
    }

    /// Returns an iterator over the buses, in ascending id order.
    pub fn buses(&self) -> impl Iterator<Item = &Bus> {
        self.buses.values()
    }

    /// Returns the substation with the given `substation_id`, if it exists.
    pub fn substation(&self, substation_id: u64) -> Result<&Substation, Error> {
        self.substations.get(&substation_id).ok_or_else(|| {
            Error::data_integrity(format!("Substation with id {substation_id} not found."))
        })
    }

    /// Returns an iterator over the substations, in ascending id order.
    pub fn substations(&self) -> impl Iterator<Item = &Substation> {
        self.substations.values()
    }

    /// Returns the total capacity of the substations at the given bus, or `0`
    /// if there are none.
    pub fn substation_capacity(&self, bus_id: u64) -> f64 {
        self.bus_capacity.get(&bus_id).copied().unwrap_or(0.0)
    }

    /// Returns the branch with the given `index`, if it exists.
    pub fn branch(&self, index: usize) -> Result<&Branch, Error> {
        self.branches
            .get(&index)
            .ok_or_else(|| Error::data_integrity(format!("Branch with index {index} not found.")))
    }

    /// Returns an iterator over all the branches, existing and candidate, in
    /// ascending index order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Returns an iterator over the candidate branches, in ascending index
    /// order.
    pub fn candidate_branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values().filter(|b| b.candidate)
    }

    /// Returns the indices of the existing branches connected to the given
    /// bus, in ascending order.
    ///
    /// Returns an error if the given `bus_id` does not exist.
    pub fn incident_branches(&self, bus_id: u64) -> Result<Vec<usize>, Error> {
        self.bus(bus_id)?;
        Ok(self
            .branches
            .values()
            .filter(|b| b.existing && b.touches(bus_id))
            .map(|b| b.index)
            .collect())
    }

    /// Returns the topology of the network when nothing has failed: whether
    /// each branch is in service, keyed by branch index.
    pub fn base_topology(&self) -> BTreeMap<usize, bool> {
        self.branches
            .values()
            .map(|b| (b.index, b.in_base_topology()))
            .collect()
    }

    /// Returns the configuration the network was created with.
    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }
}
