// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains the
//! `NetworkBuilder`, which can declaratively build network configurations
//! for use in tests.

use crate::{Branch, Bus, Error, Network, PlanningConfig, Substation};

/// A builder for creating network configurations easily, for use in tests.
///
/// Bus ids, substation ids and branch indices are assigned sequentially,
/// starting at `0`.
pub(crate) struct NetworkBuilder {
    buses: Vec<Bus>,
    substations: Vec<Substation>,
    branches: Vec<Branch>,
}

impl NetworkBuilder {
    /// Creates a new `NetworkBuilder`.
    pub(crate) fn new() -> Self {
        NetworkBuilder {
            buses: Vec::new(),
            substations: Vec::new(),
            branches: Vec::new(),
        }
    }

    fn add_bus(&mut self, bus: Bus) -> u64 {
        let id = bus.id;
        self.buses.push(bus);
        id
    }

    fn next_bus_id(&self) -> u64 {
        self.buses.len() as u64
    }

    /// Adds a bus with the given peak demand and returns its id.
    pub(crate) fn load_bus(&mut self, peak_demand_kw: f64) -> u64 {
        self.add_bus(Bus::new(self.next_bus_id(), peak_demand_kw))
    }

    /// Adds a bus that is a storage candidate and returns its id.
    pub(crate) fn storage_bus(&mut self, peak_demand_kw: f64) -> u64 {
        self.add_bus(Bus::new(self.next_bus_id(), peak_demand_kw).with_storage_candidate())
    }

    /// Adds a bus without demand, fed by a substation with the given
    /// capacity, and returns the id of the bus.
    pub(crate) fn substation_bus(&mut self, capacity_kw: f64) -> u64 {
        let bus = self.load_bus(0.0);
        let id = self.substations.len() as u64;
        self.substations.push(Substation::new(id, bus, capacity_kw));
        bus
    }

    /// Returns the index of the next branch that will be added.
    pub(crate) fn next_branch(&self) -> usize {
        self.branches.len()
    }

    fn add_branch(&mut self, branch: impl FnOnce(usize) -> Branch) -> &mut Self {
        let index = self.next_branch();
        self.branches.push(branch(index));
        self
    }

    /// Adds an existing underground line between two buses.
    pub(crate) fn line(&mut self, from: u64, to: u64) -> &mut Self {
        self.add_branch(|i| Branch::existing(i, from, to))
    }

    /// Adds an existing overhead line between two buses.
    pub(crate) fn overhead_line(&mut self, from: u64, to: u64) -> &mut Self {
        self.add_branch(|i| Branch::existing(i, from, to).with_overhead())
    }

    /// Adds an existing line with a switch between two buses.
    pub(crate) fn switched_line(&mut self, from: u64, to: u64, normally_closed: bool) -> &mut Self {
        self.add_branch(|i| Branch::existing(i, from, to).with_switch(normally_closed))
    }

    /// Adds a candidate line between two buses.
    pub(crate) fn candidate(&mut self, from: u64, to: u64) -> &mut Self {
        self.add_branch(|i| Branch::candidate(i, from, to))
    }

    /// Builds and returns the network from the elements added to the
    /// builder.
    pub(crate) fn build(&self, config: PlanningConfig) -> Result<Network, Error> {
        Network::try_new(
            self.buses.clone(),
            self.substations.clone(),
            self.branches.clone(),
            config,
        )
    }
}

/// Builds the three bus feeder used throughout the tests:
///
/// ```text
///   bus 0 (substation, 100 kW) --L0-- bus 1 (10 kW) --L1-- bus 2 (50 kW)
///   bus 0 - - - - - - - - - - - C2 - - - - - - - - - - - - bus 2
/// ```
pub(crate) fn three_bus_feeder(config: PlanningConfig) -> Result<Network, Error> {
    let mut builder = NetworkBuilder::new();
    let grid = builder.substation_bus(100.0);
    let mid = builder.load_bus(10.0);
    let end = builder.load_bus(50.0);
    builder.line(grid, mid).line(mid, end).candidate(grid, end);
    builder.build(config)
}
