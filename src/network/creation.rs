// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`Network`] instances from given buses, substations
//! and branches.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{Branch, Bus, Error, Network, PlanningConfig, Substation};

use super::{BusGraph, NodeIndexMap};

/// Slack above which a probability overflow would no longer be a rounding
/// artifact.
const MAX_PROBABILITY_TOLERANCE: f64 = 1e-6;

/// `Network` instantiation.
impl Network {
    /// Creates a new [`Network`] from the given buses, substations and
    /// branches.
    ///
    /// Returns an error if any of the elements are invalid, if they
    /// reference buses that don't exist, or if the config can't produce
    /// valid scenario probabilities.
    pub fn try_new(
        buses: impl IntoIterator<Item = Bus>,
        substations: impl IntoIterator<Item = Substation>,
        branches: impl IntoIterator<Item = Branch>,
        config: PlanningConfig,
    ) -> Result<Self, Error> {
        Self::validate_config(&config)?;
        let buses = Self::create_buses(buses)?;
        let (substations, bus_capacity) = Self::create_substations(substations, &buses)?;
        let branches = Self::create_branches(branches, &buses)?;
        let (graph, node_indices) = Self::create_graph(&buses);

        debug!(
            buses = buses.len(),
            substations = substations.len(),
            branches = branches.len(),
            "Created network."
        );

        Ok(Self {
            buses,
            substations,
            branches,
            bus_capacity,
            graph,
            node_indices,
            config,
        })
    }

    fn validate_config(config: &PlanningConfig) -> Result<(), Error> {
        let hours = config.hours_per_year;
        if !hours.is_finite() || hours <= 0.0 {
            return Err(Error::data_integrity(format!(
                "Hours per year must be finite and positive, got {hours}"
            )));
        }
        let tolerance = config.probability_tolerance;
        if !(0.0..MAX_PROBABILITY_TOLERANCE).contains(&tolerance) {
            return Err(Error::data_integrity(format!(
                "Probability tolerance must be in [0, {MAX_PROBABILITY_TOLERANCE}), got {tolerance}"
            )));
        }
        Ok(())
    }

    fn create_buses(buses: impl IntoIterator<Item = Bus>) -> Result<BTreeMap<u64, Bus>, Error> {
        let mut map = BTreeMap::new();
        for bus in buses {
            let id = bus.id;
            if bus.peak_demand_kw.is_nan() || bus.peak_demand_kw < 0.0 {
                return Err(Error::data_integrity(format!(
                    "Bus {id} has an invalid peak demand: {}",
                    bus.peak_demand_kw
                )));
            }
            if map.insert(id, bus).is_some() {
                return Err(Error::data_integrity(format!("Duplicate bus ID found: {id}")));
            }
        }
        Ok(map)
    }

    fn create_substations(
        substations: impl IntoIterator<Item = Substation>,
        buses: &BTreeMap<u64, Bus>,
    ) -> Result<(BTreeMap<u64, Substation>, BTreeMap<u64, f64>), Error> {
        let mut map = BTreeMap::new();
        let mut capacity = BTreeMap::new();
        for substation in substations {
            let Substation {
                id,
                bus,
                capacity_kw,
            } = substation;

            if !buses.contains_key(&bus) {
                return Err(Error::data_integrity(format!(
                    "Substation {id} references unknown bus {bus}"
                )));
            }
            if capacity_kw.is_nan() || capacity_kw < 0.0 {
                return Err(Error::data_integrity(format!(
                    "Substation {id} has an invalid capacity: {capacity_kw}"
                )));
            }
            if map.insert(id, substation).is_some() {
                return Err(Error::data_integrity(format!(
                    "Duplicate substation ID found: {id}"
                )));
            }
            *capacity.entry(bus).or_insert(0.0) += capacity_kw;
        }
        Ok((map, capacity))
    }

    fn create_branches(
        branches: impl IntoIterator<Item = Branch>,
        buses: &BTreeMap<u64, Bus>,
    ) -> Result<BTreeMap<usize, Branch>, Error> {
        let mut map = BTreeMap::new();
        for branch in branches {
            let idx = branch.index;
            let (from, to) = (branch.from_bus, branch.to_bus);

            if from == to {
                return Err(Error::data_integrity(format!(
                    "Branch {idx}:({from}, {to}) Can't connect a bus to itself."
                )));
            }
            for bus in [from, to] {
                if !buses.contains_key(&bus) {
                    return Err(Error::data_integrity(format!(
                        "Branch {idx}:({from}, {to}) references unknown bus {bus}"
                    )));
                }
            }
            if branch.existing == branch.candidate {
                return Err(Error::data_integrity(format!(
                    "Branch {idx} must be either existing or a candidate."
                )));
            }
            if map.insert(idx, branch).is_some() {
                return Err(Error::data_integrity(format!(
                    "Duplicate branch index found: {idx}"
                )));
            }
        }
        Ok(map)
    }

    fn create_graph(buses: &BTreeMap<u64, Bus>) -> (BusGraph, NodeIndexMap) {
        let mut graph = BusGraph::with_capacity(buses.len(), 0);
        let mut indices = NodeIndexMap::new();

        // Nodes are added in ascending bus id order, which the island
        // traversal relies on.
        for &id in buses.keys() {
            indices.insert(id, graph.add_node(id));
        }

        (graph, indices)
    }
}
