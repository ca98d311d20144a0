// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the buses, substations and branches that make up a
//! distribution network.

/// A bus of the distribution network.
#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    pub id: u64,
    pub peak_demand_kw: f64,
    pub v_min: f64,
    pub v_max: f64,
    /// Whether a storage unit may be installed at this bus.
    pub storage_candidate: bool,
}

impl Bus {
    /// Creates a new bus with the given peak demand and default voltage
    /// limits.
    pub fn new(id: u64, peak_demand_kw: f64) -> Self {
        Self {
            id,
            peak_demand_kw,
            v_min: 0.95,
            v_max: 1.05,
            storage_candidate: false,
        }
    }

    /// Marks the bus as a candidate location for storage.
    pub fn with_storage_candidate(mut self) -> Self {
        self.storage_candidate = true;
        self
    }

    /// Sets the voltage limits of the bus, in per-unit.
    pub fn with_voltage_limits(mut self, v_min: f64, v_max: f64) -> Self {
        self.v_min = v_min;
        self.v_max = v_max;
        self
    }
}

/// A substation feeding the distribution network at a bus.
#[derive(Clone, Debug, PartialEq)]
pub struct Substation {
    pub id: u64,
    pub bus: u64,
    pub capacity_kw: f64,
}

impl Substation {
    pub fn new(id: u64, bus: u64, capacity_kw: f64) -> Self {
        Self {
            id,
            bus,
            capacity_kw,
        }
    }
}

/// A line between two buses.  Either an existing line, or a candidate line
/// that the network could be reinforced with.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub index: usize,
    pub from_bus: u64,
    pub to_bus: u64,
    pub impedance_ohm_km: f64,
    pub length_km: f64,
    pub rating_ka: f64,
    /// Overhead line when `true`, underground cable otherwise.
    pub overhead: bool,
    pub existing: bool,
    pub candidate: bool,
    /// Whether the branch has a switch.
    pub switched: bool,
    /// Whether the switch on the branch is normally closed.  Ignored for
    /// branches without a switch.
    pub normally_closed: bool,
}

impl Branch {
    fn new(index: usize, from_bus: u64, to_bus: u64) -> Self {
        Self {
            index,
            from_bus,
            to_bus,
            impedance_ohm_km: 0.0,
            length_km: 0.0,
            rating_ka: 0.0,
            overhead: false,
            existing: false,
            candidate: false,
            switched: false,
            normally_closed: false,
        }
    }

    /// Creates an existing, unswitched underground branch.
    pub fn existing(index: usize, from_bus: u64, to_bus: u64) -> Self {
        Self {
            existing: true,
            ..Self::new(index, from_bus, to_bus)
        }
    }

    /// Creates a candidate branch.  Candidate branches are always switched,
    /// so that the optimizer can decide to leave them open.
    pub fn candidate(index: usize, from_bus: u64, to_bus: u64) -> Self {
        Self {
            candidate: true,
            switched: true,
            ..Self::new(index, from_bus, to_bus)
        }
    }

    /// Marks the branch as an overhead line.
    pub fn with_overhead(mut self) -> Self {
        self.overhead = true;
        self
    }

    /// Puts a switch on the branch, normally open or normally closed.
    pub fn with_switch(mut self, normally_closed: bool) -> Self {
        self.switched = true;
        self.normally_closed = normally_closed;
        self
    }

    /// Sets the electrical parameters of the branch.
    pub fn with_ratings(mut self, impedance_ohm_km: f64, length_km: f64, rating_ka: f64) -> Self {
        self.impedance_ohm_km = impedance_ohm_km;
        self.length_km = length_km;
        self.rating_ka = rating_ka;
        self
    }

    /// Returns true if the branch is in service when nothing has failed.
    ///
    /// That is the case for existing branches without a switch, and for
    /// existing branches whose switch is normally closed.
    pub fn in_base_topology(&self) -> bool {
        self.existing && (!self.switched || self.normally_closed)
    }

    /// Returns true if the branch is connected to the given bus.
    pub fn touches(&self, bus: u64) -> bool {
        self.from_bus == bus || self.to_bus == bus
    }

    /// Returns true if the branch connects a bus from `lhs` with a bus from
    /// `rhs`, in either direction.
    pub(crate) fn bridges(
        &self,
        lhs: impl Fn(u64) -> bool,
        rhs: impl Fn(u64) -> bool,
    ) -> bool {
        (lhs(self.from_bus) && rhs(self.to_bus)) || (rhs(self.from_bus) && lhs(self.to_bus))
    }
}
