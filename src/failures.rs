// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A catalogue of the failure events a [`Network`] can suffer.
//!
//! Failure events come from three independent sources:
//!
//! - routine failures of every line and substation, with a frequency and a
//!   duration per asset class,
//! - a list of rare, high-impact extreme events,
//! - an explicit table of events.
//!
//! All sources may name substations as failed; a failed substation takes out
//! every existing branch connected to its bus.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::{Error, Network};

/// How often an asset fails, in occurrences per year, and for how many hours
/// it stays out of service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FailureRate {
    pub frequency: f64,
    pub duration: f64,
}

impl FailureRate {
    pub fn new(frequency: f64, duration: f64) -> Self {
        Self {
            frequency,
            duration,
        }
    }
}

/// Routine failure rates per asset class.  Asset classes without a rate
/// don't fail.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutineFailureRates {
    pub overhead_lines: Option<FailureRate>,
    pub underground_lines: Option<FailureRate>,
    pub substations: Option<FailureRate>,
}

/// A rare, high-impact event that takes out several branches and
/// substations at once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtremeEvent {
    pub branches: Vec<usize>,
    pub substations: Vec<u64>,
    pub frequency: f64,
    pub duration: f64,
}

/// A row of an explicitly supplied event table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventListRow {
    pub id: u64,
    pub branches: Vec<usize>,
    pub substations: Vec<u64>,
    pub frequency: f64,
    pub duration: f64,
}

impl EventListRow {
    /// Creates a row from the tabular representation, where the failed
    /// branches and substations are given as comma separated id lists.
    pub fn from_cells(
        id: u64,
        branches: &str,
        substations: &str,
        frequency: f64,
        duration: f64,
    ) -> Result<Self, Error> {
        Ok(Self {
            id,
            branches: Self::parse_ids(branches)?
                .into_iter()
                .map(|b| b as usize)
                .collect(),
            substations: Self::parse_ids(substations)?,
            frequency,
            duration,
        })
    }

    /// Parses a comma separated list of ids.  An empty cell is an empty
    /// list.  Ids written as floats, like `"3.0"`, are accepted.
    pub fn parse_ids(cell: &str) -> Result<Vec<u64>, Error> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Ok(vec![]);
        }
        cell.split(',')
            .map(|s| {
                let s = s.trim();
                s.parse::<u64>().or_else(|_| match s.parse::<f64>() {
                    Ok(v) if v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
                    _ => Err(Error::data_integrity(format!(
                        "Invalid id '{s}' in event list cell '{cell}'"
                    ))),
                })
            })
            .collect()
    }
}

/// A named failure event, and the branches it takes out of service.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureEvent {
    name: String,
    branches: Vec<usize>,
    frequency: f64,
    duration: f64,
    routine: bool,
}

impl FailureEvent {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the indices of the branches taken out by the event, sorted
    /// and without duplicates.
    pub fn branches(&self) -> &[usize] {
        &self.branches
    }

    /// Returns the frequency of the event, in occurrences per year.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Returns the duration of the event, in hours.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_routine(&self) -> bool {
        self.routine
    }
}

/// A catalogue of failure events.
///
/// The registry is immutable: every ingestion method consumes it and
/// returns a new registry that includes the new events.
#[derive(Clone, Debug, Default)]
pub struct FailureRegistry {
    routine: EventSet,
    event_list: EventSet,
    extreme: EventSet,
}

impl FailureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a routine failure event for every existing line of the rated
    /// line types (named `LN_R_<branch>`), and for every substation if
    /// substations are rated (named `S_R_<substation>`).
    ///
    /// With `rewrite`, previously added routine events are dropped first.
    pub fn with_routine_failures(
        mut self,
        network: &Network,
        rates: &RoutineFailureRates,
        rewrite: bool,
    ) -> Result<Self, Error> {
        if rewrite {
            self.routine.clear();
        }
        let mut added = 0;

        for (rate, overhead) in [
            (rates.underground_lines, false),
            (rates.overhead_lines, true),
        ] {
            let Some(rate) = rate else {
                continue;
            };
            let lines = network
                .branches()
                .filter(|b| b.existing && b.overhead == overhead)
                .map(|b| b.index)
                .collect::<Vec<_>>();
            for index in lines {
                let event =
                    Self::create_event(format!("LN_R_{index}"), [index].into(), rate, true)?;
                self.routine.upsert(event);
                added += 1;
            }
        }

        if let Some(rate) = rates.substations {
            let ids = network.substations().map(|s| s.id).collect::<Vec<_>>();
            for id in ids {
                let branches = substation_branches(network, &[id])?;
                let event = Self::create_event(format!("S_R_{id}"), branches, rate, true)?;
                self.routine.upsert(event);
                added += 1;
            }
        }

        info!("Added {added} routine failure events.");
        Ok(self)
    }

    /// Adds the given extreme events, named `HILP_<n>` after their position
    /// in `events`.  Extreme events are not routine.
    ///
    /// With `rewrite`, previously added extreme events are dropped first.
    pub fn with_extreme_events(
        mut self,
        network: &Network,
        events: &[ExtremeEvent],
        rewrite: bool,
    ) -> Result<Self, Error> {
        if rewrite {
            self.extreme.clear();
        }
        for (n, ev) in events.iter().enumerate() {
            let branches = outage_branches(network, &ev.branches, &ev.substations)?;
            let event = Self::create_event(
                format!("HILP_{n}"),
                branches,
                FailureRate::new(ev.frequency, ev.duration),
                false,
            )?;
            self.extreme.upsert(event);
        }

        info!("Added {} extreme failure events.", events.len());
        Ok(self)
    }

    /// Adds the events from an explicit event table, named `EVT_<id>`.
    /// Listed events are routine.
    ///
    /// With `rewrite`, previously listed events are dropped first.
    pub fn with_event_list(
        mut self,
        network: &Network,
        rows: &[EventListRow],
        rewrite: bool,
    ) -> Result<Self, Error> {
        if rewrite {
            self.event_list.clear();
        }
        for row in rows {
            let branches = outage_branches(network, &row.branches, &row.substations)?;
            let event = Self::create_event(
                format!("EVT_{}", row.id),
                branches,
                FailureRate::new(row.frequency, row.duration),
                true,
            )?;
            self.event_list.upsert(event);
        }

        info!("Added {} listed failure events.", rows.len());
        Ok(self)
    }

    /// Returns the merged catalogue: routine events, then listed events, then
    /// extreme events.  An event replaces an earlier one with the same name.
    pub fn events(&self) -> Vec<FailureEvent> {
        let mut merged = self.routine.clone();
        for event in self.event_list.iter().chain(self.extreme.iter()) {
            merged.upsert(event.clone());
        }
        merged.events
    }

    /// Returns the number of events in the merged catalogue.
    pub fn len(&self) -> usize {
        let listed = self
            .event_list
            .iter()
            .filter(|e| !self.routine.contains(&e.name))
            .count();
        let extreme = self
            .extreme
            .iter()
            .filter(|e| !self.routine.contains(&e.name) && !self.event_list.contains(&e.name))
            .count();
        self.routine.len() + listed + extreme
    }

    pub fn is_empty(&self) -> bool {
        self.routine.is_empty() && self.event_list.is_empty() && self.extreme.is_empty()
    }

    fn create_event(
        name: String,
        branches: BTreeSet<usize>,
        rate: FailureRate,
        routine: bool,
    ) -> Result<FailureEvent, Error> {
        let FailureRate {
            frequency,
            duration,
        } = rate;
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(Error::data_integrity(format!(
                "Failure event {name} has an invalid frequency: {frequency}"
            )));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::data_integrity(format!(
                "Failure event {name} has an invalid duration: {duration}"
            )));
        }
        Ok(FailureEvent {
            name,
            branches: branches.into_iter().collect(),
            frequency,
            duration,
            routine,
        })
    }
}

/// Failure events in insertion order, with their positions keyed by name.
#[derive(Clone, Debug, Default)]
struct EventSet {
    events: Vec<FailureEvent>,
    positions: BTreeMap<String, usize>,
}

impl EventSet {
    /// Inserts the event, replacing an event with the same name in place.
    fn upsert(&mut self, event: FailureEvent) {
        match self.positions.get(&event.name) {
            Some(&position) => self.events[position] = event,
            None => {
                self.positions.insert(event.name.clone(), self.events.len());
                self.events.push(event);
            }
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    fn clear(&mut self) {
        self.events.clear();
        self.positions.clear();
    }

    fn iter(&self) -> impl Iterator<Item = &FailureEvent> {
        self.events.iter()
    }

    fn len(&self) -> usize {
        self.events.len()
    }

    fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Returns the existing branches connected to the buses of the given
/// substations.
fn substation_branches(network: &Network, substations: &[u64]) -> Result<BTreeSet<usize>, Error> {
    let mut branches = BTreeSet::new();
    for &id in substations {
        let bus = network.substation(id)?.bus;
        branches.extend(network.incident_branches(bus)?);
    }
    Ok(branches)
}

/// Returns the union of the given branches and the branches taken out by
/// the given substations.
fn outage_branches(
    network: &Network,
    branches: &[usize],
    substations: &[u64],
) -> Result<BTreeSet<usize>, Error> {
    let mut outage = substation_branches(network, substations)?;
    for &index in branches {
        network.branch(index)?;
        outage.insert(index);
    }
    Ok(outage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_utils::NetworkBuilder;
    use crate::PlanningConfig;

    /// ```text
    ///   bus 0 (S0) --L0(OH)-- bus 1 --L1-- bus 2 --L2(OH)-- bus 3 (S1)
    ///   bus 1 - - C3 - - bus 3
    /// ```
    fn network() -> Result<Network, Error> {
        let mut builder = NetworkBuilder::new();
        let s0 = builder.substation_bus(100.0);
        let b1 = builder.load_bus(10.0);
        let b2 = builder.load_bus(10.0);
        let s1 = builder.substation_bus(50.0);
        builder
            .overhead_line(s0, b1)
            .line(b1, b2)
            .overhead_line(b2, s1)
            .candidate(b1, s1);
        builder.build(PlanningConfig::default())
    }

    fn summary(registry: &FailureRegistry) -> Vec<(String, Vec<usize>, bool)> {
        registry
            .events()
            .into_iter()
            .map(|e| (e.name().to_string(), e.branches().to_vec(), e.is_routine()))
            .collect()
    }

    #[test]
    fn test_routine_failures() -> Result<(), Error> {
        let network = network()?;
        let rates = RoutineFailureRates {
            overhead_lines: Some(FailureRate::new(0.2, 2.0)),
            underground_lines: Some(FailureRate::new(0.1, 1.0)),
            substations: Some(FailureRate::new(0.05, 1.0)),
        };
        let registry = FailureRegistry::new().with_routine_failures(&network, &rates, true)?;

        assert_eq!(
            summary(&registry),
            [
                ("LN_R_1".to_string(), vec![1], true),
                ("LN_R_0".to_string(), vec![0], true),
                ("LN_R_2".to_string(), vec![2], true),
                ("S_R_0".to_string(), vec![0], true),
                ("S_R_1".to_string(), vec![2], true),
            ]
        );
        let events = registry.events();
        assert_eq!(events[0].frequency(), 0.1);
        assert_eq!(events[1].duration(), 2.0);

        // Only overhead lines this time, accumulating.
        let rates = RoutineFailureRates {
            overhead_lines: Some(FailureRate::new(0.4, 3.0)),
            ..Default::default()
        };
        let registry = registry.with_routine_failures(&network, &rates, false)?;
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.events()[1].frequency(), 0.4);

        // Rewriting drops everything else.
        let registry = registry.with_routine_failures(&network, &rates, true)?;
        assert_eq!(
            summary(&registry),
            [
                ("LN_R_0".to_string(), vec![0], true),
                ("LN_R_2".to_string(), vec![2], true),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_extreme_events() -> Result<(), Error> {
        let network = network()?;
        let events = [
            ExtremeEvent {
                branches: vec![1, 1],
                substations: vec![1],
                frequency: 0.02,
                duration: 50.0,
            },
            ExtremeEvent {
                branches: vec![0],
                substations: vec![],
                frequency: 0.01,
                duration: 60.0,
            },
        ];
        let registry = FailureRegistry::new().with_extreme_events(&network, &events, true)?;
        assert_eq!(
            summary(&registry),
            [
                ("HILP_0".to_string(), vec![1, 2], false),
                ("HILP_1".to_string(), vec![0], false),
            ]
        );

        let registry = registry.with_extreme_events(&network, &events[1..], true)?;
        assert_eq!(summary(&registry), [("HILP_0".to_string(), vec![0], false)]);

        let bad = [ExtremeEvent {
            branches: vec![9],
            ..Default::default()
        }];
        assert!(FailureRegistry::new()
            .with_extreme_events(&network, &bad, true)
            .is_err_and(|e| e == Error::data_integrity("Branch with index 9 not found.")));

        let bad = [ExtremeEvent {
            substations: vec![4],
            ..Default::default()
        }];
        assert!(FailureRegistry::new()
            .with_extreme_events(&network, &bad, true)
            .is_err_and(|e| e == Error::data_integrity("Substation with id 4 not found.")));

        let bad = [ExtremeEvent {
            branches: vec![0],
            frequency: -1.0,
            ..Default::default()
        }];
        assert!(FailureRegistry::new()
            .with_extreme_events(&network, &bad, true)
            .is_err_and(|e| e
                == Error::data_integrity("Failure event HILP_0 has an invalid frequency: -1")));

        Ok(())
    }

    #[test]
    fn test_event_list() -> Result<(), Error> {
        let network = network()?;
        let rows = [
            EventListRow::from_cells(0, "2, 1", "", 0.5, 4.0)?,
            EventListRow::from_cells(7, "", "0", 0.1, 1.0)?,
            EventListRow::from_cells(8, "1.0", "1", 0.1, 1.0)?,
        ];
        let registry = FailureRegistry::new()
            .with_routine_failures(
                &network,
                &RoutineFailureRates {
                    substations: Some(FailureRate::new(0.05, 1.0)),
                    ..Default::default()
                },
                true,
            )?
            .with_extreme_events(
                &network,
                &[ExtremeEvent {
                    branches: vec![0],
                    substations: vec![],
                    frequency: 0.01,
                    duration: 10.0,
                }],
                true,
            )?
            .with_event_list(&network, &rows, true)?;

        assert_eq!(
            summary(&registry),
            [
                ("S_R_0".to_string(), vec![0], true),
                ("S_R_1".to_string(), vec![2], true),
                ("EVT_0".to_string(), vec![1, 2], true),
                ("EVT_7".to_string(), vec![0], true),
                ("EVT_8".to_string(), vec![1, 2], true),
                ("HILP_0".to_string(), vec![0], false),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(EventListRow::parse_ids(""), Ok(vec![]));
        assert_eq!(EventListRow::parse_ids("  "), Ok(vec![]));
        assert_eq!(EventListRow::parse_ids("3"), Ok(vec![3]));
        assert_eq!(EventListRow::parse_ids("1,2.0, 17"), Ok(vec![1, 2, 17]));
        assert_eq!(
            EventListRow::parse_ids("1,x"),
            Err(Error::data_integrity("Invalid id 'x' in event list cell '1,x'"))
        );
        assert_eq!(
            EventListRow::parse_ids("1.5"),
            Err(Error::data_integrity("Invalid id '1.5' in event list cell '1.5'"))
        );
    }

    fn event(name: &str, frequency: f64) -> FailureEvent {
        FailureEvent {
            name: name.to_string(),
            branches: vec![],
            frequency,
            duration: 1.0,
            routine: true,
        }
    }

    #[test]
    fn test_event_set() {
        let mut set = EventSet::default();
        set.upsert(event("LN_R_3", 0.1));
        set.upsert(event("LN_R_1", 0.1));
        set.upsert(event("LN_R_3", 0.7));
        assert_eq!(set.len(), 2);
        assert!(set.contains("LN_R_1"));
        assert!(!set.contains("LN_R_2"));
        assert_eq!(
            set.iter()
                .map(|e| (e.name(), e.frequency()))
                .collect::<Vec<_>>(),
            [("LN_R_3", 0.7), ("LN_R_1", 0.1)]
        );

        set.clear();
        assert!(set.is_empty());
        set.upsert(event("LN_R_1", 0.2));
        assert_eq!(set.iter().map(|e| e.name()).collect::<Vec<_>>(), ["LN_R_1"]);
    }

    #[test]
    fn test_merged_catalogue() -> Result<(), Error> {
        // A long feeder, so every source contributes many events.
        let mut builder = NetworkBuilder::new();
        let mut previous = builder.substation_bus(1000.0);
        for _ in 0..2000 {
            let next = builder.load_bus(1.0);
            builder.line(previous, next);
            previous = next;
        }
        let network = builder.build(PlanningConfig::default())?;

        let rates = RoutineFailureRates {
            underground_lines: Some(FailureRate::new(0.1, 1.0)),
            ..Default::default()
        };
        let rows = (0..500)
            .map(|n| EventListRow {
                id: n,
                branches: vec![n as usize],
                ..Default::default()
            })
            .collect::<Vec<_>>();
        let registry = FailureRegistry::new()
            .with_routine_failures(&network, &rates, true)?
            .with_routine_failures(&network, &rates, false)?
            .with_event_list(&network, &rows, true)?
            .with_event_list(&network, &rows, false)?;

        let events = registry.events();
        assert_eq!(registry.len(), 2500);
        assert_eq!(events.len(), registry.len());
        assert_eq!(events[0].name(), "LN_R_0");
        assert_eq!(events[1999].name(), "LN_R_1999");
        assert_eq!(events[2000].name(), "EVT_0");
        assert_eq!(events[2499].name(), "EVT_499");

        Ok(())
    }
}
