// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Load curtailment expressions for the islands of a network.
//!
//! An expression stands for the quantity
//!
//! ```text
//! unmet load = sum(load over buses) - sum(storage state-of-charge) - substation capacity
//! ```
//!
//! which the optimizer has to cover either by curtailing load or by
//! investing in storage and lines.

use std::fmt::Display;

use super::Island;

/// The buses, storage candidates and substation capacity of an island that
/// may have to curtail load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurtailmentExpression {
    pub load_buses: Vec<u64>,
    pub storage: Vec<u64>,
    pub substation_capacity_kw: f64,
}

impl CurtailmentExpression {
    /// Returns true if the expression covers no buses.  Such an expression
    /// is emitted when no island has to curtail load.
    pub fn is_empty(&self) -> bool {
        self.load_buses.is_empty()
    }
}

impl From<&Island> for CurtailmentExpression {
    fn from(island: &Island) -> Self {
        Self {
            load_buses: island.buses().to_vec(),
            storage: island.storage().to_vec(),
            substation_capacity_kw: island.capacity_kw(),
        }
    }
}

fn format_ids(ids: &[u64]) -> String {
    format!(
        "[{}]",
        ids.iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

impl Display for CurtailmentExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sum_load({}) - sum_storage_soc({}) - {}",
            format_ids(&self.load_buses),
            format_ids(&self.storage),
            self.substation_capacity_kw
        )
    }
}

/// Returns the curtailment expressions for the given islands.
///
/// In `reduced` mode only islands whose peak demand exceeds their substation
/// capacity are reported.  Otherwise all islands are.
///
/// The result is never empty: when there is nothing to report, a single
/// empty expression is returned.
pub fn curtailment_expressions(islands: &[Island], reduced: bool) -> Vec<CurtailmentExpression> {
    let mut expressions = islands
        .iter()
        .filter(|island| !reduced || !island.is_satisfied())
        .map(CurtailmentExpression::from)
        .collect::<Vec<_>>();

    if expressions.is_empty() {
        expressions.push(CurtailmentExpression::default());
    }
    expressions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_utils::{three_bus_feeder, NetworkBuilder};
    use crate::{Error, PlanningConfig};

    #[test]
    fn test_reduced_expressions() -> Result<(), Error> {
        let network = three_bus_feeder(PlanningConfig::default())?;

        let expressions = curtailment_expressions(&network.islands([0, 1])?, true);
        assert_eq!(expressions, [CurtailmentExpression::default()]);
        assert!(expressions[0].is_empty());

        let expressions = curtailment_expressions(&network.islands([0])?, true);
        assert_eq!(
            expressions,
            [CurtailmentExpression {
                load_buses: vec![2],
                storage: vec![],
                substation_capacity_kw: 0.0,
            }]
        );

        Ok(())
    }

    #[test]
    fn test_full_expressions() -> Result<(), Error> {
        let network = three_bus_feeder(PlanningConfig::default())?;

        let expressions = curtailment_expressions(&network.islands([0])?, false);
        assert_eq!(expressions.len(), 2);
        assert_eq!(expressions[0].load_buses, [0, 1]);
        assert_eq!(expressions[0].substation_capacity_kw, 100.0);
        assert_eq!(expressions[1].load_buses, [2]);

        Ok(())
    }

    #[test]
    fn test_overloaded_substation() -> Result<(), Error> {
        // An island with generation can still be short of capacity.
        let mut builder = NetworkBuilder::new();
        let grid = builder.substation_bus(10.0);
        let load = builder.storage_bus(25.0);
        builder.line(grid, load);
        let network = builder.build(PlanningConfig::default())?;

        let expressions = curtailment_expressions(&network.islands([0])?, true);
        assert_eq!(expressions.len(), 1);
        assert_eq!(expressions[0].storage, [load]);
        assert_eq!(
            expressions[0].to_string(),
            "sum_load([0, 1]) - sum_storage_soc([1]) - 10"
        );

        Ok(())
    }
}
