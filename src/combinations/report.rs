// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Diagnostic text dumps of a [`StateExpressionIndex`].

use std::fmt::{Display, Formatter, Result};

use super::{Combination, StateExpressionIndex, StateExpressions};

/// Lists, per grid state, the relevant candidates and the curtailment
/// expressions of every combination.
pub struct StatesReport<'a>(&'a StateExpressionIndex);

/// One load curtailment equation per combination, with the candidate
/// assignment it applies to.
pub struct EquationsReport<'a>(&'a StateExpressionIndex);

impl StateExpressionIndex {
    /// Returns a displayable per-state report of the index.
    pub fn states_report(&self) -> StatesReport<'_> {
        StatesReport(self)
    }

    /// Returns a displayable list of the curtailment equations of the index.
    pub fn equations_report(&self) -> EquationsReport<'_> {
        EquationsReport(self)
    }
}

fn write_ids(f: &mut Formatter<'_>, ids: &[usize]) -> Result {
    write!(f, "[")?;
    for (n, id) in ids.iter().enumerate() {
        if n > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{id}")?;
    }
    write!(f, "]")
}

fn write_expressions(f: &mut Formatter<'_>, combination: &Combination, sep: &str) -> Result {
    for (n, expression) in combination.curtailment().iter().enumerate() {
        if n > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{expression}")?;
    }
    Ok(())
}

impl Display for StatesReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for state in self.0.states() {
            writeln!(f, "grid state: {}", state.state())?;
            write!(f, "relevant line investments: ")?;
            write_ids(f, state.relevant())?;
            writeln!(f)?;

            for combination in state.combinations() {
                if combination.on().is_empty() {
                    writeln!(f, "---> no investment")?;
                } else {
                    write!(f, "---> investment in lines ")?;
                    write_ids(f, combination.on())?;
                    writeln!(f)?;
                }
                write!(f, "load_curt = ")?;
                write_expressions(f, combination, "\n    ")?;
                writeln!(f)?;
            }
        }
        for (id, err) in self.0.skipped() {
            writeln!(f, "grid state: {id}")?;
            writeln!(f, "skipped: {err}")?;
        }
        Ok(())
    }
}

impl EquationsReport<'_> {
    fn write_state(f: &mut Formatter<'_>, state: &StateExpressions) -> Result {
        for combination in state.combinations() {
            write!(f, "load_curt {} = ", state.state())?;
            write_expressions(f, combination, " + ")?;
            if !state.relevant().is_empty() {
                write!(f, "   if")?;
                for branch in state.relevant() {
                    let on = u8::from(combination.on().contains(branch));
                    write!(f, " X_{branch}=({on})")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for EquationsReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for state in self.0.states() {
            Self::write_state(f, state)?;
        }
        Ok(())
    }
}
