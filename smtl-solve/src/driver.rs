#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smtl_core::{Compilation, Value};
use tracing::{debug, info};

use crate::backend::SolverBackend;
use crate::error::SolverError;
use crate::result::SolverResult;
use crate::script::Script;

/// A checked model: one value per declared name, ordered by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solution {
    values: BTreeMap<String, Value>,
}

impl Solution {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `name = value` lines in lexicographic name order.
    pub fn lines(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k} = {v}")).collect()
    }
}

impl From<BTreeMap<String, Value>> for Solution {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// Values are written as their text, the same form the text renderer prints.
impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, &value.to_string())?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    Sat { model: Solution },
    Unsat,
    Unknown { reason: String },
}

impl Verdict {
    pub fn status(&self) -> &'static str {
        match self {
            Verdict::Sat { .. } => "sat",
            Verdict::Unsat => "unsat",
            Verdict::Unknown { .. } => "unknown",
        }
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat { .. })
    }
}

/// Runs one satisfiability check for `compilation` and validates any model against the
/// compiled constraints before returning it.
pub fn solve(compilation: &Compilation, backend: &dyn SolverBackend) -> Result<Verdict, SolverError> {
    let script = Script::from_compilation(compilation);
    debug!(script = %script, "emitting query");
    info!(
        backend = backend.name(),
        logic = %script.logic,
        symbols = script.consts.len(),
        constraints = script.assertions.len(),
        "checking satisfiability"
    );

    let verdict = match backend.check_sat(&script)? {
        SolverResult::Unsat => Verdict::Unsat,
        SolverResult::Unknown(reason) => Verdict::Unknown { reason },
        SolverResult::Sat(mut model) => {
            model.retain(|name, _| compilation.symbols.lookup(name).is_some());
            for symbol in compilation.symbols.iter() {
                match model.get(&symbol.name) {
                    None => {
                        return Err(SolverError::Parse(format!(
                            "model has no value for `{}`",
                            symbol.name
                        )));
                    }
                    Some(v) if v.sort() != symbol.sort => {
                        return Err(SolverError::Parse(format!(
                            "model value `{v}` for `{}` is not {}",
                            symbol.name, symbol.sort
                        )));
                    }
                    Some(_) => {}
                }
            }

            let violated = compilation
                .first_violated(&model)
                .map_err(|e| SolverError::Parse(format!("cannot check model: {e}")))?;
            if let Some(index) = violated {
                return Err(SolverError::InvalidModel {
                    index,
                    constraint: compilation.constraints[index].to_string(),
                });
            }
            Verdict::Sat {
                model: Solution::from(model),
            }
        }
    };

    info!(status = verdict.status(), "solver verdict");
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_sorted_by_name() {
        let mut values = BTreeMap::new();
        values.insert("b".to_string(), Value::int(2));
        values.insert("a".to_string(), Value::int(-1));
        values.insert("c".to_string(), Value::Bool(true));
        let solution = Solution::from(values);
        assert_eq!(solution.lines(), vec!["a = -1", "b = 2", "c = true"]);
        assert_eq!(solution.to_string(), "a = -1\nb = 2\nc = true\n");
    }

    #[test]
    fn empty_solution_renders_nothing() {
        assert_eq!(Solution::default().to_string(), "");
        assert!(Solution::default().is_empty());
    }
}
