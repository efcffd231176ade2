//! Interpreting backend for test and bind expressions.

use quarry_core::{Value, compare, truthy};

use super::ast::{Atom, Junction, Path, TestExpr};
use super::bind::{BindExpr, BindPart};

/// Resolves property paths while evaluating an expression.
pub trait Environment {
    /// Value at `path`; `Null` when any segment is missing.
    fn resolve(&self, path: &Path) -> Value;
}

pub fn evaluate(test: &TestExpr, env: &dyn Environment) -> bool {
    let mut atoms = test.atoms.iter().map(|atom| evaluate_atom(atom, env));
    match test.junction {
        Junction::All => atoms.all(|holds| holds),
        Junction::Any => atoms.any(|holds| holds),
    }
}

fn evaluate_atom(atom: &Atom, env: &dyn Environment) -> bool {
    match atom {
        Atom::Truthy(path) => truthy(&env.resolve(path)),
        Atom::Compare { path, op, literal } => {
            compare(&env.resolve(path), *op, &literal.to_value())
        }
        Atom::Invalid(_) => false,
    }
}

pub fn evaluate_bind(bind: &BindExpr, env: &dyn Environment) -> Value {
    match bind {
        BindExpr::Single(part) => part_value(part, env),
        BindExpr::Concat(parts) => Value::String(
            parts
                .iter()
                .map(|part| part_value(part, env).to_string())
                .collect(),
        ),
        BindExpr::Invalid(_) => Value::Null,
    }
}

fn part_value(part: &BindPart, env: &dyn Environment) -> Value {
    match part {
        BindPart::Literal(literal) => literal.to_value(),
        BindPart::Path(path) => env.resolve(path),
    }
}
