//! Resolve a rule's multiplier argument to a number.
//!
//! The multiplier names an argument of the field, or a dotted path into an
//! input-object argument (`page.first`). Lookup order for the top-level
//! argument: the value on the selection, then the schema default. Variable
//! references are substituted at every step; an unbound top-level variable
//! falls back to the default, an unbound nested one counts as absent. A list
//! value multiplies by its length.
//!
//! Nothing here is an error: missing or non-integer values mean "no
//! multiplier", negative values are flagged so the caller can zero them.

use gqlcost_core::query::FieldSelection;
use gqlcost_core::schema::FieldDef;
use gqlcost_core::value::{Value, Variables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierValue {
    /// Argument missing, null, unbound or not an integer.
    Absent,
    Count(u64),
    Negative(i64),
}

impl MultiplierValue {
    /// Value pushed onto the multiplier stack for this field's children.
    pub fn stack_value(self) -> Option<u64> {
        match self {
            MultiplierValue::Absent => None,
            MultiplierValue::Count(n) => Some(n),
            MultiplierValue::Negative(_) => Some(0),
        }
    }
}

pub fn resolve_multiplier(
    path: &str,
    selection: &FieldSelection,
    field: Option<&FieldDef>,
    variables: Option<&Variables>,
) -> MultiplierValue {
    let mut segments = path.split('.');
    let Some(argument) = segments.next().filter(|s| !s.is_empty()) else {
        return MultiplierValue::Absent;
    };

    let given = selection
        .arguments
        .get(argument)
        .and_then(|v| substitute(v, variables));
    let default = || {
        field
            .and_then(|f| f.argument(argument))
            .and_then(|a| a.default_value.as_ref())
    };

    let Some(mut value) = given.or_else(default) else {
        return MultiplierValue::Absent;
    };

    for key in segments {
        let next = match value {
            Value::Object(map) => map.get(key),
            _ => None,
        };
        match next.and_then(|v| substitute(v, variables)) {
            Some(v) => value = v,
            None => return MultiplierValue::Absent,
        }
    }

    interpret(value)
}

fn substitute<'v>(value: &'v Value, variables: Option<&'v Variables>) -> Option<&'v Value> {
    match value {
        Value::Variable { name } => variables?.get(name),
        other => Some(other),
    }
}

fn interpret(value: &Value) -> MultiplierValue {
    match value {
        Value::Int(n) if *n < 0 => MultiplierValue::Negative(*n),
        Value::Int(n) => MultiplierValue::Count(*n as u64),
        Value::List(items) => MultiplierValue::Count(items.len() as u64),
        _ => MultiplierValue::Absent,
    }
}
