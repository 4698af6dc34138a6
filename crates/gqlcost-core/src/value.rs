//! Argument values as they appear on a type-checked field selection.
//!
//! Values are mostly literal already; `Variable` references are substituted by
//! the engine from the caller's variables (see `gqlcost-analysis`).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Variables supplied alongside the operation, keyed without the `$`.
pub type Variables = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    /// Written as `{ "$var": "limit" }` in serialized documents.
    Variable {
        #[serde(rename = "$var")]
        name: String,
    },
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn variable(name: impl Into<String>) -> Self {
        Value::Variable { name: name.into() }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Follow `path` through nested input objects.
    pub fn get_path<'a, I>(&self, path: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cur = self;
        for key in path {
            match cur {
                Value::Object(map) => cur = map.get(key)?,
                _ => return None,
            }
        }
        Some(cur)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
