//! The query tree handed to the engine: a parsed, validated document.
//!
//! Fragment spreads are expected to be resolved upstream into `InlineFragment`
//! nodes carrying the fragment's type condition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Query,
    Mutation,
    Subscription,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub operations: Vec<Operation>,
}

impl Document {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Document with a single anonymous query.
    pub fn query(selections: Vec<Selection>) -> Self {
        Self::new(vec![Operation::new(OperationKind::Query, selections)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub kind: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub selections: Vec<Selection>,
}

impl Operation {
    pub fn new(kind: OperationKind, selections: Vec<Selection>) -> Self {
        Self {
            kind,
            name: None,
            selections,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label used in logs and reports.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Tagged by `kind`: `{ kind: field, name: ... }` or
/// `{ kind: inline_fragment, type_condition: ..., selections: [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Selection {
    Field(FieldSelection),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub arguments: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selections: Vec<Selection>,
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn select(mut self, selection: impl Into<Selection>) -> Self {
        self.selections.push(selection.into());
        self
    }

    /// Key under which this field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_condition: Option<String>,
    pub selections: Vec<Selection>,
}

impl InlineFragment {
    pub fn new(type_condition: Option<String>, selections: Vec<Selection>) -> Self {
        Self {
            type_condition,
            selections,
        }
    }
}

impl From<FieldSelection> for Selection {
    fn from(f: FieldSelection) -> Self {
        Selection::Field(f)
    }
}

impl From<InlineFragment> for Selection {
    fn from(f: InlineFragment) -> Self {
        Selection::InlineFragment(f)
    }
}
