//! Schema types. Pure data; the schema is built (and type-checked) elsewhere,
//! we only keep what cost analysis needs: fields, their return types,
//! argument defaults and authored `@cost` annotations.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rule::CostAnnotation;
use crate::value::Value;

/// Scalars every schema has, whether or not they are declared.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// A possibly wrapped type reference, e.g. `[First!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// The innermost named type, with list/non-null wrappers stripped.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    /// True if a list wrapper appears anywhere in the reference.
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix('!') {
            let inner: TypeRef = inner.parse()?;
            if matches!(inner, TypeRef::NonNull(_)) {
                return Err(Error::Schema(format!("doubled non-null marker in '{s}'")));
            }
            return Ok(TypeRef::non_null(inner));
        }
        if let Some(rest) = s.strip_prefix('[') {
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| Error::Schema(format!("unbalanced list brackets in '{s}'")))?;
            return Ok(TypeRef::list(inner.parse()?));
        }
        let valid = !s.is_empty()
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !s.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(Error::Schema(format!("invalid type name '{s}'")));
        }
        Ok(TypeRef::Named(s.to_string()))
    }
}

impl TryFrom<String> for TypeRef {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TypeRef> for String {
    fn from(t: TypeRef) -> Self {
        t.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Object,
    Interface,
    Union,
    Scalar,
    Enum,
    InputObject,
}

impl TypeKind {
    /// Composite types carry sub-selections.
    pub fn is_composite(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface | TypeKind::Union)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostAnnotation>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            cost: None,
        }
    }

    pub fn with_argument(mut self, arg: ArgumentDef) -> Self {
        self.arguments.push(arg);
        self
    }

    pub fn with_cost(mut self, cost: CostAnnotation) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostAnnotation>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            cost: None,
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Scalar)
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_cost(mut self, cost: CostAnnotation) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Serialized shape of a schema; `Schema` adds the name index and root checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(default = "default_query_type")]
    pub query_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
    pub types: Vec<TypeDef>,
}

fn default_query_type() -> String {
    "Query".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct Schema {
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: Vec<TypeDef>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema with `query_type` as its query root.
    ///
    /// Built-in scalars are added when missing. Fails on duplicate type names.
    pub fn new(query_type: impl Into<String>, types: Vec<TypeDef>) -> Result<Self> {
        Self::from_def(SchemaDef {
            query_type: query_type.into(),
            mutation_type: None,
            subscription_type: None,
            types,
        })
    }

    pub fn from_def(def: SchemaDef) -> Result<Self> {
        let mut types = def.types;
        for scalar in BUILTIN_SCALARS {
            if !types.iter().any(|t| t.name == scalar) {
                types.push(TypeDef::scalar(scalar));
            }
        }

        let mut index = HashMap::with_capacity(types.len());
        for (i, t) in types.iter().enumerate() {
            if index.insert(t.name.clone(), i).is_some() {
                return Err(Error::Schema(format!("duplicate type '{}'", t.name)));
            }
        }

        let schema = Self {
            query_type: def.query_type,
            mutation_type: def.mutation_type,
            subscription_type: def.subscription_type,
            types,
            index,
        };
        schema.check_root(&schema.query_type)?;
        if let Some(root) = &schema.mutation_type {
            schema.check_root(root)?;
        }
        if let Some(root) = &schema.subscription_type {
            schema.check_root(root)?;
        }
        Ok(schema)
    }

    fn check_root(&self, name: &str) -> Result<()> {
        match self.type_def(name) {
            Some(t) if t.kind == TypeKind::Object => Ok(()),
            Some(_) => Err(Error::Schema(format!("root type '{name}' must be an object type"))),
            None => Err(Error::Schema(format!("root type '{name}' is not defined"))),
        }
    }

    pub fn with_mutation_type(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        self.check_root(&name)?;
        self.mutation_type = Some(name);
        Ok(self)
    }

    pub fn with_subscription_type(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        self.check_root(&name)?;
        self.subscription_type = Some(name);
        Ok(self)
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.index.get(name).and_then(|&i| self.types.get(i))
    }

    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = Error;

    fn try_from(def: SchemaDef) -> Result<Self> {
        Schema::from_def(def)
    }
}

impl From<Schema> for SchemaDef {
    fn from(s: Schema) -> Self {
        SchemaDef {
            query_type: s.query_type,
            mutation_type: s.mutation_type,
            subscription_type: s.subscription_type,
            types: s.types,
        }
    }
}
