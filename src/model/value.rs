//! Displayed variable values
//!
//! This module defines the [`Value`] enum, which represents every value a
//! timeline record can show for a variable, together with the closed
//! [`VarType`] tag authored next to it.
//!
//! # Value Types
//!
//! - [`Value::Undefined`]: absent value (also what `null` deserializes to)
//! - [`Value::Bool`]: boolean
//! - [`Value::Int`]: 64-bit signed integer
//! - [`Value::Float`]: 64-bit float
//! - [`Value::Text`]: string
//! - [`Value::List`]: ordered list of values
//! - [`Value::Record`]: named fields, kept in key order for stable display

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A variable's value as authored in a timeline record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Check if this value is present
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    /// The type tag naturally describing this value
    pub fn natural_type(&self) -> VarType {
        match self {
            Value::Undefined => VarType::Undefined,
            Value::Bool(_) => VarType::Boolean,
            Value::Int(_) | Value::Float(_) => VarType::Number,
            Value::Text(_) => VarType::String,
            Value::List(_) => VarType::Array,
            Value::Record(_) => VarType::Object,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Closed set of variable type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Number,
    String,
    Boolean,
    Object,
    Array,
    Function,
    Null,
    #[default]
    Undefined,
}

impl VarType {
    pub fn label(self) -> &'static str {
        match self {
            VarType::Number => "number",
            VarType::String => "string",
            VarType::Boolean => "boolean",
            VarType::Object => "object",
            VarType::Array => "array",
            VarType::Function => "function",
            VarType::Null => "null",
            VarType::Undefined => "undefined",
        }
    }
}

/// A named variable shown inside a stack frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default)]
    pub var_type: VarType,
    #[serde(default)]
    pub is_parameter: bool,
    /// Mutated since the previous snapshot; only used for highlighting
    #[serde(default)]
    pub is_changed: bool,
}

impl Variable {
    /// Create a local variable whose type tag follows its value
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Variable {
            name: name.into(),
            var_type: value.natural_type(),
            value,
            is_parameter: false,
            is_changed: false,
        }
    }

    /// Create a parameter whose type tag follows its value
    pub fn parameter(name: impl Into<String>, value: Value) -> Self {
        Variable {
            is_parameter: true,
            ..Variable::new(name, value)
        }
    }

    /// Mark this variable as changed since the previous record
    pub fn changed(mut self) -> Self {
        self.is_changed = true;
        self
    }
}
