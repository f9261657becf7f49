use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric script value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Whole number (short and long variables).
    Integer(i64),
    /// Floating-point number.
    Float(f64),
}

impl Value {
    /// The value as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Integer(n) => n as f64,
            Value::Float(f) => f,
        }
    }

    /// The value as an integer, truncating floats toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            Value::Integer(n) => n,
            Value::Float(f) => f as i64,
        }
    }

    /// Non-zero values are true.
    pub fn is_truthy(self) -> bool {
        match self {
            Value::Integer(n) => n != 0,
            Value::Float(f) => f != 0.0,
        }
    }

    /// Convert to the representation stored by a variable of `kind`.
    pub fn coerce(self, kind: VarKind) -> Value {
        match kind {
            VarKind::Short => Value::Integer(self.as_i64() as i16 as i64),
            VarKind::Long => Value::Integer(self.as_i64() as i32 as i64),
            VarKind::Float => Value::Float(self.as_f64()),
        }
    }

    /// Compare two values numerically, promoting to float when either side is a float.
    pub fn numeric_eq(self, other: Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Integer(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Declared type of a script variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    /// 16-bit integer.
    #[default]
    Short,
    /// 32-bit integer.
    Long,
    /// Floating point.
    Float,
}

/// One declared local variable and its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVar {
    /// Variable name as declared.
    pub name: String,
    /// Declared type.
    #[serde(default)]
    pub kind: VarKind,
    /// Current value.
    #[serde(default)]
    pub value: Value,
}

/// Local variable namespace and storage of an actor's attached script.
///
/// Variables are addressed by slot index once compiled; names are matched
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locals {
    vars: Vec<LocalVar>,
}

impl Locals {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable initialised to zero. Returns its slot; redeclaring
    /// an existing name returns the existing slot.
    pub fn declare(&mut self, name: &str, kind: VarKind) -> usize {
        if let Some(slot) = self.index_of(name) {
            return slot;
        }
        self.vars.push(LocalVar {
            name: name.to_lowercase(),
            kind,
            value: Value::Integer(0).coerce(kind),
        });
        self.vars.len() - 1
    }

    /// Builder form of [`Locals::declare`].
    pub fn with(mut self, name: &str, kind: VarKind) -> Self {
        self.declare(name, kind);
        self
    }

    /// Slot of a variable by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.vars
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Declared type of the variable in `slot`.
    pub fn kind(&self, slot: usize) -> Option<VarKind> {
        self.vars.get(slot).map(|v| v.kind)
    }

    /// Value in `slot`.
    pub fn get(&self, slot: usize) -> Option<Value> {
        self.vars.get(slot).map(|v| v.value)
    }

    /// Value of a variable by name.
    pub fn get_by_name(&self, name: &str) -> Option<Value> {
        self.index_of(name).and_then(|slot| self.get(slot))
    }

    /// Store into `slot`, coercing to the declared type. Returns false if the
    /// slot does not exist.
    pub fn set(&mut self, slot: usize, value: Value) -> bool {
        match self.vars.get_mut(slot) {
            Some(var) => {
                var.value = value.coerce(var.kind);
                true
            }
            None => false,
        }
    }

    /// Store into a variable by name.
    pub fn set_by_name(&mut self, name: &str, value: Value) -> bool {
        match self.index_of(name) {
            Some(slot) => self.set(slot, value),
            None => false,
        }
    }

    /// Declared variables in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &LocalVar> {
        self.vars.iter()
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are declared.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
