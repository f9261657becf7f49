//! Conditions attached to response infos.
//!
//! The core treats these as opaque data; a matcher decides what they mean.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A comparison operator used by numeric conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Equal.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl Comparison {
    /// Apply the comparison to two operands.
    pub fn test<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

/// A condition under which a response info may be selected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// The pending forced-choice code equals `code`.
    Choice {
        /// Choice code offered by an earlier response.
        code: i32,
    },
    /// Whether the actor has talked to the player before this conversation.
    TalkedTo {
        /// Expected flag value.
        value: bool,
    },
    /// The speaking actor has this name.
    Actor {
        /// Actor name (case-insensitive).
        name: String,
    },
    /// Compare the actor's displayed disposition.
    Disposition {
        /// Comparison operator.
        #[serde(default)]
        cmp: Comparison,
        /// Right-hand operand.
        value: i32,
    },
    /// Compare one of the actor's script locals.
    Local {
        /// Local variable name.
        name: String,
        /// Comparison operator.
        #[serde(default)]
        cmp: Comparison,
        /// Right-hand operand.
        value: Value,
    },
    /// Compare a global variable.
    Global {
        /// Global variable name.
        name: String,
        /// Comparison operator.
        #[serde(default)]
        cmp: Comparison,
        /// Right-hand operand.
        value: Value,
    },
    /// Compare a journal index.
    Journal {
        /// Journal quest id.
        id: String,
        /// Comparison operator.
        #[serde(default)]
        cmp: Comparison,
        /// Right-hand operand.
        index: i64,
    },
    /// Logical NOT.
    Not {
        /// Negated condition.
        condition: Box<Condition>,
    },
    /// Logical AND.
    And {
        /// All of these must hold.
        all: Vec<Condition>,
    },
    /// Logical OR.
    Or {
        /// At least one of these must hold.
        any: Vec<Condition>,
    },
    /// Always true.
    #[default]
    Always,
}
