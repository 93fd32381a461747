//! Comparison operators for conditional updates

use serde::{Deserialize, Serialize};

/// Comparison applied as `current <op> base`
///
/// Sent over the wire in place of a predicate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {
    /// Evaluate the comparison
    pub fn holds(self, current: i64, base: i64) -> bool {
        match self {
            CompareOp::Equal => current == base,
            CompareOp::NotEqual => current != base,
            CompareOp::Less => current < base,
            CompareOp::LessOrEqual => current <= base,
            CompareOp::Greater => current > base,
            CompareOp::GreaterOrEqual => current >= base,
        }
    }

    /// Short symbol used by the CLI
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "eq",
            CompareOp::NotEqual => "ne",
            CompareOp::Less => "lt",
            CompareOp::LessOrEqual => "le",
            CompareOp::Greater => "gt",
            CompareOp::GreaterOrEqual => "ge",
        }
    }
}

impl std::str::FromStr for CompareOp {
    type Err = crate::RushError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "eq" | "==" => Ok(CompareOp::Equal),
            "ne" | "!=" => Ok(CompareOp::NotEqual),
            "lt" | "<" => Ok(CompareOp::Less),
            "le" | "<=" => Ok(CompareOp::LessOrEqual),
            "gt" | ">" => Ok(CompareOp::Greater),
            "ge" | ">=" => Ok(CompareOp::GreaterOrEqual),
            other => Err(crate::RushError::InvalidArgument(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }
}
