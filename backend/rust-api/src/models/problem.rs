use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

/// Arithmetic operation a problem exercises.
///
/// Declaration order doubles as the iteration order of every per-operation map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction => "-",
            Operation::Multiplication => "×",
            Operation::Division => "÷",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "addition" => Ok(Operation::Addition),
            "subtraction" => Ok(Operation::Subtraction),
            "multiplication" => Ok(Operation::Multiplication),
            "division" => Ok(Operation::Division),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// Operands as drawn by the generator: `(a, b)` or `(dividend, divisor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operands {
    pub left: u32,
    pub right: u32,
}

impl Operands {
    pub fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "problem")]
    pub expression: String,
    pub answer: i64,
    pub operation: Operation,
    pub difficulty: u32,
    #[serde(rename = "ai_adapted", default)]
    pub adaptive: bool,
    /// Missing when the problem was not produced by this service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operands: Option<Operands>,
}

impl Problem {
    pub fn new(operation: Operation, operands: Operands, answer: i64, difficulty: u32) -> Self {
        Self {
            expression: format!(
                "{} {} {}",
                operands.left,
                operation.symbol(),
                operands.right
            ),
            answer,
            operation,
            difficulty,
            adaptive: false,
            operands: Some(operands),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateProblemsRequest {
    #[validate(length(min = 1, message = "At least one operation is required"))]
    pub operations: Vec<Operation>,
    pub count: u32,
    /// Plain random generation when false.
    #[serde(default = "default_adaptive")]
    pub adaptive: bool,
}

fn default_adaptive() -> bool {
    true
}
