use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::problem::{Operation, Problem};

#[derive(Debug, Deserialize, Validate)]
pub struct RecordAttemptRequest {
    pub problem: Problem,
    pub user_answer: i64,
    #[validate(range(min = 0.0, message = "time_taken must not be negative"))]
    pub time_taken: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub problem: Problem,
    pub user_answer: i64,
    pub is_correct: bool,
    pub time_taken: f64,
    pub operation: Operation,
    pub difficulty: u32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeCategory {
    #[serde(rename = "wrong_operation_subtraction")]
    SubtractedInsteadOfAdded,
    #[serde(rename = "wrong_operation_addition")]
    AddedInsteadOfSubtracted,
    #[serde(rename = "wrong_operation_addition_multiplication")]
    AddedInsteadOfMultiplied,
    CalculationError,
    ConceptualError,
}

impl MistakeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeCategory::SubtractedInsteadOfAdded => "wrong_operation_subtraction",
            MistakeCategory::AddedInsteadOfSubtracted => "wrong_operation_addition",
            MistakeCategory::AddedInsteadOfMultiplied => "wrong_operation_addition_multiplication",
            MistakeCategory::CalculationError => "calculation_error",
            MistakeCategory::ConceptualError => "conceptual_error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MistakeCategory::SubtractedInsteadOfAdded => {
                "wrong-operation: subtracted instead of added"
            }
            MistakeCategory::AddedInsteadOfSubtracted => {
                "wrong-operation: added instead of subtracted"
            }
            MistakeCategory::AddedInsteadOfMultiplied => {
                "wrong-operation: added instead of multiplied"
            }
            MistakeCategory::CalculationError => "calculation error",
            MistakeCategory::ConceptualError => "conceptual error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MistakeRecord {
    pub problem_text: String,
    pub user_answer: i64,
    pub correct_answer: i64,
    pub mistake_type: MistakeCategory,
}

/// Per-attempt signal consumed by difficulty prediction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DifficultyFeedback {
    pub assigned_difficulty: u32,
    pub was_correct: bool,
    pub time_taken: f64,
}
