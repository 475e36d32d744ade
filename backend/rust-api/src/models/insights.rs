use serde::Serialize;
use std::collections::BTreeMap;

use super::{answer::MistakeCategory, problem::Operation};

/// Learning summary for the current session.
///
/// Everything except the attempt count is omitted until the first attempt
/// has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_problems_attempted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak_areas: Option<BTreeMap<Operation, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_mistakes: Option<BTreeMap<MistakeCategory, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_focus: Option<Operation>,
}

impl StudentInsights {
    pub fn empty() -> Self {
        Self {
            message: Some("No data yet".to_string()),
            total_problems_attempted: 0,
            recent_accuracy: None,
            weak_areas: None,
            most_common_mistakes: None,
            recommended_focus: None,
        }
    }
}
