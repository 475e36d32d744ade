use chrono::Utc;
use serde::Deserialize;
use std::{cmp::Ordering, collections::BTreeMap};

use crate::metrics::{
    ATTEMPTS_RECORDED_TOTAL, DIFFICULTY_ADJUSTMENTS_TOTAL, MISTAKES_CLASSIFIED_TOTAL,
};
use crate::models::{
    Attempt, DifficultyFeedback, MistakeCategory, MistakeRecord, Operands, Operation, Problem,
};

/// Thresholds for difficulty prediction and insights.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Feedback entries required before any adjustment is made.
    pub min_feedback: usize,
    /// Trailing feedback entries used to judge recent performance.
    pub recent_window: usize,
    /// Ceiling for upward adjustments.
    pub max_difficulty: u32,
    pub easy_accuracy: f64,
    pub easy_seconds: f64,
    pub hard_accuracy: f64,
    pub hard_seconds: f64,
    /// Trailing attempts used for `recent_accuracy` in insights.
    pub insights_window: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            min_feedback: 3,
            recent_window: 5,
            max_difficulty: 6,
            easy_accuracy: 0.8,
            easy_seconds: 10.0,
            hard_accuracy: 0.5,
            hard_seconds: 30.0,
            insights_window: 10,
        }
    }
}

/// Session-wide record of every attempt, plus the per-operation views
/// derived from it. Grows until the owner replaces it with a fresh instance.
#[derive(Debug, Clone, Default)]
pub struct PerformanceTracker {
    settings: TrackerSettings,
    history: Vec<Attempt>,
    mistakes: BTreeMap<Operation, Vec<MistakeRecord>>,
    feedback: BTreeMap<Operation, Vec<DifficultyFeedback>>,
}

impl PerformanceTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
            mistakes: BTreeMap::new(),
            feedback: BTreeMap::new(),
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn record_attempt(&mut self, problem: &Problem, user_answer: i64, time_taken: f64) {
        let is_correct = user_answer == problem.answer;
        let operation = problem.operation;

        tracing::debug!(
            "Recording attempt: operation={}, difficulty={}, correct={}, time_taken={:.1}",
            operation,
            problem.difficulty,
            is_correct,
            time_taken
        );

        let correct_label = if is_correct { "true" } else { "false" };
        ATTEMPTS_RECORDED_TOTAL
            .with_label_values(&[operation.as_str(), correct_label])
            .inc();

        self.history.push(Attempt {
            problem: problem.clone(),
            user_answer,
            is_correct,
            time_taken,
            operation,
            difficulty: problem.difficulty,
            recorded_at: Utc::now(),
        });

        self.feedback
            .entry(operation)
            .or_default()
            .push(DifficultyFeedback {
                assigned_difficulty: problem.difficulty,
                was_correct: is_correct,
                time_taken,
            });

        if !is_correct {
            self.record_mistake(problem, user_answer);
        }
    }

    fn record_mistake(&mut self, problem: &Problem, user_answer: i64) {
        let mistake_type = classify_mistake(problem, user_answer);

        tracing::debug!(
            "Mistake on '{}': answered {}, expected {} ({})",
            problem.expression,
            user_answer,
            problem.answer,
            mistake_type.description()
        );

        MISTAKES_CLASSIFIED_TOTAL
            .with_label_values(&[mistake_type.as_str()])
            .inc();

        self.mistakes
            .entry(problem.operation)
            .or_default()
            .push(MistakeRecord {
                problem_text: problem.expression.clone(),
                user_answer,
                correct_answer: problem.answer,
                mistake_type,
            });
    }

    /// Weakness (1 - accuracy) over the full history of each attempted
    /// operation. Operations never attempted are absent.
    pub fn weak_areas(&self) -> BTreeMap<Operation, f64> {
        let mut weak_areas = BTreeMap::new();

        for operation in Operation::ALL {
            let (attempted, correct) = self
                .history
                .iter()
                .filter(|attempt| attempt.operation == operation)
                .fold((0usize, 0usize), |(attempted, correct), attempt| {
                    (attempted + 1, correct + usize::from(attempt.is_correct))
                });

            if attempted > 0 {
                weak_areas.insert(operation, 1.0 - correct as f64 / attempted as f64);
            }
        }

        weak_areas
    }

    /// Nudges `base_difficulty` by one step based on the operation's most
    /// recent feedback window.
    pub fn predict_difficulty(&self, operation: Operation, base_difficulty: u32) -> u32 {
        let feedback = self.feedback(operation);
        let settings = &self.settings;

        if feedback.len() < settings.min_feedback {
            return base_difficulty;
        }

        let window = settings.recent_window.max(1).min(feedback.len());
        let recent = &feedback[feedback.len() - window..];
        let correct = recent.iter().filter(|entry| entry.was_correct).count();
        let accuracy = correct as f64 / recent.len() as f64;
        let avg_time =
            recent.iter().map(|entry| entry.time_taken).sum::<f64>() / recent.len() as f64;

        let predicted = if accuracy > settings.easy_accuracy && avg_time < settings.easy_seconds {
            base_difficulty.saturating_add(1).min(settings.max_difficulty)
        } else if accuracy < settings.hard_accuracy || avg_time > settings.hard_seconds {
            base_difficulty.saturating_sub(1).max(1)
        } else {
            base_difficulty
        };
        let direction = match predicted.cmp(&base_difficulty) {
            Ordering::Greater => "up",
            Ordering::Less => "down",
            Ordering::Equal => "none",
        };

        tracing::debug!(
            "Predicted difficulty for {}: base={}, predicted={}, accuracy={:.2}, avg_time={:.1}",
            operation,
            base_difficulty,
            predicted,
            accuracy,
            avg_time
        );

        DIFFICULTY_ADJUSTMENTS_TOTAL
            .with_label_values(&[operation.as_str(), direction])
            .inc();

        predicted
    }

    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    pub fn total_attempts(&self) -> usize {
        self.history.len()
    }

    pub fn mistakes(&self, operation: Operation) -> &[MistakeRecord] {
        self.mistakes
            .get(&operation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn feedback(&self, operation: Operation) -> &[DifficultyFeedback] {
        self.feedback
            .get(&operation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Accuracy over the trailing `window` attempts, `None` with no history.
    pub fn recent_accuracy(&self, window: usize) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }

        let window = window.max(1).min(self.history.len());
        let recent = &self.history[self.history.len() - window..];
        let correct = recent.iter().filter(|attempt| attempt.is_correct).count();
        Some(correct as f64 / recent.len() as f64)
    }

    pub fn mistake_counts(&self) -> BTreeMap<MistakeCategory, usize> {
        let mut counts = BTreeMap::new();
        for record in self.mistakes.values().flatten() {
            *counts.entry(record.mistake_type).or_insert(0) += 1;
        }
        counts
    }
}

/// Classifies a wrong answer. Wrong-operation checks need the structured
/// operands; without them only the distance to the correct answer is used.
pub fn classify_mistake(problem: &Problem, user_answer: i64) -> MistakeCategory {
    if let Some(Operands { left, right }) = problem.operands {
        let (a, b) = (i64::from(left), i64::from(right));
        let wrong_operation = match problem.operation {
            Operation::Addition if user_answer == (a - b).abs() => {
                Some(MistakeCategory::SubtractedInsteadOfAdded)
            }
            Operation::Subtraction if user_answer == a + b => {
                Some(MistakeCategory::AddedInsteadOfSubtracted)
            }
            Operation::Multiplication if user_answer == a + b => {
                Some(MistakeCategory::AddedInsteadOfMultiplied)
            }
            _ => None,
        };
        if let Some(category) = wrong_operation {
            return category;
        }
    }

    if user_answer.abs_diff(problem.answer) <= 2 {
        MistakeCategory::CalculationError
    } else {
        MistakeCategory::ConceptualError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(
        operation: Operation,
        left: u32,
        right: u32,
        answer: i64,
        difficulty: u32,
    ) -> Problem {
        Problem::new(operation, Operands::new(left, right), answer, difficulty)
    }

    fn addition(difficulty: u32) -> Problem {
        problem(Operation::Addition, 10, 5, 15, difficulty)
    }

    fn record_many(
        tracker: &mut PerformanceTracker,
        p: &Problem,
        answer: i64,
        time: f64,
        n: usize,
    ) {
        for _ in 0..n {
            tracker.record_attempt(p, answer, time);
        }
    }

    #[test]
    fn classifies_addition_mistakes() {
        let p = addition(1);
        assert_eq!(
            classify_mistake(&p, 5),
            MistakeCategory::SubtractedInsteadOfAdded
        );
        assert_eq!(classify_mistake(&p, 16), MistakeCategory::CalculationError);
        assert_eq!(classify_mistake(&p, 2), MistakeCategory::ConceptualError);
    }

    #[test]
    fn classifies_subtraction_and_multiplication_wrong_operation() {
        let sub = problem(Operation::Subtraction, 40, 12, 28, 3);
        assert_eq!(
            classify_mistake(&sub, 52),
            MistakeCategory::AddedInsteadOfSubtracted
        );

        let mul = problem(Operation::Multiplication, 6, 7, 42, 3);
        assert_eq!(
            classify_mistake(&mul, 13),
            MistakeCategory::AddedInsteadOfMultiplied
        );
        assert_eq!(classify_mistake(&mul, 41), MistakeCategory::CalculationError);
    }

    #[test]
    fn wrong_operation_check_wins_over_closeness() {
        // 2 + 1: |2 - 1| = 1 is also within two of 3
        let p = problem(Operation::Addition, 2, 1, 3, 1);
        assert_eq!(
            classify_mistake(&p, 1),
            MistakeCategory::SubtractedInsteadOfAdded
        );
    }

    #[test]
    fn division_only_uses_distance_rules() {
        let p = problem(Operation::Division, 56, 7, 8, 4);
        assert_eq!(classify_mistake(&p, 63), MistakeCategory::ConceptualError);
        assert_eq!(classify_mistake(&p, 9), MistakeCategory::CalculationError);
    }

    #[test]
    fn problems_without_operands_fall_back_to_distance() {
        let mut p = addition(1);
        p.operands = None;
        assert_eq!(classify_mistake(&p, 5), MistakeCategory::ConceptualError);
        assert_eq!(classify_mistake(&p, 14), MistakeCategory::CalculationError);
    }

    #[test]
    fn extreme_answers_classify_without_overflow() {
        let mut p = problem(Operation::Division, 56, 7, 8, 4);
        assert_eq!(
            classify_mistake(&p, i64::MIN),
            MistakeCategory::ConceptualError
        );
        assert_eq!(
            classify_mistake(&p, i64::MAX),
            MistakeCategory::ConceptualError
        );

        p.operands = None;
        p.answer = 0;
        assert_eq!(
            classify_mistake(&p, i64::MIN),
            MistakeCategory::ConceptualError
        );

        p.answer = i64::MAX;
        assert_eq!(
            classify_mistake(&p, i64::MIN),
            MistakeCategory::ConceptualError
        );
        assert_eq!(
            classify_mistake(&p, i64::MAX - 1),
            MistakeCategory::CalculationError
        );
    }

    #[test]
    fn every_attempt_gets_feedback_and_only_misses_get_mistakes() {
        let mut tracker = PerformanceTracker::default();
        let p = addition(2);

        tracker.record_attempt(&p, 15, 4.0);
        tracker.record_attempt(&p, 5, 6.0);
        tracker.record_attempt(&p, 16, 8.0);

        assert_eq!(tracker.total_attempts(), 3);
        assert_eq!(tracker.feedback(Operation::Addition).len(), 3);
        assert_eq!(tracker.mistakes(Operation::Addition).len(), 2);
        assert!(tracker.mistakes(Operation::Division).is_empty());

        let first = &tracker.history()[0];
        assert!(first.is_correct);
        assert_eq!(first.difficulty, 2);

        let mistake = &tracker.mistakes(Operation::Addition)[0];
        assert_eq!(mistake.problem_text, "10 + 5");
        assert_eq!(mistake.correct_answer, 15);
        assert_eq!(mistake.mistake_type, MistakeCategory::SubtractedInsteadOfAdded);
    }

    #[test]
    fn weak_areas_reflect_full_history_and_skip_unattempted() {
        let mut tracker = PerformanceTracker::default();
        let add = addition(1);
        let div = problem(Operation::Division, 12, 3, 4, 2);

        // 4 attempts, 1 correct
        record_many(&mut tracker, &add, 15, 5.0, 1);
        record_many(&mut tracker, &add, 99, 5.0, 3);
        // 2 attempts, 2 correct
        record_many(&mut tracker, &div, 4, 5.0, 2);

        let weak = tracker.weak_areas();
        assert_eq!(weak.len(), 2);
        assert!((weak[&Operation::Addition] - 0.75).abs() < 1e-9);
        assert_eq!(weak[&Operation::Division], 0.0);
        assert!(!weak.contains_key(&Operation::Subtraction));
    }

    #[test]
    fn prediction_needs_three_entries() {
        let mut tracker = PerformanceTracker::default();
        assert_eq!(tracker.predict_difficulty(Operation::Addition, 3), 3);

        record_many(&mut tracker, &addition(3), 99, 100.0, 2);
        assert_eq!(tracker.predict_difficulty(Operation::Addition, 3), 3);
    }

    #[test]
    fn fast_accurate_streak_raises_difficulty_up_to_cap() {
        let mut tracker = PerformanceTracker::default();
        record_many(&mut tracker, &addition(3), 15, 5.0, 5);

        assert_eq!(tracker.predict_difficulty(Operation::Addition, 3), 4);
        assert_eq!(tracker.predict_difficulty(Operation::Addition, 6), 6);
    }

    #[test]
    fn struggling_lowers_difficulty_with_floor_of_one() {
        let mut tracker = PerformanceTracker::default();
        let p = problem(Operation::Subtraction, 40, 12, 28, 3);
        record_many(&mut tracker, &p, 0, 5.0, 5);

        assert_eq!(tracker.predict_difficulty(Operation::Subtraction, 1), 1);
        assert_eq!(tracker.predict_difficulty(Operation::Subtraction, 4), 3);
    }

    #[test]
    fn slow_answers_count_as_too_hard() {
        let mut tracker = PerformanceTracker::default();
        record_many(&mut tracker, &addition(3), 15, 45.0, 4);

        assert_eq!(tracker.predict_difficulty(Operation::Addition, 3), 2);
    }

    #[test]
    fn middling_performance_keeps_base() {
        let mut tracker = PerformanceTracker::default();
        let p = addition(3);
        // 3 of 5 correct, fast
        record_many(&mut tracker, &p, 15, 5.0, 3);
        record_many(&mut tracker, &p, 99, 5.0, 2);

        assert_eq!(tracker.predict_difficulty(Operation::Addition, 3), 3);
    }

    #[test]
    fn prediction_only_looks_at_recent_window() {
        let mut tracker = PerformanceTracker::default();
        let p = addition(3);
        record_many(&mut tracker, &p, 99, 60.0, 10);
        record_many(&mut tracker, &p, 15, 2.0, 5);

        assert_eq!(tracker.predict_difficulty(Operation::Addition, 3), 4);
    }

    #[test]
    fn recent_accuracy_and_mistake_counts() {
        let mut tracker = PerformanceTracker::default();
        assert_eq!(tracker.recent_accuracy(10), None);

        let add = addition(1);
        record_many(&mut tracker, &add, 5, 5.0, 2);
        record_many(&mut tracker, &add, 2, 5.0, 1);
        record_many(&mut tracker, &add, 15, 5.0, 1);

        assert_eq!(tracker.recent_accuracy(10), Some(0.25));
        assert_eq!(tracker.recent_accuracy(1), Some(1.0));

        let counts = tracker.mistake_counts();
        assert_eq!(counts[&MistakeCategory::SubtractedInsteadOfAdded], 2);
        assert_eq!(counts[&MistakeCategory::ConceptualError], 1);
        assert!(!counts.contains_key(&MistakeCategory::CalculationError));
    }

    #[test]
    fn custom_settings_change_thresholds() {
        let settings = TrackerSettings {
            min_feedback: 1,
            max_difficulty: 10,
            ..TrackerSettings::default()
        };
        let mut tracker = PerformanceTracker::new(settings);
        tracker.record_attempt(&addition(8), 15, 1.0);

        assert_eq!(tracker.predict_difficulty(Operation::Addition, 8), 9);
    }
}
